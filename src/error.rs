//! Error types for the qbank-latex library.
//!
//! The public render entry points never return these: every failure while
//! rendering is recovered by a fallback tier or turned into an inline error
//! block. They surface from configuration loading, the host adapters, and
//! the individual tiers when called directly.

use thiserror::Error;

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised inside the rendering tiers.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The math engine rejected or crashed on a formula.
    #[error("Math rendering error: {0}")]
    Math(String),

    /// Neither repair nor extraction found any row/column structure.
    #[error("Table parse error: {0}")]
    TableParse(String),

    /// Anything else that went wrong while dispatching a render.
    #[error("Unhandled render failure: {0}")]
    Unhandled(String),
}

/// Errors that occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for `{key}`: {message}")]
    Invalid { key: &'static str, message: String },
}
