//! Renderer configuration, loadable from TOML.
//!
//! ```toml
//! math_backend = "mathml"
//! auto_wrap = "environments"
//!
//! [table]
//! fixture_caption = ""
//!
//! [fonts]
//! bengali_class = "font-tiro-bangla"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::render::math::MathBackend;

/// Caption of the two-row variable/value fixture table.
pub const FIXTURE_CAPTION: &str = "নিচের ছকটি সঠিক?";

/// When text without `$` delimiters is treated as math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoWrap {
    /// Wrap on `\begin{...}` environments and on bare LaTeX keywords such as
    /// `\frac` or `^{`.
    #[default]
    Heuristic,
    /// Wrap only on `\begin{...}` environments.
    Environments,
    /// Never wrap; only explicit delimiters produce math.
    Off,
}

/// Top-level renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Engine used for math segments.
    pub math_backend: MathBackend,
    /// Propagate engine parse errors instead of using the engine's own
    /// error-tolerant output.
    pub throw_on_error: bool,
    pub auto_wrap: AutoWrap,
    pub table: TableConfig,
    pub fonts: FontConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            math_backend: MathBackend::MathML,
            throw_on_error: false,
            auto_wrap: AutoWrap::Heuristic,
            table: TableConfig::default(),
            fonts: FontConfig::default(),
        }
    }
}

/// Table extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Caption put above the variable/value fixture table. Empty disables it.
    pub fixture_caption: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            fixture_caption: FIXTURE_CAPTION.to_string(),
        }
    }
}

/// Bengali/English font tagging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub enabled: bool,
    pub bengali_class: String,
    pub other_class: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bengali_class: "font-bengali".to_string(),
            other_class: "font-english".to_string(),
        }
    }
}

impl RenderConfig {
    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml(input: &str) -> Result<Self> {
        let config: RenderConfig = toml::from_str(input).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    fn validate(&self) -> Result<()> {
        check_class_name("fonts.bengali_class", &self.fonts.bengali_class)?;
        check_class_name("fonts.other_class", &self.fonts.other_class)?;
        Ok(())
    }
}

fn check_class_name(key: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid {
            key,
            message: "class name must not be empty".into(),
        }
        .into());
    }
    if value.contains(|c: char| matches!(c, '"' | '<' | '>' | '&')) {
        return Err(ConfigError::Invalid {
            key,
            message: format!("class name {:?} contains markup characters", value),
        }
        .into());
    }
    Ok(())
}
