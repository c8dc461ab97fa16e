//! # qbank-latex
//!
//! Renders the text fields of a multiple-choice question bank (question,
//! options, explanation, hint) to HTML. Fields are plain Bengali or English
//! text, text with inline or display LaTeX math, or `longtable` markup left
//! behind by document converters.
//!
//! ## Quick Start
//!
//! ```rust
//! use qbank_latex::{render, ContentRenderer, RenderConfig, RenderState};
//!
//! // Plain text passes through unchanged.
//! assert_eq!(render("বাংলাদেশের রাজধানী কোথায়?"), "বাংলাদেশের রাজধানী কোথায়?");
//!
//! // Math is rendered, literal text kept.
//! let renderer = ContentRenderer::new(RenderConfig::default());
//! let rendered = renderer.render("Solve $x^2=4$");
//! assert_eq!(rendered.state, RenderState::MathOnly);
//! assert!(rendered.html.starts_with("Solve "));
//! ```
//!
//! ## Rendering states
//!
//! Each input is classified, in this order:
//!
//! - empty → `Plain`, empty output
//! - a `longtable` with converter column specs, or one of the known mangled
//!   table shapes → `ComplexTable`
//! - any other `longtable` → `LongtableSimple`
//! - math delimiters (`$`, `$$`, `\(`, `\[`) or, depending on
//!   [`AutoWrap`], bare LaTeX → `MathOnly`
//! - anything else → `Plain`, output equals input
//!
//! A crash in any state yields an `Error` block showing the source; render
//! calls never fail.
//!
//! ## Tables
//!
//! Complex tables are first repaired into an `array` and rendered as math,
//! then extracted cell by cell into an HTML table, and finally replaced with
//! a fixed placeholder table. See [`table`].
//!
//! ## Fonts
//!
//! [`render_field`] additionally wraps Bengali and non-Bengali runs of text
//! in `<span>`s with configurable font classes.
//!
//! ## Configuration
//!
//! ```toml
//! math_backend = "mathml"   # or "katex"
//! throw_on_error = false
//! auto_wrap = "heuristic"   # or "environments", "off"
//!
//! [table]
//! fixture_caption = "নিচের ছকটি সঠিক?"
//!
//! [fonts]
//! enabled = true
//! bengali_class = "font-bengali"
//! other_class = "font-english"
//! ```
//!
//! ## Features
//!
//! - `mathml` (default): server-side MathML via `latex2mathml`
//! - `wasm`: WebAssembly bindings (requires `wasm-bindgen`)

pub mod ast;
pub mod config;
pub mod error;
pub mod parser;
pub mod render;
pub mod rules;
pub mod script;
pub mod table;
pub mod unicode;

// FFI module (always compiled for cdylib)
pub mod ffi;

// WASM module (only with feature)
#[cfg(feature = "wasm")]
pub mod wasm;

pub use ast::{ParsedTable, Script, ScriptRun, SegmentKind, TableCell, TextSegment};
pub use config::{AutoWrap, FontConfig, RenderConfig, TableConfig};
pub use error::{ConfigError, Error, RenderError, Result};
pub use parser::{tokenize, Tokenizer};
pub use render::{
    create_renderer, render_math, ContentRenderer, MathBackend, MathRenderer, RenderState,
    Rendered,
};
pub use script::{apply_fonts, is_bengali, segment_scripts};
pub use table::{
    contains_complex_table, convert_latex_table, extract_table, render_table_html,
    repair_longtable, repair_longtable_for,
};
pub use unicode::convert_latex_to_unicode;

/// Render one field to HTML with the default configuration.
pub fn render(input: &str) -> String {
    ContentRenderer::default().render(input).html
}

/// Render one field and tag its Bengali/English runs with the default font
/// classes.
pub fn render_field(input: &str) -> String {
    ContentRenderer::default().render_field(input)
}
