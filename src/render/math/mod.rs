//! Math rendering engines and the tiered fallback around them.

mod fallback;
mod katex;
mod mathml;

pub use self::fallback::{error_span, render_math, render_segments};
pub(crate) use self::katex::check_balanced;
pub use self::katex::KaTeXRenderer;
pub use self::mathml::MathMLRenderer;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Math rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathBackend {
    /// Convert to MathML on the server.
    #[default]
    MathML,
    /// Emit delimited LaTeX for KaTeX to typeset in the browser.
    KaTeX,
}

/// Trait for math renderers.
///
/// Implementations return `Err` only for a failure the caller should fall
/// back from: a crash inside the engine, or a parse error when the engine
/// was created with `throw_on_error`.
pub trait MathRenderer {
    /// Render inline math.
    fn render_inline(&self, latex: &str) -> Result<String>;

    /// Render display math.
    fn render_display(&self, latex: &str) -> Result<String>;

    /// Get any required HTML head content (scripts, styles).
    fn head_content(&self) -> Option<String>;
}

/// Create a math renderer for the given backend.
pub fn create_renderer(backend: MathBackend, throw_on_error: bool) -> Box<dyn MathRenderer> {
    match backend {
        MathBackend::KaTeX => Box::new(KaTeXRenderer::new(throw_on_error)),
        MathBackend::MathML => Box::new(MathMLRenderer::new(throw_on_error)),
    }
}
