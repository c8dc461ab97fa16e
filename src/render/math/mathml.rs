//! MathML renderer.

use super::MathRenderer;
use crate::error::Result;
#[cfg(feature = "mathml")]
use crate::error::RenderError;
use crate::render::escape_html;

/// `latex2mathml` keeps going after an unknown command and leaves this marker
/// inside an `<mtext>` element.
#[cfg(feature = "mathml")]
const PARSE_ERROR_MARKER: &str = "[PARSE ERROR:";

/// Renderer that converts LaTeX to MathML.
pub struct MathMLRenderer {
    throw_on_error: bool,
}

impl MathMLRenderer {
    pub fn new(throw_on_error: bool) -> Self {
        Self { throw_on_error }
    }

    #[cfg(feature = "mathml")]
    fn convert(&self, latex: &str, style: latex2mathml::DisplayStyle) -> Result<Option<String>> {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            latex2mathml::latex_to_mathml(latex, style)
        }))
        .map_err(|_| RenderError::Math(format!("math engine crashed on {:?}", latex)))?;

        match outcome {
            Ok(mathml) if !mathml.contains(PARSE_ERROR_MARKER) => Ok(Some(mathml)),
            Ok(_) if self.throw_on_error => {
                Err(RenderError::Math(format!("unsupported command in {:?}", latex)).into())
            }
            Err(e) if self.throw_on_error => Err(RenderError::Math(e.to_string()).into()),
            _ => Ok(None),
        }
    }
}

impl Default for MathMLRenderer {
    fn default() -> Self {
        Self::new(false)
    }
}

impl MathRenderer for MathMLRenderer {
    fn render_inline(&self, latex: &str) -> Result<String> {
        #[cfg(feature = "mathml")]
        {
            match self.convert(latex, latex2mathml::DisplayStyle::Inline)? {
                Some(mathml) => Ok(mathml),
                None => Ok(format!(
                    r#"<span class="math inline math-error">{}</span>"#,
                    escape_html(latex)
                )),
            }
        }

        #[cfg(not(feature = "mathml"))]
        {
            let _ = self.throw_on_error;
            Ok(format!(
                r#"<span class="math inline">\({}\)</span>"#,
                escape_html(latex)
            ))
        }
    }

    fn render_display(&self, latex: &str) -> Result<String> {
        #[cfg(feature = "mathml")]
        {
            match self.convert(latex, latex2mathml::DisplayStyle::Block)? {
                Some(mathml) => Ok(format!(r#"<div class="math display">{}</div>"#, mathml)),
                None => Ok(format!(
                    r#"<div class="math display math-error">{}</div>"#,
                    escape_html(latex)
                )),
            }
        }

        #[cfg(not(feature = "mathml"))]
        {
            let _ = self.throw_on_error;
            Ok(format!(
                r#"<div class="math display">\[{}\]</div>"#,
                escape_html(latex)
            ))
        }
    }

    fn head_content(&self) -> Option<String> {
        Some(MATHML_STYLES.to_string())
    }
}

const MATHML_STYLES: &str = r#"<style>
.math-error, .latex-error {
    color: #b00020;
    font-family: monospace;
}
math {
    font-size: 1.1em;
}
</style>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mathml_inline() {
        let result = MathMLRenderer::default().render_inline("x^{2}").unwrap();
        assert!(!result.is_empty());
    }

    #[test]
    fn test_mathml_display_wrapped() {
        let result = MathMLRenderer::default().render_display("a+b").unwrap();
        assert!(result.starts_with(r#"<div class="math display"#));
    }

    #[cfg(feature = "mathml")]
    #[test]
    fn test_produces_math_element() {
        let result = MathMLRenderer::default().render_inline("x+1").unwrap();
        assert!(result.contains("<math"));
    }

    #[cfg(feature = "mathml")]
    #[test]
    fn test_tolerant_mode_hides_parse_marker() {
        let html = MathMLRenderer::new(false)
            .render_inline("\\mathcal{Z}_{ij}")
            .unwrap();
        assert!(!html.contains(PARSE_ERROR_MARKER));
        assert!(html.contains("math-error"));
    }

    #[cfg(feature = "mathml")]
    #[test]
    fn test_strict_mode_reports_errors() {
        let renderer = MathMLRenderer::new(true);
        assert!(renderer.render_inline("\\mathcal{Z}").is_err());
        assert!(renderer.render_inline("x+1").is_ok());
    }
}
