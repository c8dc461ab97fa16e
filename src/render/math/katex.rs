//! KaTeX passthrough renderer.

use super::MathRenderer;
use crate::error::{RenderError, Result};
use crate::render::escape_html;

/// Renderer that outputs delimited LaTeX for client-side KaTeX.
///
/// Typesetting happens in the browser, so in strict mode the only errors
/// reported here are structural ones KaTeX would reject outright: unbalanced
/// braces and unmatched `\begin`/`\end`.
pub struct KaTeXRenderer {
    throw_on_error: bool,
}

impl KaTeXRenderer {
    pub fn new(throw_on_error: bool) -> Self {
        Self { throw_on_error }
    }

    fn check(&self, latex: &str) -> Result<()> {
        if !self.throw_on_error {
            return Ok(());
        }
        check_balanced(latex).map_err(|message| RenderError::Math(message).into())
    }
}

impl Default for KaTeXRenderer {
    fn default() -> Self {
        Self::new(false)
    }
}

impl MathRenderer for KaTeXRenderer {
    fn render_inline(&self, latex: &str) -> Result<String> {
        self.check(latex)?;
        Ok(format!(
            r#"<span class="math inline">\({}\)</span>"#,
            escape_html(latex)
        ))
    }

    fn render_display(&self, latex: &str) -> Result<String> {
        self.check(latex)?;
        Ok(format!(
            r#"<div class="math display">\[{}\]</div>"#,
            escape_html(latex)
        ))
    }

    fn head_content(&self) -> Option<String> {
        Some(KATEX_HEAD.to_string())
    }
}

/// Brace balance, honouring `\{`/`\}`, and matching `\begin`/`\end` counts.
pub(crate) fn check_balanced(latex: &str) -> std::result::Result<(), String> {
    let mut depth = 0i32;
    let mut chars = latex.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                // `\{` and `\}` are literal braces.
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err("unexpected `}`".into());
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("missing `}`".into());
    }

    let begins = latex.matches("\\begin{").count();
    let ends = latex.matches("\\end{").count();
    if begins != ends {
        return Err(format!(
            "{} \\begin but {} \\end in environment markup",
            begins, ends
        ));
    }
    Ok(())
}

const KATEX_HEAD: &str = r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css" crossorigin="anonymous">
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.js" crossorigin="anonymous"></script>
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/contrib/auto-render.min.js" crossorigin="anonymous"
    onload="renderMathInElement(document.body, {
        delimiters: [
            {left: '\\[', right: '\\]', display: true},
            {left: '\\(', right: '\\)', display: false}
        ],
        throwOnError: false
    });"></script>"#;
