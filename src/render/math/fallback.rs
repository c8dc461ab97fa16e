use super::MathRenderer;
use crate::ast::{SegmentKind, TextSegment};
use crate::render::escape_html;
use crate::rules::{apply_tier, Tier};

/// Render one formula, falling back through progressively looser attempts.
///
/// 1. Brace bare single-character scripts and render in the requested mode.
/// 2. Apply the math-fallback rules and retry once inline.
/// 3. Show the escaped source, delimiters included, as an error span.
///
/// Never fails.
pub fn render_math(engine: &dyn MathRenderer, latex: &str, display: bool) -> String {
    let normalized = apply_tier(Tier::ScriptNormalize, latex);
    let first = if display {
        engine.render_display(&normalized)
    } else {
        engine.render_inline(&normalized)
    };

    match first {
        Ok(html) => return html,
        Err(e) => log::warn!("math render failed, retrying with fallback rules: {}", e),
    }

    let repaired = apply_tier(Tier::MathFallback, &normalized);
    match engine.render_inline(&repaired) {
        Ok(html) => html,
        Err(e) => {
            log::warn!("math fallback failed, showing source: {}", e);
            error_span(latex, display)
        }
    }
}

/// The last-resort markup for a formula no engine attempt could render.
pub fn error_span(latex: &str, display: bool) -> String {
    let delimiter = if display { "$$" } else { "$" };
    format!(
        r#"<span class="latex-error">{}</span>"#,
        escape_html(&format!("{delimiter}{latex}{delimiter}"))
    )
}

/// Render a segment list: math through [`render_math`], literal text as is.
pub fn render_segments(engine: &dyn MathRenderer, segments: &[TextSegment]) -> String {
    let mut html = String::new();
    for segment in segments {
        match segment.kind {
            SegmentKind::Literal => html.push_str(&segment.text),
            SegmentKind::InlineMath => html.push_str(&render_math(engine, &segment.text, false)),
            SegmentKind::DisplayMath => html.push_str(&render_math(engine, &segment.text, true)),
        }
    }
    html
}
