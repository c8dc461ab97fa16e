//! Rendering layer: math engines and the content façade.

pub mod content;
pub mod math;

pub use content::{ContentRenderer, RenderState, Rendered};
pub use math::{create_renderer, render_math, MathBackend, MathRenderer};

/// Escape text for use in HTML element content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
        assert_eq!(escape_html("বাংলা"), "বাংলা");
    }
}
