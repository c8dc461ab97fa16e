//! Splitting question text into literal and math segments.

use crate::ast::TextSegment;
use crate::config::AutoWrap;
use crate::parser::lexer::{at_math_opener, escape, math_span, Token};

/// LaTeX markers that make text without delimiters count as math under
/// [`AutoWrap::Heuristic`].
pub const BARE_KEYWORDS: &[&str] = &[
    "\\textbf", "\\frac", "\\text", "\\neq", "_{", "^{", "\\begin", "\\end",
];

/// Tokenizer with a configurable auto-wrap policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    pub auto_wrap: AutoWrap,
}

impl Tokenizer {
    pub fn new(auto_wrap: AutoWrap) -> Self {
        Self { auto_wrap }
    }

    /// Split `input` into segments in input order.
    ///
    /// Never fails: an opening `$` or `$$` without a partner turns the rest of
    /// the input into literal text.
    pub fn tokenize(&self, input: &str) -> Vec<TextSegment> {
        if input.is_empty() {
            return Vec::new();
        }

        if let Some(segment) = self.auto_wrap(input) {
            return vec![segment];
        }

        split_delimited(input)
    }

    /// Whether `input` would be auto-wrapped as math under this policy.
    pub fn wraps(&self, input: &str) -> bool {
        self.auto_wrap(input).is_some()
    }

    fn auto_wrap(&self, input: &str) -> Option<TextSegment> {
        if self.auto_wrap == AutoWrap::Off || has_explicit_delimiters(input) {
            return None;
        }

        if has_environment(input) {
            log::debug!("auto-wrapping LaTeX environment as display math");
            return Some(TextSegment::display_math(input));
        }

        if self.auto_wrap == AutoWrap::Heuristic && has_bare_keywords(input) {
            log::debug!("auto-wrapping bare LaTeX keywords as inline math");
            return Some(TextSegment::inline_math(input));
        }

        None
    }
}

/// Tokenize with the default (heuristic) auto-wrap policy.
pub fn tokenize(input: &str) -> Vec<TextSegment> {
    Tokenizer::default().tokenize(input)
}

/// Whether `input` contains a `\begin{...}` environment marker.
pub fn has_environment(input: &str) -> bool {
    input
        .match_indices("\\begin{")
        .any(|(at, _)| input[at + 7..].contains('}'))
}

/// Whether `input` contains any of [`BARE_KEYWORDS`].
pub fn has_bare_keywords(input: &str) -> bool {
    BARE_KEYWORDS.iter().any(|kw| input.contains(kw))
}

/// Whether `input` contains an explicit math delimiter.
pub fn has_explicit_delimiters(input: &str) -> bool {
    input.contains('$') || input.contains("\\(") || input.contains("\\]")
}

/// Split on explicit delimiters only.
fn split_delimited(input: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut remaining = input;

    while !remaining.is_empty() {
        if let Ok((rest, _)) = escape(remaining) {
            literal.push_str(&remaining[..remaining.len() - rest.len()]);
            remaining = rest;
            continue;
        }

        if at_math_opener(remaining) {
            match math_span(remaining) {
                Ok((rest, token)) => {
                    flush_literal(&mut literal, &mut segments);
                    match token {
                        Token::DisplayMath(content) => {
                            segments.push(TextSegment::display_math(content))
                        }
                        Token::InlineMath(content) => {
                            segments.push(TextSegment::inline_math(content))
                        }
                        Token::EscapedDollar | Token::LineBreak => {}
                    }
                    remaining = rest;
                }
                Err(_) if remaining.starts_with('$') => {
                    log::debug!("unterminated math delimiter, keeping the rest as text");
                    literal.push_str(remaining);
                    break;
                }
                Err(_) => {
                    // A lone `\[` or `\(` stays literal; scanning continues.
                    literal.push_str(&remaining[..2]);
                    remaining = &remaining[2..];
                }
            }
            continue;
        }

        let (text, rest) = consume_text(remaining);
        literal.push_str(text);
        remaining = rest;
    }

    flush_literal(&mut literal, &mut segments);
    segments
}

/// Consume text up to the next `$` or backslash, always at least one char.
fn consume_text(input: &str) -> (&str, &str) {
    let end = input
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '$' || c == '\\')
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    input.split_at(end)
}

fn flush_literal(literal: &mut String, segments: &mut Vec<TextSegment>) {
    if !literal.is_empty() {
        segments.push(TextSegment::literal(std::mem::take(literal)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SegmentKind;
    use pretty_assertions::assert_eq;

    fn off() -> Tokenizer {
        Tokenizer::new(AutoWrap::Off)
    }

    #[test]
    fn test_solve_scenario() {
        assert_eq!(
            tokenize("Solve $x^2=4$"),
            vec![
                TextSegment::literal("Solve "),
                TextSegment::inline_math("x^2=4"),
            ]
        );
    }

    #[test]
    fn test_display_before_inline() {
        assert_eq!(
            tokenize("a $$b$$ c $d$"),
            vec![
                TextSegment::literal("a "),
                TextSegment::display_math("b"),
                TextSegment::literal(" c "),
                TextSegment::inline_math("d"),
            ]
        );
    }

    #[test]
    fn test_unterminated_inline_is_literal() {
        assert_eq!(
            tokenize("cost $5 and $x$"),
            vec![
                TextSegment::literal("cost "),
                TextSegment::inline_math("5 and "),
                TextSegment::literal("x$"),
            ]
        );
        assert_eq!(
            tokenize("price is $5"),
            vec![TextSegment::literal("price is $5")]
        );
    }

    #[test]
    fn test_unterminated_display_never_split() {
        assert_eq!(
            tokenize("see $$x$ here"),
            vec![TextSegment::literal("see $$x$ here")]
        );
    }

    #[test]
    fn test_escaped_dollar_is_literal() {
        assert_eq!(
            tokenize("\\$5 or $y$"),
            vec![
                TextSegment::literal("\\$5 or "),
                TextSegment::inline_math("y"),
            ]
        );
    }

    #[test]
    fn test_bracket_delimiters() {
        let segments = off().tokenize("area \\(\\pi r^2\\) and \\[a+b\\]");
        assert_eq!(
            segments,
            vec![
                TextSegment::literal("area "),
                TextSegment::inline_math("\\pi r^2"),
                TextSegment::literal(" and "),
                TextSegment::display_math("a+b"),
            ]
        );
    }

    #[test]
    fn test_lone_bracket_opener_stays_literal() {
        assert_eq!(
            off().tokenize("x \\( y $z$"),
            vec![TextSegment::literal("x \\( y "), TextSegment::inline_math("z")]
        );
    }

    #[test]
    fn test_line_break_not_mistaken_for_bracket() {
        assert_eq!(
            off().tokenize("a \\\\[2pt] b \\]"),
            vec![TextSegment::literal("a \\\\[2pt] b \\]")]
        );
    }

    #[test]
    fn test_environment_auto_wrap() {
        let input = "\\begin{array}{cc} 1 & 2 \\end{array}";
        let segments = tokenize(input);
        assert_eq!(segments, vec![TextSegment::display_math(input)]);
    }

    #[test]
    fn test_keyword_auto_wrap_is_inline() {
        let segments = tokenize("\\frac{1}{2}");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::InlineMath);
    }

    #[test]
    fn test_auto_wrap_policies() {
        let keywords = "a_{1} + a_{2}";
        assert!(Tokenizer::new(AutoWrap::Heuristic).wraps(keywords));
        assert!(!Tokenizer::new(AutoWrap::Environments).wraps(keywords));
        assert!(!off().wraps("\\begin{matrix} 1 \\end{matrix}"));
        assert!(Tokenizer::new(AutoWrap::Environments).wraps("\\begin{matrix} 1 \\end{matrix}"));
    }

    #[test]
    fn test_no_wrap_when_delimited() {
        let segments = tokenize("$\\begin{matrix} 1 \\end{matrix}$ and \\frac");
        assert_eq!(segments[0], TextSegment::inline_math("\\begin{matrix} 1 \\end{matrix}"));
        assert_eq!(segments[1], TextSegment::literal(" and \\frac"));
    }

    #[test]
    fn test_plain_text_is_one_literal() {
        assert_eq!(
            tokenize("বাংলা প্রশ্ন"),
            vec![TextSegment::literal("বাংলা প্রশ্ন")]
        );
        assert!(tokenize("").is_empty());
    }
}
