//! Delimiter recognisers for math in question text.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::char,
    combinator::{not, peek, value},
    IResult,
};

/// A token recognised at the start of the input.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    InlineMath(&'a str),
    DisplayMath(&'a str),
    /// `\$`, a literal dollar sign.
    EscapedDollar,
    /// `\\`, a LaTeX line break kept as literal text.
    LineBreak,
}

/// Parse inline math (`$...$`).
pub fn inline_math(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('$')(input)?;
    let (input, _) = peek(not(char('$')))(input)?; // Not display math
    let (input, content) = take_until("$")(input)?;
    let (input, _) = char('$')(input)?;
    Ok((input, Token::InlineMath(content)))
}

/// Parse display math (`$$...$$`).
pub fn display_math(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = tag("$$")(input)?;
    let (input, content) = take_until("$$")(input)?;
    let (input, _) = tag("$$")(input)?;
    Ok((input, Token::DisplayMath(content)))
}

/// Parse bracketed display math (`\[...\]`).
pub fn bracket_math(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = tag("\\[")(input)?;
    let (input, content) = take_until("\\]")(input)?;
    let (input, _) = tag("\\]")(input)?;
    Ok((input, Token::DisplayMath(content)))
}

/// Parse parenthesised inline math (`\(...\)`).
pub fn paren_math(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = tag("\\(")(input)?;
    let (input, content) = take_until("\\)")(input)?;
    let (input, _) = tag("\\)")(input)?;
    Ok((input, Token::InlineMath(content)))
}

/// Parse any math span. `$$` is tried before `$`.
pub fn math_span(input: &str) -> IResult<&str, Token<'_>> {
    alt((display_math, inline_math, bracket_math, paren_math))(input)
}

/// Parse an escaped dollar (`\$`) or a LaTeX line break (`\\`).
pub fn escape(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        value(Token::EscapedDollar, tag("\\$")),
        value(Token::LineBreak, tag("\\\\")),
    ))(input)
}

/// Whether `input` starts with something [`math_span`] could open.
pub fn at_math_opener(input: &str) -> bool {
    input.starts_with('$') || input.starts_with("\\[") || input.starts_with("\\(")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_math() {
        assert_eq!(
            inline_math("$E = mc^2$ rest"),
            Ok((" rest", Token::InlineMath("E = mc^2")))
        );
    }

    #[test]
    fn test_inline_rejects_double_dollar() {
        assert!(inline_math("$$x$$").is_err());
    }

    #[test]
    fn test_display_math() {
        assert_eq!(
            display_math("$$\\int_0^1 x dx$$"),
            Ok(("", Token::DisplayMath("\\int_0^1 x dx")))
        );
    }

    #[test]
    fn test_display_keeps_single_dollar_inside() {
        assert_eq!(
            math_span("$$a$b$$!"),
            Ok(("!", Token::DisplayMath("a$b")))
        );
    }

    #[test]
    fn test_unterminated_fails() {
        assert!(math_span("$x + 1").is_err());
        assert!(math_span("$$x + 1$").is_err());
    }

    #[test]
    fn test_bracket_and_paren() {
        assert_eq!(
            math_span("\\[x^2\\] tail"),
            Ok((" tail", Token::DisplayMath("x^2")))
        );
        assert_eq!(math_span("\\(y\\)"), Ok(("", Token::InlineMath("y"))));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("\\$5"), Ok(("5", Token::EscapedDollar)));
        assert_eq!(escape("\\\\ next"), Ok((" next", Token::LineBreak)));
        assert!(escape("\\frac").is_err());
    }
}
