//! Plain-text rendering of math for places that cannot show HTML, such as
//! spreadsheet exports and notification text.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::ast::SegmentKind;
use crate::config::AutoWrap;
use crate::parser::Tokenizer;

lazy_static! {
    static ref FRACTION: Regex = Regex::new(r"\\[dt]?frac\s*\{([^{}]*)\}\s*\{([^{}]*)\}").unwrap();
    static ref COMMAND: Regex = Regex::new(r"\\([A-Za-z]+)\s?").unwrap();
    static ref SUPERSCRIPT: Regex = Regex::new(r"\^(?:\{([^{}]*)\}|([^\s{}\\]))").unwrap();
    static ref SUBSCRIPT: Regex = Regex::new(r"_(?:\{([^{}]*)\}|([^\s{}\\]))").unwrap();
}

/// Replace every `$...$` and `$$...$$` span in `text` with a Unicode
/// approximation of the formula. Text without `$` is returned unchanged.
pub fn convert_latex_to_unicode(text: &str) -> String {
    if !text.contains('$') {
        return text.to_string();
    }

    Tokenizer::new(AutoWrap::Off)
        .tokenize(text)
        .into_iter()
        .map(|segment| match segment.kind {
            SegmentKind::Literal => segment.text,
            _ => math_to_unicode(&segment.text),
        })
        .collect()
}

/// Convert one formula body to Unicode.
pub fn math_to_unicode(latex: &str) -> String {
    let text = FRACTION.replace_all(latex.trim(), "${1}/${2}");
    let text = COMMAND.replace_all(&text, |caps: &Captures| {
        let symbol = symbol(&caps[1]).unwrap_or("");
        // Keep the separating space after a symbol, drop it after a dropped
        // command.
        if !symbol.is_empty() && caps[0].ends_with(' ') {
            format!("{} ", symbol)
        } else {
            symbol.to_string()
        }
    });
    let text = SUPERSCRIPT.replace_all(&text, |caps: &Captures| script(caps, '^', superscript));
    let text = SUBSCRIPT.replace_all(&text, |caps: &Captures| script(caps, '_', subscript));

    text.chars()
        .filter(|c| !matches!(c, '{' | '}'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn script(caps: &Captures, marker: char, map: fn(char) -> Option<char>) -> String {
    let body = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
    match body.chars().map(map).collect::<Option<String>>() {
        Some(mapped) if !mapped.is_empty() => mapped,
        _ => format!("{}{}", marker, parenthesize(body)),
    }
}

fn parenthesize(body: &str) -> Cow<'_, str> {
    if body.chars().count() > 1 {
        Cow::Owned(format!("({})", body))
    } else {
        Cow::Borrowed(body)
    }
}

fn symbol(command: &str) -> Option<&'static str> {
    Some(match command {
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" | "varepsilon" => "ε",
        "zeta" => "ζ",
        "eta" => "η",
        "theta" | "vartheta" => "θ",
        "iota" => "ι",
        "kappa" => "κ",
        "lambda" => "λ",
        "mu" => "μ",
        "nu" => "ν",
        "xi" => "ξ",
        "pi" => "π",
        "rho" => "ρ",
        "sigma" => "σ",
        "tau" => "τ",
        "upsilon" => "υ",
        "phi" | "varphi" => "φ",
        "chi" => "χ",
        "psi" => "ψ",
        "omega" => "ω",
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Theta" => "Θ",
        "Lambda" => "Λ",
        "Pi" => "Π",
        "Sigma" => "Σ",
        "Phi" => "Φ",
        "Omega" => "Ω",
        "times" => "×",
        "cdot" => "·",
        "pm" => "±",
        "mp" => "∓",
        "approx" => "≈",
        "neq" | "ne" => "≠",
        "le" | "leq" => "≤",
        "ge" | "geq" => "≥",
        "div" => "÷",
        "infty" => "∞",
        "sqrt" => "√",
        "sum" => "∑",
        "prod" => "∏",
        "int" => "∫",
        "degree" | "circ" => "°",
        "angle" => "∠",
        "therefore" => "∴",
        "because" => "∵",
        "rightarrow" | "to" => "→",
        "leftarrow" => "←",
        "Rightarrow" => "⇒",
        "in" => "∈",
        "cup" => "∪",
        "cap" => "∩",
        "subset" => "⊂",
        "perp" => "⊥",
        "parallel" => "∥",
        "triangle" => "△",
        _ => return None,
    })
}

fn superscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        'n' => 'ⁿ',
        'i' => 'ⁱ',
        _ => return None,
    })
}

fn subscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        _ => return None,
    })
}
