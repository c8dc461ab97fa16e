//! First table tier: rewrite a converter-generated `longtable` into an
//! `array` the math engine accepts.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{RenderError, Result};
use crate::render::math::{check_balanced, MathBackend, MathRenderer};
use crate::rules::{apply_tier, Tier, FIXED_COLUMN_WIDTH};

lazy_static! {
    static ref HLINE: Regex = Regex::new(r"\\hline\b").unwrap();
    static ref TRAILING_BREAK: Regex = Regex::new(r"(?:\s*\\\\)+\s*$").unwrap();
}

const BEGIN: &str = "\\begin{longtable}";
const END: &str = "\\end{longtable}";

/// A table environment split into its column spec and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Environment<'a> {
    pub spec: &'a str,
    pub body: &'a str,
}

/// Rewrite the first `longtable` in `input` into `\begin{array}...\end{array}`.
///
/// Text outside the table is dropped. Input without a `longtable` is treated
/// as a bare table body.
pub fn repair_longtable(input: &str) -> String {
    let env = table_environment(input);
    let body = apply_tier(Tier::TableRepair, env.body);
    let spec = apply_tier(Tier::ColumnSpec, env.spec);
    let spec = alignment_spec(&spec, data_columns(&body));

    let mut body = body.trim().to_string();
    if !body.contains("\\\\") {
        body.push_str(" \\\\");
    }

    log::debug!("repaired longtable into array with spec {:?}", spec);
    format!("\\begin{{array}}{{{}}}\n{}\n\\end{{array}}", spec, body)
}

/// Repair for a specific engine. `latex2mathml` has no `array` environment,
/// so MathML gets a `matrix` without rules or column alignment.
pub fn repair_longtable_for(input: &str, backend: MathBackend) -> String {
    match backend {
        MathBackend::KaTeX => repair_longtable(input),
        MathBackend::MathML => repair_longtable_as_matrix(input),
    }
}

fn repair_longtable_as_matrix(input: &str) -> String {
    let env = table_environment(input);
    let body = apply_tier(Tier::TableRepair, env.body);
    let body = HLINE.replace_all(&body, "");
    let body = TRAILING_BREAK.replace(body.trim(), "");

    log::debug!("repaired longtable into matrix");
    format!("\\begin{{matrix}} {} \\end{{matrix}}", body.trim())
}

fn table_environment(input: &str) -> Environment<'_> {
    let source = isolate(input, BEGIN, END).unwrap_or(input);
    let source = source.trim().trim_matches('$');

    split_environment(source, BEGIN, END).unwrap_or(Environment {
        spec: "",
        body: source,
    })
}

/// Render repaired table source with a strict engine.
///
/// `$` inside the array would switch math mode off mid-table, which the
/// engines reject; such tables are left to extraction, as are tables with
/// unbalanced braces or environments.
pub fn render_repaired(engine: &dyn MathRenderer, repaired: &str) -> Result<String> {
    if has_unescaped_dollar(repaired) {
        return Err(RenderError::TableParse("math delimiters inside table cells".into()).into());
    }
    check_balanced(repaired).map_err(RenderError::TableParse)?;
    engine.render_display(repaired)
}

/// The slice from the first `begin` marker through the matching `end`
/// marker, or to the end of input when `end` is missing.
pub(crate) fn isolate<'a>(input: &'a str, begin: &str, end: &str) -> Option<&'a str> {
    let start = input.find(begin)?;
    let rest = &input[start..];
    Some(match rest.find(end) {
        Some(at) => &rest[..at + end.len()],
        None => rest,
    })
}

/// Split `\begin{env}[opt]{spec} body \end{env}`.
pub(crate) fn split_environment<'a>(
    source: &'a str,
    begin: &str,
    end: &str,
) -> Option<Environment<'a>> {
    let after = source.strip_prefix(begin)?;
    let after = after.trim_start();

    let after = match after.strip_prefix('[') {
        Some(opt) => &opt[opt.find(']')? + 1..],
        None => after,
    };
    let after = after.trim_start();

    let (spec, body) = match balanced_group(after) {
        Some((spec, rest)) => (spec, rest),
        None => ("", after),
    };

    let body = match body.rfind(end) {
        Some(at) => &body[..at],
        None => body,
    };

    Some(Environment { spec, body })
}

/// Split a leading `{...}` group, honouring nesting.
fn balanced_group(input: &str) -> Option<(&str, &str)> {
    if !input.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&input[1..i], &input[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Widest row of a table body, in columns.
pub(crate) fn data_columns(body: &str) -> usize {
    body.split("\\\\")
        .filter(|row| row.contains('&'))
        .map(|row| row.matches('&').count() + 1)
        .max()
        .unwrap_or(1)
}

/// Reduce a cleaned column spec to `c`/`l`/`r` letters, one per data column.
fn alignment_spec(spec: &str, columns: usize) -> String {
    let mut letters = String::new();
    let mut rest = spec;
    while let Some(c) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix(FIXED_COLUMN_WIDTH) {
            letters.push('l');
            rest = tail;
            continue;
        }
        if matches!(c, 'c' | 'l' | 'r') {
            letters.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    let columns = columns.max(1);
    if letters.len() < columns {
        let pad = columns - letters.len();
        letters.extend(std::iter::repeat('c').take(pad));
    }
    letters
}

fn has_unescaped_dollar(source: &str) -> bool {
    let mut previous = None;
    for c in source.chars() {
        if c == '$' && previous != Some('\\') {
            return true;
        }
        previous = Some(c);
    }
    false
}
