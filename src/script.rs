//! Bengali/English script runs and font tagging of rendered HTML.
//!
//! Question text mixes Bengali with English words, digits and math. The two
//! scripts need different fonts, so rendered HTML gets every text node that
//! contains Bengali split into single-script `<span>` runs.

use crate::ast::{Script, ScriptRun};
use crate::config::FontConfig;

/// Whether `c` lies in the Bengali Unicode block (U+0980..=U+09FF).
pub fn is_bengali(c: char) -> bool {
    ('\u{0980}'..='\u{09FF}').contains(&c)
}

/// Script of a character, or `None` for whitespace, punctuation and symbols,
/// which take the script of the run they fall in.
fn classify(c: char) -> Option<Script> {
    if is_bengali(c) {
        Some(Script::Bengali)
    } else if c.is_alphanumeric() {
        Some(Script::Other)
    } else {
        None
    }
}

/// Split `text` into maximal single-script runs.
///
/// Neutral characters join the run in progress; neutrals before the first
/// classified character join the first run. Text with no classified
/// character is a single `Other` run. Concatenating the runs gives back
/// `text`.
pub fn segment_scripts(text: &str) -> Vec<ScriptRun> {
    let units = text
        .char_indices()
        .map(|(i, c)| (&text[i..i + c.len_utf8()], classify(c)));
    collect_runs(units)
}

fn collect_runs<'a>(units: impl Iterator<Item = (&'a str, Option<Script>)>) -> Vec<ScriptRun> {
    let mut runs: Vec<ScriptRun> = Vec::new();
    let mut leading = String::new();

    for (unit, script) in units {
        match (script, runs.last_mut()) {
            (None, Some(run)) => run.text.push_str(unit),
            (None, None) => leading.push_str(unit),
            (Some(script), Some(run)) if run.script == script => run.text.push_str(unit),
            (Some(script), _) => {
                let mut text = std::mem::take(&mut leading);
                text.push_str(unit);
                runs.push(ScriptRun { script, text });
            }
        }
    }

    if !leading.is_empty() {
        runs.push(ScriptRun {
            script: Script::Other,
            text: leading,
        });
    }
    runs
}

/// Wrap the Bengali and non-Bengali runs of every text node in `html` in
/// font spans.
///
/// Entities are never split. Text inside `<math>`, `<script>` and `<style>`,
/// and inside spans this function produced earlier, is left alone, so
/// applying it twice changes nothing.
pub fn apply_fonts(html: &str, config: &FontConfig) -> String {
    let mut out = String::with_capacity(html.len() * 2);
    let mut skip: Option<(String, usize)> = None;
    let mut rest = html;

    while !rest.is_empty() {
        if let Some(len) = markup_len(rest) {
            let markup = &rest[..len];
            out.push_str(markup);
            track_skip(&mut skip, markup);
            rest = &rest[len..];
            continue;
        }

        let first = rest.chars().next().map_or(1, char::len_utf8);
        let end = rest[first..]
            .find('<')
            .map(|i| i + first)
            .unwrap_or(rest.len());
        let text = &rest[..end];
        if skip.is_none() && text.chars().any(is_bengali) {
            wrap_runs(&mut out, text, config);
        } else {
            out.push_str(text);
        }
        rest = &rest[end..];
    }

    out
}

fn wrap_runs(out: &mut String, text: &str, config: &FontConfig) {
    for run in collect_runs(html_units(text)) {
        let class = match run.script {
            Script::Bengali => &config.bengali_class,
            Script::Other => &config.other_class,
        };
        out.push_str(&format!(
            r#"<span class="{}" data-script="{}">{}</span>"#,
            class,
            run.script.as_str(),
            run.text
        ));
    }
}

/// Characters of an HTML text node, with each entity as one neutral unit.
fn html_units(text: &str) -> impl Iterator<Item = (&str, Option<Script>)> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let c = rest.chars().next()?;
        let len = entity_len(rest).unwrap_or(c.len_utf8());
        let (unit, tail) = rest.split_at(len);
        rest = tail;
        let script = if len == c.len_utf8() { classify(c) } else { None };
        Some((unit, script))
    })
}

/// Length of an entity such as `&amp;` or `&#2453;` at the start of `text`.
fn entity_len(text: &str) -> Option<usize> {
    let body = text.strip_prefix('&')?;
    let end = body.find(';')?;
    let name = &body[..end];
    let valid = !name.is_empty()
        && name.len() <= 32
        && name
            .strip_prefix('#')
            .unwrap_or(name)
            .chars()
            .all(|c| c.is_ascii_alphanumeric());
    valid.then_some(end + 2)
}

/// Length of a tag or comment at the start of `html`.
fn markup_len(html: &str) -> Option<usize> {
    if html.starts_with("<!--") {
        return Some(html.find("-->").map(|i| i + 3).unwrap_or(html.len()));
    }

    let mut chars = html.chars();
    if chars.next() != Some('<') {
        return None;
    }
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!' => {}
        _ => return None,
    }

    let mut quote = None;
    for (i, c) in html.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => return Some(i + 1),
            _ => {}
        }
    }
    Some(html.len())
}

/// Classes of rendered math and math source shown on failure.
const PROTECTED_CLASSES: &[&str] = &["math", "math-error", "latex-error"];

/// Elements whose text must not be re-tagged.
fn is_protected(name: &str, tag: &str) -> bool {
    matches!(name, "math" | "script" | "style")
        || (name == "span" && tag.contains("data-script="))
        || class_list(tag).any(|class| PROTECTED_CLASSES.contains(&class))
}

/// Space-separated entries of the tag's `class` attribute.
fn class_list(tag: &str) -> impl Iterator<Item = &str> {
    let value = tag
        .match_indices("class=")
        .find(|&(at, _)| at > 0 && tag[..at].ends_with(|c: char| c.is_ascii_whitespace()))
        .and_then(|(at, attr)| {
            let rest = &tag[at + attr.len()..];
            let quote = rest.chars().next().filter(|c| matches!(c, '"' | '\''))?;
            let rest = &rest[1..];
            Some(&rest[..rest.find(quote).unwrap_or(rest.len())])
        })
        .unwrap_or("");
    value.split_ascii_whitespace()
}

fn track_skip(skip: &mut Option<(String, usize)>, tag: &str) {
    let closing = tag.starts_with("</");
    let name: String = tag
        .trim_start_matches('<')
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    if name.is_empty() || tag.ends_with("/>") {
        return;
    }

    match skip {
        Some((open, depth)) if *open == name => {
            if closing {
                *depth -= 1;
                if *depth == 0 {
                    *skip = None;
                }
            } else {
                *depth += 1;
            }
        }
        Some(_) => {}
        None if !closing && is_protected(&name, tag) => *skip = Some((name, 1)),
        None => {}
    }
}
