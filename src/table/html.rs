//! HTML output for recovered tables.

use crate::ast::{ParsedTable, SegmentKind, TextSegment};
use crate::config::AutoWrap;
use crate::parser::Tokenizer;
use crate::render::escape_html;
use crate::render::math::{render_math, MathRenderer};
use crate::rules::{apply_tier, Tier};

/// Render a table as a rectangular HTML table. Every cell's text goes
/// through `cell_renderer`; short rows are padded with empty cells.
pub fn render_table_html(table: &ParsedTable, cell_renderer: impl Fn(&str) -> String) -> String {
    let mut html = String::from(r#"<div class="latex-table-wrapper">"#);

    if let Some(caption) = &table.caption {
        html.push_str(&format!(
            r#"<div class="latex-table-title">{}</div>"#,
            escape_html(caption)
        ));
    }

    html.push_str(r#"<table class="direct-latex-table">"#);

    if !table.headers.is_empty() {
        html.push_str("<thead><tr>");
        for cell in &table.headers {
            html.push_str(&format!("<th>{}</th>", cell_renderer(&cell.text)));
        }
        html.push_str("</tr></thead>");
    }

    html.push_str("<tbody>");
    for row in table.padded_rows() {
        html.push_str("<tr>");
        for (i, cell) in row.iter().enumerate() {
            let tag = if table.stub_column && i == 0 { "th" } else { "td" };
            if cell.is_empty() {
                html.push_str(&format!("<{tag}></{tag}>"));
            } else {
                html.push_str(&format!("<{tag}>{}</{tag}>", cell_renderer(&cell.text)));
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div>");

    html
}

/// Render one cell: math through the fallback tiers, `\textbf{..}` in the
/// remaining text as `<strong>`. Text that still carries bare LaTeX after
/// the bold markup is rendered as math.
pub fn render_cell(engine: &dyn MathRenderer, text: &str) -> String {
    let mut html = String::new();
    for segment in Tokenizer::new(AutoWrap::Off).tokenize(text) {
        match segment.kind {
            SegmentKind::Literal => {
                let marked = apply_tier(Tier::CellMarkup, &segment.text);
                for part in Tokenizer::new(AutoWrap::Heuristic).tokenize(&marked) {
                    push_segment(&mut html, engine, &part);
                }
            }
            _ => push_segment(&mut html, engine, &segment),
        }
    }
    html
}

fn push_segment(html: &mut String, engine: &dyn MathRenderer, segment: &TextSegment) {
    match segment.kind {
        SegmentKind::Literal => html.push_str(&segment.text),
        SegmentKind::InlineMath => html.push_str(&render_math(engine, segment.text.trim(), false)),
        SegmentKind::DisplayMath => html.push_str(&render_math(engine, segment.text.trim(), true)),
    }
}
