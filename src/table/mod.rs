//! Table repair and extraction.
//!
//! Question text imported from word-processor documents carries `longtable`
//! markup the math engines reject: fixed-width column specs, `booktabs`
//! rules, and control characters where `\t` and `\r` used to be. Three tiers
//! recover it, best first:
//!
//! 1. [`repair_longtable_for`] rewrites the table into an `array` (or a
//!    `matrix` for MathML) and renders it as math, which keeps formulas
//!    inside cells intact.
//! 2. [`extract_table`] pulls rows and cells out of the source and builds an
//!    HTML table whose cells are rendered one by one.
//! 3. [`ParsedTable::placeholder`] when nothing could be recovered.

mod detect;
mod extract;
mod html;
mod repair;

pub use detect::{contains_complex_table, contains_longtable};
pub use extract::{extract_table, extract_table_with};
pub use html::{render_cell, render_table_html};
pub use repair::{render_repaired, repair_longtable, repair_longtable_for};

use crate::config::TableConfig;
use crate::error::{RenderError, Result};
use crate::render::math::{create_renderer, MathBackend};

const ENVIRONMENTS: &[(&str, &str)] = &[
    ("\\begin{longtable}", "\\end{longtable}"),
    ("\\begin{tabular}", "\\end{tabular}"),
];

/// Convert the first `longtable` or `tabular` environment in `code` to an
/// HTML table. With `standalone`, the table is wrapped in a complete HTML
/// document with its own styles.
pub fn convert_latex_table(code: &str, standalone: bool) -> Result<String> {
    let source = ENVIRONMENTS
        .iter()
        .find_map(|(begin, end)| repair::isolate(code, begin, end))
        .ok_or_else(|| RenderError::TableParse("No LaTeX table found".into()))?;

    let table = extract_table_with(source, &TableConfig::default())?;
    let engine = create_renderer(MathBackend::default(), false);
    let html = render_table_html(&table, |text| render_cell(engine.as_ref(), text));

    if !standalone {
        return Ok(html);
    }

    let head = engine.head_content().unwrap_or_default();
    Ok(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>LaTeX Table Conversion</title>\n{}\n{}\n</head>\n<body>\n{}\n</body>\n</html>\n",
        TABLE_STYLES, head, html
    ))
}

const TABLE_STYLES: &str = r#"<style>
.direct-latex-table, .direct-latex-table th, .direct-latex-table td {
    border: 1px solid black;
    border-collapse: collapse;
    padding: 5px;
    text-align: center;
}
.direct-latex-table th {
    background-color: #f2f2f2;
}
.latex-table-wrapper {
    margin: 20px 0;
}
.latex-table-title {
    font-weight: bold;
    margin-bottom: 10px;
}
</style>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_tabular() {
        let html = convert_latex_table(
            r"Intro \begin{tabular}{|c|c|} \hline A & B \\ \hline 1 & 2 \\ \hline \end{tabular} outro",
            false,
        )
        .unwrap();
        assert!(html.starts_with(r#"<div class="latex-table-wrapper">"#));
        assert!(html.contains("<th>A</th><th>B</th>"));
        assert!(html.contains("<tr><td>1</td><td>2</td></tr>"));
        assert!(!html.contains("outro"));
    }

    #[test]
    fn test_convert_standalone_document() {
        let html = convert_latex_table(r"\begin{longtable}{cc} a & b \\ \end{longtable}", true).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(".direct-latex-table"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_convert_without_table() {
        let err = convert_latex_table("just text", false).unwrap_err();
        assert!(err.to_string().contains("No LaTeX table found"));
    }
}
