//! Second table tier: recover rows and cells from table source directly.

use lazy_static::lazy_static;
use regex::Regex;

use crate::ast::{ParsedTable, TableCell};
use crate::config::TableConfig;
use crate::error::{RenderError, Result};
use crate::rules::{apply_tier, Tier};

use super::repair::isolate;
use super::ENVIRONMENTS;

lazy_static! {
    // Row values stop at the next `$` so an unterminated `$x$` row does not
    // swallow the `$y$` row after it.
    static ref X_ROW: Regex = Regex::new(r"\$x\$\s*&([^\\$]*)").unwrap();
    static ref Y_ROW: Regex = Regex::new(r"\$y\$\s*&([^\\$]*)").unwrap();
}

/// Extract a table using the default [`TableConfig`].
pub fn extract_table(input: &str) -> Result<ParsedTable> {
    extract_table_with(input, &TableConfig::default())
}

/// Extract a table: the `$x$`/`$y$` fixture shape first, then generic
/// row/cell splitting.
pub fn extract_table_with(input: &str, config: &TableConfig) -> Result<ParsedTable> {
    if let Some(table) = variable_fixture(input, config) {
        log::debug!("extracted variable/value fixture table");
        return Ok(table);
    }

    // `$` or `$$` around the environment is not part of any cell.
    let source = ENVIRONMENTS
        .iter()
        .find_map(|(begin, end)| isolate(input, begin, end))
        .unwrap_or(input);

    let mut rows = split_rows(source);
    if rows.is_empty() {
        return Err(RenderError::TableParse("no rows with column separators".into()).into());
    }

    let headers = rows.remove(0);
    log::debug!(
        "extracted table with {} header cells and {} rows",
        headers.len(),
        rows.len()
    );
    Ok(ParsedTable::new(headers, rows))
}

/// The two-row variable/value table: `$x$ & ... \\ $y$ & ...`.
fn variable_fixture(input: &str, config: &TableConfig) -> Option<ParsedTable> {
    let xs = X_ROW.captures(input)?.get(1)?.as_str();
    let ys = Y_ROW.captures(input)?.get(1)?.as_str();

    let mut headers = vec![TableCell::new("$x$")];
    headers.extend(values(xs));
    let mut row = vec![TableCell::new("$y$")];
    row.extend(values(ys));

    Some(
        ParsedTable::new(headers, vec![row])
            .with_caption(config.fixture_caption.as_str())
            .with_stub_column(true),
    )
}

fn values(captured: &str) -> impl Iterator<Item = TableCell> + '_ {
    captured
        .split('&')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(TableCell::new)
}

/// Split table source into cleaned cell rows, dropping rows without `&`.
fn split_rows(input: &str) -> Vec<Vec<TableCell>> {
    input
        .split("\\\\")
        .map(|row| apply_tier(Tier::TableRepair, row))
        .filter(|row| row.contains('&'))
        .map(|row| {
            row.split('&')
                .map(|cell| TableCell::new(apply_tier(Tier::CellCleanup, cell).trim()))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FIXTURE_CAPTION;
    use pretty_assertions::assert_eq;

    fn texts(cells: &[TableCell]) -> Vec<&str> {
        cells.iter().map(|cell| cell.text.as_str()).collect()
    }

    #[test]
    fn test_variable_fixture() {
        let input = r"\begin{longtable}[]{@{}cccc@{}} \toprule \endhead $x$ & 0 & -1 & 2 \\ $y$ & -1 & -3 & 3 \\ \bottomrule \end{longtable}";
        let table = extract_table(input).unwrap();

        assert_eq!(texts(&table.headers), vec!["$x$", "0", "-1", "2"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(texts(&table.rows[0]), vec!["$y$", "-1", "-3", "3"]);
        assert_eq!(table.caption.as_deref(), Some(FIXTURE_CAPTION));
        assert!(table.stub_column);
    }

    #[test]
    fn test_fixture_without_row_terminator() {
        let input = " oprule oalign{} \\endhead $x$ & -1 & 0 & 3 $y$ & 5 & 3 & -3 \\\\ \\end{longtable}";
        let table = extract_table(input).unwrap();
        assert_eq!(texts(&table.headers), vec!["$x$", "-1", "0", "3"]);
        assert_eq!(texts(&table.rows[0]), vec!["$y$", "5", "3", "-3"]);
    }

    #[test]
    fn test_fixture_caption_configurable() {
        let config = TableConfig {
            fixture_caption: String::new(),
        };
        let table = extract_table_with("$x$ & 1 \\\\ $y$ & 2", &config).unwrap();
        assert_eq!(table.caption, None);
    }

    #[test]
    fn test_generic_rows() {
        let input = r"\begin{longtable}[]{@{} >{\centering\arraybackslash}p{(\linewidth - 2\tabcolsep) * \real{0.5}} >{\centering\arraybackslash}p{(\linewidth - 2\tabcolsep) * \real{0.5}}@{}}
\toprule\noalign{}
\textbf{Name} & \textbf{Score} \\
\midrule\noalign{}
\endhead
\bottomrule\noalign{}
\endlastfoot
Rahim & $90$ \\[2pt]
Karim & 85 \\
\end{longtable}";

        let table = extract_table(input).unwrap();
        assert_eq!(texts(&table.headers), vec![r"\textbf{Name}", r"\textbf{Score}"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(texts(&table.rows[0]), vec!["Rahim", "$90$"]);
        assert_eq!(texts(&table.rows[1]), vec!["Karim", "85"]);
        assert_eq!(table.caption, None);
        assert!(!table.stub_column);
    }

    #[test]
    fn test_dollars_around_table_dropped() {
        for input in [
            r"$\begin{longtable}{cc} a & b \\ 1 & 2 \\ \end{longtable}$",
            r"$$\begin{tabular}{cc} a & b \\ 1 & 2 \\ \end{tabular}$$",
        ] {
            let table = extract_table(input).unwrap();
            assert_eq!(texts(&table.headers), vec!["a", "b"]);
            assert_eq!(texts(&table.rows[0]), vec!["1", "2"]);
        }
    }

    #[test]
    fn test_ragged_rows_keep_headers_widest() {
        let table = extract_table("a & b \\\\ 1 & 2 & 3 \\\\").unwrap();
        assert_eq!(table.headers.len(), 3);
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn test_no_structure_is_error() {
        let err = extract_table(r"\begin{longtable}{c} only text \end{longtable}").unwrap_err();
        assert!(err.to_string().contains("Table parse error"));
        assert!(extract_table("").is_err());
    }
}
