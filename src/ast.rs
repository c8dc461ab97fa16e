//! Value types passed between the rendering stages.
//!
//! Everything here lives for a single render call: segments are produced by
//! the tokenizer and consumed by the math renderer, tables are produced by the
//! extraction tier and consumed by the HTML builder, script runs are produced
//! by the font segmenter.

use serde::Serialize;

/// What a [`TextSegment`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Text outside any math delimiter.
    Literal,
    /// `$...$` or `\(...\)`.
    InlineMath,
    /// `$$...$$`, `\[...\]`, or an auto-wrapped environment.
    DisplayMath,
}

/// A run of input text, either literal or math. Delimiters are not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSegment {
    pub kind: SegmentKind,
    pub text: String,
}

impl TextSegment {
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Literal,
            text: text.into(),
        }
    }

    pub fn inline_math(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::InlineMath,
            text: text.into(),
        }
    }

    pub fn display_math(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::DisplayMath,
            text: text.into(),
        }
    }

    /// Whether this segment should go through the math renderer.
    pub fn is_math(&self) -> bool {
        !matches!(self.kind, SegmentKind::Literal)
    }
}

/// A single table cell. Its position is implied by its index in the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableCell {
    pub text: String,
}

impl TableCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl From<&str> for TableCell {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Table structure recovered from LaTeX source that the math engine could not
/// render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTable {
    /// Title line shown above the table.
    pub caption: Option<String>,
    pub headers: Vec<TableCell>,
    pub rows: Vec<Vec<TableCell>>,
    /// Render the first cell of every body row as a header cell.
    pub stub_column: bool,
}

impl ParsedTable {
    /// Build a table, widening the header row so that no body row is longer
    /// than it.
    pub fn new(headers: Vec<TableCell>, rows: Vec<Vec<TableCell>>) -> Self {
        let mut headers = headers;
        if !headers.is_empty() {
            let widest = rows.iter().map(Vec::len).max().unwrap_or(0);
            if widest > headers.len() {
                headers.resize_with(widest, TableCell::default);
            }
        }

        Self {
            caption: None,
            headers,
            rows,
            stub_column: false,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        let caption = caption.into();
        self.caption = if caption.trim().is_empty() {
            None
        } else {
            Some(caption)
        };
        self
    }

    pub fn with_stub_column(mut self, stub_column: bool) -> Self {
        self.stub_column = stub_column;
        self
    }

    /// The fixed 2×4 table shown when nothing could be recovered.
    pub fn placeholder() -> Self {
        let headers = ["x", "0", "-1", "2"].map(TableCell::from).to_vec();
        let rows = vec![["y", "-1", "-3", "3"].map(TableCell::from).to_vec()];
        Self::new(headers, rows)
    }

    /// Number of columns of the rendered table.
    pub fn column_count(&self) -> usize {
        let widest_row = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        self.headers.len().max(widest_row)
    }

    /// Body rows padded on the right with empty cells up to
    /// [`column_count`](Self::column_count).
    pub fn padded_rows(&self) -> Vec<Vec<TableCell>> {
        let width = self.column_count();
        self.rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.resize_with(width, TableCell::default);
                row
            })
            .collect()
    }
}

/// Script class of a [`ScriptRun`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    Bengali,
    Other,
}

impl Script {
    /// Value used for the `data-script` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bengali => "bengali",
            Self::Other => "other",
        }
    }
}

/// A maximal stretch of text in one script class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptRun {
    pub script: Script,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_headers_widened_to_longest_row() {
        let table = ParsedTable::new(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into(), "2".into(), "3".into()]],
        );
        assert_eq!(table.headers.len(), 3);
        assert!(table.headers[2].is_empty());
    }

    #[test]
    fn test_padded_rows_are_rectangular() {
        let table = ParsedTable::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec!["1".into()], vec!["1".into(), "2".into()]],
        );
        let rows = table.padded_rows();
        assert!(rows.iter().all(|row| row.len() == 3));
        assert_eq!(rows[0][1], TableCell::default());
    }

    #[test]
    fn test_placeholder_shape() {
        let table = ParsedTable::placeholder();
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.headers[0].text, "x");
        assert_eq!(table.rows[0][0].text, "y");
    }

    #[test]
    fn test_blank_caption_is_dropped() {
        let table = ParsedTable::placeholder().with_caption("  ");
        assert_eq!(table.caption, None);
    }
}
