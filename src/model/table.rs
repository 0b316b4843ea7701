//! Table types and pipe-table parsing.

use serde::{Deserialize, Serialize};

/// A table ready for a builder: header cells, resolved widths and body rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBlock {
    /// Header cells
    pub headers: Vec<String>,

    /// Column widths in DXA, one per header
    pub widths: Vec<u32>,

    /// Body rows
    pub rows: Vec<Vec<String>>,
}

impl TableBlock {
    /// Create a table.
    pub fn new(headers: Vec<String>, widths: Vec<u32>, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers,
            widths,
            rows,
        }
    }

    /// Number of columns (header cells).
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of body rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Total width.
    pub fn total_width(&self) -> u32 {
        self.widths.iter().fold(0, |sum, w| sum.saturating_add(*w))
    }

    /// Plain text representation, one tab-separated line per row.
    pub fn plain_text(&self) -> String {
        std::iter::once(&self.headers)
            .chain(self.rows.iter())
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Check if a line is a header/body separator such as `|---|:--:|`.
pub fn is_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2
        && trimmed.starts_with('|')
        && trimmed.ends_with('|')
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| c.is_whitespace() || matches!(c, '-' | ':' | '|'))
}

/// Split one pipe-table line into cells.
///
/// Leading and trailing pipes are dropped; cells are trimmed and lose their
/// backtick and `**` markup.
pub fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner
        .split('|')
        .map(|cell| super::strip_markup(cell.trim()))
        .collect()
}

/// Parse pipe-table lines into rows, the first being the header.
///
/// Separator rows and lines without a pipe are skipped.
pub fn parse_table<S: AsRef<str>>(lines: &[S]) -> Vec<Vec<String>> {
    lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line| line.contains('|') && !is_separator_row(line))
        .map(split_cells)
        .collect()
}
