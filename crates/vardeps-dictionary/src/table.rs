//! In-memory tabular data
//!
//! A loaded dictionary before any interpretation: header names plus rows of
//! optional string cells. `None` is a missing value.

/// A loaded table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names from the header row
    columns: Vec<String>,

    /// Data rows, each exactly `columns.len()` cells wide
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Create an empty table (zero columns, zero rows)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a table from a header and rows
    ///
    /// Short rows are padded with missing values and long rows are cut to
    /// the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate over data rows
    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    /// Get a cell by row index and column name
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)?.as_deref()
    }
}
