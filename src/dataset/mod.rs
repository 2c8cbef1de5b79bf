//! Immutable respondent-by-column survey table
//!
//! The [`Dataset`] stores one column per asked item in column-major order.
//! Cells are `Option<String>`: `None` marks a missing answer. Columns are
//! addressed by position and by raw header string; headers need not be
//! unique (lookup by header returns the first match).
//!
//! A dataset is loaded once per analysis run and never mutated afterwards.
//!
//! ## Example
//!
//! ```rust
//! use survey_analytics::Dataset;
//!
//! let csv = "A1. Rating,City\n5,Warszawa\n3,\n";
//! let ds = Dataset::from_csv_str(csv).unwrap();
//!
//! assert_eq!(ds.row_count(), 2);
//! assert_eq!(ds.column_count(), 2);
//! assert_eq!(ds.value(1, 1), None); // empty cell is missing
//! ```

mod csv_import;

use thiserror::Error;

/// Errors raised while assembling a [`Dataset`]
#[derive(Error, Debug)]
pub enum DatasetError {
    /// A column's length disagrees with the dataset's row count
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// CSV input could not be read
    #[error("CSV error: {0}")]
    Csv(String),

    /// Input carried no header record
    #[error("input has no header row")]
    MissingHeader,
}

impl From<::csv::Error> for DatasetError {
    fn from(e: ::csv::Error) -> Self {
        DatasetError::Csv(e.to_string())
    }
}

/// Respondent × column table with raw string cells
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    headers: Vec<String>,
    columns: Vec<Vec<Option<String>>>,
    row_count: usize,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from parallel header/column lists
    ///
    /// All columns must share the same length.
    pub fn from_columns(
        headers: Vec<String>,
        columns: Vec<Vec<Option<String>>>,
    ) -> Result<Self, DatasetError> {
        let row_count = columns.first().map_or(0, Vec::len);
        for (header, column) in headers.iter().zip(&columns) {
            if column.len() != row_count {
                return Err(DatasetError::ColumnLengthMismatch {
                    column: header.clone(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
        }
        Ok(Self {
            headers,
            columns,
            row_count,
        })
    }

    /// Append one column
    pub fn push_column(
        &mut self,
        header: impl Into<String>,
        values: Vec<Option<String>>,
    ) -> Result<(), DatasetError> {
        let header = header.into();
        if !self.columns.is_empty() && values.len() != self.row_count {
            return Err(DatasetError::ColumnLengthMismatch {
                column: header,
                expected: self.row_count,
                actual: values.len(),
            });
        }
        self.row_count = values.len();
        self.headers.push(header);
        self.columns.push(values);
        Ok(())
    }

    /// Number of respondents (rows)
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// All raw headers, in column order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Raw header of one column
    pub fn header(&self, index: usize) -> Option<&str> {
        self.headers.get(index).map(String::as_str)
    }

    /// One column's cells, by position
    pub fn column(&self, index: usize) -> Option<&[Option<String>]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// Position of the first column whose raw header equals `header`
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// One column's cells, by raw header string (first match)
    pub fn column_by_header(&self, header: &str) -> Option<&[Option<String>]> {
        self.column_index(header).and_then(|i| self.column(i))
    }

    /// Single cell
    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.columns
            .get(column)
            .and_then(|c| c.get(row))
            .and_then(|v| v.as_deref())
    }

    /// Parse one column into a per-respondent weight vector
    ///
    /// Missing or non-numeric entries default to 1.0, so an all-defaults
    /// vector is equivalent to unweighted analysis.
    pub fn weights_from_column(&self, column: usize) -> Option<Vec<f64>> {
        let col = self.column(column)?;
        Some(
            col.iter()
                .map(|cell| {
                    cell.as_deref()
                        .and_then(|s| s.trim().parse::<f64>().ok())
                        .filter(|w| w.is_finite() && *w >= 0.0)
                        .unwrap_or(1.0)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| {
                if v.is_empty() {
                    None
                } else {
                    Some(v.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn test_from_columns() {
        let ds = Dataset::from_columns(
            vec!["a".into(), "b".into()],
            vec![cells(&["1", "2"]), cells(&["x", ""])],
        )
        .unwrap();

        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.value(0, 0), Some("1"));
        assert_eq!(ds.value(1, 1), None);
    }

    #[test]
    fn test_from_columns_length_mismatch() {
        let result = Dataset::from_columns(
            vec!["a".into(), "b".into()],
            vec![cells(&["1", "2"]), cells(&["x"])],
        );
        assert!(matches!(
            result,
            Err(DatasetError::ColumnLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_column_lookup_by_header_first_match_wins() {
        let ds = Dataset::from_columns(
            vec!["dup".into(), "dup".into()],
            vec![cells(&["first"]), cells(&["second"])],
        )
        .unwrap();

        assert_eq!(ds.column_index("dup"), Some(0));
        assert_eq!(ds.column_by_header("dup").unwrap()[0].as_deref(), Some("first"));
    }

    #[test]
    fn test_weights_from_column_defaults() {
        let ds = Dataset::from_columns(
            vec!["waga".into()],
            vec![cells(&["1.5", "abc", "", "-2", "0.5"])],
        )
        .unwrap();

        let w = ds.weights_from_column(0).unwrap();
        assert_eq!(w, vec![1.5, 1.0, 1.0, 1.0, 0.5]);
    }
}
