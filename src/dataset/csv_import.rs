//! CSV ingestion for [`Dataset`]
//!
//! The core itself performs no file IO; callers hand it a reader or a
//! string and receive an immutable in-memory table. The first record is
//! taken as the header row; empty cells become missing values.

use std::io::Read;

use tracing::debug;

use super::{Dataset, DatasetError};

impl Dataset {
    /// Parse CSV text into a dataset
    pub fn from_csv_str(input: &str) -> Result<Self, DatasetError> {
        Self::from_csv_reader(input.as_bytes())
    }

    /// Parse CSV from any reader into a dataset
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();
        if headers.is_empty() {
            return Err(DatasetError::MissingHeader);
        }

        let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for record in csv_reader.records() {
            let record = record?;
            for (i, column) in columns.iter_mut().enumerate() {
                let cell = record.get(i).unwrap_or("");
                column.push(if cell.is_empty() {
                    None
                } else {
                    Some(cell.to_string())
                });
            }
        }

        let row_count = columns.first().map_or(0, Vec::len);
        debug!(rows = row_count, cols = headers.len(), "parsed CSV input");

        Ok(Self {
            headers,
            columns,
            row_count,
        })
    }
}
