//! CSV format adapter for import/export.
//!
//! The first row is the column headers; header strings are the external
//! keys field descriptors refer to.

use crate::io::traits::{RawRow, RowSource};
use crate::{Error, Result};
use serde_json::Value;
use std::io::{BufRead, Write};

/// CSV import source.
///
/// Yields one [`RawRow`] per data row, keyed by the header strings. Cells
/// are trimmed; empty cells are omitted from the row so they read as absent.
pub struct CsvRowSource<R: BufRead> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
}

impl<R: BufRead> CsvRowSource<R> {
    /// Creates a new CSV row source.
    ///
    /// # Errors
    ///
    /// Returns an error if the header row cannot be read or is empty; a
    /// headerless sheet cannot be mapped and is a structural error.
    pub fn new(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| Error::operation("read_csv_headers", e))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(Error::InvalidInput(
                "CSV source has no column headers".to_string(),
            ));
        }

        Ok(Self {
            reader: csv_reader,
            headers,
        })
    }
}

impl<R: BufRead> RowSource for CsvRowSource<R> {
    fn next(&mut self) -> Result<Option<RawRow>> {
        let mut record = csv::StringRecord::new();
        let has_record = self
            .reader
            .read_record(&mut record)
            .map_err(|e| Error::operation("read_csv_row", e))?;
        if !has_record {
            return Ok(None);
        }

        let mut row = RawRow::new();
        for (header, cell) in self.headers.iter().zip(record.iter()) {
            let cell = cell.trim();
            if header.is_empty() || cell.is_empty() {
                continue;
            }
            row.insert(header.clone(), Value::String(cell.to_string()));
        }
        Ok(Some(row))
    }

    fn first_row_number(&self) -> usize {
        // Header occupies row 1, so the first data row is row 2.
        2
    }
}

/// Writes flat rows as CSV with a label header row.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_table<W: Write>(
    writer: W,
    labels: &[&str],
    rows: &[Vec<String>],
) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer
        .write_record(labels)
        .map_err(|e| Error::operation("write_csv_headers", e))?;
    for row in rows {
        csv_writer
            .write_record(row)
            .map_err(|e| Error::operation("write_csv_row", e))?;
    }

    csv_writer
        .flush()
        .map_err(|e| Error::operation("flush_csv", e))
}
