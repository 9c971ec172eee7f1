//! Format adapters for import/export.

pub mod csv;
pub mod json;

use crate::io::traits::RowSource;
use crate::{Error, Result};
use std::io::BufRead;
use std::path::Path;

/// Supported file formats for import/export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// JSON: a top-level array of row objects on import, an envelope with
    /// export metadata on export.
    Json,
    /// Tabular CSV: first row is column headers.
    Csv,
}

impl Format {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Returns the MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }

    /// Detects format from file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is missing or not recognized.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            Some(ext) => Err(Error::InvalidInput(format!(
                "unsupported file extension: .{ext}"
            ))),
            None => Err(Error::InvalidInput(
                "cannot determine format: file has no extension".to_string(),
            )),
        }
    }

    /// Parses a format name string.
    ///
    /// Returns `None` if the name is not recognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Creates a row source for the given format.
///
/// # Errors
///
/// Returns an error if the source is structurally unusable (see the
/// adapters for what each format requires up front).
pub fn create_row_source<R: BufRead + 'static>(
    reader: R,
    format: Format,
) -> Result<Box<dyn RowSource>> {
    match format {
        Format::Json => Ok(Box::new(json::JsonRowSource::new(reader)?)),
        Format::Csv => Ok(Box::new(csv::CsvRowSource::new(reader)?)),
    }
}
