//! JSON format adapter for import/export.
//!
//! Import expects a top-level array of row objects. Export wraps the raw
//! record array in an envelope carrying export metadata.

use crate::io::traits::{RawRow, RowSource};
use crate::models::{EntityKind, Record};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};

/// JSON import source.
///
/// The whole document is parsed up front: a top-level value that is not an
/// array, or an array element that is not an object, is a structural error
/// before any row processing.
pub struct JsonRowSource {
    rows: std::vec::IntoIter<RawRow>,
    total: usize,
}

impl JsonRowSource {
    /// Creates a new JSON row source.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or not an array
    /// of objects.
    pub fn new<R: BufRead>(reader: R) -> Result<Self> {
        let value: Value =
            serde_json::from_reader(reader).map_err(|e| Error::operation("parse_json", e))?;

        let Value::Array(items) = value else {
            return Err(Error::InvalidInput(
                "JSON import source must be an array of objects".to_string(),
            ));
        };

        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(map) => rows.push(map),
                other => {
                    return Err(Error::InvalidInput(format!(
                        "JSON import source element {index} is not an object: {other}"
                    )));
                },
            }
        }

        let total = rows.len();
        Ok(Self {
            rows: rows.into_iter(),
            total,
        })
    }
}

impl RowSource for JsonRowSource {
    fn next(&mut self) -> Result<Option<RawRow>> {
        Ok(self.rows.next())
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.total)
    }
}

/// JSON export envelope: raw records plus export metadata.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    /// When the export was produced.
    pub export_time: DateTime<Utc>,
    /// Entity type tag ("word", "phrase", ...).
    pub data_type: String,
    /// Number of records under `data`.
    pub total: usize,
    /// The records, unchanged.
    pub data: Vec<Record>,
}

impl ExportEnvelope {
    /// Wraps records in an envelope stamped with the current time.
    #[must_use]
    pub fn new(kind: EntityKind, data: Vec<Record>) -> Self {
        Self {
            export_time: Utc::now(),
            data_type: kind.as_str().to_string(),
            total: data.len(),
            data,
        }
    }
}

/// Writes records as a pretty-printed JSON envelope.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_envelope<W: Write>(mut writer: W, kind: EntityKind, records: Vec<Record>) -> Result<()> {
    let envelope = ExportEnvelope::new(kind, records);
    serde_json::to_writer_pretty(&mut writer, &envelope)
        .map_err(|e| Error::operation("write_json_export", e))?;
    writer
        .write_all(b"\n")
        .map_err(|e| Error::operation("write_json_export", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn test_import_array_of_objects() {
        let input = r#"[{"word": "apple"}, {"word": "pear", "note": "ripe"}]"#;
        let mut source = JsonRowSource::new(Cursor::new(input)).unwrap();

        assert_eq!(source.size_hint(), Some(2));
        assert_eq!(source.first_row_number(), 1);

        let first = source.next().unwrap().unwrap();
        assert_eq!(first["word"], json!("apple"));
        let second = source.next().unwrap().unwrap();
        assert_eq!(second["note"], json!("ripe"));
        assert!(source.next().unwrap().is_none());
    }

    #[test]
    fn test_non_array_rejected() {
        let result = JsonRowSource::new(Cursor::new(r#"{"word": "apple"}"#));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_non_object_element_rejected() {
        let result = JsonRowSource::new(Cursor::new(r#"[{"word": "apple"}, 42]"#));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = JsonRowSource::new(Cursor::new("not json"));
        assert!(matches!(result, Err(Error::OperationFailed { .. })));
    }

    #[test]
    fn test_envelope_roundtrip() {
        let mut fields = serde_json::Map::new();
        fields.insert("word".to_string(), json!("apple"));
        let records = vec![Record::new(fields)];

        let mut output = Vec::new();
        write_envelope(&mut output, EntityKind::Word, records.clone()).unwrap();

        let envelope: ExportEnvelope = serde_json::from_slice(&output).unwrap();
        assert_eq!(envelope.data_type, "word");
        assert_eq!(envelope.total, 1);
        assert_eq!(envelope.data, records);
    }
}
