//! Bulk record export.
//!
//! Projects a collection (or a selection of it) onto tabular CSV via an
//! [`ExportFormatter`], or serializes it as a JSON envelope with export
//! metadata.

use crate::io::formats::csv::write_table;
use crate::io::formats::json::write_envelope;
use crate::io::formats::Format;
use crate::io::mapping::ExportFormatter;
use crate::models::Record;
use crate::store::RecordStore;
use crate::{Error, Result};
use chrono::Utc;
use std::io::Write;

/// Service exporting records from one record store.
pub struct ExportService<'a> {
    store: &'a RecordStore,
}

impl<'a> ExportService<'a> {
    /// Creates an export service over a store.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Exports records as tabular CSV, one row per record, columns in the
    /// formatter's declared order.
    ///
    /// `selection` limits the export to the given ids; `None` exports the
    /// whole collection. Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or an empty selection.
    pub fn export_tabular<W: Write>(
        &self,
        formatter: &ExportFormatter,
        selection: Option<&[String]>,
        writer: W,
    ) -> Result<usize> {
        let records = self.records_for(selection)?;
        let rows = formatter.format_records(&records);
        write_table(writer, &formatter.labels(), &rows)?;

        tracing::debug!(kind = %self.store.kind(), exported = records.len(), "wrote tabular export");
        Ok(records.len())
    }

    /// Exports records as a JSON envelope
    /// (`{ exportTime, dataType, total, data }`) with the raw records
    /// unchanged under `data`. Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or an empty selection.
    pub fn export_json<W: Write>(
        &self,
        selection: Option<&[String]>,
        writer: W,
    ) -> Result<usize> {
        let records = self.records_for(selection)?;
        let total = records.len();
        write_envelope(writer, self.store.kind(), records)?;

        tracing::debug!(kind = %self.store.kind(), exported = total, "wrote json export");
        Ok(total)
    }

    /// Returns a descriptive export file name: entity type plus current
    /// date, e.g. `words_2026-08-25.csv`.
    #[must_use]
    pub fn file_name(&self, format: Format) -> String {
        format!(
            "{}_{}.{}",
            self.store.kind().file_stem(),
            Utc::now().format("%Y-%m-%d"),
            format.extension()
        )
    }

    /// Loads the collection, filtered to a selection when one is given.
    ///
    /// Requesting zero identifiers is a caller error, not a silently empty
    /// export. Ids with no matching record are skipped.
    fn records_for(&self, selection: Option<&[String]>) -> Result<Vec<Record>> {
        let records = self.store.find_all()?;
        let Some(ids) = selection else {
            return Ok(records);
        };

        if ids.is_empty() {
            return Err(Error::InvalidInput(
                "selection export requires at least one record id".to_string(),
            ));
        }

        Ok(records
            .into_iter()
            .filter(|r| ids.iter().any(|id| id == r.id.as_str()))
            .collect())
    }
}
