//! Bulk record import.
//!
//! End-to-end orchestration: decode source bytes into rows, run the field
//! mapper, create a record per valid row, and aggregate a single summary.
//!
//! The pipeline is partial-failure tolerant throughout: a row that fails
//! mapping or creation is reported and skipped, and every other row still
//! goes through. Only structural errors (unreadable source, JSON that is
//! not an array, a headerless sheet) abort before any record is created.

use crate::bulk;
use crate::io::formats::{Format, create_row_source};
use crate::io::mapping::FieldMapper;
use crate::io::traits::RawRow;
use crate::store::RecordStore;
use crate::{Error, Result};
use std::io::BufRead;
use std::path::Path;

/// Default number of failure reasons shown in a summary.
pub const DEFAULT_ERROR_SAMPLE: usize = 3;

/// Options for record import.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Source format; autodetected from the file extension when `None`.
    pub format: Option<Format>,
    /// Validate and map without creating records.
    pub dry_run: bool,
}

impl ImportOptions {
    /// Sets the source format explicitly.
    #[must_use]
    pub const fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Enables dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Result of an import operation.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Rows that became records (or would have, under dry run).
    pub created: usize,
    /// Rows that failed mapping or creation.
    pub failed: usize,
    /// Row-scoped error messages, in row order.
    pub errors: Vec<String>,
}

impl ImportReport {
    /// Returns whether any row failed.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Renders counts plus a bounded sample of error messages.
    ///
    /// Truncation is explicit ("...and N more"), never silent.
    #[must_use]
    pub fn summary(&self, sample_limit: usize) -> String {
        let mut out = format!("created {}, failed {}", self.created, self.failed);
        for error in self.errors.iter().take(sample_limit) {
            out.push_str("\n  ");
            out.push_str(error);
        }
        if self.errors.len() > sample_limit {
            out.push_str(&format!(
                "\n  ...and {} more",
                self.errors.len() - sample_limit
            ));
        }
        out
    }
}

/// Service importing external rows into one record store.
pub struct ImportService<'a> {
    store: &'a RecordStore,
}

impl<'a> ImportService<'a> {
    /// Creates an import service over a store.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Imports records from a file, detecting the format from its extension
    /// unless the options name one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, the format is
    /// unrecognized, or the source is structurally unusable.
    pub fn import_path(
        &self,
        path: &Path,
        mapper: &FieldMapper,
        options: &ImportOptions,
    ) -> Result<ImportReport> {
        let format = match options.format {
            Some(format) => format,
            None => Format::from_path(path)?,
        };

        let file = std::fs::File::open(path).map_err(|e| Error::operation("open_import_file", e))?;
        let reader = std::io::BufReader::new(file);
        self.import_reader(reader, format, mapper, options)
    }

    /// Imports records from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error only for structural/parse failures; per-row
    /// problems are collected into the report.
    pub fn import_reader<R: BufRead + 'static>(
        &self,
        reader: R,
        format: Format,
        mapper: &FieldMapper,
        options: &ImportOptions,
    ) -> Result<ImportReport> {
        let mut source = create_row_source(reader, format)?;
        let first_row_number = source.first_row_number();

        let mut rows: Vec<RawRow> = Vec::new();
        while let Some(row) = source.next()? {
            rows.push(row);
        }

        let mapped = mapper.map_rows(&rows, first_row_number);
        tracing::debug!(
            kind = %self.store.kind(),
            rows = rows.len(),
            valid = mapped.valid.len(),
            failed = mapped.failed_rows,
            "mapped import rows"
        );

        let mut report = ImportReport {
            created: 0,
            failed: mapped.failed_rows,
            errors: mapped.errors,
        };

        if options.dry_run {
            report.created = mapped.valid.len();
            return Ok(report);
        }

        // A row either fully creates a record or fully fails; one failing
        // create never aborts the remainder.
        let mut sequence = 0usize;
        let outcome = bulk::run(
            mapped.valid,
            |_| {
                sequence += 1;
                format!("record {sequence}")
            },
            |payload| {
                self.store
                    .create(payload)
                    .map_err(|e| format!("create failed: {e}"))
            },
        );

        report.created = outcome.succeeded.len();
        report.failed += outcome.failed.len();
        report
            .errors
            .extend(outcome.failed.iter().map(ToString::to_string));

        tracing::info!(
            kind = %self.store.kind(),
            created = report.created,
            failed = report.failed,
            "import finished"
        );
        Ok(report)
    }
}
