//! # Lexistore
//!
//! A flat-file record store for vocabulary content (words, phrases,
//! sentences, patterns, topics, categories) with bulk import/export.
//!
//! Each entity kind is backed by one human-diffable JSON file. The store
//! assigns identity and timestamps, and treats the domain payload opaquely;
//! field-level validation happens only on the import path, where declarative
//! field mappers turn spreadsheet/JSON rows into record payloads and collect
//! per-row errors without aborting the batch.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lexistore::{EntityKind, RecordStore, StoreConfig};
//!
//! let config = StoreConfig::new("./data");
//! let store = RecordStore::open(&config, EntityKind::Word)?;
//! let record = store.create(serde_json::Map::from_iter([(
//!     "word".to_string(),
//!     serde_json::Value::String("ephemeral".to_string()),
//! )]))?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod bulk;
pub mod config;
pub mod io;
pub mod mappings;
pub mod models;
pub mod store;

// Re-exports for convenience
pub use bulk::{BulkFailure, BulkOutcome};
pub use config::StoreConfig;
pub use io::mapping::{ExportColumn, ExportFormatter, FieldDescriptor, FieldMapper};
pub use io::services::{ExportService, ImportOptions, ImportReport, ImportService};
pub use models::{EntityKind, Record, RecordId};
pub use store::RecordStore;

/// Error type for lexistore operations.
///
/// Not-found outcomes are not errors: `find_by_id` and `update` return
/// `Ok(None)` and `delete` returns `Ok(false)` for a missing id. Errors are
/// reserved for invalid input and failed I/O or (de)serialization.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - An import source is structurally unusable (JSON that is not an
    ///   array of objects, a tabular file without headers)
    /// - An unknown entity kind or file extension is given
    /// - A selection export is requested with zero identifiers
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - The backing collection file cannot be read or written
    /// - A collection file holds content that does not deserialize
    /// - An export writer fails
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Creates an `OperationFailed` error from an operation name and cause.
    pub fn operation(operation: impl Into<String>, cause: impl ToString) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }
}

/// Result type for lexistore operations.
pub type Result<T> = std::result::Result<T, Error>;
