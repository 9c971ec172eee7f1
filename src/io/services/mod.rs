//! Import and export orchestration services.

pub mod export;
pub mod import;

pub use export::ExportService;
pub use import::{ImportOptions, ImportReport, ImportService};
