//! Domain models: records, identifiers, and entity kinds.

mod entity;
mod record;

pub use entity::EntityKind;
pub use record::{Record, RecordId};
