//! Record type and identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a record.
///
/// Opaque string, assigned by the store at creation and immutable
/// thereafter. Never reused after deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a record ID from an existing string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh, unique record ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One entity instance: identity, timestamps, and an opaque domain payload.
///
/// The payload is flattened into the same JSON object as the bookkeeping
/// fields, so a persisted Word reads as
/// `{"id": "...", "createdAt": "...", "updatedAt": "...", "word": "..."}`.
/// The store never validates payload fields; field-level validation belongs
/// to the import path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique identifier.
    pub id: RecordId,
    /// Creation timestamp, set once and never changed.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp, bumped on every successful update.
    pub updated_at: DateTime<Utc>,
    /// Entity-specific fields, kept opaque by the store.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Payload keys owned by the store; stripped from caller-supplied payloads.
pub(crate) const RESERVED_KEYS: &[&str] = &["id", "createdAt", "updatedAt"];

impl Record {
    /// Creates a new record with a fresh id and current timestamps.
    ///
    /// Reserved keys in `fields` are discarded; identity and timestamps are
    /// always store-assigned.
    #[must_use]
    pub fn new(mut fields: Map<String, Value>) -> Self {
        for key in RESERVED_KEYS {
            fields.remove(*key);
        }
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            created_at: now,
            updated_at: now,
            fields,
        }
    }

    /// Shallow-merges a partial payload over this record's fields.
    ///
    /// Fields present in `partial` overwrite, fields absent are retained.
    /// Reserved keys in `partial` are ignored: `id` and `created_at` are
    /// preserved, `updated_at` is set to the current time.
    pub fn apply_partial(&mut self, partial: Map<String, Value>) {
        for (key, value) in partial {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            self.fields.insert(key, value);
        }
        self.updated_at = Utc::now();
    }

    /// Returns a payload field as a string slice, if present and a string.
    #[must_use]
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}
