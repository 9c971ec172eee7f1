//! Flat-file record store.
//!
//! One store per entity kind, backed by a single pretty-printed JSON array
//! file that is the sole source of truth: every read re-reads it and every
//! mutation rewrites it in full. The format stays directly inspectable and
//! editable; the full-file rewrite is the accepted tradeoff and is not
//! suited to very large collections.
//!
//! An in-process mutex serializes each store's read-modify-write cycle.
//! Concurrent writers from other processes are out of scope.

pub mod sampler;

use crate::config::StoreConfig;
use crate::models::{EntityKind, Record};
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Durable CRUD and sampling for one entity collection.
pub struct RecordStore {
    /// Entity kind this store owns.
    kind: EntityKind,
    /// Path of the backing collection file.
    path: PathBuf,
    /// Serializes the read-modify-write cycle of mutating operations.
    lock: Mutex<()>,
}

impl RecordStore {
    /// Opens the store for an entity kind, self-initializing an empty
    /// collection file if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory or the initial file cannot
    /// be created.
    pub fn open(config: &StoreConfig, kind: EntityKind) -> Result<Self> {
        fs::create_dir_all(config.data_dir())
            .map_err(|e| Error::operation("create_data_dir", e))?;

        let path = config.data_dir().join(kind.file_name());
        if !path.exists() {
            fs::write(&path, "[]\n").map_err(|e| Error::operation("init_collection", e))?;
            tracing::debug!(kind = %kind, path = %path.display(), "initialized empty collection");
        }

        Ok(Self {
            kind,
            path,
            lock: Mutex::new(()),
        })
    }

    /// Returns the entity kind this store owns.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates a record from an opaque payload.
    ///
    /// Assigns a fresh id, sets both timestamps to now, appends the record
    /// and rewrites the collection. Reserved keys (`id`, `createdAt`,
    /// `updatedAt`) in the payload are discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub fn create(&self, fields: Map<String, Value>) -> Result<Record> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut records = self.load()?;
        let record = Record::new(fields);
        records.push(record.clone());
        self.persist(&records)?;

        tracing::debug!(kind = %self.kind, id = %record.id, "created record");
        Ok(record)
    }

    /// Returns every record in current on-disk order.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub fn find_all(&self) -> Result<Vec<Record>> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        self.load()
    }

    /// Finds a record by id. `Ok(None)` means no such record.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub fn find_by_id(&self, id: &str) -> Result<Option<Record>> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let records = self.load()?;
        Ok(records.into_iter().find(|r| r.id.as_str() == id))
    }

    /// Shallow-merges a partial payload over the record with the given id.
    ///
    /// The original `id` and `createdAt` are preserved regardless of what
    /// the partial supplies; `updatedAt` is bumped. `Ok(None)` means the id
    /// was not found and nothing was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub fn update(&self, id: &str, partial: Map<String, Value>) -> Result<Option<Record>> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut records = self.load()?;
        let Some(record) = records.iter_mut().find(|r| r.id.as_str() == id) else {
            return Ok(None);
        };

        record.apply_partial(partial);
        let updated = record.clone();
        self.persist(&records)?;

        tracing::debug!(kind = %self.kind, id = %updated.id, "updated record");
        Ok(Some(updated))
    }

    /// Hard-deletes the record with the given id.
    ///
    /// Returns whether a record was actually removed; `false` means not
    /// found, which is a normal outcome. The collection is rewritten only
    /// when something changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.id.as_str() != id);

        if records.len() == before {
            return Ok(false);
        }

        self.persist(&records)?;
        tracing::debug!(kind = %self.kind, id, "deleted record");
        Ok(true)
    }

    /// Returns `min(k, total)` records chosen uniformly without replacement.
    ///
    /// Uses a partial Fisher–Yates shuffle; the result order is arbitrary
    /// even when `k` covers the whole collection. The randomness source is
    /// not cryptographic.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub fn sample(&self, k: usize) -> Result<Vec<Record>> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let records = self.load()?;
        Ok(sampler::sample_uniform(records, k, &mut rand::thread_rng()))
    }

    /// Returns the number of records in the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub fn count(&self) -> Result<usize> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(self.load()?.len())
    }

    /// Reads the full collection from disk.
    ///
    /// A missing file yields an empty collection (the store self-initializes
    /// on open, but the file may have been removed underneath us); unreadable
    /// or undeserializable content is an error, never an empty result.
    fn load(&self) -> Result<Vec<Record>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::operation("read_collection", e)),
        };

        serde_json::from_str(&text).map_err(|e| Error::operation("parse_collection", e))
    }

    /// Rewrites the full collection with stable, human-diffable formatting.
    fn persist(&self, records: &[Record]) -> Result<()> {
        let mut json = serde_json::to_string_pretty(records)
            .map_err(|e| Error::operation("serialize_collection", e))?;
        json.push('\n');

        fs::write(&self.path, json).map_err(|e| Error::operation("write_collection", e))
    }
}
