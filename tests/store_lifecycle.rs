//! Integration tests for the record store lifecycle.

use lexistore::{EntityKind, RecordStore, StoreConfig, bulk};
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use tempfile::TempDir;

fn word_store(dir: &TempDir) -> RecordStore {
    RecordStore::open(&StoreConfig::new(dir.path()), EntityKind::Word).unwrap()
}

fn payload(word: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("word".to_string(), json!(word));
    fields
}

#[test]
fn create_read_update_delete_roundtrip() {
    let dir = TempDir::new().unwrap();
    let store = word_store(&dir);

    let created = store.create(payload("apple")).unwrap();
    assert_eq!(created.field_str("word"), Some("apple"));

    let found = store.find_by_id(created.id.as_str()).unwrap().unwrap();
    assert_eq!(found, created);

    let updated = store
        .update(created.id.as_str(), payload("pear"))
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.field_str("word"), Some("pear"));
    assert!(updated.updated_at >= created.updated_at);

    assert!(store.delete(created.id.as_str()).unwrap());
    assert!(store.find_by_id(created.id.as_str()).unwrap().is_none());
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn identity_unique_across_creates_and_deletes() {
    let dir = TempDir::new().unwrap();
    let store = word_store(&dir);

    let mut seen = HashSet::new();
    for i in 0..20 {
        let record = store.create(payload(&format!("w{i}"))).unwrap();
        assert!(seen.insert(record.id.as_str().to_string()));
        // Ids are never reused, even after deletion.
        store.delete(record.id.as_str()).unwrap();
    }
}

#[test]
fn collection_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::new(dir.path());

    let id = {
        let store = RecordStore::open(&config, EntityKind::Word).unwrap();
        store.create(payload("apple")).unwrap().id
    };

    let reopened = RecordStore::open(&config, EntityKind::Word).unwrap();
    let found = reopened.find_by_id(id.as_str()).unwrap().unwrap();
    assert_eq!(found.field_str("word"), Some("apple"));
}

#[test]
fn update_ignores_forged_bookkeeping_fields() {
    let dir = TempDir::new().unwrap();
    let store = word_store(&dir);

    let created = store.create(payload("apple")).unwrap();
    let mut partial = payload("pear");
    partial.insert("id".to_string(), json!("forged-id"));
    partial.insert("createdAt".to_string(), json!("1999-01-01T00:00:00Z"));
    partial.insert("updatedAt".to_string(), json!("1999-01-01T00:00:00Z"));

    let updated = store.update(created.id.as_str(), partial).unwrap().unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    // The forged keys never land in the payload either.
    assert!(!updated.fields.contains_key("id"));
    assert!(!updated.fields.contains_key("createdAt"));
}

#[test]
fn deleting_referenced_category_leaves_dangling_ids() {
    // Cross-entity references are plain strings with no cascade: deleting a
    // category must not touch the words referencing it.
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::new(dir.path());
    let categories = RecordStore::open(&config, EntityKind::Category).unwrap();
    let words = RecordStore::open(&config, EntityKind::Word).unwrap();

    let mut category_fields = Map::new();
    category_fields.insert("name".to_string(), json!("food"));
    let category = categories.create(category_fields).unwrap();

    let mut word_fields = payload("apple");
    word_fields.insert("categoryIds".to_string(), json!([category.id.as_str()]));
    let word = words.create(word_fields).unwrap();

    assert!(categories.delete(category.id.as_str()).unwrap());

    let word = words.find_by_id(word.id.as_str()).unwrap().unwrap();
    assert_eq!(word.fields["categoryIds"], json!([category.id.as_str()]));
}

#[test]
fn sample_is_uniform_without_replacement() {
    let dir = TempDir::new().unwrap();
    let store = word_store(&dir);

    let mut all_ids = HashSet::new();
    for i in 0..30 {
        all_ids.insert(store.create(payload(&format!("w{i}"))).unwrap().id);
    }

    let sampled = store.sample(12).unwrap();
    assert_eq!(sampled.len(), 12);

    let sampled_ids: HashSet<_> = sampled.into_iter().map(|r| r.id).collect();
    assert_eq!(sampled_ids.len(), 12);
    assert!(sampled_ids.is_subset(&all_ids));
}

#[test]
fn bulk_delete_reports_partial_failure() {
    let dir = TempDir::new().unwrap();
    let store = word_store(&dir);

    let mut ids: Vec<String> = (0..3)
        .map(|i| {
            store
                .create(payload(&format!("w{i}")))
                .unwrap()
                .id
                .as_str()
                .to_string()
        })
        .collect();
    ids.push("ghost-1".to_string());
    ids.push("ghost-2".to_string());

    let outcome = bulk::run(
        ids.iter(),
        |id| (*id).clone(),
        |id| match store.delete(id) {
            Ok(true) => Ok(()),
            Ok(false) => Err("not found".to_string()),
            Err(e) => Err(e.to_string()),
        },
    );

    assert_eq!(outcome.succeeded.len(), 3);
    assert_eq!(outcome.failed.len(), 2);
    assert_eq!(store.count().unwrap(), 0);

    let summary = outcome.summary(3);
    assert!(summary.starts_with("succeeded 3, failed 2"));
    assert!(summary.contains("ghost-1: not found"));
}
