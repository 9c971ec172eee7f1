//! Built-in field mappings per entity kind.
//!
//! These reproduce the per-entity spreadsheet templates of the content
//! suite: one import mapper and one export column set per kind. Library
//! callers may supply their own descriptors instead; the CLI uses these.
//!
//! List-valued cells ("categories", "words", "examples") accept either a
//! delimited string (comma/semicolon) or a JSON array of strings, so the
//! same mapper serves both tabular and JSON sources. Word definitions use
//! the `"pos: meaning; pos: meaning"` cell form.

use crate::io::mapping::{ExportColumn, ExportFormatter, FieldDescriptor, FieldMapper};
use crate::models::EntityKind;
use serde_json::{Value, json};

/// Returns the built-in import mapper for an entity kind.
#[must_use]
pub fn import_mapper(kind: EntityKind) -> FieldMapper {
    let descriptors = match kind {
        EntityKind::Word => vec![
            FieldDescriptor::new("word", "word").required(),
            FieldDescriptor::new("definitions", "definitions").with_transform(|raw, _| {
                parse_definitions(raw)
            }),
            FieldDescriptor::new("categories", "categoryIds").with_transform(|raw, _| {
                parse_list(raw, "categories")
            }),
        ],
        EntityKind::Phrase => vec![
            FieldDescriptor::new("phrase", "phrase").required(),
            FieldDescriptor::new("translation", "translation"),
            FieldDescriptor::new("words", "wordIds")
                .with_transform(|raw, _| parse_list(raw, "words")),
        ],
        EntityKind::Sentence => vec![
            FieldDescriptor::new("sentence", "sentence").required(),
            FieldDescriptor::new("translation", "translation"),
            FieldDescriptor::new("words", "wordIds")
                .with_transform(|raw, _| parse_list(raw, "words")),
        ],
        EntityKind::Pattern => vec![
            FieldDescriptor::new("pattern", "pattern").required(),
            FieldDescriptor::new("description", "description"),
            FieldDescriptor::new("examples", "examples")
                .with_transform(|raw, _| parse_list(raw, "examples")),
        ],
        EntityKind::Topic => vec![
            FieldDescriptor::new("name", "name").required(),
            FieldDescriptor::new("description", "description"),
        ],
        EntityKind::PartOfSpeech => vec![
            FieldDescriptor::new("name", "name").required(),
            FieldDescriptor::new("abbreviation", "abbreviation"),
        ],
        EntityKind::Component => vec![
            FieldDescriptor::new("name", "name").required(),
            FieldDescriptor::new("type", "type"),
            FieldDescriptor::new("description", "description"),
        ],
        EntityKind::Category => vec![
            FieldDescriptor::new("name", "name").required(),
            FieldDescriptor::new("description", "description"),
        ],
    };
    FieldMapper::new(descriptors)
}

/// Returns the built-in export formatter for an entity kind.
#[must_use]
pub fn export_formatter(kind: EntityKind) -> ExportFormatter {
    let mut columns = match kind {
        EntityKind::Word => vec![
            ExportColumn::new("word", "Word"),
            ExportColumn::new("definitions", "Definitions")
                .with_transform(|value, _| render_definitions(value)),
            ExportColumn::new("categoryIds", "Categories"),
        ],
        EntityKind::Phrase => vec![
            ExportColumn::new("phrase", "Phrase"),
            ExportColumn::new("translation", "Translation"),
            ExportColumn::new("wordIds", "Words"),
        ],
        EntityKind::Sentence => vec![
            ExportColumn::new("sentence", "Sentence"),
            ExportColumn::new("translation", "Translation"),
            ExportColumn::new("wordIds", "Words"),
        ],
        EntityKind::Pattern => vec![
            ExportColumn::new("pattern", "Pattern"),
            ExportColumn::new("description", "Description"),
            ExportColumn::new("examples", "Examples"),
        ],
        EntityKind::Topic => vec![
            ExportColumn::new("name", "Name"),
            ExportColumn::new("description", "Description"),
        ],
        EntityKind::PartOfSpeech => vec![
            ExportColumn::new("name", "Name"),
            ExportColumn::new("abbreviation", "Abbreviation"),
        ],
        EntityKind::Component => vec![
            ExportColumn::new("name", "Name"),
            ExportColumn::new("type", "Type"),
            ExportColumn::new("description", "Description"),
        ],
        EntityKind::Category => vec![
            ExportColumn::new("name", "Name"),
            ExportColumn::new("description", "Description"),
        ],
    };

    columns.push(ExportColumn::new("id", "ID"));
    columns.push(ExportColumn::new("createdAt", "Created"));
    columns.push(ExportColumn::new("updatedAt", "Updated"));
    ExportFormatter::new(columns)
}

/// Parses a list cell: delimited string or JSON array of strings.
fn parse_list(raw: &Value, field: &str) -> Result<Value, String> {
    match raw {
        Value::String(s) => {
            let items: Vec<Value> = s
                .split([',', ';'])
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect();
            Ok(Value::Array(items))
        },
        Value::Array(items) => {
            if items.iter().all(Value::is_string) {
                Ok(raw.clone())
            } else {
                Err(format!("{field} must be a list of strings"))
            }
        },
        _ => Err(format!("{field} must be a delimited string or a list")),
    }
}

/// Parses a definitions cell into `[{partOfSpeech, meaning}]`.
///
/// String form: `"noun: a fruit; verb: to gather"`. JSON form: an array of
/// objects already shaped that way.
fn parse_definitions(raw: &Value) -> Result<Value, String> {
    match raw {
        Value::String(s) => {
            let mut definitions = Vec::new();
            for part in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                let Some((pos, meaning)) = part.split_once(':') else {
                    return Err(format!(
                        "definitions entry '{part}' must look like 'pos: meaning'"
                    ));
                };
                let meaning = meaning.trim();
                if meaning.is_empty() {
                    return Err(format!("definitions entry '{part}' has an empty meaning"));
                }
                definitions.push(json!({
                    "partOfSpeech": pos.trim(),
                    "meaning": meaning,
                }));
            }
            Ok(Value::Array(definitions))
        },
        Value::Array(items) => {
            let well_formed = items.iter().all(|item| {
                item.get("partOfSpeech").is_some_and(Value::is_string)
                    && item.get("meaning").is_some_and(Value::is_string)
            });
            if well_formed {
                Ok(raw.clone())
            } else {
                Err("definitions entries must have partOfSpeech and meaning".to_string())
            }
        },
        _ => Err("definitions must be a string or a list of objects".to_string()),
    }
}

/// Renders definitions back to the `"pos: meaning; pos: meaning"` cell form.
fn render_definitions(value: &Value) -> String {
    let Value::Array(items) = value else {
        return String::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let pos = item.get("partOfSpeech")?.as_str()?;
            let meaning = item.get("meaning")?.as_str()?;
            Some(format!("{pos}: {meaning}"))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::traits::RawRow;
    use crate::models::Record;

    fn row(pairs: &[(&str, Value)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_word_mapper_parses_cells() {
        let mapper = import_mapper(EntityKind::Word);
        let payload = mapper
            .map_row(&row(&[
                ("word", json!("apple")),
                ("definitions", json!("noun: a fruit; verb: to gather")),
                ("categories", json!("food, plants")),
            ]))
            .unwrap();

        assert_eq!(payload["word"], json!("apple"));
        assert_eq!(
            payload["definitions"],
            json!([
                {"partOfSpeech": "noun", "meaning": "a fruit"},
                {"partOfSpeech": "verb", "meaning": "to gather"},
            ])
        );
        assert_eq!(payload["categoryIds"], json!(["food", "plants"]));
    }

    #[test]
    fn test_word_mapper_accepts_json_shapes() {
        let mapper = import_mapper(EntityKind::Word);
        let payload = mapper
            .map_row(&row(&[
                ("word", json!("apple")),
                ("definitions", json!([{"partOfSpeech": "noun", "meaning": "a fruit"}])),
                ("categories", json!(["food"])),
            ]))
            .unwrap();

        assert_eq!(payload["categoryIds"], json!(["food"]));
    }

    #[test]
    fn test_malformed_definitions_rejected() {
        let mapper = import_mapper(EntityKind::Word);
        let errors = mapper
            .map_row(&row(&[
                ("word", json!("apple")),
                ("definitions", json!("no separator here")),
            ]))
            .unwrap_err();

        assert!(errors[0].contains("pos: meaning"));
    }

    #[test]
    fn test_every_kind_has_mapper_and_formatter() {
        for kind in EntityKind::all() {
            let mapper = import_mapper(*kind);
            assert!(mapper.descriptors().iter().any(|d| d.required));

            let formatter = export_formatter(*kind);
            let labels = formatter.labels();
            assert!(labels.contains(&"ID"));
            assert!(labels.contains(&"Created"));
        }
    }

    #[test]
    fn test_definitions_roundtrip_through_export() {
        let mapper = import_mapper(EntityKind::Word);
        let payload = mapper
            .map_row(&row(&[
                ("word", json!("apple")),
                ("definitions", json!("noun: a fruit")),
            ]))
            .unwrap();

        let record = Record::new(payload);
        let formatter = export_formatter(EntityKind::Word);
        let flat = formatter.format_record(&record);
        assert_eq!(flat[0], "apple");
        assert_eq!(flat[1], "noun: a fruit");
    }
}
