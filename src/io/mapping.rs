//! Declarative field mapping between external rows and record payloads.
//!
//! [`FieldMapper`] is the import direction: external column/key names to
//! validated internal fields, collecting every field error of a row before
//! judging it. [`ExportFormatter`] is the mirror: internal fields to flat
//! display columns.

use crate::io::traits::RawRow;
use crate::models::Record;
use serde_json::{Map, Value};

/// Transform/validate function for one import field.
///
/// Receives the raw value and the full row (for cross-field rules); returns
/// the internal value or a human-readable rejection message.
pub type TransformFn =
    Box<dyn Fn(&Value, &RawRow) -> std::result::Result<Value, String> + Send + Sync>;

/// One declarative rule mapping an external column/key to an internal field.
pub struct FieldDescriptor {
    /// External column header or JSON key.
    pub external: String,
    /// Internal payload field name.
    pub internal: String,
    /// Whether an absent/empty raw value fails the row.
    pub required: bool,
    /// Optional transform/validate function.
    pub transform: Option<TransformFn>,
}

impl FieldDescriptor {
    /// Creates an optional descriptor copying the raw value through.
    #[must_use]
    pub fn new(external: impl Into<String>, internal: impl Into<String>) -> Self {
        Self {
            external: external.into(),
            internal: internal.into(),
            required: false,
            transform: None,
        }
    }

    /// Marks the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the transform/validate function.
    #[must_use]
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Value, &RawRow) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(transform));
        self
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("external", &self.external)
            .field("internal", &self.internal)
            .field("required", &self.required)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

/// Result of mapping a batch of rows.
#[derive(Debug, Default)]
pub struct MappedRows {
    /// Payloads of the rows with zero errors, in row order.
    pub valid: Vec<RawRow>,
    /// Row-scoped error messages ("row N: ..."), in row order.
    ///
    /// A row may contribute several messages; `failed_rows` counts rows.
    pub errors: Vec<String>,
    /// Number of rows excluded for having at least one error.
    pub failed_rows: usize,
}

/// Transforms externally-sourced rows into validated record payloads.
pub struct FieldMapper {
    descriptors: Vec<FieldDescriptor>,
}

impl FieldMapper {
    /// Creates a mapper from field descriptors.
    #[must_use]
    pub fn new(descriptors: Vec<FieldDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Returns the descriptors.
    #[must_use]
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    /// Maps one row, collecting every field error before judging it.
    ///
    /// A user fixing an import file sees all problems of a row in one pass,
    /// not just the first.
    ///
    /// # Errors
    ///
    /// Returns all field-level messages when the row has at least one.
    pub fn map_row(&self, row: &RawRow) -> std::result::Result<RawRow, Vec<String>> {
        let mut payload = Map::new();
        let mut errors = Vec::new();

        for descriptor in &self.descriptors {
            let raw = row.get(&descriptor.external);
            if is_absent(raw) {
                if descriptor.required {
                    errors.push(format!(
                        "missing required field '{}'",
                        descriptor.external
                    ));
                }
                continue;
            }
            let raw = raw.unwrap_or(&Value::Null);

            match &descriptor.transform {
                Some(transform) => match transform(raw, row) {
                    Ok(value) => {
                        payload.insert(descriptor.internal.clone(), value);
                    },
                    Err(message) => errors.push(message),
                },
                None => {
                    payload.insert(descriptor.internal.clone(), raw.clone());
                },
            }
        }

        if errors.is_empty() { Ok(payload) } else { Err(errors) }
    }

    /// Maps a batch of rows.
    ///
    /// Rows are numbered from `first_row_number` (2 for tabular sources,
    /// where the header occupies row 1). A row with any error is excluded
    /// from the valid set; its errors land in `errors` tagged with the row
    /// number.
    #[must_use]
    pub fn map_rows(&self, rows: &[RawRow], first_row_number: usize) -> MappedRows {
        let mut mapped = MappedRows::default();

        for (offset, row) in rows.iter().enumerate() {
            let row_number = first_row_number + offset;
            match self.map_row(row) {
                Ok(payload) => mapped.valid.push(payload),
                Err(errors) => {
                    mapped.failed_rows += 1;
                    mapped
                        .errors
                        .extend(errors.into_iter().map(|e| format!("row {row_number}: {e}")));
                },
            }
        }

        mapped
    }
}

/// Whether a raw value counts as absent for the required-field check.
fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Display transform for one export column.
pub type ColumnTransform = Box<dyn Fn(&Value, &Record) -> String + Send + Sync>;

/// One declarative export column: internal field to labeled display value.
pub struct ExportColumn {
    /// Internal payload field name ("id", "createdAt" and "updatedAt" reach
    /// the bookkeeping fields).
    pub internal: String,
    /// Column label in the output.
    pub label: String,
    /// Optional display transform; defaults to a flat rendering.
    pub transform: Option<ColumnTransform>,
}

impl ExportColumn {
    /// Creates a column with the default flat rendering.
    #[must_use]
    pub fn new(internal: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            internal: internal.into(),
            label: label.into(),
            transform: None,
        }
    }

    /// Sets the display transform.
    #[must_use]
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Value, &Record) -> String + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(transform));
        self
    }
}

impl std::fmt::Debug for ExportColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportColumn")
            .field("internal", &self.internal)
            .field("label", &self.label)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

/// Projects records onto flat rows per a declarative column list.
pub struct ExportFormatter {
    columns: Vec<ExportColumn>,
}

impl ExportFormatter {
    /// Creates a formatter from export columns.
    #[must_use]
    pub fn new(columns: Vec<ExportColumn>) -> Self {
        Self { columns }
    }

    /// Returns the column labels in declared order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    /// Formats one record as a flat row, columns in declared order.
    #[must_use]
    pub fn format_record(&self, record: &Record) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| {
                let value = lookup(record, &column.internal);
                match &column.transform {
                    Some(transform) => transform(&value, record),
                    None => render_flat(&value),
                }
            })
            .collect()
    }

    /// Formats a batch of records, one row per record.
    #[must_use]
    pub fn format_records(&self, records: &[Record]) -> Vec<Vec<String>> {
        records.iter().map(|r| self.format_record(r)).collect()
    }
}

/// Resolves an internal key against a record, bookkeeping fields included.
fn lookup(record: &Record, internal: &str) -> Value {
    match internal {
        "id" => Value::String(record.id.as_str().to_string()),
        "createdAt" => Value::String(record.created_at.to_rfc3339()),
        "updatedAt" => Value::String(record.updated_at.to_rfc3339()),
        key => record.fields.get(key).cloned().unwrap_or(Value::Null),
    }
}

/// Default flat rendering of a payload value.
fn render_flat(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(render_flat)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn word_mapper() -> FieldMapper {
        FieldMapper::new(vec![
            FieldDescriptor::new("word", "word").required(),
            FieldDescriptor::new("note", "note"),
            FieldDescriptor::new("level", "level").with_transform(|raw, _| {
                raw.as_str()
                    .and_then(|s| s.trim().parse::<u64>().ok())
                    .map(Value::from)
                    .ok_or_else(|| "level must be a whole number".to_string())
            }),
        ])
    }

    #[test]
    fn test_map_row_valid() {
        let mapper = word_mapper();
        let payload = mapper
            .map_row(&row(&[("word", json!("apple")), ("level", json!("3"))]))
            .unwrap();

        assert_eq!(payload["word"], json!("apple"));
        assert_eq!(payload["level"], json!(3));
        assert!(!payload.contains_key("note"));
    }

    #[test]
    fn test_map_row_collects_all_errors() {
        let mapper = word_mapper();
        let errors = mapper
            .map_row(&row(&[("word", json!("  ")), ("level", json!("high"))]))
            .unwrap_err();

        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("missing required field 'word'"));
        assert!(errors[1].contains("whole number"));
    }

    #[test]
    fn test_map_rows_numbers_from_header_offset() {
        let mapper = word_mapper();
        let rows = vec![
            row(&[("word", json!("apple"))]),
            row(&[("note", json!("no word here"))]),
            row(&[("word", json!("pear"))]),
        ];

        let mapped = mapper.map_rows(&rows, 2);
        assert_eq!(mapped.valid.len(), 2);
        assert_eq!(mapped.failed_rows, 1);
        assert_eq!(mapped.errors.len(), 1);
        assert!(mapped.errors[0].starts_with("row 3: "));
    }

    #[test]
    fn test_absent_values() {
        assert!(is_absent(None));
        assert!(is_absent(Some(&Value::Null)));
        assert!(is_absent(Some(&json!("   "))));
        assert!(!is_absent(Some(&json!("x"))));
        assert!(!is_absent(Some(&json!(0))));
        assert!(!is_absent(Some(&json!(false))));
    }

    #[test]
    fn test_formatter_flat_rendering() {
        let formatter = ExportFormatter::new(vec![
            ExportColumn::new("word", "Word"),
            ExportColumn::new("categoryIds", "Categories"),
            ExportColumn::new("missing", "Missing"),
            ExportColumn::new("id", "ID"),
        ]);

        let mut fields = Map::new();
        fields.insert("word".to_string(), json!("apple"));
        fields.insert("categoryIds".to_string(), json!(["c1", "c2"]));
        let record = Record::new(fields);

        let flat = formatter.format_record(&record);
        assert_eq!(flat[0], "apple");
        assert_eq!(flat[1], "c1, c2");
        assert_eq!(flat[2], "");
        assert_eq!(flat[3], record.id.as_str());
    }

    #[test]
    fn test_formatter_transform_sees_whole_record() {
        let formatter = ExportFormatter::new(vec![ExportColumn::new("word", "Word")
            .with_transform(|value, record| {
                format!("{} ({})", render_flat(value), record.id)
            })]);

        let mut fields = Map::new();
        fields.insert("word".to_string(), json!("apple"));
        let record = Record::new(fields);

        let flat = formatter.format_record(&record);
        assert_eq!(flat[0], format!("apple ({})", record.id));
    }

    #[test]
    fn test_labels_in_declared_order() {
        let formatter = ExportFormatter::new(vec![
            ExportColumn::new("b", "B"),
            ExportColumn::new("a", "A"),
        ]);
        assert_eq!(formatter.labels(), vec!["B", "A"]);
    }
}
