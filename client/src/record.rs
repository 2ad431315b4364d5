use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Key prefix marking a client-generated identity for a row that has not
/// been persisted yet. Such rows are display-only: they must never be
/// submitted as updates or deleted against the backend.
pub const PLACEHOLDER_PREFIX: &str = "pending:";

pub fn placeholder_key() -> String {
    format!("{PLACEHOLDER_PREFIX}{}", uuid::Uuid::new_v4())
}

pub fn is_placeholder(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.starts_with(PLACEHOLDER_PREFIX))
}

/// Render an identity value as a URL path segment. `None` for anything
/// that cannot address a persisted record: null, empty strings, and
/// placeholder keys.
pub fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s)
            if !s.is_empty() && !s.starts_with(PLACEHOLDER_PREFIX) =>
        {
            Some(s.clone())
        }
        _ => None,
    }
}

/// One resource instance after normalization: consistently-cased field
/// names, values in canonical form. The UI never sees wire casing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanonicalRecord {
    fields: Map<String, Value>,
}

impl CanonicalRecord {
    pub(crate) fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn int(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(Value::as_i64)
    }

    pub fn bool(&self, field: &str) -> Option<bool> {
        self.fields.get(field).and_then(Value::as_bool)
    }

    /// Monetary values are normalized to canonical decimal strings; this
    /// also accepts plain numbers for fields that skipped normalization.
    pub fn decimal(&self, field: &str) -> Option<Decimal> {
        match self.fields.get(field)? {
            Value::String(s) => Decimal::from_str(s).ok(),
            Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
            _ => None,
        }
    }

    pub fn id(&self, id_field: &str) -> Option<&Value> {
        self.fields.get(id_field)
    }

    pub fn id_text(&self, id_field: &str) -> Option<String> {
        self.fields.get(id_field).and_then(id_text)
    }

    pub fn has_placeholder_id(&self, id_field: &str) -> bool {
        self.fields.get(id_field).is_some_and(is_placeholder)
    }

    pub fn insert(&mut self, field: &str, value: Value) {
        self.fields.insert(field.to_string(), value);
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl From<CanonicalRecord> for Value {
    fn from(record: CanonicalRecord) -> Self {
        record.into_value()
    }
}
