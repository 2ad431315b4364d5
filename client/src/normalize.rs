//! Maps the backend's inconsistently-cased record shapes onto one
//! canonical client-side shape per resource. The backend capitalizes
//! field names differently across endpoints (`PeriodId` vs `periodId` vs
//! `PeriodID`); the alias lists here are the only place that quirk is
//! allowed to exist.

use crate::error::ClientError;
use crate::record::{CanonicalRecord, placeholder_key};
use jiff::civil;
use jiff::tz::TimeZone;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

/// How a probed wire value is coerced into canonical form. Every
/// transform maps its own output to itself, which is what keeps
/// normalization idempotent.
#[derive(Debug, Clone, Copy)]
pub enum Transform {
    /// Keep the wire value untouched (arrays, nested objects).
    Raw,
    /// Coerce scalars to a string.
    Text,
    Int,
    /// Parse into a `Decimal` and store its canonical string form, so
    /// monetary values survive without float drift.
    Decimal,
    /// Accept the date formats seen across endpoints (`2025-01-31`,
    /// civil datetimes, RFC 3339 timestamps) and store `YYYY-MM-DD`.
    Date,
    Bool,
    /// Map backend status codes to display labels. Values already on the
    /// label side pass through unchanged.
    Labels(&'static [(&'static str, &'static str)]),
}

impl Transform {
    fn apply(&self, value: &Value) -> Result<Value, String> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        // Client-generated placeholder keys survive re-normalization.
        if crate::record::is_placeholder(value) {
            return Ok(value.clone());
        }
        match self {
            Self::Raw => Ok(value.clone()),
            Self::Text => match value {
                Value::String(s) => Ok(Value::String(s.clone())),
                Value::Number(n) => Ok(Value::String(n.to_string())),
                Value::Bool(b) => Ok(Value::String(b.to_string())),
                _ => Err("expected a text value".into()),
            },
            Self::Int => coerce_int(value),
            Self::Decimal => coerce_decimal(value),
            Self::Date => coerce_date(value),
            Self::Bool => coerce_bool(value),
            Self::Labels(pairs) => Ok(map_label(value, pairs)),
        }
    }
}

fn coerce_int(value: &Value) -> Result<Value, String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0) {
                Ok(Value::from(f as i64))
            } else {
                Err(format!("{n} is not a whole number"))
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| format!("{s:?} is not a whole number")),
        _ => Err("expected a whole number".into()),
    }
}

fn coerce_decimal(value: &Value) -> Result<Value, String> {
    let parsed = match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()),
        Value::String(s) => Decimal::from_str(s.trim()),
        _ => return Err("expected a numeric value".into()),
    };
    parsed
        .map(|d| Value::String(d.to_string()))
        .map_err(|_| format!("{value} is not a number"))
}

fn coerce_date(value: &Value) -> Result<Value, String> {
    let Value::String(s) = value else {
        return Err("expected a date string".into());
    };
    let s = s.trim();
    let date = if let Ok(date) = civil::Date::from_str(s) {
        date
    } else if let Ok(datetime) = civil::DateTime::from_str(s) {
        datetime.date()
    } else if let Ok(timestamp) = jiff::Timestamp::from_str(s) {
        timestamp.to_zoned(TimeZone::UTC).date()
    } else {
        return Err(format!("{s:?} is not a recognized date"));
    };
    Ok(Value::String(date.to_string()))
}

fn coerce_bool(value: &Value) -> Result<Value, String> {
    match value {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(Value::Bool(false)),
            Some(1) => Ok(Value::Bool(true)),
            _ => Err(format!("{n} is not a boolean")),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            _ => Err(format!("{s:?} is not a boolean")),
        },
        _ => Err("expected a boolean".into()),
    }
}

fn map_label(
    value: &Value,
    pairs: &[(&'static str, &'static str)],
) -> Value {
    let key = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => return other.clone(),
    };
    // Labels pass through before codes are consulted, so re-normalizing
    // an already-mapped value is a no-op.
    if pairs.iter().any(|(_, label)| *label == key) {
        return Value::String(key);
    }
    match pairs.iter().find(|(code, _)| *code == key) {
        Some((_, label)) => Value::String((*label).to_string()),
        None => Value::String(key),
    }
}

/// Declares where one canonical field comes from on the wire. The
/// canonical name itself is always probed first, then the aliases in
/// declared order; the first present value wins, `null` included.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub transform: Transform,
    pub default: Value,
}

#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    fields: Vec<FieldSpec>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        mut self,
        canonical: &'static str,
        aliases: &'static [&'static str],
        transform: Transform,
    ) -> Self {
        self.fields.push(FieldSpec {
            canonical,
            aliases,
            transform,
            default: Value::Null,
        });
        self
    }

    pub fn field_with_default(
        mut self,
        canonical: &'static str,
        aliases: &'static [&'static str],
        transform: Transform,
        default: Value,
    ) -> Self {
        self.fields.push(FieldSpec {
            canonical,
            aliases,
            transform,
            default,
        });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Reshape one raw wire record into its canonical form. Missing fields
/// fall back to their declared default and never error; only a present
/// value that fails a hard coercion does.
pub fn normalize(
    raw: &Value,
    map: &FieldMap,
    resource: &str,
) -> Result<CanonicalRecord, ClientError> {
    let Some(source) = raw.as_object() else {
        return Err(ClientError::Normalization {
            resource: resource.to_string(),
            field: "(record)".to_string(),
            reason: "expected a JSON object".to_string(),
        });
    };
    let mut out = Map::with_capacity(map.len());
    for spec in map.iter() {
        let probed = std::iter::once(spec.canonical)
            .chain(spec.aliases.iter().copied())
            .find_map(|name| source.get(name));
        let value = match probed {
            Some(wire) => spec.transform.apply(wire).map_err(|reason| {
                ClientError::Normalization {
                    resource: resource.to_string(),
                    field: spec.canonical.to_string(),
                    reason,
                }
            })?,
            None => spec.default.clone(),
        };
        out.insert(spec.canonical.to_string(), value);
    }
    Ok(CanonicalRecord::from_map(out))
}

/// Normalize and guarantee an identity: a record that arrived without one
/// gets a client-only placeholder key so list rendering always has a
/// stable key to hang on to.
pub fn normalize_with_identity(
    raw: &Value,
    map: &FieldMap,
    resource: &str,
    id_field: &str,
) -> Result<CanonicalRecord, ClientError> {
    let mut record = normalize(raw, map, resource)?;
    let missing = match record.get(id_field) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    };
    if missing {
        record.insert(id_field, Value::String(placeholder_key()));
    }
    Ok(record)
}
