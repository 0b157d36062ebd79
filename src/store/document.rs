//! Wire types for the document store and the field decoder.
//!
//! A field map is `{ "<field>": { "<kind>Value": <scalar> } }`, one declared
//! kind per field. The store encodes 64-bit integers as JSON strings.
//!
//! Decoding never fails: a missing field, a different kind than asked for, or an
//! unparsable scalar all come back as `None` and the caller picks the default.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type FieldMap = BTreeMap<String, Value>;

/// One stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Full resource path: `projects/{p}/databases/{d}/documents/{collection}/{id}`.
    pub name: String,
    #[serde(default)]
    pub fields: FieldMap,
}

impl Document {
    /// Last path segment of `name`.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        string_field(&self.fields, key)
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        integer_field(&self.fields, key)
    }

    pub fn double(&self, key: &str) -> Option<f64> {
        double_field(&self.fields, key)
    }

    pub fn number(&self, key: &str) -> Option<Numeric> {
        numeric_field(&self.fields, key)
    }

    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        timestamp_field(&self.fields, key)
    }

    pub fn timestamp_text(&self, key: &str) -> Option<&str> {
        timestamp_text_field(&self.fields, key)
    }
}

/// One page of a collection listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    /// The store omits the key entirely for an empty collection.
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A field that may be stored as either numeric kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Integer(i64),
    Double(f64),
}

impl Numeric {
    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Integer(v) => v as f64,
            Numeric::Double(v) => v,
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Integer(v) => write!(f, "{v}"),
            Numeric::Double(v) => write!(f, "{v}"),
        }
    }
}

fn kind<'a>(fields: &'a FieldMap, key: &str, tag: &str) -> Option<&'a Value> {
    fields.get(key)?.get(tag)
}

pub fn string_field<'a>(fields: &'a FieldMap, key: &str) -> Option<&'a str> {
    kind(fields, key, "stringValue")?.as_str()
}

pub fn integer_field(fields: &FieldMap, key: &str) -> Option<i64> {
    match kind(fields, key, "integerValue")? {
        Value::String(raw) => raw.trim().parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

pub fn double_field(fields: &FieldMap, key: &str) -> Option<f64> {
    kind(fields, key, "doubleValue")?
        .as_f64()
        .filter(|v| v.is_finite())
}

/// Integer kind first, then floating point.
pub fn numeric_field(fields: &FieldMap, key: &str) -> Option<Numeric> {
    integer_field(fields, key)
        .map(Numeric::Integer)
        .or_else(|| double_field(fields, key).map(Numeric::Double))
}

/// The timestamp exactly as stored, without parsing.
pub fn timestamp_text_field<'a>(fields: &'a FieldMap, key: &str) -> Option<&'a str> {
    kind(fields, key, "timestampValue")?.as_str()
}

pub fn timestamp_field(fields: &FieldMap, key: &str) -> Option<DateTime<Utc>> {
    let raw = timestamp_text_field(fields, key)?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
