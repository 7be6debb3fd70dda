//! Structured records and their canonical text form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One structured record from the corpus. Opaque beyond its text form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Canonical text used for embedding.
    ///
    /// Pretty JSON with two-space indentation and object keys sorted at every
    /// depth, so equal records always produce byte-identical text.
    pub fn serialize(&self) -> String {
        let canonical = canonicalize(&self.0);
        // Writing a `Value` into a `String` buffer cannot fail.
        serde_json::to_string_pretty(&canonical).unwrap_or_else(|_| canonical.to_string())
    }
}

/// Rebuild `value` with keys inserted in sorted order. Holds even when
/// `serde_json` is built with `preserve_order`.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}
