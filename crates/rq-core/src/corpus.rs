//! Reading and writing the record collection on disk.
//!
//! The corpus is a single JSON file holding an array of records, as written
//! by the acquisition step.

use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::record::Record;

/// Load every record from a JSON array file, in file order.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| CoreError::Corpus {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let records = parse_records(&raw).map_err(|reason| CoreError::Corpus {
        path: path.to_path_buf(),
        reason,
    })?;
    debug!(path = %path.display(), records = records.len(), "loaded corpus");
    Ok(records)
}

/// Parse corpus text. The top level must be an array.
pub fn parse_records(raw: &str) -> std::result::Result<Vec<Record>, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))?;
    match value {
        Value::Array(items) => Ok(items.into_iter().map(Record::new).collect()),
        other => Err(format!("expected a JSON array of records, found {}", kind(&other))),
    }
}

/// Write records as a pretty-printed array with 4-space indentation.
pub fn save_records(path: impl AsRef<Path>, records: &[Record]) -> Result<()> {
    use serde::Serialize;

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    std::fs::write(path.as_ref(), buf)?;
    Ok(())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
