//! JSON ingestion.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single object: `{"a":1}`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Object key order is preserved in the resulting [`Record`]s.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{Record, Value};

/// Read a JSON file into records.
pub fn ingest_json_from_path(path: impl AsRef<Path>) -> IngestionResult<Vec<Record>> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text)
}

/// Parse JSON text into records.
///
/// Scalars map to the matching [`Value`] variant, `null` to [`Value::Null`] and arrays of strings
/// to [`Value::TextList`]. Nested objects and mixed arrays are rejected.
pub fn ingest_json_from_str(input: &str) -> IngestionResult<Vec<Record>> {
    parse_rows(input)?
        .iter()
        .enumerate()
        .map(|(idx0, v)| record_from_json(idx0 + 1, v))
        .collect()
}

/// Read a JSON file and deserialize each row into `T`.
pub fn deserialize_json_from_path<T: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> IngestionResult<Vec<T>> {
    let text = fs::read_to_string(path)?;
    deserialize_json_from_str(&text)
}

/// Deserialize each row of JSON text into `T` (e.g. [`crate::types::User`]).
///
/// Accepts the same framings as [`ingest_json_from_str`].
pub fn deserialize_json_from_str<T: DeserializeOwned>(input: &str) -> IngestionResult<Vec<T>> {
    parse_rows(input)?
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(IngestionError::from))
        .collect()
}

fn parse_rows(input: &str) -> IngestionResult<Vec<serde_json::Value>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return match v {
            serde_json::Value::Array(items) => Ok(items),
            serde_json::Value::Object(_) => Ok(vec![v]),
            _ => Err(IngestionError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        };
    }

    let mut rows = Vec::new();
    for (i, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
            IngestionError::SchemaMismatch {
                message: format!("invalid ndjson at line {}: {}", i + 1, e),
            }
        })?;
        rows.push(v);
    }
    Ok(rows)
}

fn record_from_json(row: usize, v: &serde_json::Value) -> IngestionResult<Record> {
    let obj = v.as_object().ok_or_else(|| IngestionError::SchemaMismatch {
        message: format!("row {row} is not a json object"),
    })?;

    let mut record = Record::new();
    for (field, jv) in obj {
        record.insert(field.as_str(), convert_json_value(row, field, jv)?);
    }
    Ok(record)
}

fn convert_json_value(row: usize, column: &str, v: &serde_json::Value) -> IngestionResult<Value> {
    let parse_error = |message: &str| IngestionError::ParseError {
        row,
        column: column.to_string(),
        raw: v.to_string(),
        message: message.to_string(),
    };

    match v {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::String(s) => Ok(Value::Utf8(s.clone())),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int64(i))
            } else if n.is_u64() {
                Err(parse_error("u64 out of range for i64"))
            } else {
                n.as_f64()
                    .map(Value::Float64)
                    .ok_or_else(|| parse_error("expected number"))
            }
        }
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(Value::TextList)
            .ok_or_else(|| parse_error("expected array of strings")),
        serde_json::Value::Object(_) => Err(parse_error("nested objects are not supported")),
    }
}
