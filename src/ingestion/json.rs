//! JSON reading.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Columns are the union of the objects' top-level keys in first-seen order. A column's type
//! is inferred from its non-null values: all booleans -> `Bool`, all integers -> `Int64`,
//! integers and floats -> `Float64`, anything else -> `Utf8` (non-string values keep their
//! JSON text).

use std::fs;
use std::path::Path;

use crate::error::{ExtractionError, ExtractionResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Read a JSON file into an in-memory [`DataSet`].
pub fn read_json_table(path: impl AsRef<Path>) -> ExtractionResult<DataSet> {
    let text = fs::read_to_string(path)?;
    read_json_from_str(&text)
}

/// Read JSON from an in-memory string into a [`DataSet`].
pub fn read_json_from_str(input: &str) -> ExtractionResult<DataSet> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(DataSet::new(Schema::default(), Vec::new()));
    }

    // First try parsing as a single JSON value (array or object).
    let values = if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(_) => vec![v],
            _ => {
                return Err(ExtractionError::format(
                    "json must be an object, an array of objects, or NDJSON",
                ));
            }
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
                ExtractionError::format(format!("invalid ndjson at line {}: {}", i + 1, e))
            })?;
            values.push(v);
        }
        values
    };

    json_values_to_table(&values)
}

fn json_values_to_table(values: &[serde_json::Value]) -> ExtractionResult<DataSet> {
    let mut objects = Vec::with_capacity(values.len());
    for (idx0, v) in values.iter().enumerate() {
        let obj = v.as_object().ok_or_else(|| {
            ExtractionError::format(format!("row {} is not a json object", idx0 + 1))
        })?;
        objects.push(obj);
    }

    let mut fields: Vec<Field> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !fields.iter().any(|f| &f.name == key) {
                fields.push(Field::new(key.clone(), DataType::Utf8));
            }
        }
    }
    for field in &mut fields {
        let inferred = objects
            .iter()
            .filter_map(|obj| obj.get(&field.name).and_then(json_type))
            .reduce(widen);
        field.data_type = inferred.unwrap_or(DataType::Utf8);
    }

    let mut rows = Vec::with_capacity(objects.len());
    for (idx0, obj) in objects.iter().enumerate() {
        let mut row = Vec::with_capacity(fields.len());
        for field in &fields {
            row.push(match obj.get(&field.name) {
                Some(v) => convert_json_value(idx0 + 1, &field.name, field.data_type, v)?,
                None => Value::Null,
            });
        }
        rows.push(row);
    }

    Ok(DataSet::new(Schema::new(fields), rows))
}

fn json_type(v: &serde_json::Value) -> Option<DataType> {
    match v {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(_) => Some(DataType::Bool),
        serde_json::Value::Number(n) if n.is_i64() => Some(DataType::Int64),
        serde_json::Value::Number(n) if n.is_f64() => Some(DataType::Float64),
        _ => Some(DataType::Utf8),
    }
}

fn widen(a: DataType, b: DataType) -> DataType {
    match (a, b) {
        _ if a == b => a,
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => DataType::Float64,
        _ => DataType::Utf8,
    }
}

fn convert_json_value(row: usize, column: &str, data_type: DataType, v: &serde_json::Value) -> ExtractionResult<Value> {
    if v.is_null() {
        return Ok(Value::Null);
    }

    let converted = match data_type {
        DataType::Utf8 => Some(match v.as_str() {
            Some(s) => Value::Utf8(s.to_string()),
            None => Value::Utf8(v.to_string()),
        }),
        DataType::Bool => v.as_bool().map(Value::Bool),
        DataType::Int64 => v.as_i64().map(Value::Int64),
        DataType::Float64 => v.as_f64().map(Value::Float64),
    };

    converted.ok_or_else(|| ExtractionError::Cast {
        row,
        column: column.to_string(),
        raw: v.to_string(),
        target: data_type,
        message: "unexpected json value for column type".to_string(),
    })
}
