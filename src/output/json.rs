//! JSON writing (newline-delimited objects, one per row, keys in schema order).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Number, Value as JsonValue};

use crate::error::ExtractionResult;
use crate::types::{DataSet, Value};

/// Write `table` as NDJSON to `path`. Non-finite floats are written as `null`.
pub fn write_json_table(path: impl AsRef<Path>, table: &DataSet) -> ExtractionResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for row in &table.rows {
        let mut obj = Map::with_capacity(table.schema.fields.len());
        for (field, value) in table.schema.fields.iter().zip(row) {
            obj.insert(field.name.clone(), to_json(value));
        }
        serde_json::to_writer(&mut out, &obj)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Int64(v) => JsonValue::from(*v),
        Value::Float64(v) => Number::from_f64(*v).map_or(JsonValue::Null, JsonValue::Number),
        Value::Bool(v) => JsonValue::Bool(*v),
        Value::Utf8(v) => JsonValue::String(v.clone()),
    }
}
