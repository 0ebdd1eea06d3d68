//! Value casts between [`DataType`]s.
//!
//! `Null` casts to `Null` for every target. Text parsing trims whitespace and treats an empty
//! string as `Null`, matching how the CSV reader treats empty cells.

use crate::error::{ExtractionError, ExtractionResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Cast a single value. `row` is 1-based and only used for error reporting.
pub fn cast_value(row: usize, column: &str, value: &Value, target: DataType) -> ExtractionResult<Value> {
    let fail = |message: &str| ExtractionError::Cast {
        row,
        column: column.to_owned(),
        raw: value.to_string(),
        target,
        message: message.to_owned(),
    };

    match (value, target) {
        (Value::Null, _) => Ok(Value::Null),

        (Value::Int64(_), DataType::Int64)
        | (Value::Float64(_), DataType::Float64)
        | (Value::Bool(_), DataType::Bool)
        | (Value::Utf8(_), DataType::Utf8) => Ok(value.clone()),

        (Value::Int64(_) | Value::Float64(_) | Value::Bool(_), DataType::Utf8) => {
            Ok(Value::Utf8(value.to_string()))
        }

        (Value::Int64(v), DataType::Float64) => {
            // `as i64` saturates, so 2^63 would compare equal to i64::MAX.
            let f = *v as f64;
            if f < i64::MAX as f64 && f as i64 == *v {
                Ok(Value::Float64(f))
            } else {
                Err(fail("integer is not exactly representable as a float"))
            }
        }
        (Value::Int64(v), DataType::Bool) => match v {
            0 => Ok(Value::Bool(false)),
            1 => Ok(Value::Bool(true)),
            _ => Err(fail("only 0 and 1 cast to bool")),
        },

        (Value::Float64(v), DataType::Int64) => {
            // i64::MAX as f64 rounds up to 2^63, hence the exclusive upper bound.
            if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 {
                Ok(Value::Int64(*v as i64))
            } else {
                Err(fail("float is not an integer in i64 range"))
            }
        }
        (Value::Float64(v), DataType::Bool) => {
            if *v == 0.0 {
                Ok(Value::Bool(false))
            } else if *v == 1.0 {
                Ok(Value::Bool(true))
            } else {
                Err(fail("only 0.0 and 1.0 cast to bool"))
            }
        }

        (Value::Bool(b), DataType::Int64) => Ok(Value::Int64(i64::from(*b))),
        (Value::Bool(b), DataType::Float64) => Ok(Value::Float64(if *b { 1.0 } else { 0.0 })),

        (Value::Utf8(s), _) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(Value::Null);
            }
            match target {
                DataType::Int64 => trimmed
                    .parse::<i64>()
                    .map(Value::Int64)
                    .map_err(|e| fail(&e.to_string())),
                DataType::Float64 => trimmed
                    .parse::<f64>()
                    .map(Value::Float64)
                    .map_err(|e| fail(&e.to_string())),
                DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(|m| fail(&m)),
                DataType::Utf8 => Ok(value.clone()),
            }
        }
    }
}

/// Cast every column of `table` whose name appears in `schema` to that field's type.
///
/// Columns that `schema` does not mention are left untouched.
pub fn cast_to_schema(table: &DataSet, schema: &Schema) -> ExtractionResult<DataSet> {
    let targets: Vec<Option<DataType>> = table
        .schema
        .fields
        .iter()
        .map(|f| {
            schema
                .field(&f.name)
                .map(|t| t.data_type)
                .filter(|t| *t != f.data_type)
        })
        .collect();

    if targets.iter().all(Option::is_none) {
        return Ok(table.clone());
    }

    let fields = table
        .schema
        .fields
        .iter()
        .zip(&targets)
        .map(|(f, t)| Field::new(f.name.clone(), t.unwrap_or(f.data_type)))
        .collect();

    let mut rows = Vec::with_capacity(table.row_count());
    for (idx0, row) in table.rows.iter().enumerate() {
        let mut out = Vec::with_capacity(row.len());
        for ((value, field), target) in row.iter().zip(&table.schema.fields).zip(&targets) {
            out.push(match target {
                Some(t) => cast_value(idx0 + 1, &field.name, value, *t)?,
                None => value.clone(),
            });
        }
        rows.push(out);
    }

    Ok(DataSet::new(Schema::new(fields), rows))
}

pub(crate) fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}
