//! Parquet reading.
//!
//! Column types are inferred from the stored values of each top-level column; a column with
//! no non-null values falls back to its physical type. Values the table model has no type
//! for (dates, timestamps, decimals, binary, nested groups) are read as text.

use std::collections::HashMap;
use std::path::Path;

use parquet::basic::Type as PhysicalType;
use parquet::file::reader::FileReader;
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::{ExtractionError, ExtractionResult};
use crate::types::{self, DataSet, DataType, Schema, Value};

/// Read a Parquet file into an in-memory [`DataSet`].
pub fn read_parquet_table(path: impl AsRef<Path>) -> ExtractionResult<DataSet> {
    let reader = SerializedFileReader::try_from(path.as_ref())?;

    let columns: Vec<(String, DataType)> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .root_schema()
        .get_fields()
        .iter()
        .map(|t| {
            let fallback = if t.is_primitive() {
                match t.get_physical_type() {
                    PhysicalType::BOOLEAN => DataType::Bool,
                    PhysicalType::INT32 | PhysicalType::INT64 => DataType::Int64,
                    PhysicalType::FLOAT | PhysicalType::DOUBLE => DataType::Float64,
                    _ => DataType::Utf8,
                }
            } else {
                DataType::Utf8
            };
            (t.name().to_string(), fallback)
        })
        .collect();

    let mut records = Vec::new();
    for row_res in reader.into_iter() {
        records.push(row_res?);
    }

    // Name -> Field lookup per row.
    let lookups: Vec<HashMap<&str, &Field>> = records
        .iter()
        .map(|row| {
            row.get_column_iter()
                .map(|(name, field)| (name.as_str(), field))
                .collect()
        })
        .collect();

    let mut fields = Vec::with_capacity(columns.len());
    for (name, fallback) in &columns {
        let inferred = lookups
            .iter()
            .filter_map(|m| m.get(name.as_str()).and_then(|f| field_type(f)))
            .reduce(|a, b| if a == b { a } else { DataType::Utf8 });
        fields.push(types::Field::new(name.clone(), inferred.unwrap_or(*fallback)));
    }

    let mut rows = Vec::with_capacity(lookups.len());
    for (idx0, lookup) in lookups.iter().enumerate() {
        let row_num = idx0 + 1;
        let mut out_row = Vec::with_capacity(fields.len());
        for f in &fields {
            let value = match lookup.get(f.name.as_str()) {
                Some(field) => convert_parquet_field(row_num, &f.name, f.data_type, field)?,
                None => Value::Null,
            };
            out_row.push(value);
        }
        rows.push(out_row);
    }

    Ok(DataSet::new(Schema::new(fields), rows))
}

fn field_type(f: &Field) -> Option<DataType> {
    match f {
        Field::Null => None,
        Field::Bool(_) => Some(DataType::Bool),
        Field::ULong(v) if *v > i64::MAX as u64 => Some(DataType::Utf8),
        Field::Byte(_)
        | Field::Short(_)
        | Field::Int(_)
        | Field::Long(_)
        | Field::UByte(_)
        | Field::UShort(_)
        | Field::UInt(_)
        | Field::ULong(_) => Some(DataType::Int64),
        Field::Float(_) | Field::Double(_) => Some(DataType::Float64),
        _ => Some(DataType::Utf8),
    }
}

fn convert_parquet_field(row: usize, column: &str, data_type: DataType, f: &Field) -> ExtractionResult<Value> {
    let mismatch = || ExtractionError::Cast {
        row,
        column: column.to_string(),
        raw: f.to_string(),
        target: data_type,
        message: "unexpected parquet value for column type".to_string(),
    };

    match (data_type, f) {
        (_, Field::Null) => Ok(Value::Null),
        (DataType::Bool, Field::Bool(b)) => Ok(Value::Bool(*b)),
        (DataType::Int64, Field::Byte(v)) => Ok(Value::Int64(i64::from(*v))),
        (DataType::Int64, Field::Short(v)) => Ok(Value::Int64(i64::from(*v))),
        (DataType::Int64, Field::Int(v)) => Ok(Value::Int64(i64::from(*v))),
        (DataType::Int64, Field::Long(v)) => Ok(Value::Int64(*v)),
        (DataType::Int64, Field::UByte(v)) => Ok(Value::Int64(i64::from(*v))),
        (DataType::Int64, Field::UShort(v)) => Ok(Value::Int64(i64::from(*v))),
        (DataType::Int64, Field::UInt(v)) => Ok(Value::Int64(i64::from(*v))),
        (DataType::Int64, Field::ULong(v)) => i64::try_from(*v).map(Value::Int64).map_err(|_| mismatch()),
        (DataType::Float64, Field::Float(v)) => Ok(Value::Float64(f64::from(*v))),
        (DataType::Float64, Field::Double(v)) => Ok(Value::Float64(*v)),
        // Display for `Field::Str` adds quotes.
        (DataType::Utf8, Field::Str(s)) => Ok(Value::Utf8(s.clone())),
        (DataType::Utf8, other) => Ok(Value::Utf8(other.to_string())),
        _ => Err(mismatch()),
    }
}
