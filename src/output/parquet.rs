//! Parquet writing.
//!
//! Every column is written as an `OPTIONAL` primitive so nulls survive a round trip:
//! `Int64 -> INT64`, `Float64 -> DOUBLE`, `Bool -> BOOLEAN`, `Utf8 -> BYTE_ARRAY (UTF8)`.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use parquet::basic::{ConvertedType, Repetition, Type as PhysicalType};
use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::errors::ParquetError;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::types::Type;

use crate::error::{ExtractionError, ExtractionResult};
use crate::types::{DataSet, DataType, Value};

/// Write `table` to a Parquet file at `path` (single row group).
pub fn write_parquet_table(path: impl AsRef<Path>, table: &DataSet) -> ExtractionResult<()> {
    let mut columns = Vec::with_capacity(table.schema.fields.len());
    for field in &table.schema.fields {
        let (physical, converted) = match field.data_type {
            DataType::Int64 => (PhysicalType::INT64, ConvertedType::NONE),
            DataType::Float64 => (PhysicalType::DOUBLE, ConvertedType::NONE),
            DataType::Bool => (PhysicalType::BOOLEAN, ConvertedType::NONE),
            DataType::Utf8 => (PhysicalType::BYTE_ARRAY, ConvertedType::UTF8),
        };
        let column = Type::primitive_type_builder(&field.name, physical)
            .with_repetition(Repetition::OPTIONAL)
            .with_converted_type(converted)
            .build()?;
        columns.push(Arc::new(column));
    }
    let schema = Arc::new(Type::group_type_builder("schema").with_fields(columns).build()?);

    let file = File::create(path)?;
    let props = Arc::new(WriterProperties::builder().build());
    let mut writer = SerializedFileWriter::new(file, schema, props)?;

    let mut row_group = writer.next_row_group()?;
    let mut idx = 0;
    while let Some(mut column) = row_group.next_column()? {
        match column.untyped() {
            ColumnWriter::Int64ColumnWriter(w) => {
                let (values, defs) = column_values(table, idx, |v| match v {
                    Value::Int64(x) => Some(*x),
                    _ => None,
                })?;
                w.write_batch(&values, Some(&defs), None)?;
            }
            ColumnWriter::DoubleColumnWriter(w) => {
                let (values, defs) = column_values(table, idx, |v| match v {
                    Value::Float64(x) => Some(*x),
                    _ => None,
                })?;
                w.write_batch(&values, Some(&defs), None)?;
            }
            ColumnWriter::BoolColumnWriter(w) => {
                let (values, defs) = column_values(table, idx, |v| match v {
                    Value::Bool(x) => Some(*x),
                    _ => None,
                })?;
                w.write_batch(&values, Some(&defs), None)?;
            }
            ColumnWriter::ByteArrayColumnWriter(w) => {
                let (values, defs) = column_values(table, idx, |v| match v {
                    Value::Utf8(s) => Some(ByteArray::from(s.as_str())),
                    _ => None,
                })?;
                w.write_batch(&values, Some(&defs), None)?;
            }
            _ => {
                return Err(ParquetError::General(format!(
                    "unsupported column writer for '{}'",
                    table.schema.fields[idx].name
                ))
                .into());
            }
        }
        column.close()?;
        idx += 1;
    }
    row_group.close()?;
    writer.close()?;
    Ok(())
}

/// Non-null values of column `idx` plus one definition level per row.
fn column_values<T>(
    table: &DataSet,
    idx: usize,
    pick: impl Fn(&Value) -> Option<T>,
) -> ExtractionResult<(Vec<T>, Vec<i16>)> {
    let field = &table.schema.fields[idx];
    let mut values = Vec::with_capacity(table.row_count());
    let mut defs = Vec::with_capacity(table.row_count());

    for (idx0, row) in table.rows.iter().enumerate() {
        match row.get(idx).unwrap_or(&Value::Null) {
            Value::Null => defs.push(0),
            v => {
                let picked = pick(v).ok_or_else(|| ExtractionError::Cast {
                    row: idx0 + 1,
                    column: field.name.clone(),
                    raw: v.to_string(),
                    target: field.data_type,
                    message: "value does not match column type".to_string(),
                })?;
                values.push(picked);
                defs.push(1);
            }
        }
    }

    Ok((values, defs))
}
