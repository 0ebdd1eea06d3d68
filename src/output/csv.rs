//! CSV writing.

use std::path::Path;

use crate::error::ExtractionResult;
use crate::types::DataSet;

/// Write `table` to a CSV file with a header row; nulls are written as empty cells.
pub fn write_csv_table(path: impl AsRef<Path>, table: &DataSet) -> ExtractionResult<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    write_csv_to_writer(&mut wtr, table)?;
    wtr.flush()?;
    Ok(())
}

/// Write `table` (header row first) to an existing CSV writer.
pub fn write_csv_to_writer<W: std::io::Write>(wtr: &mut csv::Writer<W>, table: &DataSet) -> ExtractionResult<()> {
    wtr.write_record(table.schema.field_names())?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::write_csv_to_writer;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    #[test]
    fn nulls_become_empty_cells() {
        let table = DataSet::new(
            Schema::new(vec![
                Field::new("id", DataType::Utf8),
                Field::new("balance", DataType::Float64),
                Field::new("active", DataType::Bool),
            ]),
            vec![
                vec![Value::Utf8("Ox000".to_string()), Value::Float64(1.5), Value::Bool(true)],
                vec![Value::Utf8("Ox001".to_string()), Value::Null, Value::Bool(false)],
            ],
        );

        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv_to_writer(&mut wtr, &table).unwrap();
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();

        assert_eq!(text, "id,balance,active\nOx000,1.5,true\nOx001,,false\n");
    }
}
