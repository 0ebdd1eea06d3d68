//! CSV reading.

use std::path::Path;

use crate::error::ExtractionResult;
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Read a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Every column is read as [`DataType::Utf8`]; CSV carries no types, and the reconciler
///   casts text columns when they meet typed data.
/// - Values are trimmed; empty cells become [`Value::Null`].
pub fn read_csv_table(path: impl AsRef<Path>) -> ExtractionResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    read_csv_from_reader(&mut rdr)
}

/// Read a label table written by [`crate::output::csv::write_csv_table`].
///
/// Cells keep their surrounding whitespace so text attributes survive repeated merges. Empty
/// cells still become [`Value::Null`]; CSV cannot tell an empty string from a missing value.
pub fn read_label_csv_table(path: impl AsRef<Path>) -> ExtractionResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    read_records(&mut rdr, false)
}

/// Read CSV data from an existing CSV reader.
pub fn read_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> ExtractionResult<DataSet> {
    read_records(rdr, true)
}

fn read_records<R: std::io::Read>(rdr: &mut csv::Reader<R>, trim: bool) -> ExtractionResult<DataSet> {
    let headers = rdr.headers()?.clone();
    let schema = Schema::new(
        headers
            .iter()
            .map(|h| Field::new(h.trim(), DataType::Utf8))
            .collect(),
    );

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row = (0..headers.len())
            .map(|i| {
                let cell = record.get(i).unwrap_or("");
                let raw = if trim { cell.trim() } else { cell };
                if raw.is_empty() {
                    Value::Null
                } else {
                    Value::Utf8(raw.to_owned())
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(DataSet::new(schema, rows))
}

#[cfg(test)]
mod tests {
    use super::{read_csv_from_reader, read_records};
    use crate::types::{DataType, Value};

    #[test]
    fn reads_every_column_as_text() {
        let input = "_address, balance\nOx000, 10\nOx001,\n";
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(input.as_bytes());

        let ds = read_csv_from_reader(&mut rdr).unwrap();

        assert_eq!(ds.schema.field_names().collect::<Vec<_>>(), vec!["_address", "balance"]);
        assert!(ds.schema.fields.iter().all(|f| f.data_type == DataType::Utf8));
        assert_eq!(
            ds.rows,
            vec![
                vec![Value::Utf8("Ox000".to_string()), Value::Utf8("10".to_string())],
                vec![Value::Utf8("Ox001".to_string()), Value::Null],
            ]
        );
    }

    #[test]
    fn label_tables_keep_cell_whitespace() {
        let input = "id,note\nOx000, padded \nOx001,\n";
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(input.as_bytes());

        let ds = read_records(&mut rdr, false).unwrap();

        assert_eq!(ds.rows[0][1], Value::Utf8(" padded ".to_string()));
        assert_eq!(ds.rows[1][1], Value::Null);
    }
}
