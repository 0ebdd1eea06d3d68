//! Projection of raw tables into node/edge relations.

use std::collections::HashMap;

use crate::error::{ExtractionError, ExtractionResult};
use crate::mapping::{ColumnMapping, EDGE_SOURCE, EDGE_TARGET, NODE_ID};
use crate::types::{DataSet, Field, Schema, ValueKey};

/// Fails with [`ExtractionError::SchemaMismatch`] unless `schema` has every column `mapping` reads.
pub fn check_required_columns(schema: &Schema, mapping: &ColumnMapping) -> ExtractionResult<()> {
    let required = mapping.required_columns();
    let mut missing: Vec<&str> = Vec::new();
    for col in &required {
        if schema.index_of(col).is_none() && !missing.contains(col) {
            missing.push(col);
        }
    }
    if missing.is_empty() {
        return Ok(());
    }
    Err(ExtractionError::schema_mismatch(format!(
        "missing required column(s) {missing:?} for {mapping}. required={required:?} available={:?}",
        schema.field_names().collect::<Vec<_>>()
    )))
}

/// Project `raw` into the node or edge relation described by `mapping`.
///
/// Output columns are `id | attr…` for nodes and `source | target | attr…` for edges, typed
/// like their source columns. Rows sharing a key are collapsed to the last one in `raw`.
pub fn extract_table(raw: &DataSet, mapping: &ColumnMapping) -> ExtractionResult<DataSet> {
    check_required_columns(&raw.schema, mapping)?;

    let mut fields = Vec::new();
    let mut idxs = Vec::new();
    for (out, src) in projection(mapping) {
        let idx = raw.schema.index_of(src).ok_or_else(|| {
            ExtractionError::schema_mismatch(format!("missing required column '{src}'"))
        })?;
        fields.push(Field::new(out, raw.schema.fields[idx].data_type));
        idxs.push(idx);
    }

    let rows = raw
        .rows
        .iter()
        .map(|row| idxs.iter().map(|&i| row[i].clone()).collect())
        .collect();

    dedup_keep_last(DataSet::new(Schema::new(fields), rows), mapping.key_columns())
}

/// Keep only the last row for every distinct key. Surviving rows keep their relative order.
pub fn dedup_keep_last(table: DataSet, key_columns: &[&str]) -> ExtractionResult<DataSet> {
    let key_idxs = key_columns
        .iter()
        .map(|k| {
            table.schema.index_of(k).ok_or_else(|| {
                ExtractionError::schema_mismatch(format!(
                    "key column '{k}' not found in {}",
                    table.schema
                ))
            })
        })
        .collect::<ExtractionResult<Vec<_>>>()?;

    let keys: Vec<Vec<ValueKey>> = table
        .rows
        .iter()
        .map(|row| key_idxs.iter().map(|&i| row[i].key()).collect())
        .collect();

    let mut last: HashMap<&[ValueKey], usize> = HashMap::with_capacity(keys.len());
    for (i, key) in keys.iter().enumerate() {
        last.insert(key.as_slice(), i);
    }
    if last.len() == keys.len() {
        return Ok(table);
    }

    let DataSet { schema, rows } = table;
    let rows = rows
        .into_iter()
        .zip(&keys)
        .enumerate()
        .filter(|(i, (_, key))| last.get(key.as_slice()) == Some(i))
        .map(|(_, (row, _))| row)
        .collect();
    Ok(DataSet::new(schema, rows))
}

/// `(output column, source column)` pairs in output order.
fn projection(mapping: &ColumnMapping) -> Vec<(&str, &str)> {
    let keys: Vec<(&str, &str)> = match mapping {
        ColumnMapping::Node(m) => vec![(NODE_ID, m.id_column.as_str())],
        ColumnMapping::Edge(m) => vec![
            (EDGE_SOURCE, m.source_column.as_str()),
            (EDGE_TARGET, m.target_column.as_str()),
        ],
    };
    keys.into_iter().chain(mapping.attributes().iter()).collect()
}

#[cfg(test)]
mod tests {
    use super::{dedup_keep_last, extract_table};
    use crate::error::ExtractionError;
    use crate::mapping::{AttributeMap, ColumnMapping, EdgeMapping, NodeMapping};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn s(v: &str) -> Value {
        Value::Utf8(v.to_string())
    }

    fn utf8_table(columns: &[&str], rows: &[&[&str]]) -> DataSet {
        DataSet::new(
            Schema::new(columns.iter().map(|c| Field::new(*c, DataType::Utf8)).collect()),
            rows.iter().map(|r| r.iter().map(|v| s(v)).collect()).collect(),
        )
    }

    fn node(id: &str, attrs: &[(&str, &str)]) -> ColumnMapping {
        NodeMapping::new(id, AttributeMap::from_pairs(attrs.iter().copied()).unwrap())
            .unwrap()
            .into()
    }

    fn edge(source: &str, target: &str, attrs: &[(&str, &str)]) -> ColumnMapping {
        EdgeMapping::new(source, target, AttributeMap::from_pairs(attrs.iter().copied()).unwrap())
            .unwrap()
            .into()
    }

    #[test]
    fn node_extraction_dedups_by_id() {
        let raw = utf8_table(&["_address"], &[&["Ox000"], &["Ox001"], &["Ox002"], &["Ox000"]]);

        let out = extract_table(&raw, &node("_address", &[("address", "_address")])).unwrap();

        assert_eq!(out.schema.field_names().collect::<Vec<_>>(), vec!["id", "address"]);
        assert_eq!(
            out.rows,
            vec![
                vec![s("Ox001"), s("Ox001")],
                vec![s("Ox002"), s("Ox002")],
                vec![s("Ox000"), s("Ox000")],
            ]
        );
    }

    #[test]
    fn edge_extraction_dedups_by_endpoints() {
        let raw = utf8_table(
            &["_source", "_target", "_type"],
            &[
                &["Ox000", "Ox001", "OWNS"],
                &["Ox001", "Ox002", "OWNS"],
                &["Ox002", "Ox003", "OWNS"],
                &["Ox000", "Ox001", "OWNS"],
            ],
        );

        let out = extract_table(&raw, &edge("_source", "_target", &[("type", "_type")])).unwrap();

        assert_eq!(
            out.schema.field_names().collect::<Vec<_>>(),
            vec!["source", "target", "type"]
        );
        assert_eq!(out.row_count(), 3);
        for pair in [("Ox000", "Ox001"), ("Ox001", "Ox002"), ("Ox002", "Ox003")] {
            let hits = out
                .rows
                .iter()
                .filter(|r| r[0] == s(pair.0) && r[1] == s(pair.1))
                .count();
            assert_eq!(hits, 1, "pair {pair:?}");
        }
    }

    #[test]
    fn later_rows_win_for_duplicate_ids() {
        let raw = utf8_table(
            &["addr", "label"],
            &[&["Ox000", "first"], &["Ox001", "other"], &["Ox000", "second"]],
        );

        let out = extract_table(&raw, &node("addr", &[("name", "label")])).unwrap();

        let ox000: Vec<&Vec<Value>> = out.rows.iter().filter(|r| r[0] == s("Ox000")).collect();
        assert_eq!(ox000, vec![&vec![s("Ox000"), s("second")]]);
    }

    #[test]
    fn edges_with_same_source_but_different_target_are_kept() {
        let raw = utf8_table(&["a", "b"], &[&["x", "y"], &["x", "z"], &["y", "x"]]);
        let out = extract_table(&raw, &edge("a", "b", &[])).unwrap();
        assert_eq!(out.row_count(), 3);
    }

    #[test]
    fn missing_column_is_a_schema_mismatch() {
        let raw = utf8_table(&["_source", "_type"], &[&["Ox000", "OWNS"]]);

        let err = extract_table(&raw, &edge("_source", "_target", &[("type", "_type")])).unwrap_err();

        assert!(matches!(err, ExtractionError::SchemaMismatch { .. }));
        let msg = err.to_string();
        assert!(msg.contains("[\"_target\"]"), "{msg}");
        assert!(msg.contains("required=[\"_source\", \"_target\", \"_type\"]"), "{msg}");
    }

    #[test]
    fn output_columns_keep_source_types() {
        let raw = DataSet::new(
            Schema::new(vec![
                Field::new("addr", DataType::Utf8),
                Field::new("balance", DataType::Int64),
            ]),
            vec![vec![s("Ox000"), Value::Int64(10)]],
        );
        let out = extract_table(&raw, &node("addr", &[("balance", "balance")])).unwrap();
        assert_eq!(out.schema.fields[1], Field::new("balance", DataType::Int64));
    }

    #[test]
    fn dedup_requires_key_columns() {
        let table = utf8_table(&["a"], &[&["x"]]);
        let err = dedup_keep_last(table, &["id"]).unwrap_err();
        assert!(err.to_string().contains("key column 'id' not found"));
    }
}
