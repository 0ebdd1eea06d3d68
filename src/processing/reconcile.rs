//! Merging a newly extracted table into a previously persisted one.
//!
//! Types are inferred per source file, so the two sides of a merge can disagree (a column
//! read as `Int64` from one file and as `Utf8` from another). The reconciler prefers the
//! schema with fewer `Utf8` columns, casts both tables to it, and falls back to the other
//! schema if that cast fails. Only when both casts (or the concatenation) fail is the merge
//! reported as [`ExtractionError::MergeDataFrame`].

use crate::error::{ExtractionError, ExtractionResult};
use crate::observability::{ExtractionEvent, ExtractionObserver, ExtractionSeverity};
use crate::types::{DataSet, Schema, Value};

use super::cast::cast_to_schema;
use super::extract::dedup_keep_last;

/// Rows of each table included in the error dump of a failed merge.
const DIAGNOSTIC_ROWS: usize = 5;

/// Pick `(target, backup)`: the schema with fewer `Utf8` fields is the target.
///
/// On a tie the existing table's schema is the target.
pub fn choose_target_schema<'a>(existing: &'a Schema, incoming: &'a Schema) -> (&'a Schema, &'a Schema) {
    if incoming.utf8_count() < existing.utf8_count() {
        (incoming, existing)
    } else {
        (existing, incoming)
    }
}

/// Reconcile, concatenate (existing rows first) and deduplicate on `key_columns`.
///
/// For a key present in both tables the incoming row wins.
pub fn merge_tables(
    existing: &DataSet,
    incoming: &DataSet,
    key_columns: &[&str],
    observer: &dyn ExtractionObserver,
) -> ExtractionResult<DataSet> {
    let (target, backup) = choose_target_schema(&existing.schema, &incoming.schema);

    let cast = match cast_pair(existing, incoming, target) {
        Ok(pair) => Ok(pair),
        Err(err) => {
            observer.on_event(
                ExtractionSeverity::Warning,
                &ExtractionEvent::SchemaFallback {
                    abandoned: target.clone(),
                    fallback: backup.clone(),
                    reason: err.to_string(),
                },
            );
            cast_pair(existing, incoming, backup)
        }
    };

    cast.and_then(|(top, bottom)| concat_tables(top, bottom, key_columns))
        .and_then(|combined| dedup_keep_last(combined, key_columns))
        .map_err(|cause| {
            observer.on_event(
                ExtractionSeverity::Error,
                &ExtractionEvent::MergeFailed {
                    existing_schema: existing.schema.clone(),
                    incoming_schema: incoming.schema.clone(),
                    existing_head: existing.head(DIAGNOSTIC_ROWS),
                    incoming_head: incoming.head(DIAGNOSTIC_ROWS),
                    cause: cause.to_string(),
                },
            );
            ExtractionError::MergeDataFrame {
                message: format!(
                    "cannot reconcile {} with {}",
                    existing.schema, incoming.schema
                ),
                source: Box::new(cause),
            }
        })
}

fn cast_pair(existing: &DataSet, incoming: &DataSet, schema: &Schema) -> ExtractionResult<(DataSet, DataSet)> {
    Ok((cast_to_schema(existing, schema)?, cast_to_schema(incoming, schema)?))
}

/// Stack `bottom` under `top`, aligning columns by name.
///
/// The result has `top`'s columns followed by the columns only `bottom` has; cells a table
/// does not have are `Null`. Fails if a shared column has different types, or if a key
/// column is missing from either table.
pub fn concat_tables(top: DataSet, bottom: DataSet, key_columns: &[&str]) -> ExtractionResult<DataSet> {
    for key in key_columns {
        if top.schema.index_of(key).is_none() || bottom.schema.index_of(key).is_none() {
            return Err(ExtractionError::schema_mismatch(format!(
                "key column '{key}' must exist in both tables ({} / {})",
                top.schema, bottom.schema
            )));
        }
    }

    let mut schema = top.schema.clone();
    let mut positions = Vec::with_capacity(bottom.schema.fields.len());
    for field in &bottom.schema.fields {
        match top.schema.index_of(&field.name) {
            Some(idx) if top.schema.fields[idx].data_type != field.data_type => {
                return Err(ExtractionError::schema_mismatch(format!(
                    "column '{}' is {} in one table and {} in the other",
                    field.name, top.schema.fields[idx].data_type, field.data_type
                )));
            }
            Some(idx) => positions.push(idx),
            None => {
                positions.push(schema.fields.len());
                schema.fields.push(field.clone());
            }
        }
    }

    let width = schema.fields.len();
    let mut rows = Vec::with_capacity(top.row_count() + bottom.row_count());
    for mut row in top.rows {
        row.resize(width, Value::Null);
        rows.push(row);
    }
    for row in bottom.rows {
        let mut out = vec![Value::Null; width];
        for (value, &pos) in row.into_iter().zip(&positions) {
            out[pos] = value;
        }
        rows.push(out);
    }

    Ok(DataSet::new(schema, rows))
}
