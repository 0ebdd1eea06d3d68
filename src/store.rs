//! Per-label persisted tables.
//!
//! Each node or edge label owns one file, `<output_dir>/<label>.<ext>`. The file does not
//! exist until the first extraction for the label; afterwards every extraction loads it,
//! merges the new rows in, and rewrites it in full.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ExtractionResult;
use crate::ingestion::csv::read_label_csv_table;
use crate::ingestion::{read_table, TableFormat};
use crate::mapping::{validate_label, ColumnMapping};
use crate::observability::{ExtractionEvent, ExtractionObserver, ExtractionSeverity, TracingObserver};
use crate::output::write_table;
use crate::processing::{extract_table, merge_tables};
use crate::types::DataSet;

/// Row counts for one [`LabelStore::extract_and_merge`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStats {
    pub path: PathBuf,
    /// Rows produced by extraction (after deduplication).
    pub rows_extracted: usize,
    /// Rows in the label file before the merge; 0 if it did not exist.
    pub rows_before: usize,
    pub rows_after: usize,
}

/// Reads, merges and rewrites label tables under one output directory.
pub struct LabelStore {
    output_dir: PathBuf,
    format: TableFormat,
    observer: Arc<dyn ExtractionObserver>,
}

impl LabelStore {
    /// Store writing `format` files into `output_dir` (which must exist).
    pub fn new(output_dir: impl Into<PathBuf>, format: TableFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Report merge fallbacks/failures and written tables to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn ExtractionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn format(&self) -> TableFormat {
        self.format
    }

    pub fn label_path(&self, label: &str) -> PathBuf {
        self.output_dir
            .join(format!("{label}.{}", self.format.extension()))
    }

    /// The persisted table for `label`, or `None` if nothing was written yet.
    ///
    /// A label file without columns counts as absent: an empty table written as NDJSON is an
    /// empty file and reads back with no schema.
    pub fn load(&self, label: &str) -> ExtractionResult<Option<DataSet>> {
        let path = self.label_path(label);
        if !path.is_file() {
            return Ok(None);
        }
        let table = match self.format {
            TableFormat::Csv => read_label_csv_table(&path)?,
            format => read_table(&path, Some(format))?,
        };
        if table.schema.fields.is_empty() {
            return Ok(None);
        }
        Ok(Some(table))
    }

    /// Extract `mapping` from `raw` and merge the result into `label`'s table.
    ///
    /// On any error the label file is left exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`crate::ExtractionError::SchemaMismatch`] if `raw` lacks a required column.
    /// - [`crate::ExtractionError::MergeDataFrame`] if the existing table and the new rows
    ///   cannot be reconciled.
    /// - [`crate::ExtractionError::Format`], I/O and parquet errors from reading or writing the
    ///   label file. A corrupt label file is never treated as a schema mismatch.
    pub fn extract_and_merge(
        &self,
        raw: &DataSet,
        label: &str,
        mapping: &ColumnMapping,
    ) -> ExtractionResult<MergeStats> {
        validate_label(label)?;
        let extracted = extract_table(raw, mapping)?;
        let rows_extracted = extracted.row_count();

        let path = self.label_path(label);
        let (rows_before, merged) = match self.load(label)? {
            Some(existing) => {
                let merged = merge_tables(&existing, &extracted, mapping.key_columns(), self.observer.as_ref())?;
                (existing.row_count(), merged)
            }
            None => (0, extracted),
        };

        write_table(&path, &merged, self.format)?;

        let stats = MergeStats {
            path,
            rows_extracted,
            rows_before,
            rows_after: merged.row_count(),
        };
        self.observer.on_event(
            ExtractionSeverity::Info,
            &ExtractionEvent::TableWritten {
                label: label.to_string(),
                path: stats.path.clone(),
                rows_extracted,
                rows_before,
                rows_after: stats.rows_after,
            },
        );
        Ok(stats)
    }
}
