//! Writing tables, plus helpers over a finished output folder.
//!
//! [`write_table`] is what the label store uses: the table is written to a hidden temporary
//! sibling and renamed over the destination, so a failed write never leaves a truncated
//! label file behind.

pub mod csv;
pub mod folder;
pub mod json;
pub mod parquet;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ExtractionResult;
use crate::ingestion::TableFormat;
use crate::types::DataSet;

pub use folder::{convert_folder_to_csv, folder_stats, FileStats};

/// Write `table` to `path` in `format`, replacing any existing file.
pub fn write_table(path: impl AsRef<Path>, table: &DataSet, format: TableFormat) -> ExtractionResult<()> {
    let path = path.as_ref();
    let tmp = temp_sibling(path);

    let written = match format {
        TableFormat::Parquet => parquet::write_parquet_table(&tmp, table),
        TableFormat::Csv => csv::write_csv_table(&tmp, table),
        TableFormat::Json => json::write_json_table(&tmp, table),
    }
    .and_then(|()| Ok(fs::rename(&tmp, path)?));

    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
