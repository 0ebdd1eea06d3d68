//! Post-run helpers over an output folder: batch CSV conversion and file statistics.

use std::path::{Path, PathBuf};

use parquet::file::reader::FileReader;
use parquet::file::serialized_reader::SerializedFileReader;
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::ExtractionResult;
use crate::ingestion::parquet::read_parquet_table;
use crate::ingestion::TableFormat;

use super::write_table;

/// Size (and, for parquet files, row count) of one file in a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStats {
    pub name: String,
    pub bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<i64>,
}

/// Regular files directly inside `dir`, sorted by name. Hidden files are skipped.
fn folder_files(dir: &Path) -> ExtractionResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if entry.file_type().is_file() && !hidden {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_parquet(path: &Path) -> bool {
    TableFormat::from_path(path).ok() == Some(TableFormat::Parquet)
}

/// Convert every parquet file directly inside `dir` to a `.csv` sibling.
///
/// Files are converted in parallel. Returns the written CSV paths in file-name order.
pub fn convert_folder_to_csv(dir: impl AsRef<Path>) -> ExtractionResult<Vec<PathBuf>> {
    let inputs: Vec<PathBuf> = folder_files(dir.as_ref())?
        .into_iter()
        .filter(|p| is_parquet(p))
        .collect();

    inputs
        .par_iter()
        .map(|input| -> ExtractionResult<PathBuf> {
            let table = read_parquet_table(input)?;
            let output = input.with_extension(TableFormat::Csv.extension());
            write_table(&output, &table, TableFormat::Csv)?;
            tracing::debug!(input = %input.display(), rows = table.row_count(), "converted to csv");
            Ok(output)
        })
        .collect()
}

/// Per-file statistics for the regular files directly inside `dir`.
pub fn folder_stats(dir: impl AsRef<Path>) -> ExtractionResult<Vec<FileStats>> {
    let mut stats = Vec::new();
    for path in folder_files(dir.as_ref())? {
        let rows = if is_parquet(&path) {
            let reader = SerializedFileReader::try_from(path.as_path())?;
            Some(reader.metadata().file_metadata().num_rows())
        } else {
            None
        };
        stats.push(FileStats {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            bytes: path.metadata()?.len(),
            rows,
        });
    }
    Ok(stats)
}
