//! Unified table reading.
//!
//! Most callers should use [`read_table`], which reads a file into an in-memory
//! [`crate::types::DataSet`], choosing the reader from the file extension unless a
//! [`TableFormat`] is forced.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ExtractionError, ExtractionResult};
use crate::types::DataSet;

use super::{csv, json, parquet};

/// Supported table file formats, for both source files and label tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// Apache Parquet.
    #[default]
    Parquet,
    /// Comma-separated values with a header row.
    Csv,
    /// JSON array-of-objects or newline-delimited objects.
    Json,
}

impl TableFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "parquet" | "pq" => Some(Self::Parquet),
            "csv" => Some(Self::Csv),
            "json" | "ndjson" | "jsonl" => Some(Self::Json),
            _ => None,
        }
    }

    /// Infer the format of `path` from its extension.
    pub fn from_path(path: &Path) -> ExtractionResult<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                ExtractionError::format(format!(
                    "cannot infer format: path has no extension ({})",
                    path.display()
                ))
            })?;

        Self::from_extension(ext).ok_or_else(|| {
            ExtractionError::format(format!(
                "cannot infer format from extension '{ext}' for path ({})",
                path.display()
            ))
        })
    }

    /// Extension used for label files written in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Parquet => "parquet",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TableFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| format!("unsupported table format '{s}' (parquet, csv, json)"))
    }
}

/// Read a table from `path`.
///
/// If `format` is `None`, the format is inferred from the file extension.
///
/// ```no_run
/// use graph_tables::ingestion::read_table;
///
/// # fn main() -> Result<(), graph_tables::ExtractionError> {
/// let table = read_table("exports/transfers_000.parquet", None)?;
/// println!("rows={} schema={}", table.row_count(), table.schema);
/// # Ok(())
/// # }
/// ```
pub fn read_table(path: impl AsRef<Path>, format: Option<TableFormat>) -> ExtractionResult<DataSet> {
    let path = path.as_ref();
    let format = match format {
        Some(f) => f,
        None => TableFormat::from_path(path)?,
    };

    match format {
        TableFormat::Parquet => parquet::read_parquet_table(path),
        TableFormat::Csv => csv::read_csv_table(path),
        TableFormat::Json => json::read_json_table(path),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::TableFormat;
    use crate::error::ExtractionError;

    #[test]
    fn formats_from_extensions() {
        assert_eq!(TableFormat::from_extension("PQ"), Some(TableFormat::Parquet));
        assert_eq!(TableFormat::from_extension("ndjson"), Some(TableFormat::Json));
        assert_eq!(TableFormat::from_extension("txt"), None);
        assert_eq!("csv".parse::<TableFormat>(), Ok(TableFormat::Csv));
    }

    #[test]
    fn unknown_extension_is_a_format_error() {
        let err = TableFormat::from_path(Path::new("exports/readme.txt")).unwrap_err();
        assert!(err.to_string().contains("cannot infer format from extension 'txt'"));
        assert!(matches!(err, ExtractionError::Format { .. }));
        assert!(TableFormat::from_path(Path::new("exports/no_extension")).is_err());
    }
}
