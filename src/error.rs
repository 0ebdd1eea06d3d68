use thiserror::Error;

use crate::types::DataType;

/// Convenience result type used across the crate.
pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Error type returned by mapping, extraction, merge and run functions.
///
/// [`ExtractionError::SchemaMismatch`] and [`ExtractionError::MergeDataFrame`] (and their
/// node/edge wrappers) are the anticipated failure modes the run orchestrator recovers from;
/// everything else aborts a run.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet read/write error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// JSON document could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configured file pattern is not a valid glob.
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A path matched by a glob could not be read.
    #[error("glob error: {0}")]
    Glob(#[from] glob::GlobError),

    /// A file's contents or extension do not match any readable table format.
    #[error("unreadable table: {message}")]
    Format { message: String },

    /// The mapping configuration is malformed.
    #[error("invalid mapping: {message}")]
    Validation { message: String },

    /// A table lacks a column required by a mapping (or a key column).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be converted to the required [`DataType`].
    #[error("failed to cast value at row {row} column '{column}' to {target}: {message} (raw='{raw}')")]
    Cast {
        row: usize,
        column: String,
        raw: String,
        target: DataType,
        message: String,
    },

    /// Two tables could not be reconciled into one.
    #[error("failed to merge tables: {message}")]
    MergeDataFrame {
        message: String,
        #[source]
        source: Box<ExtractionError>,
    },

    /// Extraction or merge of a node label failed.
    #[error("node extraction failed for label '{label}': {source}")]
    NodeExtract {
        label: String,
        #[source]
        source: Box<ExtractionError>,
    },

    /// Extraction or merge of an edge label failed.
    #[error("edge extraction failed for label '{label}': {source}")]
    EdgeExtract {
        label: String,
        #[source]
        source: Box<ExtractionError>,
    },
}

impl ExtractionError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    pub(crate) fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }
}
