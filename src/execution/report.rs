use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::ExtractionError;
use crate::mapping::MappingKind;

/// A (folder, pattern) triple whose remaining files were skipped after a recoverable failure.
#[derive(Debug)]
pub struct AbandonedTriple {
    pub folder: String,
    pub pattern: String,
    /// File being processed when the failure happened.
    pub file: PathBuf,
    pub label: String,
    pub kind: MappingKind,
    /// [`ExtractionError::NodeExtract`] or [`ExtractionError::EdgeExtract`].
    pub error: ExtractionError,
}

/// A file pattern that matched no regular files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedPattern {
    pub folder: String,
    pub pattern: String,
}

/// Outcome of a completed run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files whose every mapping was extracted and merged.
    pub files_processed: usize,
    /// Files never read because their triple was abandoned earlier.
    pub files_skipped: usize,
    /// Label files written (one per successful extract-and-merge).
    pub tables_written: usize,
    pub abandoned: Vec<AbandonedTriple>,
    pub unmatched_patterns: Vec<UnmatchedPattern>,
}

impl RunReport {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            files_processed: self.files_processed,
            files_skipped: self.files_skipped,
            tables_written: self.tables_written,
            triples_abandoned: self.abandoned.len(),
            patterns_unmatched: self.unmatched_patterns.len(),
        }
    }

    /// `true` when nothing was abandoned.
    pub fn is_clean(&self) -> bool {
        self.abandoned.is_empty()
    }
}

/// Counters of a [`RunReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub tables_written: usize,
    pub triples_abandoned: usize,
    pub patterns_unmatched: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "files_processed={} files_skipped={} tables_written={} triples_abandoned={} patterns_unmatched={}",
            self.files_processed,
            self.files_skipped,
            self.tables_written,
            self.triples_abandoned,
            self.patterns_unmatched
        )
    }
}
