//! Run orchestration: configuration + source directory -> label tables.
//!
//! This module sits "above" [`crate::store`] and [`crate::processing`] and provides:
//!
//! - Pattern resolution (`<source_root>/<folder>/<pattern>`, regular files, sorted)
//! - Sequential processing of every (folder, pattern, mapping) triple in configuration order
//! - Failure containment: a schema mismatch or merge failure abandons the rest of its triple
//!   and the run moves on; anything else aborts the run
//! - A [`RunReport`] plus observer events describing what happened

mod report;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ExtractionError, ExtractionResult};
use crate::ingestion::{read_table, TableFormat};
use crate::mapping::{ColumnMapping, Config, FileMapping, MappingKind};
use crate::observability::{ExtractionEvent, ExtractionObserver, ExtractionSeverity, TracingObserver};
use crate::store::LabelStore;

pub use report::{AbandonedTriple, RunReport, RunSummary, UnmatchedPattern};

/// Configuration for the [`ExtractionEngine`].
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Format of the label tables written to the output directory.
    pub output_format: TableFormat,
    /// Read every source file in this format instead of inferring it from the extension.
    pub input_format: Option<TableFormat>,
    /// Emit a warning for file patterns that match nothing.
    ///
    /// Unmatched patterns are recorded in the [`RunReport`] either way.
    pub warn_on_unmatched_pattern: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_format: TableFormat::Parquet,
            input_format: None,
            warn_on_unmatched_pattern: true,
        }
    }
}

/// How the orchestrator reacts to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// A table lacks a required or key column. Abandons the triple.
    SchemaMismatch,
    /// Two tables could not be reconciled. Abandons the triple.
    MergeFailure,
    /// Anything else. Aborts the run.
    Unexpected,
}

impl FailureClass {
    pub fn of(err: &ExtractionError) -> Self {
        match err {
            ExtractionError::SchemaMismatch { .. } => FailureClass::SchemaMismatch,
            ExtractionError::MergeDataFrame { .. } => FailureClass::MergeFailure,
            ExtractionError::NodeExtract { source, .. } | ExtractionError::EdgeExtract { source, .. } => {
                FailureClass::of(source)
            }
            _ => FailureClass::Unexpected,
        }
    }

    pub fn is_recoverable(self) -> bool {
        !matches!(self, FailureClass::Unexpected)
    }
}

/// Glob for `pattern` under `<source_root>/<folder>`; the directory part is escaped.
pub fn pattern_glob(source_root: &Path, folder: &str, pattern: &str) -> String {
    let dir = source_root.join(folder);
    format!("{}/{pattern}", glob::Pattern::escape(&dir.to_string_lossy()))
}

/// Regular files matching `pattern` in `<source_root>/<folder>`, sorted by path.
pub fn resolve_pattern(source_root: &Path, folder: &str, pattern: &str) -> ExtractionResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in glob::glob(&pattern_glob(source_root, folder, pattern))? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// A recoverable failure, before it is reported.
struct Abandon {
    label: String,
    kind: MappingKind,
    mapping: ColumnMapping,
    error: ExtractionError,
}

/// Drives extraction for a whole [`Config`].
pub struct ExtractionEngine {
    opts: RunOptions,
    observer: Arc<dyn ExtractionObserver>,
}

impl ExtractionEngine {
    pub fn new(opts: RunOptions) -> Self {
        Self {
            opts,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Attach an observer for extraction events (defaults to [`TracingObserver`]).
    pub fn with_observer(mut self, observer: Arc<dyn ExtractionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.opts
    }

    /// Process every triple of `config` against files under `source_root`, writing label
    /// tables into `output_dir` (created if missing).
    ///
    /// Returns the first unexpected error; recoverable failures are in the report.
    pub fn run(
        &self,
        config: &Config,
        source_root: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> ExtractionResult<RunReport> {
        let source_root = source_root.as_ref();
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;

        self.emit(
            ExtractionSeverity::Info,
            ExtractionEvent::RunStarted {
                source_root: source_root.to_path_buf(),
                output_dir: output_dir.to_path_buf(),
                triples: config.triples().count(),
            },
        );

        let store = LabelStore::new(output_dir, self.opts.output_format).with_observer(Arc::clone(&self.observer));
        let mut report = RunReport::default();

        for (folder, pattern, mapping) in config.triples() {
            let files = resolve_pattern(source_root, folder, pattern)?;
            if files.is_empty() {
                if self.opts.warn_on_unmatched_pattern {
                    self.emit(
                        ExtractionSeverity::Warning,
                        ExtractionEvent::PatternUnmatched {
                            folder: folder.to_string(),
                            pattern: pattern.to_string(),
                            glob: pattern_glob(source_root, folder, pattern),
                        },
                    );
                }
                report.unmatched_patterns.push(UnmatchedPattern {
                    folder: folder.to_string(),
                    pattern: pattern.to_string(),
                });
                continue;
            }

            for (i, file) in files.iter().enumerate() {
                match self.process_file(&store, file, mapping, &mut report) {
                    Ok(None) => report.files_processed += 1,
                    Ok(Some(abandon)) => {
                        let skipped_files = files.len() - i - 1;
                        self.emit(
                            ExtractionSeverity::Warning,
                            ExtractionEvent::TripleAbandoned {
                                folder: folder.to_string(),
                                pattern: pattern.to_string(),
                                file: file.clone(),
                                label: abandon.label.clone(),
                                mapping: abandon.mapping.to_string(),
                                skipped_files,
                                cause: abandon.error.to_string(),
                            },
                        );
                        report.files_skipped += skipped_files;
                        report.abandoned.push(AbandonedTriple {
                            folder: folder.to_string(),
                            pattern: pattern.to_string(),
                            file: file.clone(),
                            label: abandon.label,
                            kind: abandon.kind,
                            error: abandon.error,
                        });
                        break;
                    }
                    Err(err) => {
                        self.emit(
                            ExtractionSeverity::Critical,
                            ExtractionEvent::RunAborted {
                                file: file.clone(),
                                cause: err.to_string(),
                            },
                        );
                        return Err(err);
                    }
                }
            }
        }

        self.emit(
            ExtractionSeverity::Info,
            ExtractionEvent::RunFinished {
                summary: report.summary(),
            },
        );
        Ok(report)
    }

    /// Read one file and apply every node mapping, then every edge mapping.
    ///
    /// `Ok(Some(_))` means a recoverable failure stopped the file.
    fn process_file(
        &self,
        store: &LabelStore,
        path: &Path,
        mapping: &FileMapping,
        report: &mut RunReport,
    ) -> ExtractionResult<Option<Abandon>> {
        let raw = read_table(path, self.opts.input_format)?;
        tracing::debug!(file = %path.display(), rows = raw.row_count(), schema = %raw.schema, "read source file");

        for (label, column_mapping) in mapping.column_mappings() {
            let err = match store.extract_and_merge(&raw, label, &column_mapping) {
                Ok(_) => {
                    report.tables_written += 1;
                    continue;
                }
                Err(err) => err,
            };

            match FailureClass::of(&err) {
                FailureClass::SchemaMismatch | FailureClass::MergeFailure => {
                    let kind = column_mapping.kind();
                    let label = label.to_string();
                    let error = match kind {
                        MappingKind::Node => ExtractionError::NodeExtract {
                            label: label.clone(),
                            source: Box::new(err),
                        },
                        MappingKind::Edge => ExtractionError::EdgeExtract {
                            label: label.clone(),
                            source: Box::new(err),
                        },
                    };
                    return Ok(Some(Abandon {
                        label,
                        kind,
                        mapping: column_mapping,
                        error,
                    }));
                }
                FailureClass::Unexpected => return Err(err),
            }
        }

        Ok(None)
    }

    fn emit(&self, severity: ExtractionSeverity, event: ExtractionEvent) {
        self.observer.on_event(severity, &event);
    }
}

#[cfg(test)]
mod tests {
    use super::FailureClass;
    use crate::error::ExtractionError;

    #[test]
    fn classifies_wrapped_errors_by_their_source() {
        let mismatch = ExtractionError::NodeExtract {
            label: "ADDR".to_string(),
            source: Box::new(ExtractionError::schema_mismatch("missing column")),
        };
        assert_eq!(FailureClass::of(&mismatch), FailureClass::SchemaMismatch);

        let merge = ExtractionError::MergeDataFrame {
            message: "cannot reconcile".to_string(),
            source: Box::new(ExtractionError::schema_mismatch("column 'n' differs")),
        };
        assert_eq!(FailureClass::of(&merge), FailureClass::MergeFailure);
        assert!(FailureClass::of(&merge).is_recoverable());

        let io = ExtractionError::Io(std::io::Error::other("disk full"));
        assert_eq!(FailureClass::of(&io), FailureClass::Unexpected);
        assert!(!FailureClass::of(&io).is_recoverable());

        let corrupt = ExtractionError::EdgeExtract {
            label: "TRANSFER".to_string(),
            source: Box::new(ExtractionError::format("invalid ndjson at line 1")),
        };
        assert_eq!(FailureClass::of(&corrupt), FailureClass::Unexpected);
    }
}
