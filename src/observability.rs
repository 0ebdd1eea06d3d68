//! Structured events emitted by the extraction core, and observer sinks for them.
//!
//! The core never installs a global logger. Components receive an
//! [`ExtractionObserver`] handle and report [`ExtractionEvent`]s with an
//! [`ExtractionSeverity`]; the sink decides what to do with them.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::execution::RunSummary;
use crate::types::{Schema, Value};

/// Severity classification for observer callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExtractionSeverity {
    /// Informational event.
    Info,
    /// Non-fatal problem; work continues (possibly with a triple abandoned).
    Warning,
    /// An operation failed.
    Error,
    /// The run is being aborted.
    Critical,
}

/// Events reported by the store, the reconciler and the run orchestrator.
#[derive(Debug, Clone)]
pub enum ExtractionEvent {
    RunStarted {
        source_root: PathBuf,
        output_dir: PathBuf,
        triples: usize,
    },
    /// A file pattern matched nothing.
    PatternUnmatched {
        folder: String,
        pattern: String,
        glob: String,
    },
    TableWritten {
        label: String,
        path: PathBuf,
        rows_extracted: usize,
        rows_before: usize,
        rows_after: usize,
    },
    /// Casting against the preferred schema failed; the other schema is tried next.
    SchemaFallback {
        abandoned: Schema,
        fallback: Schema,
        reason: String,
    },
    /// Emitted right before a merge failure is returned.
    MergeFailed {
        existing_schema: Schema,
        incoming_schema: Schema,
        existing_head: Vec<Vec<Value>>,
        incoming_head: Vec<Vec<Value>>,
        cause: String,
    },
    /// A recoverable failure ended processing of a (folder, pattern) triple.
    TripleAbandoned {
        folder: String,
        pattern: String,
        file: PathBuf,
        label: String,
        mapping: String,
        skipped_files: usize,
        cause: String,
    },
    /// An unanticipated failure; the run stops.
    RunAborted { file: PathBuf, cause: String },
    RunFinished { summary: RunSummary },
}

impl ExtractionEvent {
    /// Short stable name, used as a structured field by sinks.
    pub fn name(&self) -> &'static str {
        match self {
            ExtractionEvent::RunStarted { .. } => "run_started",
            ExtractionEvent::PatternUnmatched { .. } => "pattern_unmatched",
            ExtractionEvent::TableWritten { .. } => "table_written",
            ExtractionEvent::SchemaFallback { .. } => "schema_fallback",
            ExtractionEvent::MergeFailed { .. } => "merge_failed",
            ExtractionEvent::TripleAbandoned { .. } => "triple_abandoned",
            ExtractionEvent::RunAborted { .. } => "run_aborted",
            ExtractionEvent::RunFinished { .. } => "run_finished",
        }
    }
}

impl fmt::Display for ExtractionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionEvent::RunStarted {
                source_root,
                output_dir,
                triples,
            } => write!(
                f,
                "extracting {triples} triple(s) from {} into {}",
                source_root.display(),
                output_dir.display()
            ),
            ExtractionEvent::PatternUnmatched {
                folder,
                pattern,
                glob,
            } => write!(f, "pattern '{pattern}' in folder '{folder}' matched no files ({glob})"),
            ExtractionEvent::TableWritten {
                label,
                path,
                rows_extracted,
                rows_before,
                rows_after,
            } => write!(
                f,
                "label '{label}': {rows_extracted} row(s) extracted, {rows_before} -> {rows_after} row(s) in {}",
                path.display()
            ),
            ExtractionEvent::SchemaFallback {
                abandoned,
                fallback,
                reason,
            } => write!(
                f,
                "could not cast to schema {abandoned} ({reason}); falling back to {fallback}"
            ),
            ExtractionEvent::MergeFailed {
                existing_schema,
                incoming_schema,
                existing_head,
                incoming_head,
                cause,
            } => {
                writeln!(f, "failed to merge tables: {cause}")?;
                writeln!(f, "existing schema: {existing_schema}")?;
                write_rows(f, existing_head)?;
                writeln!(f, "incoming schema: {incoming_schema}")?;
                write_rows(f, incoming_head)
            }
            ExtractionEvent::TripleAbandoned {
                folder,
                pattern,
                file,
                label,
                mapping,
                skipped_files,
                cause,
            } => write!(
                f,
                "skipping {skipped_files} remaining file(s) of '{folder}/{pattern}': {} failed for label '{label}' with {mapping}: {cause}",
                file.display()
            ),
            ExtractionEvent::RunAborted { file, cause } => {
                write!(f, "aborting run while processing {}: {cause}", file.display())
            }
            ExtractionEvent::RunFinished { summary } => write!(f, "run finished: {summary}"),
        }
    }
}

fn write_rows(f: &mut fmt::Formatter<'_>, rows: &[Vec<Value>]) -> fmt::Result {
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .map(|v| match v {
                Value::Null => "null".to_string(),
                other => other.to_string(),
            })
            .collect();
        writeln!(f, "  | {} |", cells.join(" | "))?;
    }
    Ok(())
}

/// Observer interface for extraction events.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ExtractionObserver: Send + Sync {
    fn on_event(&self, severity: ExtractionSeverity, event: &ExtractionEvent);
}

/// Forwards events to `tracing` at the matching level.
///
/// This is the default sink; a subscriber has to be installed by the program for the events
/// to go anywhere.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ExtractionObserver for TracingObserver {
    fn on_event(&self, severity: ExtractionSeverity, event: &ExtractionEvent) {
        let name = event.name();
        match severity {
            ExtractionSeverity::Info => tracing::info!(event = name, "{event}"),
            ExtractionSeverity::Warning => tracing::warn!(event = name, "{event}"),
            ExtractionSeverity::Error => tracing::error!(event = name, "{event}"),
            ExtractionSeverity::Critical => tracing::error!(event = name, critical = true, "{event}"),
        }
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ExtractionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ExtractionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ExtractionObserver for CompositeObserver {
    fn on_event(&self, severity: ExtractionSeverity, event: &ExtractionEvent) {
        for o in &self.observers {
            o.on_event(severity, event);
        }
    }
}

/// Appends events to a local log file, one line per event.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ExtractionObserver for FileObserver {
    fn on_event(&self, severity: ExtractionSeverity, event: &ExtractionEvent) {
        // Multi-line events (merge dumps) stay on one line.
        let message = event.to_string().replace('\n', " ");
        self.append_line(&format!(
            "{} {:?} {} {}",
            unix_ts(),
            severity,
            event.name(),
            message.trim_end()
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::{ExtractionEvent, ExtractionSeverity};
    use crate::types::{DataType, Field, Schema, Value};

    #[test]
    fn severities_are_ordered() {
        assert!(ExtractionSeverity::Info < ExtractionSeverity::Warning);
        assert!(ExtractionSeverity::Error < ExtractionSeverity::Critical);
    }

    #[test]
    fn merge_failure_dump_includes_schemas_and_rows() {
        let event = ExtractionEvent::MergeFailed {
            existing_schema: Schema::new(vec![Field::new("id", DataType::Int64)]),
            incoming_schema: Schema::new(vec![Field::new("id", DataType::Utf8)]),
            existing_head: vec![vec![Value::Int64(1)]],
            incoming_head: vec![vec![Value::Utf8("Ox000".to_string())], vec![Value::Null]],
            cause: "boom".to_string(),
        };
        let text = event.to_string();
        assert!(text.contains("existing schema: {id: Int64}"));
        assert!(text.contains("| Ox000 |"));
        assert!(text.contains("| null |"));
        assert_eq!(event.name(), "merge_failed");
    }
}
