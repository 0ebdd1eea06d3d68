//! `graph-tables` turns batches of columnar data files into node and edge tables for a graph
//! database import, driven by a declarative column mapping.
//!
//! The primary entrypoint is [`execution::ExtractionEngine::run`], which walks a
//! [`mapping::Config`] (folder -> file pattern -> node/edge mappings), reads every matched
//! file, extracts one relation per mapping, and merges it into that label's table on disk.
//!
//! ## What goes in
//!
//! **File formats (auto-detected by extension):**
//!
//! - **Parquet**: `.parquet`, `.pq` (types from the stored values)
//! - **CSV**: `.csv` (every column read as text)
//! - **JSON**: `.json` (array-of-objects) and `.ndjson`/`.jsonl` (newline-delimited objects),
//!   types inferred from the values
//!
//! Types are inferred per file, so the same column can arrive as `Int64` from one file and as
//! `Utf8` from another. The merge step reconciles such differences (see
//! [`processing::reconcile`]).
//!
//! ## What comes out
//!
//! One file per label under the output directory: `<label>.parquet` by default, or CSV/JSON.
//! Node tables have the columns `id | attributes…`, edge tables `source | target | attributes…`.
//! Within a label table the key (`id`, or `(source, target)`) is unique, and the most recently
//! extracted row for a key wins.
//!
//! ## Quick example: run a configuration
//!
//! ```no_run
//! use graph_tables::execution::{ExtractionEngine, RunOptions};
//! use graph_tables::mapping::Config;
//!
//! # fn main() -> Result<(), graph_tables::ExtractionError> {
//! let config = Config::from_path("mapping.json")?;
//! let report = ExtractionEngine::new(RunOptions::default()).run(&config, "exports", "output_data")?;
//! for abandoned in &report.abandoned {
//!     eprintln!("{}/{}: {}", abandoned.folder, abandoned.pattern, abandoned.error);
//! }
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure handling
//!
//! A file lacking a mapped column ([`ExtractionError::SchemaMismatch`]) or a table that cannot
//! be reconciled with the label's existing data ([`ExtractionError::MergeDataFrame`]) abandons
//! the rest of that (folder, pattern) triple; label files are never left half-written and the
//! run continues. Any other error aborts the run.
//!
//! ## Modules
//!
//! - [`mapping`]: mapping model and configuration parsing
//! - [`types`]: schema + in-memory dataset types
//! - [`ingestion`]: reading parquet/CSV/JSON files
//! - [`processing`]: extraction, casting and merging
//! - [`store`]: per-label persisted tables
//! - [`output`]: table writers, batch CSV conversion, folder statistics
//! - [`execution`]: run orchestration and reporting
//! - [`observability`]: extraction events and observer sinks
//! - [`error`]: error types used across the crate

pub mod error;
pub mod execution;
pub mod ingestion;
pub mod mapping;
pub mod observability;
pub mod output;
pub mod processing;
pub mod store;
pub mod types;

pub use error::{ExtractionError, ExtractionResult};
