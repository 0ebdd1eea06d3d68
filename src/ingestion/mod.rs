//! Table reading entrypoints and implementations.
//!
//! Most callers should use [`read_table`] (from [`unified`]) which auto-detects the format by
//! file extension (or takes a forced [`TableFormat`]) and reads the whole file into an
//! in-memory [`crate::types::DataSet`], inferring column types per file.
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - [`parquet`]

pub mod csv;
pub mod json;
pub mod parquet;
pub mod unified;

pub use unified::{read_table, TableFormat};
