//! In-memory table transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion.
//! Everything here is a pure function of its inputs (apart from observer callbacks).
//!
//! - [`extract_table()`]: project a raw table into a node or edge relation, deduplicated by key
//! - [`merge_tables()`]: reconcile two relations' schemas and merge them, incoming rows winning
//! - [`cast_to_schema()`]: per-column type casts used by the reconciler
//!
//! ## Example: extract, then merge
//!
//! ```rust
//! use graph_tables::mapping::{AttributeMap, ColumnMapping, NodeMapping};
//! use graph_tables::observability::TracingObserver;
//! use graph_tables::processing::{extract_table, merge_tables};
//! use graph_tables::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let raw = DataSet::new(
//!     Schema::new(vec![Field::new("_address", DataType::Utf8)]),
//!     vec![
//!         vec![Value::Utf8("Ox000".to_string())],
//!         vec![Value::Utf8("Ox001".to_string())],
//!         vec![Value::Utf8("Ox000".to_string())],
//!     ],
//! );
//! let mapping: ColumnMapping = NodeMapping::new(
//!     "_address",
//!     AttributeMap::from_pairs([("address", "_address")]).unwrap(),
//! )
//! .unwrap()
//! .into();
//!
//! let nodes = extract_table(&raw, &mapping).unwrap();
//! assert_eq!(nodes.row_count(), 2);
//!
//! let merged = merge_tables(&nodes, &nodes, mapping.key_columns(), &TracingObserver).unwrap();
//! assert_eq!(merged, nodes);
//! ```

pub mod cast;
pub mod extract;
pub mod reconcile;

pub use cast::{cast_to_schema, cast_value};
pub use extract::{check_required_columns, dedup_keep_last, extract_table};
pub use reconcile::{choose_target_schema, concat_tables, merge_tables};
