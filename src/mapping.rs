//! Mapping model: which source columns become which node/edge fields.
//!
//! A [`Config`] is parsed once from a JSON document shaped like
//!
//! ```json
//! { "<folder>": { "<file-glob>": {
//!     "nodes": { "<label>": [ { "id": "<col>", "attributes": { "<out>": "<col>" } } ] },
//!     "edges": { "<label>": [ { "source": "<col>", "target": "<col>", "attributes": {} } ] }
//! } } }
//! ```
//!
//! `nodes`, `edges` and `attributes` are optional, and a label may map to a single mapping
//! object instead of a list. Folders, patterns, labels and attributes keep document order.
//! Unknown keys are rejected.
//!
//! ```rust
//! use graph_tables::mapping::Config;
//!
//! # fn main() -> Result<(), graph_tables::ExtractionError> {
//! let config = Config::from_json_str(r#"{
//!     "exports": { "transfers_*.parquet": {
//!         "nodes": { "ADDR": { "id": "_address", "attributes": { "address": "_address" } } }
//!     } }
//! }"#)?;
//! let (folder, pattern, mapping) = config.triples().next().unwrap();
//! assert_eq!((folder, pattern), ("exports", "transfers_*.parquet"));
//! assert_eq!(mapping.nodes[0].0, "ADDR");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::error::Category;
use serde_json::Value as JsonValue;

use crate::error::{ExtractionError, ExtractionResult};

/// Key column of every node table.
pub const NODE_ID: &str = "id";
/// Source endpoint column of every edge table.
pub const EDGE_SOURCE: &str = "source";
/// Target endpoint column of every edge table.
pub const EDGE_TARGET: &str = "target";

const NODE_KEY: &[&str] = &[NODE_ID];
const EDGE_KEY: &[&str] = &[EDGE_SOURCE, EDGE_TARGET];

/// Ordered mapping from output attribute name to source column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<(String, String)>,
}

impl AttributeMap {
    /// An empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(output name, source column)` pairs, validating them.
    pub fn from_pairs<I, K, V>(pairs: I) -> ExtractionResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        };
        map.validate()?;
        Ok(map)
    }

    /// Iterate `(output name, source column)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate source column names in order.
    pub fn source_columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys and values must be non-empty; output names must be unique.
    pub fn validate(&self) -> ExtractionResult<()> {
        for (i, (out, src)) in self.entries.iter().enumerate() {
            if out.is_empty() {
                return Err(ExtractionError::validation(format!(
                    "attribute name must be a non-empty string (source column '{src}')"
                )));
            }
            if src.is_empty() {
                return Err(ExtractionError::validation(format!(
                    "attribute '{out}' must map to a non-empty source column"
                )));
            }
            if self.entries[..i].iter().any(|(prev, _)| prev == out) {
                return Err(ExtractionError::validation(format!(
                    "attribute '{out}' is declared more than once"
                )));
            }
        }
        Ok(())
    }

    fn reject_reserved(&self, reserved: &[&str]) -> ExtractionResult<()> {
        match self.entries.iter().find(|(out, _)| reserved.contains(&out.as_str())) {
            Some((out, _)) => Err(ExtractionError::validation(format!(
                "attribute name '{out}' collides with a key column"
            ))),
            None => Ok(()),
        }
    }
}

/// Attribute objects keep document order; entries are validated when a mapping is built.
impl<'de> Deserialize<'de> for AttributeMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Ordered(entries) = Ordered::<String>::deserialize(deserializer)?;
        Ok(Self { entries })
    }
}

impl fmt::Display for AttributeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (out, src)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{out}: {src}")?;
        }
        f.write_str("}")
    }
}

/// Derives one node-table row per source row: an identifier column plus attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMapping {
    /// Source column that becomes `id`.
    pub id_column: String,
    pub attributes: AttributeMap,
}

impl NodeMapping {
    /// Create and validate a node mapping.
    pub fn new(id_column: impl Into<String>, attributes: AttributeMap) -> ExtractionResult<Self> {
        let mapping = Self {
            id_column: id_column.into(),
            attributes,
        };
        mapping.validate()?;
        Ok(mapping)
    }

    pub fn validate(&self) -> ExtractionResult<()> {
        if self.id_column.is_empty() {
            return Err(ExtractionError::validation(
                "node mapping 'id' must be a non-empty column name",
            ));
        }
        self.attributes.validate()?;
        self.attributes.reject_reserved(NODE_KEY)
    }

    /// `[id_column] + attribute source columns`.
    pub fn required_columns(&self) -> Vec<&str> {
        std::iter::once(self.id_column.as_str())
            .chain(self.attributes.source_columns())
            .collect()
    }

}

/// Derives one edge-table row per source row: endpoints plus attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMapping {
    /// Source column that becomes `source`.
    pub source_column: String,
    /// Source column that becomes `target`.
    pub target_column: String,
    pub attributes: AttributeMap,
}

impl EdgeMapping {
    /// Create and validate an edge mapping.
    pub fn new(
        source_column: impl Into<String>,
        target_column: impl Into<String>,
        attributes: AttributeMap,
    ) -> ExtractionResult<Self> {
        let mapping = Self {
            source_column: source_column.into(),
            target_column: target_column.into(),
            attributes,
        };
        mapping.validate()?;
        Ok(mapping)
    }

    pub fn validate(&self) -> ExtractionResult<()> {
        if self.source_column.is_empty() || self.target_column.is_empty() {
            return Err(ExtractionError::validation(
                "edge mapping 'source' and 'target' must be non-empty column names",
            ));
        }
        self.attributes.validate()?;
        self.attributes.reject_reserved(EDGE_KEY)
    }

    /// `[source_column, target_column] + attribute source columns`.
    pub fn required_columns(&self) -> Vec<&str> {
        [self.source_column.as_str(), self.target_column.as_str()]
            .into_iter()
            .chain(self.attributes.source_columns())
            .collect()
    }

}

/// Which side of the graph a mapping produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingKind {
    Node,
    Edge,
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MappingKind::Node => "node",
            MappingKind::Edge => "edge",
        })
    }
}

/// A node or edge mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnMapping {
    Node(NodeMapping),
    Edge(EdgeMapping),
}

impl ColumnMapping {
    pub fn kind(&self) -> MappingKind {
        match self {
            ColumnMapping::Node(_) => MappingKind::Node,
            ColumnMapping::Edge(_) => MappingKind::Edge,
        }
    }

    pub fn validate(&self) -> ExtractionResult<()> {
        match self {
            ColumnMapping::Node(m) => m.validate(),
            ColumnMapping::Edge(m) => m.validate(),
        }
    }

    /// Source columns this mapping reads, in projection order.
    pub fn required_columns(&self) -> Vec<&str> {
        match self {
            ColumnMapping::Node(m) => m.required_columns(),
            ColumnMapping::Edge(m) => m.required_columns(),
        }
    }

    /// Output columns that identify a row: `id`, or `source` + `target`.
    pub fn key_columns(&self) -> &'static [&'static str] {
        match self {
            ColumnMapping::Node(_) => NODE_KEY,
            ColumnMapping::Edge(_) => EDGE_KEY,
        }
    }

    pub fn attributes(&self) -> &AttributeMap {
        match self {
            ColumnMapping::Node(m) => &m.attributes,
            ColumnMapping::Edge(m) => &m.attributes,
        }
    }
}

impl From<NodeMapping> for ColumnMapping {
    fn from(m: NodeMapping) -> Self {
        ColumnMapping::Node(m)
    }
}

impl From<EdgeMapping> for ColumnMapping {
    fn from(m: EdgeMapping) -> Self {
        ColumnMapping::Edge(m)
    }
}

impl fmt::Display for ColumnMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnMapping::Node(m) => {
                write!(f, "node(id={}, attributes={})", m.id_column, m.attributes)
            }
            ColumnMapping::Edge(m) => write!(
                f,
                "edge(source={}, target={}, attributes={})",
                m.source_column, m.target_column, m.attributes
            ),
        }
    }
}

/// Node and edge mappings for one source-file schema, keyed by label in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMapping {
    pub nodes: Vec<(String, Vec<NodeMapping>)>,
    pub edges: Vec<(String, Vec<EdgeMapping>)>,
}

impl FileMapping {
    /// Every `(label, mapping)` pair: all node labels first, then all edge labels.
    pub fn column_mappings(&self) -> impl Iterator<Item = (&str, ColumnMapping)> + '_ {
        let nodes = self.nodes.iter().flat_map(|(label, mappings)| {
            mappings
                .iter()
                .map(move |m| (label.as_str(), ColumnMapping::Node(m.clone())))
        });
        let edges = self.edges.iter().flat_map(|(label, mappings)| {
            mappings
                .iter()
                .map(move |m| (label.as_str(), ColumnMapping::Edge(m.clone())))
        });
        nodes.chain(edges)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|(_, m)| m.is_empty()) && self.edges.iter().all(|(_, m)| m.is_empty())
    }

}

/// File-glob pattern (relative to its folder) and the mapping applied to every match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMapping {
    pub pattern: String,
    pub mapping: FileMapping,
}

/// All patterns configured for one source folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderMapping {
    pub folder: String,
    pub patterns: Vec<PatternMapping>,
}

/// Parsed run configuration: folder -> file pattern -> [`FileMapping`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub folders: Vec<FolderMapping>,
}

impl Config {
    pub fn new(folders: Vec<FolderMapping>) -> Self {
        Self { folders }
    }

    /// Parse a configuration document.
    ///
    /// Repeated folder or pattern keys are kept as separate entries, in document order.
    pub fn from_json_str(input: &str) -> ExtractionResult<Self> {
        let raw: RawConfig = serde_json::from_str(input).map_err(invalid_config)?;
        raw.into_config()
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> ExtractionResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Every `(folder, pattern, mapping)` triple in document order.
    pub fn triples(&self) -> impl Iterator<Item = (&str, &str, &FileMapping)> {
        self.folders.iter().flat_map(|f| {
            f.patterns
                .iter()
                .map(move |p| (f.folder.as_str(), p.pattern.as_str(), &p.mapping))
        })
    }
}

impl TryFrom<&JsonValue> for Config {
    type Error = ExtractionError;

    fn try_from(value: &JsonValue) -> ExtractionResult<Self> {
        RawConfig::deserialize(value).map_err(invalid_config)?.into_config()
    }
}

/// Labels name output files, so they must be usable as a single path component.
pub fn validate_label(label: &str) -> ExtractionResult<()> {
    if label.is_empty() || label == "." || label == ".." || label.contains(['/', '\\']) {
        return Err(ExtractionError::validation(format!(
            "label '{label}' must be a non-empty file name without path separators"
        )));
    }
    Ok(())
}

/// Shape errors in an otherwise well-formed document are configuration errors.
fn invalid_config(err: serde_json::Error) -> ExtractionError {
    match err.classify() {
        Category::Data => ExtractionError::validation(err.to_string()),
        _ => ExtractionError::Json(err),
    }
}

fn in_context(context: &str) -> impl Fn(ExtractionError) -> ExtractionError + '_ {
    move |e| match e {
        ExtractionError::Validation { message } => {
            ExtractionError::validation(format!("{context}: {message}"))
        }
        other => other,
    }
}

#[derive(Deserialize)]
#[serde(transparent)]
struct RawConfig(Ordered<Ordered<RawFileMapping>>);

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFileMapping {
    #[serde(default)]
    nodes: Ordered<OneOrMany<RawNodeMapping>>,
    #[serde(default)]
    edges: Ordered<OneOrMany<RawEdgeMapping>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNodeMapping {
    id: String,
    #[serde(default)]
    attributes: AttributeMap,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEdgeMapping {
    source: String,
    target: String,
    #[serde(default)]
    attributes: AttributeMap,
}

impl RawConfig {
    fn into_config(self) -> ExtractionResult<Config> {
        let Ordered(folders) = self.0;
        let mut out = Vec::with_capacity(folders.len());
        for (folder, Ordered(patterns)) in folders {
            let mut mapped = Vec::with_capacity(patterns.len());
            for (pattern, raw) in patterns {
                if pattern.is_empty() {
                    return Err(ExtractionError::validation(format!(
                        "{folder}: file pattern must be non-empty"
                    )));
                }
                let context = format!("{folder}/{pattern}");
                let mapping = FileMapping {
                    nodes: labelled(raw.nodes, &format!("{context} nodes"), |m| {
                        NodeMapping::new(m.id, m.attributes)
                    })?,
                    edges: labelled(raw.edges, &format!("{context} edges"), |m| {
                        EdgeMapping::new(m.source, m.target, m.attributes)
                    })?,
                };
                mapped.push(PatternMapping { pattern, mapping });
            }
            out.push(FolderMapping {
                folder,
                patterns: mapped,
            });
        }
        Ok(Config::new(out))
    }
}

fn labelled<R, T>(
    Ordered(labels): Ordered<OneOrMany<R>>,
    context: &str,
    build: impl Fn(R) -> ExtractionResult<T>,
) -> ExtractionResult<Vec<(String, Vec<T>)>> {
    let mut out = Vec::with_capacity(labels.len());
    for (label, mappings) in labels {
        let context = format!("{context}.{label}");
        validate_label(&label).map_err(in_context(&context))?;
        let built = mappings
            .into_vec()
            .into_iter()
            .map(|m| build(m).map_err(in_context(&context)))
            .collect::<ExtractionResult<Vec<_>>>()?;
        out.push((label, built));
    }
    Ok(out)
}

/// Object entries in document order, repeated keys included.
struct Ordered<T>(Vec<(String, T)>);

impl<T> Default for Ordered<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Ordered<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
            type Value = Ordered<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a json object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, T>()? {
                    entries.push(entry);
                }
                Ok(Ordered(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

/// A label's value: one mapping object or a list of them.
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(v) => v,
        }
    }
}

// Dispatching on the json shape keeps serde's field-level errors, which an untagged enum
// would collapse into "did not match any variant".
impl<'de, T: Deserialize<'de>> Deserialize<'de> for OneOrMany<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OneOrManyVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OneOrManyVisitor<T> {
            type Value = OneOrMany<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping object or a list of them")
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                T::deserialize(MapAccessDeserializer::new(map)).map(OneOrMany::One)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
                Vec::<T>::deserialize(SeqAccessDeserializer::new(seq)).map(OneOrMany::Many)
            }
        }

        deserializer.deserialize_any(OneOrManyVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::{AttributeMap, ColumnMapping, Config, EdgeMapping, FileMapping, MappingKind, NodeMapping};
    use crate::error::ExtractionError;

    fn attrs(pairs: &[(&str, &str)]) -> AttributeMap {
        AttributeMap::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn parses_single_object_labels() {
        let raw = serde_json::json!({
            "bq_exports": {
                "output_*.json": {
                    "nodes": { "ADDR": { "id": "id", "attributes": { "name": "name", "type": "type" } } },
                    "edges": { "OWNS": { "source": "source", "target": "target", "attributes": { "type": "type" } } }
                }
            }
        });

        let config = Config::try_from(&raw).unwrap();

        let expected = FileMapping {
            nodes: vec![(
                "ADDR".to_string(),
                vec![NodeMapping::new("id", attrs(&[("name", "name"), ("type", "type")])).unwrap()],
            )],
            edges: vec![(
                "OWNS".to_string(),
                vec![EdgeMapping::new("source", "target", attrs(&[("type", "type")])).unwrap()],
            )],
        };
        let triples: Vec<_> = config.triples().collect();
        assert_eq!(triples, vec![("bq_exports", "output_*.json", &expected)]);
    }

    #[test]
    fn keeps_document_order_and_multiple_mappings_per_label() {
        let config = Config::from_json_str(
            r#"{
                "zeta": { "b_*.parquet": { "nodes": { "ADDR": [
                    { "id": "from_address" },
                    { "id": "to_address", "attributes": { "address": "to_address" } }
                ] } } },
                "alpha": { "a_*.parquet": {} }
            }"#,
        )
        .unwrap();

        let folders: Vec<&str> = config.folders.iter().map(|f| f.folder.as_str()).collect();
        assert_eq!(folders, vec!["zeta", "alpha"]);

        let mapping = &config.folders[0].patterns[0].mapping;
        let labels: Vec<(&str, String)> = mapping
            .column_mappings()
            .map(|(label, m)| (label, m.required_columns().join(",")))
            .collect();
        assert_eq!(
            labels,
            vec![("ADDR", "from_address".to_string()), ("ADDR", "to_address,to_address".to_string())]
        );
        assert!(config.folders[1].patterns[0].mapping.is_empty());
    }

    #[test]
    fn node_labels_come_before_edge_labels() {
        let config = Config::from_json_str(
            r#"{ "f": { "*.csv": {
                "edges": { "OWNS": { "source": "s", "target": "t" } },
                "nodes": { "ADDR": { "id": "s" } }
            } } }"#,
        )
        .unwrap();
        let kinds: Vec<MappingKind> = config.folders[0].patterns[0]
            .mapping
            .column_mappings()
            .map(|(_, m)| m.kind())
            .collect();
        assert_eq!(kinds, vec![MappingKind::Node, MappingKind::Edge]);
    }

    #[test]
    fn rejects_non_string_attribute_values() {
        let err = Config::from_json_str(
            r#"{ "f": { "*.csv": { "nodes": { "ADDR": { "id": "a", "attributes": { "n": 3 } } } } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ExtractionError::Validation { .. }));
        assert!(err.to_string().contains("expected a string"));
    }

    #[test]
    fn rejects_missing_or_empty_key_columns() {
        let missing = Config::from_json_str(r#"{ "f": { "*.csv": { "edges": { "E": { "source": "a" } } } } }"#)
            .unwrap_err();
        assert!(matches!(missing, ExtractionError::Validation { .. }));
        assert!(missing.to_string().contains("missing field `target`"));

        let empty = Config::from_json_str(r#"{ "f": { "*.csv": { "nodes": { "N": { "id": "" } } } } }"#)
            .unwrap_err();
        assert!(matches!(empty, ExtractionError::Validation { .. }));
    }

    #[test]
    fn rejects_attribute_named_like_a_key_column() {
        let err = NodeMapping::new("addr", attrs(&[("id", "other")])).unwrap_err();
        assert!(err.to_string().contains("collides with a key column"));

        let err = EdgeMapping::new("a", "b", attrs(&[("target", "c")])).unwrap_err();
        assert!(matches!(err, ExtractionError::Validation { .. }));
    }

    #[test]
    fn rejects_labels_that_are_not_file_names() {
        let err = Config::from_json_str(r#"{ "f": { "*.csv": { "nodes": { "../ADDR": { "id": "a" } } } } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("without path separators"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = Config::from_json_str(r#"{ "f": { "*.csv": { "vertices": {} } } }"#).unwrap_err();
        assert!(err.to_string().contains("unknown field `vertices`"));
    }

    #[test]
    fn repeated_folder_keys_stay_separate() {
        let config = Config::from_json_str(
            r#"{ "f": { "a.csv": {} }, "g": { "b.csv": {} }, "f": { "c.csv": {} } }"#,
        )
        .unwrap();
        let triples: Vec<(&str, &str)> = config.triples().map(|(f, p, _)| (f, p)).collect();
        assert_eq!(triples, vec![("f", "a.csv"), ("g", "b.csv"), ("f", "c.csv")]);
    }

    #[test]
    fn malformed_documents_are_json_errors() {
        let err = Config::from_json_str(r#"{ "f": "#).unwrap_err();
        assert!(matches!(err, ExtractionError::Json(_)));

        let err = Config::from_json_str(r#"{ "f": { "*.csv": { "nodes": { "N": "id" } } } }"#).unwrap_err();
        assert!(err.to_string().contains("a mapping object or a list of them"));
    }

    #[test]
    fn required_columns_lists_keys_then_attributes() {
        let node: ColumnMapping = NodeMapping::new("_address", attrs(&[("address", "_address")]))
            .unwrap()
            .into();
        assert_eq!(node.required_columns(), vec!["_address", "_address"]);
        assert_eq!(node.key_columns(), &["id"]);

        let edge: ColumnMapping = EdgeMapping::new("_source", "_target", attrs(&[("type", "_type")]))
            .unwrap()
            .into();
        assert_eq!(edge.required_columns(), vec!["_source", "_target", "_type"]);
        assert_eq!(edge.key_columns(), &["source", "target"]);
        assert_eq!(edge.to_string(), "edge(source=_source, target=_target, attributes={type: _type})");
    }
}
