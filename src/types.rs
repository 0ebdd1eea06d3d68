//! Core in-memory table model.
//!
//! Raw source files, extracted node/edge relations and persisted label tables are all
//! represented as a [`DataSet`]: a [`Schema`] (a list of typed [`Field`]s) plus row-major
//! [`Value`] storage.

use std::fmt;

use serde::Serialize;

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string. This is the "untyped" kind when reconciling schemas.
    Utf8,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int64 => "Int64",
            DataType::Float64 => "Float64",
            DataType::Bool => "Bool",
            DataType::Utf8 => "Utf8",
        };
        f.write_str(name)
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// An ordered list of fields describing the shape of a table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns a field by name, if present.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of [`DataType::Utf8`] fields.
    pub fn utf8_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|f| f.data_type == DataType::Utf8)
            .count()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field.name, field.data_type)?;
        }
        f.write_str("}")
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Hashable identity of this value, used for key-based deduplication.
    pub fn key(&self) -> ValueKey {
        match self {
            Value::Null => ValueKey::Null,
            Value::Int64(v) => ValueKey::Int64(*v),
            // Normalize -0.0 so it groups with 0.0.
            Value::Float64(v) if *v == 0.0 => ValueKey::Float64(0.0_f64.to_bits()),
            Value::Float64(v) => ValueKey::Float64(v.to_bits()),
            Value::Bool(v) => ValueKey::Bool(*v),
            Value::Utf8(v) => ValueKey::Utf8(v.clone()),
        }
    }
}

/// Renders the value as plain text; `Null` renders as an empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Utf8(v) => f.write_str(v),
        }
    }
}

/// Hashable, comparable form of a [`Value`] (floats compared by bit pattern).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Null,
    Int64(i64),
    Float64(u64),
    Bool(bool),
    Utf8(String),
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterate the values of one column, or `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let idx = self.schema.index_of(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Clone of the first `n` rows, for diagnostics.
    pub fn head(&self, n: usize) -> Vec<Vec<Value>> {
        self.rows.iter().take(n).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{DataSet, DataType, Field, Schema, Value, ValueKey};

    #[test]
    fn utf8_count_counts_string_fields_only() {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Utf8),
            Field::new("n", DataType::Int64),
            Field::new("name", DataType::Utf8),
        ]);
        assert_eq!(schema.utf8_count(), 2);
        assert_eq!(schema.to_string(), "{id: Utf8, n: Int64, name: Utf8}");
    }

    #[test]
    fn float_keys_treat_signed_zero_as_equal() {
        assert_eq!(Value::Float64(0.0).key(), Value::Float64(-0.0).key());
        assert_ne!(Value::Int64(1).key(), Value::Float64(1.0).key());
        assert_eq!(Value::Null.key(), ValueKey::Null);
    }

    #[test]
    fn display_renders_null_as_empty() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Float64(1.5).to_string(), "1.5");
        assert_eq!(Value::Utf8("Ox000".to_string()).to_string(), "Ox000");
    }

    #[test]
    fn column_iterates_values_by_name() {
        let ds = DataSet::new(
            Schema::new(vec![Field::new("a", DataType::Int64), Field::new("b", DataType::Bool)]),
            vec![
                vec![Value::Int64(1), Value::Bool(true)],
                vec![Value::Int64(2), Value::Null],
            ],
        );
        let b: Vec<&Value> = ds.column("b").unwrap().collect();
        assert_eq!(b, vec![&Value::Bool(true), &Value::Null]);
        assert!(ds.column("missing").is_none());
        assert_eq!(ds.head(1).len(), 1);
    }
}
