//! Rows and the header schema they share.
//!
//! A [`Schema`] is built once per distinct header set and shared by every
//! row of a table through an `Arc`. Field lookup by name goes through the
//! schema's name-to-position map.

use std::collections::HashMap;
use std::ops::Index;
use std::sync::Arc;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::error::TableError;
use crate::ident::{make_identifiers, suggest};
use crate::value::Value;
use crate::Result;

/// Ordered, unique column identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Schema {
    /// Derive a schema from raw header text.
    pub fn derive<I, S>(headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = make_identifiers(headers)?;
        let positions = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Ok(Schema { names, positions })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Like [`Schema::position`], but an unknown name becomes
    /// [`TableError::UnknownColumn`] carrying the closest known name.
    pub fn resolve(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| TableError::UnknownColumn {
                name: name.to_string(),
                suggestion: suggest(name, &self.names),
            })
    }
}

/// One record of a table.
///
/// Equality and ordering look at the values only, so rows from tables with
/// different headers compare like plain tuples.
#[derive(Debug, Clone)]
pub struct Row {
    schema: Option<Arc<Schema>>,
    values: Vec<Value>,
}

impl Row {
    pub(crate) fn new(schema: Option<Arc<Schema>>, values: Vec<Value>) -> Self {
        Row { schema, values }
    }

    /// Field names, when the row belongs to a headered table.
    pub fn fields(&self) -> Option<&[String]> {
        self.schema.as_deref().map(Schema::names)
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_deref()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn at(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    /// Field by name; `None` for unknown names and headerless rows.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let pos = self.schema.as_ref()?.position(name)?;
        self.values.get(pos)
    }

    /// Field by name, reporting why the lookup failed.
    pub fn field(&self, name: &str) -> Result<&Value> {
        let schema = self.schema.as_ref().ok_or(TableError::HeaderlessAccess)?;
        let pos = schema.resolve(name)?;
        self.values
            .get(pos)
            .ok_or_else(|| TableError::unknown_column(name))
    }

    /// Render this row as a `label = value` listing.
    pub fn pretty(&self) -> String {
        crate::format::render_row(self)
    }
}

impl Index<usize> for Row {
    type Output = Value;

    fn index(&self, position: usize) -> &Value {
        &self.values[position]
    }
}

/// Panics when the name is unknown or the row has no headers.
impl Index<&str> for Row {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        match self.get(name) {
            Some(v) => v,
            None => panic!("no field named '{name}' in row"),
        }
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for Row {}

impl Ord for Row {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.values.cmp(&other.values)
    }
}

impl PartialOrd for Row {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.values.len()))?;
        for value in &self.values {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> Row {
        let schema = Arc::new(Schema::derive(["Name", "Age"]).unwrap());
        Row::new(Some(schema), vec![Value::from("ann"), Value::from(30)])
    }

    #[test]
    fn test_schema_positions() {
        let schema = Schema::derive(["First Name", "Age"]).unwrap();
        assert_eq!(schema.names(), ["first_name", "age"]);
        assert_eq!(schema.position("age"), Some(1));
        assert_eq!(schema.position("Age"), None);
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_schema_resolve_suggests() {
        let schema = Schema::derive(["name", "age"]).unwrap();
        match schema.resolve("nam").unwrap_err() {
            TableError::UnknownColumn { name, suggestion } => {
                assert_eq!(name, "nam");
                assert_eq!(suggestion.as_deref(), Some("name"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_row_named_access() {
        let row = sample_row();
        assert_eq!(row.get("name"), Some(&Value::from("ann")));
        assert_eq!(row["age"], Value::from(30));
        assert_eq!(row[0], Value::from("ann"));
        assert!(row.get("missing").is_none());
        assert_eq!(row.fields().unwrap(), ["name", "age"]);
    }

    #[test]
    fn test_headerless_row_field_errors() {
        let row = Row::new(None, vec![Value::from("x")]);
        assert!(matches!(row.field("x"), Err(TableError::HeaderlessAccess)));
        assert!(row.get("x").is_none());
        assert_eq!(row.at(0), Some(&Value::from("x")));
    }

    #[test]
    fn test_into_values() {
        let values = sample_row().into_values();
        assert_eq!(values, [Value::from("ann"), Value::from(30)]);
    }

    #[test]
    fn test_row_equality_ignores_schema() {
        let plain = Row::new(None, vec![Value::from("ann"), Value::from(30)]);
        assert_eq!(sample_row(), plain);
    }

    #[test]
    #[should_panic(expected = "no field named 'nope'")]
    fn test_index_by_unknown_name_panics() {
        let row = sample_row();
        let _ = &row["nope"];
    }
}
