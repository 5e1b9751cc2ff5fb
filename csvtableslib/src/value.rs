//! Cell values.
//!
//! Values loaded from CSV start out as [`Value::Text`]. Derived columns can
//! hold native values (integers, floats, booleans), and a join produces a
//! nested [`Value::Table`] per row.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::table::Table;

/// A single cell.
#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Sub-table produced by a grouping join
    Table(Table),
}

impl Value {
    /// Parse a raw field, recognizing integers, floats and booleans.
    ///
    /// A field is only converted when the converted value displays exactly
    /// as the (trimmed) field did, so `007`, `+5` or `1.0` stay text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            if n.to_string() == trimmed {
                return Value::Int(n);
            }
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() && f.to_string() == trimmed {
                return Value::Float(f);
            }
        }
        match trimmed {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Text(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Whether the formatter right-aligns this value.
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Rank used to order values of different kinds.
    fn kind_rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) | Value::Float(_) => 1,
            Value::Text(_) => 2,
            Value::Table(_) => 3,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Table(t) => write!(f, "<table: {} rows>", t.len()),
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            // Mixed numbers compare numerically; ints sort first on a tie so
            // that Int(1) and Float(1.0) never compare Equal.
            (Value::Int(a), Value::Float(b)) => {
                (*a as f64).total_cmp(b).then(Ordering::Less)
            }
            (Value::Float(a), Value::Int(b)) => {
                a.total_cmp(&(*b as f64)).then(Ordering::Greater)
            }
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Table(a), Value::Table(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Text(s) => serializer.serialize_str(s),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Table(t) => t.serialize(serializer),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Value::Table(t)
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Value::parse("42"), Value::Int(42));
        assert_eq!(Value::parse(" -7 "), Value::Int(-7));
        assert_eq!(Value::parse("2.5"), Value::Float(2.5));
        assert_eq!(Value::parse("true"), Value::Bool(true));
        assert_eq!(Value::parse("false"), Value::Bool(false));
        assert_eq!(Value::parse("ann"), Value::Text("ann".to_string()));
        assert_eq!(Value::parse("inf"), Value::Text("inf".to_string()));
        assert_eq!(Value::parse(""), Value::Text(String::new()));
    }

    #[test]
    fn test_parse_keeps_text_that_would_display_differently() {
        for raw in ["007", "+5", "1.0", "2.50", "1e3", "-0", "False", "TRUE"] {
            assert_eq!(Value::parse(raw), Value::Text(raw.to_string()), "{raw}");
        }
        assert_eq!(Value::parse("0.1"), Value::Float(0.1));
    }

    #[test]
    fn test_accessors() {
        let text = Value::from("ann");
        assert_eq!(text.as_str(), Some("ann"));
        assert_eq!(text.as_int(), None);
        assert_eq!(text.as_float(), None);
        assert_eq!(text.as_bool(), None);
        assert!(text.as_table().is_none());

        assert_eq!(Value::from(3).as_int(), Some(3));
        assert_eq!(Value::from(3).as_float(), Some(3.0));
        assert_eq!(Value::from(2.5).as_float(), Some(2.5));
        assert_eq!(Value::from(2.5).as_int(), None);
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(true).as_str(), None);
        assert!(Value::from(3).is_int());
        assert!(!Value::from(2.5).is_int());

        let nested = Value::from(Table::headerless(vec![vec!["x"]]));
        assert_eq!(nested.as_table().map(Table::len), Some(1));
    }

    #[test]
    fn test_text_and_int_differ() {
        assert_ne!(Value::from("1"), Value::from(1));
    }

    #[test]
    fn test_ordering_within_kind() {
        assert!(Value::from("apple") < Value::from("banana"));
        assert!(Value::from(2) < Value::from(10));
        // Text compares lexicographically
        assert!(Value::from("10") < Value::from("2"));
    }

    #[test]
    fn test_ordering_across_kinds() {
        assert!(Value::from(true) < Value::from(0));
        assert!(Value::from(1_000_000) < Value::from("a"));
        assert!(Value::from(1.5) < Value::from(2));
        assert!(Value::from(1) < Value::from(1.0));
        assert_ne!(Value::from(1), Value::from(1.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("x").to_string(), "x");
        assert_eq!(Value::from(-3).to_string(), "-3");
        assert_eq!(Value::from(0.5).to_string(), "0.5");
        assert_eq!(Value::from(false).to_string(), "false");
        assert_eq!(
            Value::from(Table::headerless(Vec::<Vec<Value>>::new())).to_string(),
            "<table: 0 rows>"
        );
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&vec![
            Value::from("a"),
            Value::from(1),
            Value::from(true),
        ])
        .unwrap();
        assert_eq!(json, r#"["a",1,true]"#);
    }
}
