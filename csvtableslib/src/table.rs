//! The `Table`: rows plus an optional header schema.
//!
//! Operations that change which rows or columns exist (projection, filter,
//! added columns, joins) return a new table rebuilt through the same
//! construction path as a freshly loaded one, so header derivation and arity
//! checks are applied again. Only [`Table::sort`] and [`Table::pop`] change a
//! table in place.
//!
//! ```
//! use csvtableslib::{SortKey, Table, Value};
//!
//! let mut people = Table::new(vec![
//!     vec!["Name", "Home Town"],
//!     vec!["bob", "Leeds"],
//!     vec!["ann", "York"],
//! ])
//! .unwrap();
//!
//! people.sort(SortKey::from("name")).unwrap();
//! assert_eq!(people.column("name").unwrap(), [&Value::from("ann"), &Value::from("bob")]);
//!
//! let towns = people.select(&["home_town"]).unwrap();
//! assert_eq!(towns.headers().unwrap(), ["home_town"]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::TableError;
use crate::format;
use crate::row::{Row, Schema};
use crate::value::Value;
use crate::Result;

/// How to address part of a table through [`Table::index`].
pub enum Selector<'a> {
    /// One row by position
    Position(usize),
    /// One column's values by name
    Name(&'a str),
    /// A sub-table of the named columns, in the given order
    Names(Vec<&'a str>),
    /// A sub-table of the rows the predicate accepts
    Predicate(Box<dyn Fn(&Row) -> bool + 'a>),
}

impl<'a> Selector<'a> {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Row) -> bool + 'a,
    {
        Selector::Predicate(Box::new(f))
    }
}

impl fmt::Debug for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Position(i) => f.debug_tuple("Position").field(i).finish(),
            Selector::Name(n) => f.debug_tuple("Name").field(n).finish(),
            Selector::Names(ns) => f.debug_tuple("Names").field(ns).finish(),
            Selector::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<usize> for Selector<'_> {
    fn from(position: usize) -> Self {
        Selector::Position(position)
    }
}

impl<'a> From<&'a str> for Selector<'a> {
    fn from(name: &'a str) -> Self {
        Selector::Name(name)
    }
}

impl<'a> From<&[&'a str]> for Selector<'a> {
    fn from(names: &[&'a str]) -> Self {
        Selector::Names(names.to_vec())
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for Selector<'a> {
    fn from(names: [&'a str; N]) -> Self {
        Selector::Names(names.to_vec())
    }
}

/// What [`Table::index`] returns, one variant per selector kind.
#[derive(Debug)]
pub enum Selection<'t> {
    Row(&'t Row),
    Column(Vec<&'t Value>),
    Table(Table),
}

impl<'t> Selection<'t> {
    pub fn into_row(self) -> Option<&'t Row> {
        match self {
            Selection::Row(row) => Some(row),
            _ => None,
        }
    }

    pub fn into_column(self) -> Option<Vec<&'t Value>> {
        match self {
            Selection::Column(values) => Some(values),
            _ => None,
        }
    }

    pub fn into_table(self) -> Option<Table> {
        match self {
            Selection::Table(table) => Some(table),
            _ => None,
        }
    }
}

/// Sort order for [`Table::sort`].
#[derive(Default)]
pub enum SortKey<'a> {
    /// Natural order of whole rows
    #[default]
    Natural,
    /// Stable sort on one column by name
    Column(&'a str),
    /// Stable sort on one column by position
    Position(usize),
    /// Caller-supplied ordering of rows
    Comparator(Box<dyn Fn(&Row, &Row) -> Ordering + 'a>),
}

impl<'a> SortKey<'a> {
    pub fn by<F>(f: F) -> Self
    where
        F: Fn(&Row, &Row) -> Ordering + 'a,
    {
        SortKey::Comparator(Box::new(f))
    }
}

impl fmt::Debug for SortKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Natural => f.write_str("Natural"),
            SortKey::Column(n) => f.debug_tuple("Column").field(n).finish(),
            SortKey::Position(i) => f.debug_tuple("Position").field(i).finish(),
            SortKey::Comparator(_) => f.write_str("Comparator(..)"),
        }
    }
}

impl<'a> From<&'a str> for SortKey<'a> {
    fn from(name: &'a str) -> Self {
        SortKey::Column(name)
    }
}

impl From<usize> for SortKey<'_> {
    fn from(position: usize) -> Self {
        SortKey::Position(position)
    }
}

/// An in-memory table.
///
/// `Clone` is a deep copy: rows, values and nested join tables are all
/// duplicated. The header schema is shared, but it is never mutated.
#[derive(Debug, Clone, Default)]
pub struct Table {
    schema: Option<Arc<Schema>>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a headered table: the first row is the header row, the rest
    /// are data rows that must each have one field per header.
    ///
    /// An empty input yields an empty table with no columns.
    pub fn new<I, R, V>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut rows = rows.into_iter();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .into_iter()
                .map(|v| Into::<Value>::into(v).to_string())
                .collect(),
            None => Vec::new(),
        };
        Self::with_headers(headers, rows)
    }

    /// Build a headered table from a header row and separate data rows.
    pub fn with_headers<H, S, I, R, V>(headers: H, rows: I) -> Result<Self>
    where
        H: IntoIterator<Item = S>,
        S: AsRef<str>,
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let schema = Arc::new(Schema::derive(headers)?);
        let expected = schema.len();

        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let values: Vec<Value> = row.into_iter().map(Into::into).collect();
                if values.len() != expected {
                    return Err(TableError::RowArity {
                        row: i,
                        expected,
                        found: values.len(),
                    });
                }
                Ok(Row::new(Some(Arc::clone(&schema)), values))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Table {
            schema: Some(schema),
            rows,
        })
    }

    /// Build a table without headers. Rows are kept as given and may differ
    /// in length.
    pub fn headerless<I, R, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let rows = rows
            .into_iter()
            .map(|row| Row::new(None, row.into_iter().map(Into::into).collect()))
            .collect();
        Table { schema: None, rows }
    }

    /// Build a table, treating the first row as headers when `headers` is
    /// set.
    pub fn from_rows<I, R, V>(rows: I, headers: bool) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if headers {
            Self::new(rows)
        } else {
            Ok(Self::headerless(rows))
        }
    }

    /// Rebuild a headered table from already-derived identifiers.
    fn rebuild<I>(headers: Vec<String>, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<Value>>,
    {
        let table = Self::with_headers(headers, rows)?;
        debug!(
            columns = table.width(),
            rows = table.len(),
            "rebuilt table"
        );
        Ok(table)
    }

    pub fn has_headers(&self) -> bool {
        self.schema.is_some()
    }

    /// Column identifiers, or `None` for a headerless table.
    pub fn headers(&self) -> Option<&[String]> {
        self.schema.as_deref().map(Schema::names)
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_deref()
    }

    /// Number of columns: the header count, or the widest row when headerless.
    pub fn width(&self) -> usize {
        match &self.schema {
            Some(schema) => schema.len(),
            None => self.rows.iter().map(Row::len).max().unwrap_or(0),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// A fresh iterator over the rows; each call starts from the first row.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    fn require_schema(&self) -> Result<&Schema> {
        self.schema.as_deref().ok_or(TableError::HeaderlessAccess)
    }

    fn headers_vec(&self) -> Result<Vec<String>> {
        Ok(self.require_schema()?.names().to_vec())
    }

    /// Row at `index`.
    pub fn row(&self, index: usize) -> Result<&Row> {
        self.rows.get(index).ok_or(TableError::Index {
            index,
            len: self.rows.len(),
        })
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Value>> {
        let pos = self.require_schema()?.resolve(name)?;
        Ok(self.rows.iter().map(|row| &row[pos]).collect())
    }

    /// Project onto the named columns, in the order given.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        let schema = self.require_schema()?;
        let positions = names
            .iter()
            .map(|n| schema.resolve(n.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let headers = positions
            .iter()
            .map(|&p| schema.names()[p].clone())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| positions.iter().map(|&p| row[p].clone()).collect::<Vec<Value>>());

        Self::rebuild(headers, rows)
    }

    /// Keep the rows the predicate accepts, in their original order.
    pub fn filter<F>(&self, predicate: F) -> Result<Table>
    where
        F: Fn(&Row) -> bool,
    {
        let headers = self.headers_vec()?;
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row))
            .map(|row| row.values().to_vec());

        Self::rebuild(headers, rows)
    }

    /// Dispatch on a [`Selector`]: position, name, names or predicate.
    pub fn index<'a>(&self, selector: impl Into<Selector<'a>>) -> Result<Selection<'_>> {
        match selector.into() {
            Selector::Position(i) => self.row(i).map(Selection::Row),
            Selector::Name(name) => self.column(name).map(Selection::Column),
            Selector::Names(names) => self.select(names.as_slice()).map(Selection::Table),
            Selector::Predicate(f) => self.filter(|row| f(row)).map(Selection::Table),
        }
    }

    /// Reorder rows in place.
    ///
    /// Column and position sorts are stable. An unknown column leaves the
    /// table untouched.
    pub fn sort<'a>(&mut self, key: impl Into<SortKey<'a>>) -> Result<()> {
        match key.into() {
            SortKey::Natural => self.rows.sort(),
            SortKey::Column(name) => {
                let pos = self.require_schema()?.resolve(name)?;
                self.rows.sort_by(|a, b| a[pos].cmp(&b[pos]));
            }
            SortKey::Position(pos) => {
                let past_headers = self.schema.as_ref().is_some_and(|s| pos >= s.len());
                if past_headers || self.rows.iter().any(|row| pos >= row.len()) {
                    return Err(TableError::unknown_column(pos.to_string()));
                }
                self.rows.sort_by(|a, b| a[pos].cmp(&b[pos]));
            }
            SortKey::Comparator(cmp) => self.rows.sort_by(|a, b| cmp(a, b)),
        }
        Ok(())
    }

    /// Remove and return the last row.
    pub fn pop(&mut self) -> Result<Row> {
        self.rows.pop().ok_or(TableError::EmptyTable)
    }

    /// Deep copy; see the note on [`Table`].
    pub fn copy(&self) -> Table {
        self.clone()
    }

    /// Append a column computed from each row.
    ///
    /// `name` goes through identifier derivation like any header, so
    /// `"Total Score"` becomes `total_score`.
    pub fn add_column<F, V>(&self, name: &str, f: F) -> Result<Table>
    where
        F: Fn(&Row) -> V,
        V: Into<Value>,
    {
        let mut headers = self.headers_vec()?;
        headers.push(name.to_string());

        let rows: Vec<Vec<Value>> = self
            .rows
            .iter()
            .map(|row| {
                let mut values = row.values().to_vec();
                values.push(f(row).into());
                values
            })
            .collect();

        Self::rebuild(headers, rows)
    }

    /// Grouping join.
    ///
    /// Every row of `self` gains a `join` column holding the sub-table of
    /// `other` rows whose `right` field equals this row's `left` field. The
    /// result has exactly as many rows as `self`.
    pub fn join(&self, other: &Table, join: &str, left: &str, right: &str) -> Result<Table> {
        let l_pos = self.require_schema()?.resolve(left)?;
        let r_pos = other.require_schema()?.resolve(right)?;

        let mut headers = self.headers_vec()?;
        headers.push(join.to_string());

        let rows = self
            .rows
            .iter()
            .map(|row| -> Result<Vec<Value>> {
                let key = &row[l_pos];
                let matches = other.filter(|candidate| candidate[r_pos] == *key)?;
                let mut values = row.values().to_vec();
                values.push(Value::Table(matches));
                Ok(values)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(left, right, rows = rows.len(), "grouping join");
        Self::rebuild(headers, rows)
    }

    /// Write the formatter's rendering of all rows to `out`.
    pub fn pprint<W: Write>(&self, out: &mut W) -> io::Result<()> {
        format::write_rows(out, &self.rows)
    }

    /// Layout of the rows as a grid.
    pub fn grid(&self) -> format::Grid {
        format::Grid::from_rows(&self.rows)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::render_rows(&self.rows))
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.headers() == other.headers() && self.rows == other.rows
    }
}

impl Eq for Table {}

impl Ord for Table {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rows
            .cmp(&other.rows)
            .then_with(|| self.headers().cmp(&other.headers()))
    }
}

impl PartialOrd for Table {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Table", 2)?;
        state.serialize_field("headers", &self.headers())?;
        state.serialize_field("rows", &self.rows)?;
        state.end()
    }
}
