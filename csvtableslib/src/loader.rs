//! Reading delimited text into a [`Table`].
//!
//! The loader only turns a CSV source into rows of fields; header
//! derivation and arity checks are left to [`Table`] construction, so a
//! ragged file fails with [`TableError::RowArity`] rather than a parser
//! error.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::TableError;
use crate::table::Table;
use crate::value::Value;
use crate::Result;

/// Options for loading a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Treat the first record as the header row
    pub headers: bool,
    /// Field delimiter
    pub delimiter: u8,
    /// Parse data fields into integers, floats and booleans where possible
    pub infer_types: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            headers: true,
            delimiter: b',',
            infer_types: false,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set whether the first record holds headers
    pub fn headers(mut self, headers: bool) -> Self {
        self.headers = headers;
        self
    }

    /// Builder: set the field delimiter
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder: enable or disable type inference for data fields
    pub fn infer_types(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }
}

/// Load a table from a CSV file.
pub fn load_csv(path: impl AsRef<Path>, options: LoadOptions) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| TableError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loading table");
    read_csv(BufReader::new(file), options)
}

/// Load a table from CSV text.
pub fn parse_csv(content: &str, options: LoadOptions) -> Result<Table> {
    read_csv(content.as_bytes(), options)
}

/// Load a table from any reader producing CSV.
pub fn read_csv<R: Read>(reader: R, options: LoadOptions) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false) // Table construction handles the header row
        .flexible(true)
        .from_reader(reader);

    let mut records: Vec<Vec<String>> = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        records.push(record.iter().map(str::to_string).collect());
    }
    debug!(records = records.len(), headers = options.headers, "parsed CSV");

    if !options.infer_types {
        return Table::from_rows(records, options.headers);
    }

    let mut records = records.into_iter();
    if options.headers {
        let headers = records.next().unwrap_or_default();
        Table::with_headers(headers, records.map(infer_row))
    } else {
        Ok(Table::headerless(records.map(infer_row)))
    }
}

fn infer_row(record: Vec<String>) -> Vec<Value> {
    record.iter().map(|field| Value::parse(field)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const PEOPLE: &str = "Name,Age,Home Town\nann,30,York\nbob,7,\"Leeds, West\"\n";

    #[test]
    fn test_load_options_default() {
        let options = LoadOptions::default();
        assert!(options.headers);
        assert_eq!(options.delimiter, b',');
        assert!(!options.infer_types);
    }

    #[test]
    fn test_load_options_builder() {
        let options = LoadOptions::new()
            .headers(false)
            .delimiter(b'\t')
            .infer_types(true);
        assert!(!options.headers);
        assert_eq!(options.delimiter, b'\t');
        assert!(options.infer_types);
    }

    #[test]
    fn test_parse_with_headers() {
        let table = parse_csv(PEOPLE, LoadOptions::default()).unwrap();
        assert_eq!(table.headers().unwrap(), ["name", "age", "home_town"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.row(1).unwrap()["home_town"], Value::from("Leeds, West"));
        assert_eq!(table.row(0).unwrap()["age"], Value::from("30"));
    }

    #[test]
    fn test_parse_without_headers() {
        let table = parse_csv(PEOPLE, LoadOptions::new().headers(false)).unwrap();
        assert!(!table.has_headers());
        assert_eq!(table.len(), 3);
        assert_eq!(table.row(0).unwrap()[0], Value::from("Name"));
    }

    #[test]
    fn test_parse_infers_types() {
        let table = parse_csv(PEOPLE, LoadOptions::new().infer_types(true)).unwrap();
        assert_eq!(table.row(0).unwrap()["age"], Value::from(30));
        assert_eq!(table.row(0).unwrap()["name"], Value::from("ann"));
        // Headers are never inferred
        assert_eq!(table.headers().unwrap()[1], "age");
    }

    #[test]
    fn test_inferred_fields_keep_their_text() {
        let table = parse_csv(
            "price,qty\n1.0,007\n2.5,+5\n3,8\n",
            LoadOptions::new().infer_types(true),
        )
        .unwrap();
        assert_eq!(table.row(0).unwrap()["price"], Value::from("1.0"));
        assert_eq!(table.row(0).unwrap()["qty"], Value::from("007"));
        assert_eq!(table.row(1).unwrap()["price"], Value::from(2.5));
        assert_eq!(table.row(1).unwrap()["qty"], Value::from("+5"));
        assert_eq!(table.row(2).unwrap()["qty"], Value::from(8));

        let matching = table
            .filter(|row| row["price"].to_string() == "1.0")
            .unwrap();
        assert_eq!(matching.len(), 1);
    }

    #[test]
    fn test_parse_custom_delimiter() {
        let table = parse_csv("a;b\n1;2\n", LoadOptions::new().delimiter(b';')).unwrap();
        assert_eq!(table.headers().unwrap(), ["a", "b"]);
        assert_eq!(table.row(0).unwrap()["b"], Value::from("2"));
    }

    #[test]
    fn test_ragged_file_is_arity_error() {
        let err = parse_csv("a,b\n1,2\n3\n", LoadOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            TableError::RowArity {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_ragged_file_without_headers() {
        let table = parse_csv("a,b\n1\n", LoadOptions::new().headers(false)).unwrap();
        assert_eq!(table.row(1).unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_headers_in_file() {
        let err = parse_csv("Name,NAME\n", LoadOptions::default()).unwrap_err();
        assert!(matches!(err, TableError::DuplicateHeader { .. }));
    }

    #[test]
    fn test_empty_source() {
        let table = parse_csv("", LoadOptions::default()).unwrap();
        assert!(table.is_empty());
        let table = parse_csv("", LoadOptions::new().infer_types(true)).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(&path, PEOPLE).unwrap();

        let table = load_csv(&path, LoadOptions::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.column("name").unwrap(),
            [&Value::from("ann"), &Value::from("bob")]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        match load_csv(&path, LoadOptions::default()).unwrap_err() {
            TableError::FileRead { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_csv_error() {
        let bytes: &[u8] = b"a,b\n\xff,1\n";
        let err = read_csv(bytes, LoadOptions::default()).unwrap_err();
        assert!(matches!(err, TableError::Csv(_)));
    }
}
