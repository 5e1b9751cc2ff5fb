//! Error types for csvtableslib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or querying a table
#[derive(Error, Debug)]
pub enum TableError {
    /// Two headers normalized to the same identifier
    #[error("duplicate column name '{name}' derived from header '{header}'")]
    DuplicateHeader { name: String, header: String },

    /// A data row does not have one field per header
    #[error("row {row} has {found} fields, expected {expected}")]
    RowArity {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A name-based operation on a table built without headers
    #[error("cannot address columns by name on a table without headers")]
    HeaderlessAccess,

    /// A column name or position that does not exist
    #[error("unknown column '{name}'{}", did_you_mean(.suggestion))]
    UnknownColumn {
        name: String,
        suggestion: Option<String>,
    },

    /// Row position out of range
    #[error("row index {index} out of range for table with {len} rows")]
    Index { index: usize, len: usize },

    /// `pop` on a table with no rows
    #[error("cannot pop from an empty table")]
    EmptyTable,

    /// Failed to open a source file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed delimited input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl TableError {
    pub(crate) fn unknown_column(name: impl Into<String>) -> Self {
        TableError::UnknownColumn {
            name: name.into(),
            suggestion: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_column_message_with_suggestion() {
        let err = TableError::UnknownColumn {
            name: "nme".to_string(),
            suggestion: Some("name".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "unknown column 'nme' (did you mean 'name'?)"
        );
    }

    #[test]
    fn test_unknown_column_message_without_suggestion() {
        let err = TableError::unknown_column("zzz");
        assert_eq!(err.to_string(), "unknown column 'zzz'");
    }

    #[test]
    fn test_row_arity_message() {
        let err = TableError::RowArity {
            row: 2,
            expected: 3,
            found: 1,
        };
        assert_eq!(err.to_string(), "row 2 has 1 fields, expected 3");
    }
}
