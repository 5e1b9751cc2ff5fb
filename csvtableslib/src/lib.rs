//! # csvtableslib
//!
//! In-memory tables loaded from CSV, with safe column identifiers, a small
//! relational algebra and a fixed-width text formatter.
//!
//! ## Overview
//!
//! A [`Table`] holds rows of [`Value`]s. When the source has a header row,
//! each header is turned into an identifier (`"Home Town"` → `home_town`,
//! `"2nd"` → `_2nd`) and rows can be addressed by field name.
//!
//! - **Projection**: [`Table::select`] keeps named columns
//! - **Filtering**: [`Table::filter`] keeps rows matching a predicate
//! - **Derived columns**: [`Table::add_column`] appends a computed column
//! - **Grouping join**: [`Table::join`] attaches, to every row, the sub-table
//!   of matching rows from another table
//! - **Sorting**: [`Table::sort`] by column, position, comparator or whole row
//! - **Formatting**: [`Table::pprint`] renders an aligned grid
//!
//! Operations other than `sort` and `pop` return new tables, so they chain.
//!
//! ## Example
//!
//! ```rust
//! use csvtableslib::{parse_csv, LoadOptions, Value};
//!
//! let orders = parse_csv(
//!     "Order Id,Customer\n1,ann\n2,bob\n3,ann\n",
//!     LoadOptions::default(),
//! )
//! .unwrap();
//! let customers = parse_csv("Name,City\nann,York\nbob,Leeds\n", LoadOptions::default()).unwrap();
//!
//! let grouped = customers.join(&orders, "orders", "name", "customer").unwrap();
//! let ann = grouped.row(0).unwrap();
//! assert_eq!(ann["orders"].as_table().unwrap().len(), 2);
//!
//! let mut out = Vec::new();
//! customers.pprint(&mut out).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "name | city \n-----+------\nann  | York \nbob  | Leeds\n"
//! );
//! ```

pub mod error;
pub mod format;
pub mod ident;
pub mod loader;
pub mod row;
pub mod table;
pub mod value;

pub use error::TableError;
pub use format::{render_row, render_rows, write_rows, Grid};
pub use ident::{make_identifier, make_identifiers};
pub use loader::{load_csv, parse_csv, read_csv, LoadOptions};
pub use row::{Row, Schema};
pub use table::{Selection, Selector, SortKey, Table};
pub use value::Value;

/// Result type for csvtableslib operations
pub type Result<T> = std::result::Result<T, TableError>;
