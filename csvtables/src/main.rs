//! # csvtables
//!
//! A CLI for loading a CSV file into a table, narrowing it down and printing
//! it as an aligned grid or JSON.
//!
//! ## Usage
//!
//! ```bash
//! # Pretty-print a file
//! csvtables people.csv
//!
//! # Keep two columns, only rows from York, sorted by age (descending)
//! csvtables people.csv --select name,age --where town=York --sort age --reverse
//!
//! # One row as a key/value listing
//! csvtables people.csv --row 0
//!
//! # A column's values, one per line
//! csvtables people.csv --column name
//!
//! # JSON output
//! csvtables people.csv --output json
//! ```
//!
//! Set `RUST_LOG=debug` (or pass `--verbose`) to see what the loader does.

use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use console::style;
use csvtableslib::{load_csv, LoadOptions, Row, SortKey, Table, TableError};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("csvtables")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Load, filter, sort and pretty-print CSV files")
        .arg(Arg::new("file").help("CSV file to load").required(true))
        .arg(
            Arg::new("no-headers")
                .long("no-headers")
                .action(ArgAction::SetTrue)
                .help("Treat the first record as data rather than headers"),
        )
        .arg(
            Arg::new("delimiter")
                .short('d')
                .long("delimiter")
                .default_value(",")
                .help("Field delimiter (a single character, or 'tab')"),
        )
        .arg(
            Arg::new("infer-types")
                .long("infer-types")
                .action(ArgAction::SetTrue)
                .help("Parse numbers and booleans (numeric columns right-align)"),
        )
        .arg(
            Arg::new("select")
                .short('s')
                .long("select")
                .value_delimiter(',')
                .help("Keep only these columns, in this order (comma-separated)"),
        )
        .arg(
            Arg::new("where")
                .short('w')
                .long("where")
                .action(ArgAction::Append)
                .help("Keep rows where COLUMN=VALUE (can be specified multiple times)"),
        )
        .arg(
            Arg::new("sort")
                .long("sort")
                .help("Sort by column name or zero-based position"),
        )
        .arg(
            Arg::new("reverse")
                .short('r')
                .long("reverse")
                .action(ArgAction::SetTrue)
                .requires("sort")
                .help("Sort in descending order"),
        )
        .arg(
            Arg::new("row")
                .long("row")
                .value_parser(clap::value_parser!(usize))
                .conflicts_with("column")
                .help("Print a single row as a key/value listing"),
        )
        .arg(
            Arg::new("column")
                .long("column")
                .help("Print one column's values, one per line"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["table", "json"])
                .default_value("table")
                .help("Output format"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log debug information to stderr"),
        )
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_delimiter(raw: &str) -> anyhow::Result<u8> {
    match raw {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ if raw.len() == 1 && raw.is_ascii() => Ok(raw.as_bytes()[0]),
        _ => Err(anyhow!(
            "Invalid delimiter '{raw}'. Use a single ASCII character or 'tab'"
        )),
    }
}

fn parse_condition(expr: &str) -> anyhow::Result<(&str, &str)> {
    expr.split_once('=')
        .filter(|(column, _)| !column.is_empty())
        .ok_or_else(|| anyhow!("Invalid filter '{expr}'. Use 'column=value'"))
}

/// Build load options from matches
fn load_options(matches: &ArgMatches) -> anyhow::Result<LoadOptions> {
    let delimiter = matches
        .get_one::<String>("delimiter")
        .map(|s| s.as_str())
        .unwrap_or(",");

    Ok(LoadOptions::new()
        .headers(!matches.get_flag("no-headers"))
        .delimiter(parse_delimiter(delimiter)?)
        .infer_types(matches.get_flag("infer-types")))
}

/// Keep rows whose field displays as the given text
fn apply_condition(table: &Table, column: &str, expected: &str) -> anyhow::Result<Table> {
    // Resolve the column up front so a typo is an error rather than no rows
    let position = table
        .schema()
        .ok_or(TableError::HeaderlessAccess)?
        .resolve(column)?;
    let filtered = table.filter(|row| row[position].to_string() == expected)?;
    debug!(column, expected, kept = filtered.len(), "applied filter");
    Ok(filtered)
}

fn sort_table(table: &mut Table, key: &str, reverse: bool) -> anyhow::Result<()> {
    let position = match key.parse::<usize>() {
        Ok(position) => position,
        Err(_) => table
            .schema()
            .ok_or(TableError::HeaderlessAccess)?
            .resolve(key)?,
    };

    if !reverse {
        table.sort(position)?;
        return Ok(());
    }

    // The comparator indexes rows directly, so check the position first
    let past_headers = table.headers().is_some_and(|h| position >= h.len());
    if past_headers || table.iter().any(|row| row.at(position).is_none()) {
        return Err(TableError::UnknownColumn {
            name: key.to_string(),
            suggestion: None,
        }
        .into());
    }
    table.sort(SortKey::by(move |a, b| b[position].cmp(&a[position])))?;
    Ok(())
}

/// A row as a JSON object keyed by field name, or an array when headerless
fn row_json(row: &Row) -> serde_json::Result<serde_json::Value> {
    let Some(fields) = row.fields() else {
        return serde_json::to_value(row);
    };
    let object = fields
        .iter()
        .zip(row.iter())
        .map(|(name, value)| serde_json::to_value(value).map(|v| (name.clone(), v)))
        .collect::<serde_json::Result<serde_json::Map<_, _>>>()?;
    Ok(serde_json::Value::Object(object))
}

/// Load the table and apply the requested operations, returning the text to print
fn run(matches: &ArgMatches) -> anyhow::Result<String> {
    let path = matches
        .get_one::<String>("file")
        .map(|s| s.as_str())
        .unwrap_or_default();
    let options = load_options(matches)?;
    let json = matches
        .get_one::<String>("output")
        .is_some_and(|s| s == "json");

    let mut table =
        load_csv(path, options).with_context(|| format!("could not load '{path}'"))?;

    if let Some(columns) = matches.get_many::<String>("select") {
        let columns: Vec<&str> = columns.map(|s| s.as_str()).collect();
        table = table.select(columns.as_slice())?;
    }

    if let Some(conditions) = matches.get_many::<String>("where") {
        for expr in conditions {
            let (column, expected) = parse_condition(expr)?;
            table = apply_condition(&table, column, expected)?;
        }
    }

    if let Some(key) = matches.get_one::<String>("sort") {
        sort_table(&mut table, key, matches.get_flag("reverse"))?;
    }

    if let Some(&index) = matches.get_one::<usize>("row") {
        let row = table.row(index)?;
        return Ok(if json {
            serde_json::to_string_pretty(&row_json(row)?)?
        } else {
            row.pretty()
        });
    }

    if let Some(name) = matches.get_one::<String>("column") {
        let values = table.column(name)?;
        return Ok(if json {
            serde_json::to_string_pretty(&values)?
        } else {
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        });
    }

    if json {
        Ok(serde_json::to_string_pretty(&table)?)
    } else {
        Ok(table.to_string())
    }
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {e:#}", style("Error:").for_stderr().red().bold());
            ExitCode::FAILURE
        }
    }
}
