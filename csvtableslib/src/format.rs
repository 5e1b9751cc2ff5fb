//! Fixed-width text rendering for rows.
//!
//! Several rows render as an aligned grid:
//!
//! ```text
//! name | score
//! -----+------
//! ann  |    10
//! bob  |     5
//! ```
//!
//! A single row renders as a `label = value` listing, and no rows render as
//! nothing at all.
//!
//! [`Grid`] is the layout computed for a set of rows: labels, column widths,
//! alignment and cell strings. It is recomputed on every call.

use std::io::{self, Write};

use serde::Serialize;

use crate::row::Row;

const CELL_SEPARATOR: &str = " | ";
const RULE_SEPARATOR: &str = "-+-";

/// Layout for rendering several rows as a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    /// Column labels (identifiers, or positions for headerless rows)
    headers: Vec<String>,
    /// Display width of each column
    widths: Vec<usize>,
    /// Columns whose first-row value is an integer are right-aligned
    right_align: Vec<bool>,
    /// Cell display strings, one vector per row
    cells: Vec<Vec<String>>,
}

impl Grid {
    /// Compute the layout for `rows`.
    ///
    /// Labels come from the first row's fields; headerless rows are labelled
    /// by position and short rows are padded with empty cells.
    pub fn from_rows(rows: &[Row]) -> Self {
        let headers = column_labels(rows);
        let columns = headers.len();

        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                (0..columns)
                    .map(|i| row.at(i).map(|v| v.to_string()).unwrap_or_default())
                    .collect()
            })
            .collect();

        let widths = (0..columns)
            .map(|i| {
                cells
                    .iter()
                    .map(|line| display_width(&line[i]))
                    .chain(std::iter::once(display_width(&headers[i])))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let right_align = (0..columns)
            .map(|i| {
                rows.first()
                    .and_then(|row| row.at(i))
                    .is_some_and(|v| v.is_int())
            })
            .collect();

        Grid {
            headers,
            widths,
            right_align,
            cells,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    pub fn right_align(&self) -> &[bool] {
        &self.right_align
    }

    pub fn cells(&self) -> &[Vec<String>] {
        &self.cells
    }

    pub fn header_line(&self) -> String {
        self.headers
            .iter()
            .zip(&self.widths)
            .map(|(h, w)| pad_right(h, *w))
            .collect::<Vec<_>>()
            .join(CELL_SEPARATOR)
    }

    pub fn rule_line(&self) -> String {
        self.widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join(RULE_SEPARATOR)
    }

    pub fn data_lines(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|line| {
                line.iter()
                    .zip(self.widths.iter().zip(&self.right_align))
                    .map(|(cell, (&width, &right))| {
                        if right {
                            pad_left(cell, width)
                        } else {
                            pad_right(cell, width)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(CELL_SEPARATOR)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let mut lines = vec![self.header_line(), self.rule_line()];
        lines.extend(self.data_lines());
        lines.join("\n")
    }
}

fn column_labels(rows: &[Row]) -> Vec<String> {
    match rows.first().and_then(Row::fields) {
        Some(fields) => fields.to_vec(),
        None => {
            let columns = rows.iter().map(Row::len).max().unwrap_or(0);
            (0..columns).map(|i| i.to_string()).collect()
        }
    }
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}

fn pad_right(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}

fn pad_left(s: &str, width: usize) -> String {
    format!("{s:>width$}")
}

/// Render rows: a grid for several, a listing for one, nothing for none.
pub fn render_rows(rows: &[Row]) -> String {
    match rows {
        [] => String::new(),
        [row] => render_row(row),
        _ => Grid::from_rows(rows).render(),
    }
}

/// Render a single row as one `label = value` line per field.
pub fn render_row(row: &Row) -> String {
    let labels: Vec<String> = match row.fields() {
        Some(fields) => fields.to_vec(),
        None => (0..row.len()).map(|i| i.to_string()).collect(),
    };
    let width = labels.iter().map(|l| display_width(l)).max().unwrap_or(0);

    labels
        .iter()
        .zip(row.iter())
        .map(|(label, value)| format!("{} = {}", pad_left(label, width), value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write [`render_rows`] output followed by a newline; writes nothing for
/// an empty slice.
pub fn write_rows<W: Write>(out: &mut W, rows: &[Row]) -> io::Result<()> {
    let text = render_rows(rows);
    if !text.is_empty() {
        writeln!(out, "{text}")?;
    }
    Ok(())
}
