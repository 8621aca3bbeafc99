//! Tabular input/output.
//!
//! A [`Table`] is a header row plus data rows in file order. Spreadsheet
//! workbooks are read through calamine and written with rust_xlsxwriter;
//! delimited text goes through the csv crate.

mod column;
mod date;
mod format;
mod read;
mod write;

pub use column::{ColumnRange, ColumnSelector};
pub use read::read_table;
pub use write::{check_output_path, write_table};

use crate::naming::sanitize_identifier;
use std::fmt;

/// One spreadsheet value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Date and/or time as an Excel serial number (days since 1899-12-30).
    DateTime(f64),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Text rendering used for identifiers.
    ///
    /// Workbooks store every number as a float, so whole floats render without
    /// a fractional part (`12.0` → `"12"`).
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::String(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                (*f as i64).to_string()
            }
            Cell::Float(f) => f.to_string(),
            Cell::Bool(true) => "TRUE".to_string(),
            Cell::Bool(false) => "FALSE".to_string(),
            Cell::DateTime(serial) => date::serial_to_iso(*serial),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::String(s.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::String(s)
        }
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Float(f)
    }
}

/// Header row plus data rows, in the order they appear in the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Sheet the table was read from, reused as the sheet name on write.
    pub sheet_name: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            sheet_name: None,
            headers,
            rows,
        }
    }

    /// Number of columns: the widest of the header and every row.
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    /// Cell at (row, col); cells past the end of a short row read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&Cell::Empty)
    }

    /// Overwrites one cell, padding a short row with empty cells.
    pub fn set_cell(&mut self, row: usize, col: usize, value: Cell) {
        if let Some(r) = self.rows.get_mut(row) {
            if r.len() <= col {
                r.resize(col + 1, Cell::Empty);
            }
            r[col] = value;
        }
    }

    /// Builds one [`Record`] per data row, in row order.
    pub fn records(&self, id_col: usize, image_cols: &ColumnRange) -> Vec<Record> {
        (0..self.rows.len())
            .map(|row| Record {
                row,
                identifier: self.cell(row, id_col).clone(),
                image_urls: image_cols
                    .columns()
                    .map(|col| self.cell(row, col).clone())
                    .collect(),
            })
            .collect()
    }
}

/// One spreadsheet row as seen by the fetcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 0-based data row index (header excluded).
    pub row: usize,
    pub identifier: Cell,
    /// Candidate URL cells in column order; may be blank or non-URL.
    pub image_urls: Vec<Cell>,
}

impl Record {
    /// Sanitized identifier, or `None` if the cell is empty or blank.
    pub fn sanitized_identifier(&self) -> Option<String> {
        let id = sanitize_identifier(&self.identifier.as_text());
        (!id.is_empty()).then_some(id)
    }

    /// String cells starting with `http`, in column order. Everything else is
    /// skipped without being counted.
    pub fn http_urls(&self) -> impl Iterator<Item = &str> {
        self.image_urls
            .iter()
            .filter_map(Cell::as_str)
            .filter(|s| s.starts_with("http"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_identifiers_render_like_integers() {
        assert_eq!(Cell::Float(12.0).as_text(), "12");
        assert_eq!(Cell::Float(-3.0).as_text(), "-3");
        assert_eq!(Cell::Float(1.5).as_text(), "1.5");
        assert_eq!(Cell::Int(7).as_text(), "7");
        assert_eq!(Cell::Bool(true).as_text(), "TRUE");
        assert_eq!(Cell::Empty.as_text(), "");
    }

    #[test]
    fn empty_string_converts_to_empty_cell() {
        assert_eq!(Cell::from(""), Cell::Empty);
        assert_eq!(Cell::from("a"), Cell::String("a".into()));
    }

    #[test]
    fn short_rows_read_as_empty() {
        let t = Table::new(
            vec!["id".into(), "a".into(), "b".into()],
            vec![vec![Cell::from("x")]],
        );
        assert_eq!(t.cell(0, 2), &Cell::Empty);
        assert_eq!(t.cell(5, 0), &Cell::Empty);
        assert_eq!(t.width(), 3);
    }

    #[test]
    fn set_cell_pads_row() {
        let mut t = Table::new(vec!["a".into(), "b".into()], vec![vec![]]);
        t.set_cell(0, 1, Cell::from("v"));
        assert_eq!(t.rows[0], vec![Cell::Empty, Cell::from("v")]);
    }

    #[test]
    fn records_follow_row_order_and_range() {
        let t = Table::new(
            vec!["id".into(), "name".into(), "u1".into(), "u2".into()],
            vec![
                vec![Cell::from("b"), Cell::from("B"), Cell::from("http://x/1.png")],
                vec![Cell::from("a"), Cell::from("A")],
            ],
        );
        let recs = t.records(0, &ColumnRange::new(2, 4));
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].row, 0);
        assert_eq!(recs[0].identifier, Cell::from("b"));
        assert_eq!(recs[0].image_urls, vec![Cell::from("http://x/1.png"), Cell::Empty]);
        assert_eq!(recs[1].identifier, Cell::from("a"));
    }

    #[test]
    fn http_urls_filters_non_urls() {
        let rec = Record {
            row: 0,
            identifier: Cell::from("id"),
            image_urls: vec![
                Cell::from("http://a/x.png"),
                Cell::Empty,
                Cell::from("not-a-url"),
                Cell::Float(3.0),
                Cell::from("http://a/y"),
            ],
        };
        let urls: Vec<&str> = rec.http_urls().collect();
        assert_eq!(urls, vec!["http://a/x.png", "http://a/y"]);
    }

    #[test]
    fn blank_identifier_is_missing() {
        let mut rec = Record {
            row: 0,
            identifier: Cell::Empty,
            image_urls: vec![],
        };
        assert!(rec.sanitized_identifier().is_none());
        rec.identifier = Cell::from("   ");
        assert!(rec.sanitized_identifier().is_none());
        rec.identifier = Cell::Float(42.0);
        assert_eq!(rec.sanitized_identifier().as_deref(), Some("42"));
    }
}
