//! Column addressing: a single identifier column and a contiguous URL range.

use super::Table;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Picks one column by 0-based position or by header text.
///
/// Parsed from text: all digits is a position, anything else a header name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnSelector {
    Index(usize),
    Name(String),
}

impl ColumnSelector {
    /// Resolves to a 0-based column position in `table`.
    pub fn resolve(&self, table: &Table) -> Result<usize> {
        match self {
            ColumnSelector::Index(i) => {
                let width = table.width();
                if *i >= width {
                    bail!("column index {} is out of range (table has {} columns)", i, width);
                }
                Ok(*i)
            }
            ColumnSelector::Name(name) => match table.headers.iter().position(|h| h == name) {
                Some(i) => Ok(i),
                None => bail!(
                    "column {:?} not found; available columns: {}",
                    name,
                    table.headers.join(", ")
                ),
            },
        }
    }
}

impl FromStr for ColumnSelector {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            bail!("empty column selector");
        }
        if s.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(ColumnSelector::Index(s.parse()?));
        }
        Ok(ColumnSelector::Name(s.to_string()))
    }
}

impl TryFrom<String> for ColumnSelector {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ColumnSelector> for String {
    fn from(c: ColumnSelector) -> Self {
        c.to_string()
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::Index(i) => write!(f, "{}", i),
            ColumnSelector::Name(n) => f.write_str(n),
        }
    }
}

/// Contiguous, 0-based, end-exclusive range of column positions.
///
/// Accepted text forms: `6..17`, `6..=16`, or spreadsheet letters `G:Q`
/// (inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnRange {
    start: usize,
    end: usize,
}

impl ColumnRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn columns(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Default for ColumnRange {
    /// Columns G through Q.
    fn default() -> Self {
        Self::new(6, 17)
    }
}

impl FromStr for ColumnRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some((a, b)) = s.split_once(':') {
            let start = column_letters_to_index(a.trim())?;
            let last = column_letters_to_index(b.trim())?;
            if last < start {
                bail!("column range {:?} ends before it starts", s);
            }
            return Ok(Self::new(start, last + 1));
        }
        if let Some((a, b)) = s.split_once("..=") {
            let start: usize = a.trim().parse()?;
            let last: usize = b.trim().parse()?;
            if last < start {
                bail!("column range {:?} ends before it starts", s);
            }
            return Ok(Self::new(start, last + 1));
        }
        if let Some((a, b)) = s.split_once("..") {
            let start: usize = a.trim().parse()?;
            let end: usize = b.trim().parse()?;
            if end < start {
                bail!("column range {:?} ends before it starts", s);
            }
            return Ok(Self::new(start, end));
        }
        bail!("invalid column range {:?}; expected START..END, START..=END or letters like G:Q", s)
    }
}

impl TryFrom<String> for ColumnRange {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ColumnRange> for String {
    fn from(r: ColumnRange) -> Self {
        r.to_string()
    }
}

impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// `A` → 0, `Z` → 25, `AA` → 26.
fn column_letters_to_index(letters: &str) -> Result<usize> {
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
        bail!("invalid column letters {:?}", letters);
    }
    let mut n = 0usize;
    for b in letters.bytes() {
        n = n * 26 + (b.to_ascii_uppercase() - b'A') as usize + 1;
    }
    Ok(n - 1)
}
