//! Loading a [`Table`] from a workbook sheet or a delimited text file.

use super::format::TableFormat;
use super::{Cell, Table};
use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Reads the first row as headers and every following row as data.
///
/// `sheet` selects a workbook sheet by name (first sheet when `None`); it is
/// ignored for csv/tsv. Unreadable files and unknown sheets are errors.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let table = match TableFormat::from_path(path)? {
        TableFormat::Workbook => read_workbook(path, sheet)?,
        TableFormat::Delimited(delimiter) => read_delimited(path, delimiter)?,
    };
    tracing::debug!(
        path = %path.display(),
        rows = table.rows.len(),
        columns = table.width(),
        "table loaded"
    );
    Ok(table)
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook {}", path.display()))?;
    let names = workbook.sheet_names();
    let name = match sheet {
        Some(s) if names.iter().any(|n| n == s) => s.to_string(),
        Some(s) => bail!(
            "sheet {:?} not found in {}; available sheets: {}",
            s,
            path.display(),
            names.join(", ")
        ),
        None => match names.first() {
            Some(first) => first.clone(),
            None => bail!("workbook {} has no sheets", path.display()),
        },
    };
    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("failed to read sheet {:?} of {}", name, path.display()))?;

    // The range starts at the first non-empty cell; pad back to column A so
    // positional selectors line up with the sheet.
    let col_offset = range.start().map(|(_, c)| c as usize).unwrap_or(0);
    let mut rows = range.rows().map(|r| {
        let mut cells = vec![Cell::Empty; col_offset];
        cells.extend(r.iter().map(cell_from_data));
        cells
    });

    let headers = rows
        .next()
        .map(|r| r.iter().map(Cell::as_text).collect())
        .unwrap_or_default();
    let mut table = Table::new(headers, rows.collect());
    table.sheet_name = Some(name);
    Ok(table)
}

fn cell_from_data(d: &Data) -> Cell {
    match d {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from(s.as_str()),
    }
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read header row of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();
    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("failed to read row {} of {}", i + 2, path.display()))?;
        rows.push(record.iter().map(Cell::from).collect());
    }
    Ok(Table::new(headers, rows))
}
