//! Persisting a [`Table`] as xlsx or delimited text.

use super::format::TableFormat;
use super::{Cell, Table};
use anyhow::{Context, Result};
use super::date;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Writes the header row followed by every data row.
///
/// Workbook output is always xlsx; cell types are preserved. Existing files
/// at `path` are replaced.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let written = match TableFormat::for_output(path)? {
        TableFormat::Workbook => write_workbook(path, table),
        TableFormat::Delimited(delimiter) => write_delimited(path, table, delimiter),
    };
    written.with_context(|| format!("failed to write table {}", path.display()))?;
    tracing::debug!(path = %path.display(), rows = table.rows.len(), "table written");
    Ok(())
}

/// Fails if [`write_table`] cannot produce `path`'s format.
pub fn check_output_path(path: &Path) -> Result<()> {
    TableFormat::for_output(path).map(|_| ())
}

fn write_workbook(path: &Path, table: &Table) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    if let Some(name) = &table.sheet_name {
        sheet.set_name(name)?;
    }
    for (col, header) in table.headers.iter().enumerate() {
        write_cell(sheet, 0, col, &Cell::from(header.as_str()))?;
    }
    for (row, cells) in table.rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            write_cell(sheet, row + 1, col, cell)?;
        }
    }
    workbook.save(path)?;
    Ok(())
}

fn write_cell(sheet: &mut Worksheet, row: usize, col: usize, cell: &Cell) -> Result<()> {
    let row = u32::try_from(row).context("too many rows for xlsx")?;
    let col = u16::try_from(col).context("too many columns for xlsx")?;
    match cell {
        Cell::Empty => {}
        Cell::String(s) => {
            sheet.write_string(row, col, s)?;
        }
        Cell::Int(i) => {
            sheet.write_number(row, col, *i as f64)?;
        }
        Cell::Float(f) => {
            sheet.write_number(row, col, *f)?;
        }
        Cell::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        Cell::DateTime(serial) => {
            let format = Format::new().set_num_format(date::number_format(*serial));
            sheet.write_number_with_format(row, col, *serial, &format)?;
        }
    }
    Ok(())
}

fn write_delimited(path: &Path, table: &Table, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(Cell::as_text))?;
    }
    writer.flush()?;
    Ok(())
}
