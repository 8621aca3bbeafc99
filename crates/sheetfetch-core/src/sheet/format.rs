use anyhow::{bail, Result};
use std::path::Path;

/// On-disk table format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableFormat {
    /// xlsx/xlsm/xls/ods: sheet-addressable workbook.
    Workbook,
    /// csv (`,`) or tsv (`\t`).
    Delimited(u8),
}

impl TableFormat {
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(TableFormat::Workbook),
            "csv" => Ok(TableFormat::Delimited(b',')),
            "tsv" | "tab" => Ok(TableFormat::Delimited(b'\t')),
            _ => bail!(
                "unsupported table format for {} (expected .xlsx, .xls, .ods, .csv or .tsv)",
                path.display()
            ),
        }
    }

    /// Format for writing `path`. Workbook output is xlsx only.
    pub(crate) fn for_output(path: &Path) -> Result<Self> {
        let format = Self::from_path(path)?;
        if format == TableFormat::Workbook
            && !path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"))
        {
            bail!("workbook output must be .xlsx: {}", path.display());
        }
        Ok(format)
    }
}
