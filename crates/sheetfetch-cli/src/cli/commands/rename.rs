//! `sheetfetch rename` – renumber identifiers and rename image files to match.

use anyhow::Result;
use clap::Args;
use sheetfetch_core::config::RenameConfig;
use sheetfetch_core::rename::{self, RenameReport};
use sheetfetch_core::sheet::ColumnSelector;
use std::path::PathBuf;

/// Overrides for the `[rename]` config section.
#[derive(Debug, Default, Args)]
pub struct RenameArgs {
    /// Spreadsheet whose row order defines the new identifiers.
    #[arg(long, value_name = "PATH")]
    pub table: Option<PathBuf>,

    #[arg(long)]
    pub sheet: Option<String>,

    /// Identifier column: 0-based index or header name.
    #[arg(long, value_name = "COLUMN")]
    pub id_column: Option<ColumnSelector>,

    /// Directory holding the image files to rename.
    #[arg(long, value_name = "DIR")]
    pub image_dir: Option<PathBuf>,

    /// Where to write the rewritten table (.xlsx, .csv or .tsv).
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the planned renames without touching any file.
    #[arg(long)]
    pub dry_run: bool,
}

impl RenameArgs {
    pub fn apply(self, mut cfg: RenameConfig) -> RenameConfig {
        if let Some(v) = self.table {
            cfg.table = v;
        }
        if self.sheet.is_some() {
            cfg.sheet = self.sheet;
        }
        if let Some(v) = self.id_column {
            cfg.id_column = v;
        }
        if let Some(v) = self.image_dir {
            cfg.image_dir = v;
        }
        if let Some(v) = self.output {
            cfg.output = v;
        }
        cfg
    }
}

pub fn run_rename(cfg: RenameConfig, dry_run: bool) -> Result<()> {
    let report = rename::run_rename(&cfg, dry_run)?;
    if report.resumed {
        println!("Finishing renames from an interrupted run.");
    }
    if dry_run {
        for r in &report.planned {
            println!("{} -> {}", r.from.display(), r.to.display());
        }
    }
    for c in &report.conflicts {
        eprintln!(
            "conflict: {} -> {} (target exists, left as is)",
            c.from.display(),
            c.to.display()
        );
    }
    println!("{}", summary(&report));
    Ok(())
}

/// One-line outcome. Unmapped and conflict counts come from the directory
/// scan, which a resumed run does not repeat.
pub fn summary(report: &RenameReport) -> String {
    let scan = if report.resumed {
        "unmapped and conflict counts unknown (resumed from journal)".to_string()
    } else {
        format!(
            "{} left unmapped, {} conflict(s)",
            report.unmapped,
            report.conflicts.len()
        )
    };
    match &report.output {
        Some(out) => format!(
            "Renamed {} file(s), {}. Wrote {} row(s) to {}.",
            report.renamed,
            scan,
            report.rows,
            out.display()
        ),
        None => format!(
            "Dry run: {} rename(s) planned, {}, {} row(s).",
            report.planned.len(),
            scan,
            report.rows
        ),
    }
}
