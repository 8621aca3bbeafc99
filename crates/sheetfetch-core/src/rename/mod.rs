//! Identifier renormalizer.
//!
//! Gives every row a new identifier from its position (`0001`, `0002`, …),
//! renames files in the image directory whose `{prefix}_…` names carry an
//! old identifier, and writes the table with the new identifiers to a
//! separate output file.
//!
//! Renames are planned from one directory listing and journaled next to the
//! output table before the first one happens; an interrupted run is finished
//! by the next run. No lock is taken on the image directory: concurrent runs
//! against the same directory are not supported.

mod journal;
mod map;
mod plan;

pub use journal::{JournalEntry, JournalPhase, RenameJournal};
pub use map::IdentifierMap;
pub use plan::{PlannedRename, RenamePlan};

use crate::config::RenameConfig;
use crate::sheet::{check_output_path, read_table, write_table, Cell, Table};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// What a rename run did (or, for a dry run, would do).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
    /// Data rows in the table.
    pub rows: usize,
    /// Renames in the batch.
    pub planned: Vec<PlannedRename>,
    /// Files moved to their new name by this run.
    pub renamed: usize,
    /// Files left alone because no identifier matched. Not recorded in the
    /// journal, so always 0 when `resumed`.
    pub unmapped: usize,
    /// Renames skipped because the target was taken. Empty when `resumed`.
    pub conflicts: Vec<PlannedRename>,
    /// The batch came from an interrupted run's journal.
    pub resumed: bool,
    /// Table written, `None` for a dry run.
    pub output: Option<PathBuf>,
}

/// Copy of `table` with column `id_col` replaced by the new identifiers.
pub fn rewrite_identifiers(table: &Table, id_col: usize, map: &IdentifierMap) -> Table {
    let mut out = table.clone();
    for (row, new_id) in map.new_ids().iter().enumerate() {
        out.set_cell(row, id_col, Cell::String(new_id.clone()));
    }
    out
}

/// Runs the whole rename job described by `config`.
pub fn run_rename(config: &RenameConfig, dry_run: bool) -> Result<RenameReport> {
    if same_location(&config.table, &config.output) {
        bail!(
            "output {} would overwrite the source table",
            config.output.display()
        );
    }
    check_output_path(&config.output)?;

    let table = read_table(&config.table, config.sheet.as_deref())
        .with_context(|| format!("failed to load {}", config.table.display()))?;
    let id_col = config
        .id_column
        .resolve(&table)
        .context("identifier column")?;
    let map = IdentifierMap::build((0..table.rows.len()).map(|row| table.cell(row, id_col)));
    tracing::info!(rows = table.rows.len(), mapped = map.len(), "identifier map built");

    let mut report = RenameReport {
        rows: table.rows.len(),
        ..RenameReport::default()
    };

    let journal_path = RenameJournal::path_for(&config.output);
    let mut journal = match RenameJournal::load(&journal_path)? {
        Some(journal) => {
            tracing::info!(journal = %journal_path.display(), "resuming interrupted rename");
            report.resumed = true;
            journal
        }
        None => {
            let plan = RenamePlan::build(&config.image_dir, &map)?;
            for c in &plan.conflicts {
                tracing::warn!(from = %c.from.display(), to = %c.to.display(), "target exists, not renaming");
            }
            report.unmapped = plan.unmapped;
            report.conflicts = plan.conflicts.clone();
            RenameJournal::from_plan(&plan)
        }
    };
    report.planned = journal
        .entries
        .iter()
        .map(|e| PlannedRename {
            from: e.from.clone(),
            to: e.to.clone(),
        })
        .collect();

    if dry_run {
        for p in &report.planned {
            tracing::info!(from = %p.from.display(), to = %p.to.display(), "would rename");
        }
        return Ok(report);
    }

    if !journal.entries.is_empty() {
        if !report.resumed {
            journal.save(&journal_path)?;
        }
        report.renamed = journal.apply(&journal_path)?;
    }

    let rewritten = rewrite_identifiers(&table, id_col, &map);
    if let Some(parent) = config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    write_table(&config.output, &rewritten)?;
    if journal_path.exists() {
        fs::remove_file(&journal_path)
            .with_context(|| format!("failed to remove journal {}", journal_path.display()))?;
    }

    tracing::info!(
        renamed = report.renamed,
        unmapped = report.unmapped,
        conflicts = report.conflicts.len(),
        output = %config.output.display(),
        "rename finished"
    );
    report.output = Some(config.output.clone());
    Ok(report)
}

/// Whether two paths name the same file, resolving what exists on disk.
fn same_location(a: &Path, b: &Path) -> bool {
    fn resolve(p: &Path) -> Option<PathBuf> {
        if let Ok(c) = p.canonicalize() {
            return Some(c);
        }
        let parent = p
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        Some(parent.canonicalize().ok()?.join(p.file_name()?))
    }
    match (resolve(a), resolve(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}
