//! On-disk record of a rename batch, written before the first rename.
//!
//! If a run is interrupted, the next run finds the journal and finishes the
//! same batch instead of re-deriving it from a half-renamed directory.

use super::plan::RenamePlan;
use crate::storage;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const STAGING_SUFFIX: &str = ".sheetfetch-rename";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalPhase {
    /// Each source goes straight to its target.
    Direct,
    /// Sources are being moved to their staging names.
    Staging,
    /// Every source is staged; staging names are being moved to targets.
    Finalizing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub from: PathBuf,
    pub to: PathBuf,
    /// Hidden temporary name in the same directory, used when staging.
    pub staged: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameJournal {
    pub phase: JournalPhase,
    pub entries: Vec<JournalEntry>,
}

impl RenameJournal {
    pub fn from_plan(plan: &RenamePlan) -> Self {
        let phase = if plan.needs_staging() {
            JournalPhase::Staging
        } else {
            JournalPhase::Direct
        };
        let entries = plan
            .renames
            .iter()
            .map(|r| JournalEntry {
                from: r.from.clone(),
                to: r.to.clone(),
                staged: staging_path(&r.from),
            })
            .collect();
        Self { phase, entries }
    }

    /// Journal location for a given output table: `{output}.journal.json`.
    pub fn path_for(output: &Path) -> PathBuf {
        let mut o = output.as_os_str().to_owned();
        o.push(".journal.json");
        PathBuf::from(o)
    }

    pub fn load(path: &Path) -> Result<Option<Self>> {
        let data = match fs::read(path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read journal {}", path.display()))
            }
        };
        let journal = serde_json::from_slice(&data)
            .with_context(|| format!("corrupt rename journal {}", path.display()))?;
        Ok(Some(journal))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_vec_pretty(self)?;
        storage::write_atomic(path, &data)
            .with_context(|| format!("failed to write journal {}", path.display()))
    }

    /// Carries out (or finishes) every rename, persisting phase changes to
    /// `path`. Returns how many files reached their target in this call.
    ///
    /// Entries whose source is gone and whose target exists count as done.
    pub fn apply(&mut self, path: &Path) -> Result<usize> {
        let mut renamed = 0;

        if self.phase == JournalPhase::Direct {
            for e in &self.entries {
                if !e.from.exists() {
                    if !e.to.exists() {
                        tracing::warn!(file = %e.from.display(), "source vanished, skipping");
                    }
                    continue;
                }
                if e.to.exists() {
                    tracing::warn!(from = %e.from.display(), to = %e.to.display(), "target appeared, skipping");
                    continue;
                }
                rename(&e.from, &e.to)?;
                renamed += 1;
            }
            return Ok(renamed);
        }

        if self.phase == JournalPhase::Staging {
            for e in &self.entries {
                if e.from.exists() && !e.staged.exists() {
                    rename(&e.from, &e.staged)?;
                }
            }
            self.phase = JournalPhase::Finalizing;
            self.save(path)?;
        }

        for e in &self.entries {
            if !e.staged.exists() {
                continue;
            }
            if e.to.exists() {
                bail!(
                    "cannot finish rename {} -> {}: target exists",
                    e.staged.display(),
                    e.to.display()
                );
            }
            rename(&e.staged, &e.to)?;
            renamed += 1;
        }
        Ok(renamed)
    }
}

fn staging_path(from: &Path) -> PathBuf {
    let name = from
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    from.with_file_name(format!(".{}{}", name, STAGING_SUFFIX))
}

fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to)
        .with_context(|| format!("failed to rename {} -> {}", from.display(), to.display()))?;
    tracing::info!(
        from = %from.file_name().unwrap_or_default().to_string_lossy(),
        to = %to.file_name().unwrap_or_default().to_string_lossy(),
        "renamed"
    );
    Ok(())
}
