//! Rename planning: decide every file rename from a single directory listing
//! before anything on disk changes.

use super::map::IdentifierMap;
use crate::naming::split_file_name;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedRename {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamePlan {
    /// Renames to perform, in directory listing order.
    pub renames: Vec<PlannedRename>,
    /// Renames skipped because the target is taken by a file that stays put.
    pub conflicts: Vec<PlannedRename>,
    /// Files whose name has no underscore or whose prefix is not mapped.
    pub unmapped: usize,
    /// Mapped files that already carry their new name.
    pub unchanged: usize,
}

impl RenamePlan {
    pub fn build(dir: &Path, map: &IdentifierMap) -> Result<Self> {
        let mut plan = RenamePlan::default();
        let mut claimed = HashSet::new();
        let mut candidates = Vec::new();

        for name in list_files(dir)? {
            let Some(parts) = split_file_name(&name) else {
                plan.unmapped += 1;
                continue;
            };
            let Some(new_id) = map.get(parts.prefix) else {
                plan.unmapped += 1;
                continue;
            };
            let new_name = format!("{}_{}{}", new_id, parts.remainder, parts.extension);
            if new_name == name {
                plan.unchanged += 1;
                continue;
            }
            let rename = PlannedRename {
                from: dir.join(&name),
                to: dir.join(&new_name),
            };
            if claimed.insert(new_name) {
                candidates.push(rename);
            } else {
                plan.conflicts.push(rename);
            }
        }

        // A target may be occupied only by a file that is itself renamed away.
        // Dropping one rename can leave its source in another's way, so repeat
        // until nothing changes.
        loop {
            let moving: HashSet<PathBuf> = candidates.iter().map(|r| r.from.clone()).collect();
            let (ok, blocked): (Vec<_>, Vec<_>) = candidates
                .into_iter()
                .partition(|r| moving.contains(&r.to) || !r.to.exists());
            candidates = ok;
            if blocked.is_empty() {
                break;
            }
            plan.conflicts.extend(blocked);
        }

        plan.renames = candidates;
        Ok(plan)
    }

    /// True when some target is currently occupied by another source, so the
    /// renames must go through temporary names.
    pub fn needs_staging(&self) -> bool {
        let sources: HashSet<&PathBuf> = self.renames.iter().map(|r| &r.from).collect();
        self.renames.iter().any(|r| sources.contains(&r.to))
    }
}

/// Regular files with an extension, hidden files excluded, sorted by name.
/// A missing directory yields nothing.
fn list_files(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(dir = %dir.display(), "image directory not found, nothing to rename");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to list {}", dir.display()));
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::debug!(path = %path.display(), "skipping non UTF-8 file name");
            continue;
        };
        if name.starts_with('.') || path.extension().is_none() {
            continue;
        }
        names.push(name.to_string());
    }
    names.sort();
    Ok(names)
}
