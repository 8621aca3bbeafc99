//! Tracing setup shared by both subcommands.

use anyhow::{anyhow, Result};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,sheetfetch=debug,sheetfetch_core=debug";

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to this file, creating it and its directory.
    File(PathBuf),
    Stderr,
}

impl LogTarget {
    /// `~/.local/state/sheetfetch/sheetfetch.log`.
    pub fn state_file() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("sheetfetch")?;
        let path = xdg_dirs
            .get_state_home()
            .join("sheetfetch")
            .join("sheetfetch.log");
        Ok(LogTarget::File(path))
    }
}

/// Filter from `directives` (normally `RUST_LOG`); unset or unparsable
/// directives fall back to info with debug for our crates.
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber writing to `target`.
///
/// Fails if the log file cannot be opened or a subscriber is already set;
/// nothing is installed in either case.
pub fn init(target: &LogTarget) -> Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_from(directives.as_deref()))
        .with_ansi(false);
    let installed = match target {
        LogTarget::File(path) => {
            let file = open_log_file(path)
                .map_err(|e| anyhow!("cannot open log file {}: {}", path.display(), e))?;
            builder.with_writer(Mutex::new(file)).try_init()
        }
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install logger: {}", e))?;

    if let LogTarget::File(path) = target {
        tracing::info!(path = %path.display(), "logging to file");
    }
    Ok(())
}
