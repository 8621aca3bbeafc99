//! `sheetfetch fetch` – download the images listed in a table.

use anyhow::Result;
use clap::Args;
use sheetfetch_core::config::FetchConfig;
use sheetfetch_core::fetch::{self, FetchEvent};
use sheetfetch_core::sheet::{ColumnRange, ColumnSelector};
use std::path::PathBuf;

/// Overrides for the `[fetch]` config section. Unset flags keep the config value.
#[derive(Debug, Default, Args)]
pub struct FetchArgs {
    /// Spreadsheet (.xlsx, .xls, .ods, .csv, .tsv) listing the image URLs.
    #[arg(long, value_name = "PATH")]
    pub table: Option<PathBuf>,

    /// Sheet to read (first sheet by default).
    #[arg(long)]
    pub sheet: Option<String>,

    /// Identifier column: 0-based index or header name.
    #[arg(long, value_name = "COLUMN")]
    pub id_column: Option<ColumnSelector>,

    /// Image URL columns, e.g. `G:Q` or `6..17`.
    #[arg(long, value_name = "RANGE")]
    pub image_columns: Option<ColumnRange>,

    /// Directory to save images in.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Attempts per URL before giving up.
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Connect and stalled-transfer timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Pause after each saved image, in seconds.
    #[arg(long, value_name = "SECS")]
    pub delay: Option<f64>,

    /// Pause after each failed attempt, in seconds.
    #[arg(long, value_name = "SECS")]
    pub retry_delay: Option<f64>,

    #[arg(long)]
    pub user_agent: Option<String>,

    /// Extra request header, `NAME: VALUE`. Repeatable.
    #[arg(long = "header", short = 'H', value_name = "HEADER", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
}

impl FetchArgs {
    pub fn apply(self, mut cfg: FetchConfig) -> FetchConfig {
        if let Some(v) = self.table {
            cfg.table = v;
        }
        if self.sheet.is_some() {
            cfg.sheet = self.sheet;
        }
        if let Some(v) = self.id_column {
            cfg.id_column = v;
        }
        if let Some(v) = self.image_columns {
            cfg.image_columns = v;
        }
        if let Some(v) = self.output_dir {
            cfg.output_dir = v;
        }
        if let Some(v) = self.max_retries {
            cfg.max_retries = v;
        }
        if let Some(v) = self.timeout {
            cfg.timeout_secs = v;
        }
        if let Some(v) = self.delay {
            cfg.delay_secs = v;
        }
        if let Some(v) = self.retry_delay {
            cfg.retry_delay_secs = v;
        }
        if let Some(v) = self.user_agent {
            cfg.user_agent = v;
        }
        cfg.headers.extend(self.headers);
        cfg
    }
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected NAME: VALUE, got {:?}", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in {:?}", s));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

pub fn run_fetch(cfg: FetchConfig) -> Result<()> {
    println!(
        "Fetching images from {} into {}",
        cfg.table.display(),
        cfg.output_dir.display()
    );
    let report = fetch::run_fetch(&cfg, &mut print_event)?;
    println!(
        "Done: {} saved ({} bytes), {} already present, {} failed, {} row(s) with an identifier.",
        report.saved, report.bytes, report.skipped, report.abandoned, report.records
    );
    Ok(())
}

fn print_event(event: &FetchEvent<'_>) {
    match event {
        FetchEvent::Saved { target, .. } => {
            println!("saved: {} <- {}", target.file_name(), target.url)
        }
        FetchEvent::Skipped { target } => println!("skip: {} (exists)", target.file_name()),
        FetchEvent::Retry {
            target,
            attempt,
            max_attempts,
            error,
        } => eprintln!(
            "retry {}/{}: {} -> {}",
            attempt, max_attempts, target.url, error
        ),
        FetchEvent::GaveUp {
            target, attempts, ..
        } => eprintln!("give up: {} after {} attempt(s)", target.url, attempts),
    }
}
