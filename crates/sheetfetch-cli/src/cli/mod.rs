//! CLI for sheetfetch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sheetfetch_core::config::{self, SheetfetchConfig};
use std::path::PathBuf;

pub use commands::{FetchArgs, RenameArgs};

/// Top-level CLI for sheetfetch.
#[derive(Debug, Parser)]
#[command(name = "sheetfetch", version)]
#[command(
    about = "Download images listed in a spreadsheet and renumber their identifiers",
    long_about = None
)]
pub struct Cli {
    /// Config file to use instead of ~/.config/sheetfetch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every image URL in the table into the output directory.
    Fetch(FetchArgs),

    /// Replace identifiers with row-order numbers and rename image files to match.
    Rename(RenameArgs),
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config)?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch(args) => commands::run_fetch(args.apply(cfg.fetch)),
            CliCommand::Rename(args) => {
                let dry_run = args.dry_run;
                commands::run_rename(args.apply(cfg.rename), dry_run)
            }
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<SheetfetchConfig> {
    match path {
        Some(path) => config::load_from(&path),
        None => config::load_or_init(),
    }
}

#[cfg(test)]
mod tests;
