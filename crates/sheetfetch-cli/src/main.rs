use sheetfetch_core::logging::{self, LogTarget};

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Log to the state dir when possible; stderr otherwise.
    if let Err(err) = LogTarget::state_file().and_then(|target| logging::init(&target)) {
        if logging::init(&LogTarget::Stderr).is_ok() {
            tracing::warn!("file logging unavailable, using stderr: {:#}", err);
        }
    }

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("sheetfetch error: {:#}", err);
        std::process::exit(1);
    }
}
