//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}


#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["sheetfetch"]).is_err());
}

#[test]
fn cli_global_config_flag() {
    let cli = parse(&["sheetfetch", "fetch", "--config", "/tmp/sf.toml"]);
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/sf.toml")));
    assert!(matches!(cli.command, CliCommand::Fetch(_)));

    let cli = parse(&["sheetfetch", "--config", "c.toml", "rename"]);
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("c.toml")));
}
