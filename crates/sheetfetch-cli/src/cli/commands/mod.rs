//! CLI command handlers, one file per subcommand.

mod fetch;
pub(crate) mod rename;

pub use fetch::{run_fetch, FetchArgs};
pub use rename::{run_rename, RenameArgs};
