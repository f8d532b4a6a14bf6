//! Interactive presenter for the ledger: reads commands, renders summaries.

pub mod commands;
pub mod errors;
pub mod output;
pub mod registry;
pub mod render;
mod shell;
pub mod shell_context;

pub use errors::{CliError, CommandError, CommandResult};
pub use shell::{run_cli, SCRIPT_ENV};
pub use shell_context::{CliMode, ShellContext};
