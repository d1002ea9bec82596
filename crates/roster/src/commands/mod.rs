//! Command dispatch: bridges CLI args -> view models -> output formatting.

pub mod config_cmd;
pub mod students;
pub mod util;

use roster_core::RemoteStudents;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    api: RemoteStudents,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Students(args) => students::handle(api, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
