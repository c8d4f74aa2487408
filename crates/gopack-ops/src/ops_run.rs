//! Operation: hand any other command to the `go` tool.

use gopack_core::session::Session;
use gopack_util::errors::GopackError;

use crate::go_command;

/// Run `go <args>` against the vendor workspace with inherited stdio.
///
/// Returns the child's exit status so the caller can mirror it.
pub fn run_go(session: &Session, args: &[String]) -> miette::Result<i32> {
    let cmd = go_command(session).args(args.iter().cloned());
    tracing::debug!("Running {}", cmd.display());

    let status = cmd.status().map_err(|e| GopackError::Generic {
        message: format!("Failed to execute go: {e}"),
    })?;
    Ok(status.code().unwrap_or(1))
}
