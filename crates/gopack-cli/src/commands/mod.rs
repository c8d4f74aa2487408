//! Command dispatch and handler modules.

mod install;
mod run;
mod stats;
mod tree;
mod version;

use gopack_core::session::Session;
use gopack_ops::ops_resolve::{self, ResolveOptions};
use gopack_resolver::ResolutionReport;
use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
///
/// Every command except `version` resolves the project first. Returns the
/// process exit status.
pub fn dispatch(cli: Cli, session: &Session) -> Result<i32> {
    if let Some(Command::Version) = cli.command {
        version::exec();
        return Ok(0);
    }

    let report = resolve(session, cli.verbose)?;
    match cli.command {
        Some(Command::DependencyTree { json }) => tree::exec(&report, json)?,
        Some(Command::Stats { exclude }) => stats::exec(session, &report, exclude)?,
        Some(Command::InstallDeps) => install::exec(session, &report)?,
        Some(Command::External(args)) => return run::exec(session, &args),
        Some(Command::Version) => {}
        None => return run::exec(session, &[]),
    }
    Ok(0)
}

fn resolve(session: &Session, verbose: bool) -> Result<ResolutionReport> {
    ops_resolve::resolve_with_scm(session, ResolveOptions { verbose })
}
