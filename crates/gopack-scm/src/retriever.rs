use std::path::Path;
use std::process::Output;

use gopack_core::dep::{CheckoutSpec, Dep, ScmKind};
use gopack_core::retrieve::Retriever;
use gopack_core::session::Session;
use gopack_util::errors::GopackError;
use gopack_util::process::CommandBuilder;

use crate::commands;

/// [`Retriever`] backed by the installed version-control clients.
///
/// Every command honors the session's cancellation token and fetch timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScmRetriever;

impl ScmRetriever {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, dep: &Dep, cmd: CommandBuilder, session: &Session) -> miette::Result<Output> {
        tracing::debug!("{}: {}", dep.import, cmd.display());
        let output = cmd
            .exec_watched(&session.cancel, session.fetch_timeout)
            .map_err(|e| match e {
                GopackError::Io(io) => GopackError::Retrieval {
                    message: format!("{}: failed to run `{}`: {io}", dep.import, cmd.display()),
                },
                other => other,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GopackError::Retrieval {
                message: format!(
                    "{}: `{}` exited with {}\n{}",
                    dep.import,
                    cmd.display(),
                    output.status,
                    stderr.trim_end()
                ),
            }
            .into());
        }
        Ok(output)
    }
}

fn scm_of(dep: &Dep) -> miette::Result<ScmKind> {
    dep.scm.ok_or_else(|| {
        GopackError::Retrieval {
            message: format!("{}: no version-control system to retrieve with", dep.import),
        }
        .into()
    })
}

impl Retriever for ScmRetriever {
    fn retrieve(&self, dep: &Dep, dest: &Path, session: &Session) -> miette::Result<()> {
        let kind = scm_of(dep)?;
        if dest.exists() {
            self.run(dep, commands::refresh(kind, dest), session)?;
            return Ok(());
        }

        if let Some(parent) = dest.parent() {
            gopack_util::fs::ensure_dir(parent).map_err(GopackError::from)?;
        }
        self.run(dep, commands::clone(kind, &dep.source, dest), session)?;
        Ok(())
    }

    fn checkout(
        &self,
        dep: &Dep,
        spec: &CheckoutSpec,
        dest: &Path,
        session: &Session,
    ) -> miette::Result<()> {
        let kind = scm_of(dep)?;
        self.run(dep, commands::checkout(kind, spec, dest), session)?;
        Ok(())
    }
}
