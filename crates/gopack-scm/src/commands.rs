//! Command lines for each supported version-control client.
//!
//! Only argument building lives here; running the commands is
//! [`crate::retriever::ScmRetriever`]'s job.

use std::path::Path;

use gopack_core::dep::{CheckoutKind, CheckoutSpec, ScmKind};
use gopack_util::process::CommandBuilder;

/// The client binary for `kind`.
pub fn program(kind: ScmKind) -> &'static str {
    match kind {
        ScmKind::Git => "git",
        ScmKind::Hg => "hg",
        ScmKind::Bzr => "bzr",
        ScmKind::Svn => "svn",
    }
}

/// Fresh copy of `source` into `dest`. `dest` must not exist yet.
pub fn clone(kind: ScmKind, source: &str, dest: &Path) -> CommandBuilder {
    let dest = dest.to_string_lossy().to_string();
    let cmd = CommandBuilder::new(program(kind));
    match kind {
        ScmKind::Git => cmd.args(["clone", "--quiet", source]).arg(dest),
        ScmKind::Hg => cmd.args(["clone", "--quiet", source]).arg(dest),
        ScmKind::Bzr => cmd.args(["branch", "--quiet", source]).arg(dest),
        ScmKind::Svn => cmd.args(["checkout", "--quiet", source]).arg(dest),
    }
}

/// Bring an existing working copy at `dest` up to date with its origin.
pub fn refresh(kind: ScmKind, dest: &Path) -> CommandBuilder {
    let cmd = CommandBuilder::new(program(kind)).cwd(dest);
    match kind {
        ScmKind::Git => cmd.args(["fetch", "--quiet", "--tags", "origin"]),
        ScmKind::Hg => cmd.args(["pull", "--quiet"]),
        ScmKind::Bzr => cmd.args(["pull", "--quiet", "--overwrite"]),
        ScmKind::Svn => cmd.args(["update", "--quiet"]),
    }
}

/// Pin the working copy at `dest` to `spec`.
pub fn checkout(kind: ScmKind, spec: &CheckoutSpec, dest: &Path) -> CommandBuilder {
    let cmd = CommandBuilder::new(program(kind)).cwd(dest);
    let value = spec.value.as_str();
    match (kind, spec.kind) {
        (ScmKind::Git, _) => cmd.args(["checkout", "--quiet", value]),
        (ScmKind::Hg, _) => cmd.args(["update", "--quiet", value]),
        (ScmKind::Bzr, CheckoutKind::Branch) => cmd.args(["switch", "--quiet", value]),
        (ScmKind::Bzr, CheckoutKind::Tag) => cmd
            .args(["update", "--quiet", "-r"])
            .arg(format!("tag:{value}")),
        (ScmKind::Bzr, CheckoutKind::Commit) => cmd.args(["update", "--quiet", "-r", value]),
        (ScmKind::Svn, CheckoutKind::Branch) => cmd
            .args(["switch", "--quiet"])
            .arg(format!("^/branches/{value}")),
        (ScmKind::Svn, CheckoutKind::Tag) => cmd
            .args(["switch", "--quiet"])
            .arg(format!("^/tags/{value}")),
        (ScmKind::Svn, CheckoutKind::Commit) => cmd.args(["update", "--quiet", "-r", value]),
    }
}
