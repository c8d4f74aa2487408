pub mod ops_install;
pub mod ops_resolve;
pub mod ops_run;
pub mod ops_stats;
pub mod ops_tree;

use gopack_core::session::Session;
use gopack_util::process::CommandBuilder;

/// A `go` invocation that sees the vendor workspace as its `GOPATH`.
///
/// Module mode is switched off so the toolchain resolves imports through
/// `<vendor>/src` rather than a module cache.
pub fn go_command(session: &Session) -> CommandBuilder {
    CommandBuilder::new("go")
        .env("GOPATH", session.vendor_dir().to_string_lossy().to_string())
        .env("GO111MODULE", "off")
        .cwd(session.project_root())
}
