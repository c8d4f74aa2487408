//! Handler for commands passed through to `go`.

use gopack_core::session::Session;
use miette::Result;

pub fn exec(session: &Session, args: &[String]) -> Result<i32> {
    gopack_ops::ops_run::run_go(session, args)
}
