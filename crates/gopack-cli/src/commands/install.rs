//! Handler for `gopack installdeps`.

use gopack_core::session::Session;
use gopack_ops::ops_install;
use gopack_resolver::ResolutionReport;
use gopack_util::progress::status;
use miette::Result;

pub fn exec(session: &Session, report: &ResolutionReport) -> Result<()> {
    let count = ops_install::install(session, report)?;
    status("Finished", &format!("installed {count} dependencies"));
    Ok(())
}
