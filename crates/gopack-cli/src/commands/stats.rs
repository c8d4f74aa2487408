//! Handler for `gopack stats`.

use gopack_core::session::Session;
use gopack_ops::ops_stats::{self, StatsOptions};
use gopack_resolver::ResolutionReport;
use miette::Result;

pub fn exec(session: &Session, report: &ResolutionReport, exclude: Vec<String>) -> Result<()> {
    let opts = StatsOptions { exclude };
    ops_stats::stats(session, report.graph(), report.root(), &opts)
}
