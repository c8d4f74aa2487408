//! Handler for `gopack dependencytree`.

use gopack_ops::ops_tree::{self, TreeOptions};
use gopack_resolver::ResolutionReport;
use miette::Result;

pub fn exec(report: &ResolutionReport, json: bool) -> Result<()> {
    ops_tree::tree(report, TreeOptions { json })
}
