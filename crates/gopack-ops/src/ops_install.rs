//! Operation: `go install` every top-level dependency.

use gopack_core::session::Session;
use gopack_resolver::ResolutionReport;
use gopack_util::errors::GopackError;
use gopack_util::progress::status;

use crate::go_command;

/// Install the packages of every dependency the project declares directly,
/// in declaration order. Stops at the first failure.
pub fn install(session: &Session, report: &ResolutionReport) -> miette::Result<usize> {
    let mut installed = 0usize;
    for visit in report.top_level().filter(|v| !v.repeat) {
        status("Installing", &visit.import);
        let pattern = format!("{}/...", visit.import);
        let output = go_command(session)
            .arg("install")
            .arg(pattern)
            .exec_watched(&session.cancel, None)
            .map_err(|e| match e {
                GopackError::Io(io) => GopackError::Generic {
                    message: format!("Failed to execute go: {io}"),
                },
                other => other,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GopackError::Generic {
                message: format!(
                    "go install {} failed with {}\n{}",
                    visit.import,
                    output.status,
                    stderr.trim_end()
                ),
            }
            .into());
        }
        installed += 1;
    }
    Ok(installed)
}
