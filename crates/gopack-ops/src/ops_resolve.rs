//! Operation: resolve, fetch and pin every dependency, then record the checksum.

use gopack_core::config::Config;
use gopack_core::graph::Graph;
use gopack_core::retrieve::Retriever;
use gopack_core::session::Session;
use gopack_resolver::{Pipeline, ResolutionReport, Visit};
use gopack_util::progress::{spinner, status, status_quiet};

/// Options for the resolution step every command runs first.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResolveOptions {
    /// Also report dependencies that needed no retrieval.
    pub verbose: bool,
}

/// Bring the vendor workspace in line with `gopack.config`.
///
/// The declaration's checksum decides whether existing copies are refreshed.
/// The marker is written only once everything succeeded, so a failed or
/// cancelled run is retried in full next time.
pub fn resolve(
    session: &Session,
    retriever: &dyn Retriever,
    opts: ResolveOptions,
) -> miette::Result<ResolutionReport> {
    let config = Config::load(session.project_root())?;
    let marker = session.checksum_path();
    let force_refetch = config.modified_checksum(&marker);
    if force_refetch {
        tracing::debug!("{} changed since last run, refetching", config.path.display());
    }

    let mut graph = Graph::new();
    config.init_repo(session, &mut graph)?;

    let report = match config.load_dependency_model(&mut graph) {
        Some(deps) => {
            let sp = spinner("Resolving dependencies...");
            let result = Pipeline::new(session, retriever, force_refetch)
                .with_observer(|visit| {
                    sp.set_message(format!("Resolving {}...", visit.import));
                    if visit.retrieved {
                        sp.suspend(|| status("Fetched", &visit.import));
                    } else if opts.verbose {
                        let note = if visit.repeat { "already resolved" } else { "up to date" };
                        sp.suspend(|| status_quiet("Fresh", &format!("{} ({note})", visit.import)));
                    }
                    if let Some(note) = pinned_note(visit) {
                        sp.suspend(|| status("Pinned", &note));
                    }
                })
                .resolve(deps, graph);
            sp.finish_and_clear();
            result?
        }
        None => {
            tracing::debug!("No dependencies declared");
            ResolutionReport::new(config.repository.clone(), Vec::new(), graph)
        }
    };

    config.write_checksum(&marker)?;

    let resolved = report.resolved_count();
    if resolved > 0 {
        status(
            "Resolved",
            &format!(
                "{resolved} dependenc{} ({} fetched)",
                if resolved == 1 { "y" } else { "ies" },
                report.retrieved_count()
            ),
        );
    }
    Ok(report)
}

fn pinned_note(visit: &Visit) -> Option<String> {
    let checkout = visit.checkout.as_deref()?;
    Some(format!("{} at {checkout}", visit.import))
}

/// [`resolve`] using the installed version-control clients.
pub fn resolve_with_scm(session: &Session, opts: ResolveOptions) -> miette::Result<ResolutionReport> {
    resolve(session, &gopack_scm::ScmRetriever::new(), opts)
}
