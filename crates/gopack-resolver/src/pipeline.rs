//! Depth-first resolution over the transitive dependency forest.
//!
//! Pending dependency sets live on an explicit stack, each with a cursor into
//! its members. The top set is advanced one member at a time; when a member
//! owns a nested declaration its set is pushed and processed fully before the
//! next sibling. Depth and visiting order therefore come straight from the
//! stack rather than from the call stack.

use std::sync::Arc;

use gopack_core::dep::{Dep, FetchOutcome};
use gopack_core::dependencies::Dependencies;
use gopack_core::graph::Graph;
use gopack_core::project::validation_error;
use gopack_core::retrieve::Retriever;
use gopack_core::session::Session;

use crate::report::{ResolutionReport, Visit};
use crate::visited::VisitedSet;

/// One pending dependency set on the worklist.
struct Frame {
    deps: Dependencies,
    cursor: usize,
    depth: usize,
    parent: Option<String>,
}

impl Frame {
    fn new(deps: Dependencies, depth: usize, parent: Option<String>) -> Self {
        Self {
            deps,
            cursor: 0,
            depth,
            parent,
        }
    }

    /// The next member to process, advancing the cursor.
    fn advance(&mut self) -> Option<Arc<Dep>> {
        let dep = self.deps.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(dep)
    }
}

/// Drives fetch, checkout and transitive expansion for one run.
pub struct Pipeline<'a> {
    session: &'a Session,
    retriever: &'a dyn Retriever,
    force_refetch: bool,
    observer: Option<Box<dyn FnMut(&Visit) + 'a>>,
}

impl<'a> Pipeline<'a> {
    /// `force_refetch` is the checksum gate computed from the root
    /// declaration; it applies to every dependency in the run.
    pub fn new(session: &'a Session, retriever: &'a dyn Retriever, force_refetch: bool) -> Self {
        Self {
            session,
            retriever,
            force_refetch,
            observer: None,
        }
    }

    /// Call `observer` for every visit as soon as it completes.
    pub fn with_observer(mut self, observer: impl FnMut(&Visit) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Resolve `root` and everything it transitively declares.
    ///
    /// Every set, the root included, is validated exhaustively before any of
    /// its members is fetched. The root project's own identifier counts as
    /// visited from the start, so a dependency that points back at it, or at
    /// a package inside it, is a repeat. So is a sub-package of anything
    /// already visited. The dependency actually fetched for an identifier
    /// replaces whatever leaf `graph` held for it. The first error of any
    /// kind aborts the run.
    pub fn resolve(mut self, root: Dependencies, mut graph: Graph) -> miette::Result<ResolutionReport> {
        let root_repo = root.project().repository.clone();
        check_set(&root)?;

        let mut visited = VisitedSet::new();
        if let Some(repo) = &root_repo {
            visited.visit(repo);
            if graph.get(repo).is_none() {
                graph.insert(Arc::new(Dep::new("", repo.as_str())));
            }
        }

        let mut visits = Vec::new();
        let mut stack = vec![Frame::new(root, 0, None)];

        while let Some(frame) = stack.last_mut() {
            let Some(dep) = frame.advance() else {
                stack.pop();
                continue;
            };
            let depth = frame.depth;
            let parent = frame.parent.clone();

            self.session.check_cancelled()?;

            if let Some(owner) = visited_owner(&graph, &visited, &dep.import) {
                tracing::debug!("{} is provided by {owner}, skipping", dep.import);
                let visit = Visit::repeat(&dep, depth, parent);
                self.notify(&visit);
                visits.push(visit);
                continue;
            }
            if !visited.visit(&dep.import) {
                tracing::debug!("{} already visited, skipping", dep.import);
                let visit = Visit::repeat(&dep, depth, parent);
                self.notify(&visit);
                visits.push(visit);
                continue;
            }
            graph.insert(Arc::clone(&dep));

            let outcome = dep.fetch(self.session, self.retriever, self.force_refetch)?;
            let checkout = dep
                .switch_to_checkout(self.session, self.retriever)?
                .map(ToString::to_string);

            let visit = Visit {
                key: dep.key.clone(),
                import: dep.import.clone(),
                depth,
                parent,
                retrieved: outcome == FetchOutcome::Retrieved,
                checkout,
                repeat: false,
            };
            self.notify(&visit);
            visits.push(visit);

            if !dep.owns_declaration(self.session) {
                continue;
            }
            if let Some(nested) = dep.load_transitive_deps(self.session, &mut graph)? {
                check_set(&nested)?;
                tracing::debug!(
                    "{} declares {} dependencies at depth {}",
                    dep.import,
                    nested.len(),
                    depth + 1
                );
                stack.push(Frame::new(nested, depth + 1, Some(dep.import.clone())));
            }
        }

        Ok(ResolutionReport::new(root_repo, visits, graph))
    }

    fn notify(&mut self, visit: &Visit) {
        if let Some(observer) = self.observer.as_mut() {
            observer(visit);
        }
    }
}

/// The visited dependency whose tree already holds `import`, when `import`
/// is strictly below it.
fn visited_owner(graph: &Graph, visited: &VisitedSet, import: &str) -> Option<String> {
    let owner = graph.search(import)?;
    (owner.import != import && visited.contains(&owner.import)).then(|| owner.import.clone())
}

fn check_set(set: &Dependencies) -> miette::Result<()> {
    let errors = set.validate(set.project());
    match validation_error(&errors) {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
