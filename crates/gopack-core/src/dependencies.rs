//! Ordered set of dependencies declared by one `gopack.config`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::declaration::Declaration;
use crate::dep::Dep;
use crate::graph::Graph;
use crate::project::{ProjectError, ProjectFacts};

/// Dependencies declared by one project, main entries first, then dev.
///
/// `keys`, `imports` and `deps` are index-aligned. A member is shared with
/// the graph leaf at its import path unless that leaf was registered earlier.
#[derive(Debug)]
pub struct Dependencies {
    keys: Vec<String>,
    imports: Vec<String>,
    deps: Vec<Arc<Dep>>,
    project: ProjectFacts,
}

impl Dependencies {
    /// Build the set for `declaration`, registering its dependencies in `graph`.
    ///
    /// An identifier that already has a leaf keeps it: a nested declaration
    /// never replaces the project's own entry or one registered before it.
    /// Returns `None` when the declaration lists no dependencies.
    pub fn from_declaration(
        declaration: &Declaration,
        project: ProjectFacts,
        graph: &mut Graph,
    ) -> Option<Self> {
        if declaration.is_empty() {
            return None;
        }

        let total = declaration.len();
        let mut set = Self {
            keys: Vec::with_capacity(total),
            imports: Vec::with_capacity(total),
            deps: Vec::with_capacity(total),
            project,
        };

        let main = declaration.deps.iter().map(|(k, e)| (k, e, false));
        let dev = declaration.dev_deps.iter().map(|(k, e)| (k, e, true));
        for (key, entry, is_dev) in main.chain(dev) {
            let dep = Arc::new(Dep::from_entry(key, entry, is_dev));
            if !dep.import.is_empty() && graph.get(&dep.import).is_none() {
                graph.insert(Arc::clone(&dep));
            }
            set.keys.push(key.clone());
            set.imports.push(entry.import.clone().unwrap_or_default());
            set.deps.push(dep);
        }
        Some(set)
    }

    /// Validate every member plus the whole set.
    ///
    /// Never stops at the first failure: each invalid dependency contributes
    /// exactly one error. Members that pass their own checks are then
    /// checked for identifiers declared more than once.
    pub fn validate(&self, project: &ProjectFacts) -> Vec<ProjectError> {
        let mut errors = Vec::new();
        let mut first_seen: HashMap<&str, &str> = HashMap::new();

        for dep in &self.deps {
            if let Err(e) = dep.validate(project) {
                errors.push(e);
                continue;
            }
            if let Some(other) = first_seen.get(dep.import.as_str()) {
                errors.push(ProjectError::new(
                    &dep.key,
                    Some(dep.import.as_str()),
                    "import",
                    format!("already declared by `{other}`"),
                ));
                continue;
            }
            first_seen.insert(&dep.import, &dep.key);
        }
        errors
    }

    /// Apply `routine` to every dependency in declaration order.
    ///
    /// Stops at, and returns, the first error.
    pub fn visit_deps<F>(&self, mut routine: F) -> miette::Result<()>
    where
        F: FnMut(&Arc<Dep>) -> miette::Result<()>,
    {
        for dep in &self.deps {
            routine(dep)?;
        }
        Ok(())
    }

    /// Facts about the project that declared this set.
    pub fn project(&self) -> &ProjectFacts {
        &self.project
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Import identifiers exactly as declared (empty when missing).
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn deps(&self) -> &[Arc<Dep>] {
        &self.deps
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Dep>> {
        self.deps.get(index)
    }

    pub fn len(&self) -> usize {
        self.deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }
}
