//! Helpers for gopack's integration tests.
//!
//! [`RecordingRetriever`] stands in for a VCS: it materializes each
//! dependency as a directory, optionally holding a canned declaration, and
//! records every call. [`ScratchProject`] is a throwaway project directory.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use gopack_core::config::Config;
use gopack_core::declaration::DECLARATION_FILE;
use gopack_core::dep::{CheckoutSpec, Dep};
use gopack_core::dependencies::Dependencies;
use gopack_core::graph::Graph;
use gopack_core::retrieve::Retriever;
use gopack_core::session::Session;
use gopack_util::errors::GopackError;
use tempfile::TempDir;

#[derive(Debug, Default)]
pub struct RecordingRetriever {
    nested: HashMap<String, String>,
    fail: Option<String>,
    cancel_after: Option<usize>,
    retrieved: RefCell<Vec<String>>,
    checkouts: RefCell<Vec<(String, String)>>,
}

impl RecordingRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `import` its own declaration once retrieved.
    pub fn with_nested(mut self, import: &str, declaration: &str) -> Self {
        self.nested.insert(import.to_string(), declaration.to_string());
        self
    }

    /// Make retrieval of `import` fail.
    pub fn failing_on(mut self, import: &str) -> Self {
        self.fail = Some(import.to_string());
        self
    }

    /// Cancel the session once `count` retrievals have completed.
    pub fn cancel_after(mut self, count: usize) -> Self {
        self.cancel_after = Some(count);
        self
    }

    /// Imports retrieved so far, in order.
    pub fn retrieved(&self) -> Vec<String> {
        self.retrieved.borrow().clone()
    }

    pub fn retrieve_count(&self) -> usize {
        self.retrieved.borrow().len()
    }

    /// `(import, "kind value")` for every checkout applied.
    pub fn checkouts(&self) -> Vec<(String, String)> {
        self.checkouts.borrow().clone()
    }
}

impl Retriever for RecordingRetriever {
    fn retrieve(&self, dep: &Dep, dest: &Path, session: &Session) -> miette::Result<()> {
        if self.fail.as_deref() == Some(dep.import.as_str()) {
            return Err(GopackError::Retrieval {
                message: format!("{} is unreachable", dep.import),
            }
            .into());
        }
        std::fs::create_dir_all(dest).map_err(GopackError::from)?;
        if let Some(decl) = self.nested.get(&dep.import) {
            std::fs::write(dest.join(DECLARATION_FILE), decl).map_err(GopackError::from)?;
        }
        self.retrieved.borrow_mut().push(dep.import.clone());
        if self.cancel_after == Some(self.retrieve_count()) {
            session.cancel.cancel();
        }
        Ok(())
    }

    fn checkout(
        &self,
        dep: &Dep,
        spec: &CheckoutSpec,
        _dest: &Path,
        _session: &Session,
    ) -> miette::Result<()> {
        self.checkouts
            .borrow_mut()
            .push((dep.import.clone(), spec.to_string()));
        Ok(())
    }
}

/// A temporary project whose `gopack.config` holds a given declaration.
pub struct ScratchProject {
    pub dir: TempDir,
    pub session: Session,
}

impl ScratchProject {
    /// Panics if the scratch directory cannot be set up.
    pub fn new(declaration: &str) -> Self {
        let dir = TempDir::new().expect("create scratch project");
        std::fs::write(dir.path().join(DECLARATION_FILE), declaration)
            .expect("write scratch declaration");
        let session = Session::new(dir.path());
        Self { dir, session }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> miette::Result<Config> {
        Config::load(self.dir.path())
    }

    /// The top-level dependency set and the graph it was registered on.
    pub fn model(&self) -> miette::Result<(Dependencies, Graph)> {
        let mut graph = Graph::new();
        let deps = self
            .config()?
            .load_dependency_model(&mut graph)
            .ok_or_else(|| miette::miette!("declaration lists no dependencies"))?;
        Ok((deps, graph))
    }
}
