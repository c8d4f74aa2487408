//! The project's declaration file and the checksum gate built on it.
//!
//! The gate compares the MD5 of the declaration against the hash recorded at
//! the end of the last fully successful run. The marker is written only after
//! such a run, so any failure leaves it untouched and the next run re-fetches.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gopack_util::errors::GopackError;
use gopack_util::hash::md5_bytes;

use crate::declaration::{Declaration, DECLARATION_FILE};
use crate::dep::Dep;
use crate::dependencies::Dependencies;
use crate::graph::Graph;
use crate::project::ProjectFacts;
use crate::session::Session;

#[derive(Debug)]
pub struct Config {
    /// Path to the declaration file.
    pub path: PathBuf,
    /// The project's own import identifier, e.g. `github.com/d2fn/gopack`.
    pub repository: Option<String>,
    declaration: Declaration,
    content: Vec<u8>,
    checksum: OnceCell<String>,
}

impl Config {
    /// Load `gopack.config` from the project directory `dir`.
    pub fn load(dir: &Path) -> miette::Result<Self> {
        Self::from_path(&dir.join(DECLARATION_FILE))
    }

    fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read(path).map_err(|e| GopackError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        let text = std::str::from_utf8(&content).map_err(|e| GopackError::Config {
            message: format!("{} is not valid UTF-8: {e}", path.display()),
        })?;
        let declaration = Declaration::from_str(text)?;
        let repository = declaration
            .repo
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from);

        Ok(Self {
            path: path.to_path_buf(),
            repository,
            declaration,
            content,
            checksum: OnceCell::new(),
        })
    }

    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    pub fn project_facts(&self) -> ProjectFacts {
        ProjectFacts::new(self.repository.clone())
    }

    /// Hex MD5 of the declaration as it was loaded. Computed once.
    pub fn checksum(&self) -> &str {
        self.checksum.get_or_init(|| md5_bytes(&self.content))
    }

    /// True when `marker` is missing or records a different hash.
    ///
    /// An unreadable marker counts as modified.
    pub fn modified_checksum(&self, marker: &Path) -> bool {
        match std::fs::read_to_string(marker) {
            Ok(stored) => stored.trim() != self.checksum(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                tracing::warn!("Failed to read checksum marker {}: {e}", marker.display());
                true
            }
        }
    }

    /// Record the current hash in `marker`. Call only after a fully successful run.
    pub fn write_checksum(&self, marker: &Path) -> miette::Result<()> {
        gopack_util::fs::write_atomic(marker, self.checksum().as_bytes()).map_err(|e| {
            GopackError::Generic {
                message: format!("Failed to write checksum marker {}: {e}", marker.display()),
            }
            .into()
        })
    }

    /// Make the project addressable through its own import identifier.
    ///
    /// Links `<vendor>/src/<repo>` to the project root (an existing link is
    /// kept) and registers a synthetic dependency for it in `graph`. Does
    /// nothing when the declaration has no `repo`.
    pub fn init_repo(&self, session: &Session, graph: &mut Graph) -> miette::Result<()> {
        let Some(repo) = &self.repository else {
            return Ok(());
        };

        let link = session.src_path(repo)?;
        gopack_util::fs::symlink_dir(session.project_root(), &link).map_err(|e| {
            GopackError::Generic {
                message: format!(
                    "Failed to link {} to {}: {e}",
                    link.display(),
                    session.project_root().display()
                ),
            }
        })?;

        graph.insert(Arc::new(Dep::new("", repo.as_str())));
        Ok(())
    }

    /// Build the top-level dependency set on `graph`, or `None` if nothing is declared.
    pub fn load_dependency_model(&self, graph: &mut Graph) -> Option<Dependencies> {
        Dependencies::from_declaration(&self.declaration, self.project_facts(), graph)
    }
}
