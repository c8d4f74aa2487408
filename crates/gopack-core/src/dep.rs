//! A single declared dependency and its fetch/checkout behavior.

use std::fmt;
use std::path::PathBuf;

use gopack_util::errors::GopackError;

use crate::config::Config;
use crate::declaration::{DepEntry, DECLARATION_FILE};
use crate::dependencies::Dependencies;
use crate::graph::Graph;
use crate::project::{ProjectError, ProjectFacts};
use crate::retrieve::Retriever;
use crate::session::Session;

/// Version-control system used to retrieve a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScmKind {
    Git,
    Hg,
    Bzr,
    Svn,
}

impl ScmKind {
    /// Parse an explicit `scm = "..."` value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "git" => Some(Self::Git),
            "hg" | "mercurial" => Some(Self::Hg),
            "bzr" | "bazaar" => Some(Self::Bzr),
            "svn" | "subversion" => Some(Self::Svn),
            _ => None,
        }
    }

    /// Guess the kind from the source locator, then the import identifier.
    ///
    /// A `.git`/`.hg`/`.bzr`/`.svn` suffix or a well-known host decides;
    /// anything else is assumed to be git.
    pub fn infer(import: &str, source: Option<&str>) -> Self {
        source
            .and_then(Self::from_locator)
            .or_else(|| Self::from_locator(import))
            .unwrap_or(Self::Git)
    }

    fn from_locator(locator: &str) -> Option<Self> {
        let trimmed = locator.trim_end_matches('/');
        for (suffix, kind) in [
            (".git", Self::Git),
            (".hg", Self::Hg),
            (".bzr", Self::Bzr),
            (".svn", Self::Svn),
        ] {
            if trimmed.ends_with(suffix) {
                return Some(kind);
            }
        }

        let without_scheme = trimmed
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(trimmed);
        let host = without_scheme.split('/').next().unwrap_or("");
        if host == "launchpad.net" || host.ends_with(".launchpad.net") {
            Some(Self::Bzr)
        } else if host.starts_with("hg.") {
            Some(Self::Hg)
        } else if host.starts_with("svn.") {
            Some(Self::Svn)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Hg => "hg",
            Self::Bzr => "bzr",
            Self::Svn => "svn",
        }
    }
}

impl fmt::Display for ScmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which kind of reference a checkout spec pins to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutKind {
    Branch,
    Commit,
    Tag,
}

impl CheckoutKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Branch => "branch",
            Self::Commit => "commit",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for CheckoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pinned reference applied after retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckoutSpec {
    pub kind: CheckoutKind,
    pub value: String,
}

impl fmt::Display for CheckoutSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.value)
    }
}

/// Result of [`Dep::fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The retriever ran.
    Retrieved,
    /// The target path already existed and no re-fetch was forced.
    Cached,
}

/// One declared dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dep {
    /// Declaration key (`foo` in `[deps.foo]`); empty for synthetic entries.
    pub key: String,
    pub import: String,
    /// `None` when an explicit `scm` names no known system.
    pub scm: Option<ScmKind>,
    /// The explicit `scm` value as written, if any.
    pub scm_declared: Option<String>,
    pub source: String,
    pub checkout: Option<CheckoutSpec>,
    /// Checkout specs declared after the first one; any entry here is a validation error.
    pub extra_checkouts: Vec<CheckoutSpec>,
    /// Declared under `[dev-deps]`.
    pub dev: bool,
}

impl Dep {
    /// A dependency with only its identity set; SCM inferred, default source.
    pub fn new(key: impl Into<String>, import: impl Into<String>) -> Self {
        let import = import.into();
        Self {
            key: key.into(),
            scm: Some(ScmKind::infer(&import, None)),
            scm_declared: None,
            source: default_source(&import),
            import,
            checkout: None,
            extra_checkouts: Vec::new(),
            dev: false,
        }
    }

    /// Build a dependency from its declaration entry.
    ///
    /// Structural facts first (identity, SCM kind, source), then the
    /// checkout spec in branch, commit, tag order.
    pub fn from_entry(key: &str, entry: &DepEntry, dev: bool) -> Self {
        let mut dep = Self::new(key, entry.import.as_deref().unwrap_or("").trim());
        dep.dev = dev;
        dep.set_scm(entry.scm.as_deref(), entry.source.as_deref());
        dep.set_source(entry.source.as_deref());

        dep.set_checkout(CheckoutKind::Branch, entry.branch.as_deref());
        dep.set_checkout(CheckoutKind::Commit, entry.commit.as_deref());
        dep.set_checkout(CheckoutKind::Tag, entry.tag.as_deref());
        dep
    }

    pub fn set_scm(&mut self, declared: Option<&str>, source: Option<&str>) {
        self.scm_declared = declared.map(String::from);
        self.scm = match declared {
            Some(name) => ScmKind::parse(name),
            None => Some(ScmKind::infer(&self.import, source)),
        };
    }

    pub fn set_source(&mut self, source: Option<&str>) {
        self.source = match source.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.to_string(),
            None => default_source(&self.import),
        };
    }

    /// Record a checkout spec. The first one declared wins; later ones are
    /// kept aside so validation can reject the entry.
    pub fn set_checkout(&mut self, kind: CheckoutKind, value: Option<&str>) {
        let Some(value) = value else {
            return;
        };
        let spec = CheckoutSpec {
            kind,
            value: value.trim().to_string(),
        };
        if self.checkout.is_none() {
            self.checkout = Some(spec);
        } else {
            self.extra_checkouts.push(spec);
        }
    }

    /// Report the first structural problem with this dependency, if any.
    pub fn validate(&self, project: &ProjectFacts) -> Result<(), ProjectError> {
        let err = |field: &'static str, message: String| -> Result<(), ProjectError> {
            Err(ProjectError::new(&self.key, Some(self.import.as_str()), field, message))
        };

        if self.import.is_empty() {
            return err("import", "missing import identifier".into());
        }
        let bad_segment = |s: &str| s.is_empty() || s == "." || s == "..";
        if self.import.split('/').any(bad_segment)
            || self.import.contains(char::is_whitespace)
            || self.import.contains('\\')
        {
            return err(
                "import",
                format!("malformed import identifier `{}`", self.import),
            );
        }
        if project.owns(&self.import) {
            return err("import", "refers to the project itself".into());
        }
        if self.scm.is_none() {
            let declared = self.scm_declared.as_deref().unwrap_or("");
            return err(
                "scm",
                format!("unknown scm `{declared}` (expected git, hg, bzr or svn)"),
            );
        }
        if let Some(first) = &self.checkout {
            if let Some(extra) = self.extra_checkouts.first() {
                return err(
                    "checkout",
                    format!(
                        "declares both {} `{}` and {} `{}`; pick one",
                        first.kind, first.value, extra.kind, extra.value
                    ),
                );
            }
            if first.value.is_empty() {
                return err("checkout", format!("empty {}", first.kind));
            }
        }
        Ok(())
    }

    /// Where this dependency lives inside the vendor workspace.
    pub fn src_path(&self, session: &Session) -> Result<PathBuf, GopackError> {
        session.src_path(&self.import)
    }

    /// Retrieve the dependency unless it is already on disk.
    ///
    /// With `force_refetch` false an existing target path short-circuits the
    /// retrieval; its contents are not inspected. With `force_refetch` true
    /// the retriever always runs.
    pub fn fetch(
        &self,
        session: &Session,
        retriever: &dyn Retriever,
        force_refetch: bool,
    ) -> miette::Result<FetchOutcome> {
        let dest = self.src_path(session)?;
        if !force_refetch && dest.exists() {
            tracing::debug!("{} present at {}, skipping", self.import, dest.display());
            return Ok(FetchOutcome::Cached);
        }

        session.check_cancelled()?;
        tracing::info!("Retrieving {} from {} ({})", self.import, self.source, self.scm_name());
        retriever.retrieve(self, &dest, session)?;
        Ok(FetchOutcome::Retrieved)
    }

    /// Pin the working copy to the declared checkout spec, if there is one.
    pub fn switch_to_checkout(
        &self,
        session: &Session,
        retriever: &dyn Retriever,
    ) -> miette::Result<Option<&CheckoutSpec>> {
        let Some(spec) = &self.checkout else {
            return Ok(None);
        };
        session.check_cancelled()?;
        retriever.checkout(self, spec, &self.src_path(session)?, session)?;
        Ok(Some(spec))
    }

    /// True when the vendored copy carries its own `gopack.config`.
    pub fn owns_declaration(&self, session: &Session) -> bool {
        self.src_path(session)
            .is_ok_and(|dir| dir.join(DECLARATION_FILE).is_file())
    }

    /// Parse this dependency's own declaration into a new set on `graph`.
    ///
    /// Returns `None` when the nested declaration lists no dependencies.
    pub fn load_transitive_deps(
        &self,
        session: &Session,
        graph: &mut Graph,
    ) -> miette::Result<Option<Dependencies>> {
        let config = Config::load(&self.src_path(session)?)?;
        let owner = config
            .repository
            .clone()
            .unwrap_or_else(|| self.import.clone());
        Ok(Dependencies::from_declaration(
            config.declaration(),
            ProjectFacts::new(Some(owner)),
            graph,
        ))
    }

    fn scm_name(&self) -> &str {
        self.scm.map(|s| s.name()).unwrap_or("unknown")
    }
}

fn default_source(import: &str) -> String {
    if import.is_empty() {
        String::new()
    } else {
        format!("https://{import}")
    }
}
