//! Explicit context for one resolution run.
//!
//! Everything the run needs to know about where things live on disk, plus the
//! cancellation token and retrieval timeout, travels in a [`Session`] instead
//! of process-wide variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use gopack_util::errors::GopackError;
use tokio_util::sync::CancellationToken;

use crate::declaration::DECLARATION_FILE;

/// Default vendor workspace, relative to the project root.
pub const DEFAULT_VENDOR_DIR: &str = ".gopack/vendor";

/// Checksum marker, relative to the project root.
pub const CHECKSUM_FILE: &str = ".gopack/checksum";

/// Environment variable overriding the project root.
pub const APP_CONFIG_ENV: &str = "GOPACK_APP_CONFIG";

#[derive(Debug, Clone)]
pub struct Session {
    project_root: PathBuf,
    vendor_dir: PathBuf,
    pub cancel: CancellationToken,
    pub fetch_timeout: Option<Duration>,
}

impl Session {
    /// A session rooted at `project_root` using the default vendor workspace.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let vendor_dir = project_root.join(DEFAULT_VENDOR_DIR);
        Self {
            project_root,
            vendor_dir,
            cancel: CancellationToken::new(),
            fetch_timeout: None,
        }
    }

    /// Build a session from the process environment.
    ///
    /// The project root is `$GOPACK_APP_CONFIG` when set, otherwise `cwd`.
    /// The vendor workspace follows the first `$GOPATH` entry when set.
    pub fn from_env(cwd: &Path) -> Self {
        let root = std::env::var_os(APP_CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| cwd.to_path_buf());
        let gopath = std::env::var("GOPATH").ok();
        let vendor = vendor_dir_for(&root, gopath.as_deref());
        tracing::debug!(
            "Project root {}, vendor workspace {}",
            root.display(),
            vendor.display()
        );
        Self::new(root).with_vendor_dir(vendor)
    }

    pub fn with_vendor_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.vendor_dir = dir.into();
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Fail with [`GopackError::Cancelled`] once the run has been cancelled.
    pub fn check_cancelled(&self) -> Result<(), GopackError> {
        if self.cancel.is_cancelled() {
            Err(GopackError::Cancelled)
        } else {
            Ok(())
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Root of the vendor workspace; child `go` processes see it as `GOPATH`.
    pub fn vendor_dir(&self) -> &Path {
        &self.vendor_dir
    }

    /// `<vendor>/src`, under which every dependency lands at its import path.
    pub fn src_dir(&self) -> PathBuf {
        self.vendor_dir.join("src")
    }

    /// Target directory of a dependency: `<vendor>/src/<import>`.
    ///
    /// Empty segments are skipped. A `.` or `..` segment, or one holding a
    /// backslash, is refused so the result always stays under [`Self::src_dir`].
    pub fn src_path(&self, import: &str) -> Result<PathBuf, GopackError> {
        let mut path = self.src_dir();
        for segment in import.split('/').filter(|s| !s.is_empty()) {
            if segment == "." || segment == ".." || segment.contains('\\') {
                return Err(GopackError::Config {
                    message: format!("import path {import:?} leaves the vendor workspace"),
                });
            }
            path.push(segment);
        }
        Ok(path)
    }

    pub fn declaration_path(&self) -> PathBuf {
        self.project_root.join(DECLARATION_FILE)
    }

    pub fn checksum_path(&self) -> PathBuf {
        self.project_root.join(CHECKSUM_FILE)
    }
}

/// Pick the vendor workspace for `project_root` given the value of `$GOPATH`.
///
/// The first non-empty `GOPATH` entry wins; relative entries are taken
/// relative to the project root. Without one, `.gopack/vendor` is used.
pub fn vendor_dir_for(project_root: &Path, gopath: Option<&str>) -> PathBuf {
    let first = gopath
        .and_then(|p| std::env::split_paths(p).next())
        .filter(|p| !p.as_os_str().is_empty());
    match first {
        Some(entry) if entry.is_absolute() => entry,
        Some(entry) => project_root.join(entry),
        None => project_root.join(DEFAULT_VENDOR_DIR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let s = Session::new("/work/app");
        assert_eq!(s.vendor_dir(), Path::new("/work/app/.gopack/vendor"));
        assert_eq!(s.src_dir(), PathBuf::from("/work/app/.gopack/vendor/src"));
        assert_eq!(s.checksum_path(), PathBuf::from("/work/app/.gopack/checksum"));
        assert_eq!(
            s.declaration_path(),
            PathBuf::from("/work/app/gopack.config")
        );
    }

    #[test]
    fn src_path_follows_import_segments() {
        let s = Session::new("/work/app");
        assert_eq!(
            s.src_path("github.com/x/foo").unwrap(),
            PathBuf::from("/work/app/.gopack/vendor/src/github.com/x/foo")
        );
    }

    #[test]
    fn src_path_refuses_to_leave_vendor_tree() {
        let s = Session::new("/work/app");
        for import in [
            "example.org/../../../..",
            "../outside",
            "example.org/./x",
            "example.org\\..\\x",
        ] {
            assert!(s.src_path(import).is_err(), "{import}");
        }
    }

    #[test]
    fn cancellation_is_shared_between_clones() {
        let s = Session::new("/work/app");
        let other = s.clone();
        assert!(s.check_cancelled().is_ok());
        other.cancel.cancel();
        assert!(matches!(s.check_cancelled(), Err(GopackError::Cancelled)));
    }

    #[test]
    fn vendor_dir_without_gopath() {
        assert_eq!(
            vendor_dir_for(Path::new("/p"), None),
            PathBuf::from("/p/.gopack/vendor")
        );
        assert_eq!(
            vendor_dir_for(Path::new("/p"), Some("")),
            PathBuf::from("/p/.gopack/vendor")
        );
    }

    #[cfg(unix)]
    #[test]
    fn vendor_dir_uses_first_gopath_entry() {
        assert_eq!(
            vendor_dir_for(Path::new("/p"), Some("/go/one:/go/two")),
            PathBuf::from("/go/one")
        );
        assert_eq!(
            vendor_dir_for(Path::new("/p"), Some("deps")),
            PathBuf::from("/p/deps")
        );
    }
}
