use std::fmt;

use gopack_util::errors::GopackError;

/// What validation needs to know about the project that declares a set of
/// dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFacts {
    /// The declaring project's own import identifier, if it has one.
    pub repository: Option<String>,
}

impl ProjectFacts {
    pub fn new(repository: Option<String>) -> Self {
        Self { repository }
    }

    /// True when `import` is the project itself or one of its sub-packages.
    pub fn owns(&self, import: &str) -> bool {
        match self.repository.as_deref() {
            Some(repo) if !repo.is_empty() => {
                import == repo
                    || import
                        .strip_prefix(repo)
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            _ => false,
        }
    }
}

/// A single validation failure, tied to one field of one declared dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectError {
    /// Declaration key (`foo` in `[deps.foo]`).
    pub key: String,
    /// Import identifier, when the entry has one.
    pub import: Option<String>,
    pub field: &'static str,
    pub message: String,
}

impl ProjectError {
    pub fn new(
        key: impl Into<String>,
        import: Option<&str>,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            import: import.filter(|i| !i.is_empty()).map(String::from),
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ProjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.import {
            Some(import) => write!(
                f,
                "dependency `{}` ({import}): {}: {}",
                self.key, self.field, self.message
            ),
            None => write!(f, "dependency `{}`: {}: {}", self.key, self.field, self.message),
        }
    }
}

/// Fold a batch of validation failures into one error, or `None` if the batch is empty.
pub fn validation_error(errors: &[ProjectError]) -> Option<GopackError> {
    if errors.is_empty() {
        return None;
    }
    let report = errors
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n");
    Some(GopackError::Validation {
        count: errors.len(),
        report,
    })
}
