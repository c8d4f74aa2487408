use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use gopack_util::errors::GopackError;

/// File name of the dependency declaration at a project root.
pub const DECLARATION_FILE: &str = "gopack.config";

/// The parsed representation of a `gopack.config` file.
///
/// Both tables keep the order in which entries appear in the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Declaration {
    /// Import identifier of the declaring project itself.
    #[serde(default)]
    pub repo: Option<String>,

    #[serde(default)]
    pub deps: IndexMap<String, DepEntry>,

    #[serde(default, rename = "dev-deps")]
    pub dev_deps: IndexMap<String, DepEntry>,
}

/// One `[deps.<key>]` or `[dev-deps.<key>]` record.
///
/// `import` is optional here so a missing identifier surfaces as a
/// validation error alongside every other one instead of aborting the load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepEntry {
    #[serde(default)]
    pub import: Option<String>,
    #[serde(default)]
    pub scm: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

impl Declaration {
    /// Parse a declaration from a string.
    pub fn from_str(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            GopackError::Config {
                message: format!("Failed to parse {DECLARATION_FILE}: {e}"),
            }
            .into()
        })
    }

    /// Total number of declared entries across both tables.
    pub fn len(&self) -> usize {
        self.deps.len() + self.dev_deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
