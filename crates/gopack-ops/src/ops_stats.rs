//! Operation: source-tree statistics.
//!
//! Walks the project's Go sources, collects their imports and sorts each one
//! into the standard library, the project itself, a declared dependency (via
//! the import graph) or unresolved.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use gopack_core::graph::Graph;
use gopack_core::session::Session;
use gopack_util::errors::GopackError;

/// Paths never analyzed, relative to the project root.
const DEFAULT_EXCLUDES: &[&str] = &[".gopack/**", "**/testdata/**"];

/// Options for `gopack stats`.
#[derive(Debug, Default, Clone)]
pub struct StatsOptions {
    /// Extra glob patterns, relative to the project root, to leave out.
    pub exclude: Vec<String>,
}

/// What the source walk found.
#[derive(Debug, Default, Clone)]
pub struct ProjectStats {
    pub go_files: usize,
    pub test_files: usize,
    /// Directories (relative to the root, `.` for the root) holding Go files.
    pub packages: BTreeSet<String>,
    /// Import path → number of files importing it.
    pub imports: BTreeMap<String, usize>,
}

/// Imports sorted by where they resolve.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub stdlib: BTreeSet<String>,
    pub project: BTreeSet<String>,
    /// Owning dependency's import identifier → imports it satisfies.
    pub vendored: BTreeMap<String, BTreeSet<String>>,
    pub unresolved: BTreeSet<String>,
}

impl ProjectStats {
    /// Walk `root`, skipping hidden and `_`-prefixed directories and anything
    /// matching `exclude`.
    pub fn analyze(root: &Path, exclude: &GlobSet) -> miette::Result<Self> {
        let mut files = Vec::new();
        collect_go_files(root, root, exclude, &mut files)?;
        files.sort();

        let mut stats = Self::default();
        for file in &files {
            let source = std::fs::read_to_string(file).map_err(GopackError::from)?;
            stats.go_files += 1;
            if file
                .file_name()
                .is_some_and(|n| n.to_string_lossy().ends_with("_test.go"))
            {
                stats.test_files += 1;
            }

            let package = file
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(relative_name)
                .unwrap_or_else(|| ".".to_string());
            stats.packages.insert(package);

            let unique: BTreeSet<String> = parse_imports(&source).into_iter().collect();
            for import in unique {
                *stats.imports.entry(import).or_default() += 1;
            }
        }
        Ok(stats)
    }

    /// Resolve every collected import through `graph`.
    ///
    /// Imports whose first segment has no dot are treated as standard
    /// library. Imports owned by the project's own identifier land in
    /// `project`.
    pub fn classify(&self, graph: &Graph, repository: Option<&str>) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for import in self.imports.keys() {
            let first = import.split('/').next().unwrap_or("");
            if !first.contains('.') {
                summary.stdlib.insert(import.clone());
                continue;
            }
            match graph.search(import) {
                Some(dep) if dep.key.is_empty() || Some(dep.import.as_str()) == repository => {
                    summary.project.insert(import.clone());
                }
                Some(dep) => {
                    summary
                        .vendored
                        .entry(dep.import.clone())
                        .or_default()
                        .insert(import.clone());
                }
                None => {
                    summary.unresolved.insert(import.clone());
                }
            }
        }
        summary
    }
}

/// Compile `patterns` plus the built-in excludes.
pub fn exclude_set(patterns: &[String]) -> miette::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for g in DEFAULT_EXCLUDES.iter().copied().chain(patterns.iter().map(String::as_str)) {
        let glob = Glob::new(g).map_err(|e| GopackError::Config {
            message: format!("invalid exclude pattern {g:?}: {e}"),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| {
        GopackError::Generic {
            message: format!("Failed to build exclude set: {e}"),
        }
        .into()
    })
}

/// Analyze the project and print a summary against the resolved `graph`.
pub fn stats(
    session: &Session,
    graph: &Graph,
    repository: Option<&str>,
    opts: &StatsOptions,
) -> miette::Result<()> {
    let exclude = exclude_set(&opts.exclude)?;
    let stats = ProjectStats::analyze(session.project_root(), &exclude)?;
    let summary = stats.classify(graph, repository);
    print!("{}", render_summary(&stats, &summary));
    Ok(())
}

pub fn render_summary(stats: &ProjectStats, summary: &ImportSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Go files:   {} ({} test)", stats.go_files, stats.test_files);
    let _ = writeln!(out, "Packages:   {}", stats.packages.len());
    let _ = writeln!(out, "Imports:    {}", stats.imports.len());
    let _ = writeln!(out, "  stdlib:     {}", summary.stdlib.len());
    let _ = writeln!(out, "  project:    {}", summary.project.len());
    let _ = writeln!(
        out,
        "  vendored:   {}",
        summary.vendored.values().map(BTreeSet::len).sum::<usize>()
    );
    let _ = writeln!(out, "  unresolved: {}", summary.unresolved.len());

    if !summary.vendored.is_empty() {
        out.push_str("\nDependencies in use:\n");
        for (dep, imports) in &summary.vendored {
            let _ = writeln!(out, "  {dep} ({} imports)", imports.len());
        }
    }
    if !summary.unresolved.is_empty() {
        out.push_str("\nUnresolved imports:\n");
        for import in &summary.unresolved {
            let _ = writeln!(out, "  {import}");
        }
    }
    out
}

fn collect_go_files(
    root: &Path,
    dir: &Path,
    exclude: &GlobSet,
    out: &mut Vec<PathBuf>,
) -> miette::Result<()> {
    let entries = std::fs::read_dir(dir).map_err(GopackError::from)?;
    for entry in entries.flatten() {
        let path = entry.path();
        let rel = path.strip_prefix(root).unwrap_or(&path);
        if exclude.is_match(rel) {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        // symlinks are not followed; the project links itself into the vendor tree
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if name.starts_with('.') || name.starts_with('_') {
                continue;
            }
            collect_go_files(root, &path, exclude, out)?;
        } else if file_type.is_file() && name.ends_with(".go") {
            out.push(path);
        }
    }
    Ok(())
}

fn relative_name(path: &Path) -> String {
    let name = path.to_string_lossy().replace('\\', "/");
    if name.is_empty() {
        ".".to_string()
    } else {
        name
    }
}

/// Extract import paths from Go source.
///
/// Handles single imports, parenthesized blocks, aliases (`name`, `_`, `.`)
/// and line comments. Scanning stops at the first top-level declaration.
pub fn parse_imports(source: &str) -> Vec<String> {
    let mut imports = Vec::new();
    let mut in_block = false;
    let mut in_comment = false;

    for raw in source.lines() {
        let mut line = raw.trim();
        if in_comment {
            match line.find("*/") {
                Some(end) => {
                    in_comment = false;
                    line = line[end + 2..].trim();
                }
                None => continue,
            }
        }
        if let Some(start) = line.find("/*") {
            if !line[start..].contains("*/") {
                in_comment = true;
            }
            line = line[..start].trim();
        }
        if let Some(start) = line.find("//") {
            line = line[..start].trim();
        }
        if line.is_empty() {
            continue;
        }

        if in_block {
            if line.starts_with(')') {
                in_block = false;
            } else if let Some(path) = quoted(line) {
                imports.push(path);
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("import") {
            let rest = rest.trim_start();
            if rest.starts_with('(') {
                let inner = rest[1..].trim();
                if let Some(path) = quoted(inner) {
                    imports.push(path);
                }
                in_block = !inner.contains(')');
            } else if let Some(path) = quoted(rest) {
                imports.push(path);
            }
            continue;
        }

        if ["func ", "type ", "var ", "const "]
            .iter()
            .any(|kw| line.starts_with(kw))
        {
            break;
        }
    }
    imports
}

fn quoted(s: &str) -> Option<String> {
    let start = s.find(['"', '`'])?;
    let delim = s[start..].chars().next()?;
    let rest = &s[start + 1..];
    let end = rest.find(delim)?;
    Some(rest[..end].to_string()).filter(|p| !p.is_empty())
}
