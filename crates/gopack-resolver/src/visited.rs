//! Identifiers already handled during one resolution run.

use std::collections::HashSet;

/// Tracks which import identifiers have been visited during resolution
/// so diamonds are fetched once and cycles terminate.
#[derive(Debug, Default)]
pub struct VisitedSet {
    visited: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an identifier as visited. Returns `false` if already visited.
    pub fn visit(&mut self, import: &str) -> bool {
        self.visited.insert(import.to_string())
    }

    pub fn contains(&self, import: &str) -> bool {
        self.visited.contains(import)
    }
}
