//! Prefix trie over import-identifier segments.
//!
//! Every known dependency is registered at its import path. A lookup stops at
//! the first leaf it reaches, so any sub-package path resolves to the
//! dependency that owns it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::dep::Dep;

/// Import-identifier trie for one resolution run.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: HashMap<String, Node>,
}

/// One path segment in the trie. A node is a leaf iff it holds a dependency.
#[derive(Debug)]
pub struct Node {
    key: String,
    dependency: Option<Arc<Dep>>,
    nodes: HashMap<String, Node>,
}

impl Node {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            dependency: None,
            nodes: HashMap::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_leaf(&self) -> bool {
        self.dependency.is_some()
    }

    pub fn dependency(&self) -> Option<&Arc<Dep>> {
        self.dependency.as_ref()
    }

    fn count_leaves(&self) -> usize {
        usize::from(self.is_leaf()) + self.nodes.values().map(Node::count_leaves).sum::<usize>()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `dep` at its import path, creating intermediate nodes.
    ///
    /// Inserting an identifier that is already present replaces the
    /// dependency held by its leaf; the shape of the trie does not change.
    pub fn insert(&mut self, dep: Arc<Dep>) {
        let mut segments = segments(&dep.import);
        let Some(first) = segments.next() else {
            return;
        };
        let mut node = self
            .nodes
            .entry(first.to_string())
            .or_insert_with(|| Node::new(first));
        for segment in segments {
            node = node
                .nodes
                .entry(segment.to_string())
                .or_insert_with(|| Node::new(segment));
        }
        node.dependency = Some(dep);
    }

    /// Find the dependency owning `import`.
    ///
    /// Walks the trie segment by segment and returns the dependency of the
    /// first leaf reached, even when that leaf's identifier is a strict
    /// prefix of `import`. Returns `None` if a segment is missing first.
    pub fn search(&self, import: &str) -> Option<&Arc<Dep>> {
        let mut nodes = &self.nodes;
        for segment in segments(import) {
            let node = nodes.get(segment)?;
            if let Some(dep) = &node.dependency {
                return Some(dep);
            }
            nodes = &node.nodes;
        }
        None
    }

    /// The dependency registered at exactly `import`, ignoring owners above it.
    pub fn get(&self, import: &str) -> Option<&Arc<Dep>> {
        let mut segments = segments(import);
        let mut node = self.nodes.get(segments.next()?)?;
        for segment in segments {
            node = node.nodes.get(segment)?;
        }
        node.dependency.as_ref()
    }

    /// Number of registered dependencies (leaves).
    pub fn len(&self) -> usize {
        self.nodes.values().map(Node::count_leaves).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn segments(import: &str) -> impl Iterator<Item = &str> {
    import.split('/').filter(|s| !s.is_empty())
}
