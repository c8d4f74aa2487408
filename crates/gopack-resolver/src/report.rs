//! What a resolution run did, and the dependency tree derived from it.

use std::fmt::Write as _;

use gopack_core::dep::Dep;
use gopack_core::graph::Graph;
use serde::Serialize;

/// One dependency reached during a run, in visiting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visit {
    pub key: String,
    pub import: String,
    /// 0 for dependencies declared by the project itself.
    pub depth: usize,
    /// Import identifier of the dependency whose declaration listed this one.
    pub parent: Option<String>,
    /// The retriever ran (as opposed to reusing an existing copy).
    pub retrieved: bool,
    /// Checkout spec applied, rendered as `kind value`.
    pub checkout: Option<String>,
    /// Already handled earlier in the run; nothing was fetched or expanded.
    pub repeat: bool,
}

impl Visit {
    pub(crate) fn repeat(dep: &Dep, depth: usize, parent: Option<String>) -> Self {
        Self {
            key: dep.key.clone(),
            import: dep.import.clone(),
            depth,
            parent,
            retrieved: false,
            checkout: None,
            repeat: true,
        }
    }
}

/// A node of the rendered dependency tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub import: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout: Option<String>,
    pub repeat: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TreeNode>,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    root: Option<&'a str>,
    dependencies: Vec<TreeNode>,
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct ResolutionReport {
    root: Option<String>,
    visits: Vec<Visit>,
    graph: Graph,
}

impl ResolutionReport {
    pub fn new(root: Option<String>, visits: Vec<Visit>, graph: Graph) -> Self {
        Self {
            root,
            visits,
            graph,
        }
    }

    /// The project's own identifier, when it declares one.
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Every visit in depth-first pre-order.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// The import graph built during the run.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Number of dependencies the retriever actually ran for.
    pub fn retrieved_count(&self) -> usize {
        self.visits.iter().filter(|v| v.retrieved).count()
    }

    /// Number of distinct dependencies resolved (repeats excluded).
    pub fn resolved_count(&self) -> usize {
        self.visits.iter().filter(|v| !v.repeat).count()
    }

    /// Top-level dependencies, in declaration order.
    pub fn top_level(&self) -> impl Iterator<Item = &Visit> {
        self.visits.iter().filter(|v| v.depth == 0)
    }

    /// Rebuild the nesting from the pre-order visit list.
    pub fn tree(&self) -> Vec<TreeNode> {
        let mut roots = Vec::new();
        // open[i] is the most recent node at depth i still accepting children
        let mut open: Vec<TreeNode> = Vec::new();

        for visit in &self.visits {
            while open.len() > visit.depth {
                close_last(&mut open, &mut roots);
            }
            open.push(TreeNode {
                import: visit.import.clone(),
                checkout: visit.checkout.clone(),
                repeat: visit.repeat,
                dependencies: Vec::new(),
            });
        }
        while !open.is_empty() {
            close_last(&mut open, &mut roots);
        }
        roots
    }

    /// Render the tree with box-drawing connectors.
    ///
    /// Repeats are marked with `(*)`; their subtree is shown where they were
    /// first reached.
    pub fn render_tree(&self) -> String {
        let mut output = String::new();
        let label = self.root.as_deref().unwrap_or("(project)");
        output.push_str(&format!("{label}\n"));

        let roots = self.tree();
        let count = roots.len();
        for (i, node) in roots.iter().enumerate() {
            print_subtree(&mut output, node, "", i == count - 1);
        }
        output
    }

    /// The tree as pretty-printed JSON.
    pub fn to_json(&self) -> miette::Result<String> {
        let report = JsonReport {
            root: self.root.as_deref(),
            dependencies: self.tree(),
        };
        serde_json::to_string_pretty(&report).map_err(|e| miette::miette!("Failed to serialize tree: {e}"))
    }
}

fn close_last(open: &mut Vec<TreeNode>, roots: &mut Vec<TreeNode>) {
    let Some(node) = open.pop() else {
        return;
    };
    match open.last_mut() {
        Some(parent) => parent.dependencies.push(node),
        None => roots.push(node),
    }
}

fn print_subtree(output: &mut String, node: &TreeNode, prefix: &str, is_last: bool) {
    let connector = if is_last { "└── " } else { "├── " };
    let _ = write!(output, "{prefix}{connector}{}", node.import);
    if let Some(checkout) = &node.checkout {
        let _ = write!(output, " [{checkout}]");
    }
    if node.repeat {
        output.push_str(" (*)");
    }
    output.push('\n');

    let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
    let count = node.dependencies.len();
    for (i, child) in node.dependencies.iter().enumerate() {
        print_subtree(output, child, &child_prefix, i == count - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(import: &str, depth: usize, repeat: bool) -> Visit {
        Visit {
            key: import.rsplit('/').next().unwrap_or(import).to_string(),
            import: import.to_string(),
            depth,
            parent: None,
            retrieved: !repeat,
            checkout: None,
            repeat,
        }
    }

    fn report(visits: Vec<Visit>) -> ResolutionReport {
        ResolutionReport::new(Some("github.com/me/app".into()), visits, Graph::new())
    }

    #[test]
    fn tree_nesting_from_preorder() {
        let r = report(vec![
            visit("x/a", 0, false),
            visit("x/b", 1, false),
            visit("x/c", 2, false),
            visit("x/d", 1, false),
            visit("x/e", 0, false),
        ]);
        let tree = r.tree();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].import, "x/a");
        assert_eq!(tree[0].dependencies.len(), 2);
        assert_eq!(tree[0].dependencies[0].dependencies[0].import, "x/c");
        assert_eq!(tree[0].dependencies[1].import, "x/d");
        assert!(tree[1].dependencies.is_empty());
    }

    #[test]
    fn render_marks_repeats_and_checkouts() {
        let mut pinned = visit("x/a", 0, false);
        pinned.checkout = Some("branch dev".into());
        let r = report(vec![pinned, visit("x/b", 1, false), visit("x/b", 0, true)]);
        let expected = "\
github.com/me/app
├── x/a [branch dev]
│   └── x/b
└── x/b (*)
";
        assert_eq!(r.render_tree(), expected);
    }

    #[test]
    fn empty_report_renders_label_only() {
        let r = ResolutionReport::new(None, Vec::new(), Graph::new());
        assert_eq!(r.render_tree(), "(project)\n");
        assert_eq!(r.retrieved_count(), 0);
    }

    #[test]
    fn json_shape() {
        let r = report(vec![visit("x/a", 0, false), visit("x/b", 1, false)]);
        let value: serde_json::Value = serde_json::from_str(&r.to_json().unwrap()).unwrap();
        assert_eq!(value["root"], "github.com/me/app");
        assert_eq!(value["dependencies"][0]["import"], "x/a");
        assert_eq!(value["dependencies"][0]["dependencies"][0]["import"], "x/b");
        assert!(value["dependencies"][0].get("checkout").is_none());
    }

    #[test]
    fn counts() {
        let r = report(vec![
            visit("x/a", 0, false),
            visit("x/b", 1, false),
            visit("x/a", 1, true),
        ]);
        assert_eq!(r.retrieved_count(), 2);
        assert_eq!(r.resolved_count(), 2);
        assert_eq!(r.top_level().count(), 1);
    }
}
