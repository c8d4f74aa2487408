//! Operation: display the dependency tree.

use gopack_resolver::ResolutionReport;

/// Options for `gopack dependencytree`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeOptions {
    /// Emit JSON instead of box-drawing text.
    pub json: bool,
}

/// Render the tree of a finished resolution.
pub fn render(report: &ResolutionReport, opts: TreeOptions) -> miette::Result<String> {
    if opts.json {
        let mut out = report.to_json()?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(report.render_tree())
    }
}

/// Print the tree of a finished resolution to stdout.
pub fn tree(report: &ResolutionReport, opts: TreeOptions) -> miette::Result<()> {
    print!("{}", render(report, opts)?);
    Ok(())
}
