use std::io::Write;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// Print a Cargo-style status line: `    Updating github.com/x/foo`
///
/// The `label` is right-padded to 12 characters and printed in bold green,
/// followed by the `message` in the default terminal colour.
pub fn status(label: &str, message: &str) {
    let green_bold = Style::new().green().bold();
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        green_bold.apply_to(label),
    );
}

/// Like [`status`] but dimmed, for steps that did no work (cached, skipped).
pub fn status_quiet(label: &str, message: &str) {
    let dim = Style::new().dim();
    let _ = writeln!(std::io::stderr(), "{:>12} {message}", dim.apply_to(label));
}

/// Print every line of `report` in red on stderr.
pub fn error_block(report: &str) {
    let red = Style::new().red();
    let mut err = std::io::stderr();
    for line in report.lines() {
        let _ = writeln!(err, "{}", red.apply_to(line));
    }
}

/// Create an animated spinner with the given message for indeterminate progress.
///
/// The spinner ticks automatically and should be finished with
/// [`ProgressBar::finish_and_clear`].
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
