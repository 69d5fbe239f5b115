//! CLI output formatting.
//!
//! Each report has a `format_*` function returning display lines (pure, no
//! I/O, easy to test) and a `print_*` wrapper that writes them to stdout.
//! Diagnostics that are not part of the report go through `log` instead.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! [#########################                         ]  50%
//! Removed 2 old pages from build
//! index.html → 3 links
//!
//! Skipped
//!     002 key "a/b" contains forbidden character '/'
//!
//! Failed
//!     你好: cannot write page for "你好": Permission denied (os error 13)
//!
//! Generated 2 of 3 pages in build
//! ```
//!
//! ## Check
//!
//! ```text
//! cedict.json: 3 entries
//!     002 key "a/b" contains forbidden character '/'
//! 2 entries can be published
//! ```

use crate::generate::{BuildReport, SkippedEntry};
use std::path::Path;

/// Width of the progress bar in characters. One segment per 2%.
const BAR_WIDTH: usize = 50;

/// Format a 1-based dataset position as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, plural)
    }
}

fn skipped_line(skipped: &SkippedEntry) -> String {
    format!("    {} {}", format_index(skipped.position), skipped.reason)
}

/// One progress bar frame, prefixed with `\r` so it overwrites the previous one.
pub fn format_progress(completed: usize, total: usize) -> String {
    let percent = if total == 0 {
        100
    } else {
        completed.min(total) * 100 / total
    };
    let filled = percent / 2;
    format!(
        "\r[{}{}] {:>3}%",
        "#".repeat(filled),
        " ".repeat(BAR_WIDTH - filled),
        percent
    )
}

/// Format the summary printed after a build.
pub fn format_generate_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    let dir = report.output_dir.display();

    if report.removed > 0 {
        lines.push(format!(
            "Removed {} from {}",
            plural(report.removed, "old page", "old pages"),
            dir
        ));
    }
    lines.push(format!(
        "index.html \u{2192} {}",
        plural(report.dispatched, "link", "links")
    ));

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        lines.extend(report.skipped.iter().map(skipped_line));
    }

    if !report.failures.is_empty() {
        lines.push(String::new());
        lines.push("Failed".to_string());
        for failure in &report.failures {
            lines.push(format!("    {}: {}", failure.key, failure));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {} of {} in {}",
        report.written(),
        plural(report.dispatched, "page", "pages"),
        dir
    ));
    lines
}

/// Print build summary to stdout.
pub fn print_generate_output(report: &BuildReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

/// Format the result of validating a dataset without building it.
pub fn format_check_output(input: &Path, total: usize, skipped: &[SkippedEntry]) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: {}",
        input.display(),
        plural(total, "entry", "entries")
    )];
    lines.extend(skipped.iter().map(skipped_line));
    lines.push(format!(
        "{} can be published",
        plural(total - skipped.len(), "entry", "entries")
    ));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(input: &Path, total: usize, skipped: &[SkippedEntry]) {
    for line in format_check_output(input, total, skipped) {
        println!("{}", line);
    }
}
