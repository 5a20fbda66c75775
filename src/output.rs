//! CLI output formatting.
//!
//! Each command has a `format_*` function returning lines, for testability,
//! and a `print_*` wrapper that writes them to stdout. Format functions do no
//! I/O.
//!
//! ## Scan
//!
//! ```text
//! Layouts
//! 001 default
//!     Source: _layouts/default.html
//! 002 post → default
//!     Source: _layouts/post.html
//!
//! Posts
//! 001 2024-01-01 hello
//!     Source: _posts/2024-01-01-hello.md
//!     Layout: post
//!
//! Pages
//! 001 about.html
//!     Layout: default
//!
//! Assets
//! 001 robots.txt
//!
//! Skipped
//!     bad.html (page): invalid metadata header: ...
//! ```
//!
//! ## Build
//!
//! ```text
//! _posts/2024-01-01-hello.md → 2024/01/01/hello.html
//! about.html → about.html
//!
//! Wrote 2 rendered files, copied 1 asset
//! ```

use crate::render::RenderedObject;
use crate::site::SiteGraph;
use crate::write::WriteSummary;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Format the classified site graph.
///
/// Empty sections are omitted. Layouts show their inheritance chain after the
/// name; posts show their date before the slug.
pub fn format_scan_output(graph: &SiteGraph<'_>) -> Vec<String> {
    let mut lines = Vec::new();

    if !graph.layouts.is_empty() {
        lines.push("Layouts".to_string());
        for (i, entry) in graph.layouts.iter().enumerate() {
            let ancestors = &entry.chain[1.min(entry.chain.len())..];
            let header = if ancestors.is_empty() {
                format!("{} {}", format_index(i + 1), entry.layout.name)
            } else {
                format!(
                    "{} {} → {}",
                    format_index(i + 1),
                    entry.layout.name,
                    ancestors.join(" → ")
                )
            };
            lines.push(header);
            lines.push(format!("{}Source: {}", indent(1), entry.layout.path));
        }
    }

    if !graph.posts.is_empty() {
        push_gap(&mut lines);
        lines.push("Posts".to_string());
        for (i, post) in graph.posts.iter().enumerate() {
            lines.push(format!("{} {} {}", format_index(i + 1), post.date, post.slug));
            lines.push(format!("{}Source: {}", indent(1), post.path));
            if let Some(layout) = post.layout() {
                lines.push(format!("{}Layout: {}", indent(1), layout));
            }
        }
    }

    if !graph.pages.is_empty() {
        push_gap(&mut lines);
        lines.push("Pages".to_string());
        for (i, page) in graph.pages.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), page.path));
            if let Some(layout) = page.layout() {
                lines.push(format!("{}Layout: {}", indent(1), layout));
            }
        }
    }

    if !graph.assets.is_empty() {
        push_gap(&mut lines);
        lines.push("Assets".to_string());
        for (i, asset) in graph.assets.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), asset.path));
        }
    }

    if !graph.skipped.is_empty() {
        push_gap(&mut lines);
        lines.push("Skipped".to_string());
        for skipped in graph.skipped {
            lines.push(format!(
                "{}{} ({}): {}",
                indent(1),
                skipped.path,
                skipped.kind,
                skipped.reason
            ));
        }
    }

    lines
}

fn push_gap(lines: &mut Vec<String>) {
    if !lines.is_empty() {
        lines.push(String::new());
    }
}

/// Print scan output to stdout.
pub fn print_scan_output(graph: &SiteGraph<'_>) {
    for line in format_scan_output(graph) {
        println!("{}", line);
    }
}

/// Format build output: one line per rendered object, then totals.
pub fn format_build_output(rendered: &[RenderedObject], summary: &WriteSummary) -> Vec<String> {
    let mut lines: Vec<String> = rendered
        .iter()
        .map(|r| format!("{} → {}", r.path, r.output_path))
        .collect();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Wrote {}, copied {}",
        plural(summary.rendered, "rendered file", "rendered files"),
        plural(summary.copied, "asset", "assets")
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(rendered: &[RenderedObject], summary: &WriteSummary) {
    for line in format_build_output(rendered, summary) {
        println!("{}", line);
    }
}
