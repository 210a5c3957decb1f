//! CLI output formatting.
//!
//! Output leads with what a reader of the site sees: positional index and
//! title, in menu order. Source and output paths follow as indented context
//! lines so every entry can be traced back to its file.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Documents
//! 001 README (index)
//!     Source: README.md
//!     Output: README.html
//! 002 Guide
//!     Source: guide/
//!     001 Setup
//!         Source: guide/setup.md
//!         Output: guide_setup.html
//!
//! Empty directories
//!     empty_dir/
//!
//! 2 pages, index: README.html
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 README → README.html (index)
//! 002 Setup → guide_setup.html
//!
//! Generated 2 pages, 5 assets, 2 search entries
//! Site written to site/
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::assemble::Site;
use crate::generate::{BuildReport, Prepared};
use crate::naming::display_title;
use crate::tree::{DocTree, NodeId, NodeKind};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn index_marker(is_index: bool) -> &'static str {
    if is_index { " (index)" } else { "" }
}

/// Path relative to the source root, `/` separated.
fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

// ============================================================================
// Check output
// ============================================================================

/// Format the scanned document tree the way it will appear in the menu.
pub fn format_scan_output(prepared: &Prepared) -> Vec<String> {
    let Prepared { tree, site } = prepared;
    let mut lines = vec!["Documents".to_string()];
    let mut empty = Vec::new();
    walk_tree(tree, site, DocTree::ROOT, "", 0, &mut lines, &mut empty);

    if !empty.is_empty() {
        lines.push(String::new());
        lines.push("Empty directories".to_string());
        for dir in empty {
            lines.push(format!("    {}/", dir));
        }
    }

    lines.push(String::new());
    let index = site
        .index_page()
        .map(|p| p.output_file_name.as_str())
        .unwrap_or("-");
    let noun = if site.pages.len() == 1 { "page" } else { "pages" };
    lines.push(format!("{} {}, index: {}", site.pages.len(), noun, index));
    lines
}

fn walk_tree(
    tree: &DocTree,
    site: &Site,
    id: NodeId,
    path: &str,
    depth: usize,
    lines: &mut Vec<String>,
    empty: &mut Vec<String>,
) {
    let mut position = 0;
    for &child in &tree.node(id).children {
        let node = tree.node(child);
        let child_path = if path.is_empty() {
            node.name().to_string()
        } else {
            format!("{}/{}", path, node.name())
        };
        if !node.content_bearing {
            if !node.is_document() {
                empty.push(child_path);
            }
            continue;
        }
        position += 1;
        let pad = indent(depth);
        match &node.kind {
            NodeKind::Directory { name } => {
                lines.push(format!("{}{} {}", pad, format_index(position), display_title(name)));
                lines.push(format!("{}    Source: {}/", pad, child_path));
                walk_tree(tree, site, child, &child_path, depth + 1, lines, empty);
            }
            NodeKind::Document(doc) => {
                let Some(page) = site.page_for(child) else {
                    continue;
                };
                lines.push(format!(
                    "{}{} {}{}",
                    pad,
                    format_index(position),
                    page.title,
                    index_marker(page.is_index)
                ));
                lines.push(format!(
                    "{}    Source: {}",
                    pad,
                    relative_display(&doc.source_path, tree.root_path())
                ));
                lines.push(format!("{}    Output: {}", pad, page.output_file_name));
            }
            NodeKind::Root => {}
        }
    }
}

/// Print check output to stdout.
pub fn print_scan_output(prepared: &Prepared) {
    for line in format_scan_output(prepared) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the pages written by a build, in page order, plus a summary.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            format!(
                "{} {} \u{2192} {}{}",
                format_index(i + 1),
                page.title,
                page.output,
                index_marker(page.is_index)
            )
        })
        .collect();

    lines.push(String::new());
    lines.push(format!(
        "Generated {} pages, {} assets, {} search entries",
        report.pages.len(),
        report.assets,
        report.search_entries
    ));
    lines.push(format!("Site written to {}", report.target.display()));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
