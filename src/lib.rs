//! # treedocs
//!
//! A static documentation site generator. Point it at a directory of markdown
//! files and it produces one HTML page per document, a sidebar menu that nests
//! exactly like the source directories, a per-page table of contents and a
//! client-side search index.
//!
//! # Architecture: Scan, Assemble, Render
//!
//! ```text
//! 1. Scan      docs/     →  DocTree      (filesystem → document tree)
//! 2. Assemble  DocTree   →  Site         (ordered pages, titles, index page)
//! 3. Render    Site      →  site/        (HTML pages, assets, search data)
//! ```
//!
//! The [`tree::DocTree`] built in stage 1 is the backbone of everything after
//! it: page order is its depth-first document order, and the menu is rendered
//! by recursing over it, so the navigation always has the same shape as the
//! source directories. The tree is finalized (sorted, flattened order cached)
//! once the scan completes and read-only afterwards, which lets pages render
//! in parallel.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`tree`] | Arena-backed document tree: content-bearing flags, sibling order, flattened view |
//! | [`scan`] | Stage 1: walks the source directory into a [`tree::DocTree`] |
//! | [`assemble`] | Stage 2: page list, titles, output file names, index selection |
//! | [`naming`] | Display titles and output file names derived from source names |
//! | [`markup`] | Markdown → headings + HTML via pulldown-cmark, unique heading ids |
//! | [`toc`] | Per-page table of contents from heading tokens |
//! | [`render`] | Stage 3: Maud templates for pages and the tree-shaped menu |
//! | [`search`] | Search data accumulated per page and emitted as `js/searchIndex.js` |
//! | [`assets`] | Embedded stylesheet, script and icons; user asset copying |
//! | [`generate`] | Runs the pipeline and writes the site |
//! | [`config`] | `treedocs.toml` loading, CLI overrides, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## The Filesystem Is the Table of Contents
//!
//! There is no front-matter and no ordering file. Titles come from file and
//! directory names (`getting-started.md` → "Getting Started"), and siblings are
//! ordered documents first, then sub-directories, each alphabetically. Renaming
//! a file is all it takes to re-title or reorder a page.
//!
//! ## Flat Output
//!
//! Every page lands directly in the output directory as
//! `{parent dir}_{name}.html`, so all relative links to `css/`, `js/` and other
//! pages work the same from every page. Two documents that would end up in the
//! same file are reported as an error instead of silently overwriting each
//! other.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): templates are
//! checked at compile time and every interpolated title or heading is escaped.

pub mod assemble;
pub mod assets;
pub mod config;
pub mod generate;
pub mod markup;
pub mod naming;
pub mod output;
pub mod render;
pub mod scan;
pub mod search;
pub mod toc;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_helpers;
