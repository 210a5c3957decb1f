//! Shared test utilities for the treedocs test suite.
//!
//! Provides fixture setup, in-memory tree builders and lookup helpers that
//! work with scan and assembly data structures (`DocTree`, `Site`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let tree = scan(tmp.path(), &ScanOptions::default()).unwrap();
//! assert_eq!(doc_ids(&tree)[0], "readme.md");
//!
//! let tree = tree_from_paths(&["README.md", "guide/setup.md", "empty_dir/"]);
//! let site = assemble(&tree, None).unwrap();
//! assert_eq!(page_files(&site), vec!["README.md", "setup.md"]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::assemble::Site;
use crate::tree::{DocTree, Document, NodeId, NodeKind, normalize_id};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/docs/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/docs");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `(relative path, contents)` files under `root`, creating directories.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, contents) in files {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
    }
}

/// Read a generated file from an output directory. Panics if missing.
pub fn read_output(out: &TempDir, relative: &str) -> String {
    let path = out.path().join(relative);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

// =========================================================================
// In-memory trees
// =========================================================================

/// Build a finalized tree from relative paths without touching the disk.
///
/// A path ending in `/` creates an (empty) directory; anything else is a
/// document with empty content.
pub fn tree_from_paths(paths: &[&str]) -> DocTree {
    let docs: Vec<(&str, &str)> = paths.iter().map(|p| (*p, "")).collect();
    tree_from_docs(&docs)
}

/// Build a finalized tree from `(relative path, markdown)` pairs.
pub fn tree_from_docs(docs: &[(&str, &str)]) -> DocTree {
    let root = Path::new("docs");
    let mut tree = DocTree::new(root);

    for (path, raw) in docs {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let is_dir = path.ends_with('/');
        let dir_count = if is_dir { parts.len() } else { parts.len() - 1 };

        let mut parent = DocTree::ROOT;
        for depth in 0..dir_count {
            parent = ensure_dir(&mut tree, parent, &parts[..=depth]);
        }
        if is_dir {
            continue;
        }

        let file_name = parts[parts.len() - 1];
        let base_name = Path::new(file_name)
            .file_stem()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        tree.attach(
            parent,
            normalize_id(&parts.join("/")),
            NodeKind::Document(Document {
                source_path: root.join(path),
                file_name: file_name.to_string(),
                base_name,
                parent_dir: dir_count.checked_sub(1).map(|i| parts[i].to_string()),
                depth: dir_count,
                raw: raw.to_string(),
            }),
        );
    }

    tree.finalize();
    tree
}

fn ensure_dir(tree: &mut DocTree, parent: NodeId, parts: &[&str]) -> NodeId {
    let id = normalize_id(&parts.join("/"));
    if let Some(existing) = tree.find(&id) {
        return existing;
    }
    let name = parts[parts.len() - 1].to_string();
    tree.attach(parent, id, NodeKind::Directory { name })
}

// =========================================================================
// Lookups and extractors
// =========================================================================

/// Node ids of all documents in flattened order.
pub fn doc_ids(tree: &DocTree) -> Vec<String> {
    tree.documents()
        .iter()
        .map(|&id| tree.node(id).id.clone())
        .collect()
}

/// Source file names of all pages in page order.
pub fn page_files(site: &Site) -> Vec<String> {
    site.pages.iter().map(|p| p.file_name.clone()).collect()
}
