//! Filesystem scanning.
//!
//! Stage 1 of the treedocs build pipeline. Walks the source directory and
//! materializes a [`DocTree`] mirroring it: directories become inner nodes and
//! markdown documents become leaves carrying their raw content.
//!
//! ## Source Layout
//!
//! ```text
//! docs/                         # Source root
//! ├── treedocs.toml             # Site configuration (optional)
//! ├── README.md                 # Root document, default index page
//! ├── assets/                   # Copied verbatim to the output, never scanned
//! ├── guide/
//! │   ├── setup.md
//! │   └── advanced/
//! │       └── tips.md
//! ├── drafts/                   # Skipped with `--exclude drafts`
//! └── empty_dir/                # No documents: left out of every listing
//! ```
//!
//! ## Rules
//!
//! - Documents are files with a `.md` or `.markdown` extension (any case).
//!   Everything else is ignored.
//! - Entries starting with `.` are hidden and never scanned.
//! - Symbolic links to directories are not followed; a link to a markdown
//!   file is read like the file itself.
//! - Documents that are not valid UTF-8 are read with the invalid bytes
//!   replaced.
//! - Directory filters match against `{source}/{relative/path}`: a directory
//!   matching `exclude` is skipped with everything below it; when `include`
//!   is set, directories not matching it are skipped.
//! - Two siblings whose names only differ by case are rejected, since they
//!   would share a node id.
//!
//! Sibling directories are scanned in parallel. Each recursion returns its
//! subtree as an owned value, so the tree itself is only touched once all of
//! them have returned; the final sort makes the result independent of
//! listing and completion order.

use crate::config::{ConfigError, SiteConfig};
use crate::tree::{DocTree, Document, NodeId, NodeKind, normalize_id};
use rayon::prelude::*;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions recognised as documents, compared case-insensitively.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["md", "markdown"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("The source folder \"{}\" has no markdown files.", .0.display())]
    NoDocuments(PathBuf),
    #[error("{} and {} only differ by case", .first.display(), .second.display())]
    CaseCollision { first: PathBuf, second: PathBuf },
}

impl ScanError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> ScanError + '_ {
        move |source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Which directories the scanner descends into.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub include: Option<Regex>,
    pub exclude: Option<Regex>,
    /// Directory names directly under the source root that are never scanned.
    pub skip_dirs: Vec<String>,
}

impl ScanOptions {
    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            include: config.include_pattern()?,
            exclude: config.exclude_pattern()?,
            skip_dirs: vec![config.assets_dir.clone()],
        })
    }

    /// Whether a directory at `path` passes the filters. Exclude is checked first.
    pub fn accepts_dir(&self, path: &str) -> bool {
        if self.exclude.as_ref().is_some_and(|re| re.is_match(path)) {
            return false;
        }
        if self.include.as_ref().is_some_and(|re| !re.is_match(path)) {
            return false;
        }
        true
    }
}

/// Scanned entry with its subtree, not yet attached to a tree.
#[derive(Debug)]
enum Entry {
    Directory {
        name: String,
        relative: String,
        children: Vec<Entry>,
    },
    Document {
        relative: String,
        document: Document,
    },
}

/// A directory waiting to be scanned.
struct PendingDir {
    name: String,
    path: PathBuf,
    relative: String,
}

/// Scan `root` into a finalized document tree.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<DocTree, ScanError> {
    let prefix = root.to_string_lossy().replace('\\', "/");
    let walker = Walker {
        filter_prefix: prefix.trim_end_matches('/'),
        options,
    };
    let entries = walker.scan_directory(root, "", None, 0)?;

    let mut tree = DocTree::new(root);
    graft(&mut tree, DocTree::ROOT, entries);
    tree.finalize();

    if !tree.root().content_bearing {
        return Err(ScanError::NoDocuments(root.to_path_buf()));
    }
    tracing::debug!(
        root = %root.display(),
        nodes = tree.node_count(),
        documents = tree.documents().len(),
        "scan completed"
    );
    Ok(tree)
}

/// Whether a file name carries a document extension.
pub fn is_document(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| DOCUMENT_EXTENSIONS.iter().any(|d| ext.eq_ignore_ascii_case(d)))
}

struct Walker<'a> {
    filter_prefix: &'a str,
    options: &'a ScanOptions,
}

impl Walker<'_> {
    fn scan_directory(
        &self,
        dir: &Path,
        relative: &str,
        dir_name: Option<&str>,
        depth: usize,
    ) -> Result<Vec<Entry>, ScanError> {
        let mut entries = Vec::new();
        let mut subdirs = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for item in fs::read_dir(dir).map_err(ScanError::io(dir))? {
            let item = item.map_err(ScanError::io(dir))?;
            let path = item.path();
            let name = item.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let child_relative = if relative.is_empty() {
                name.clone()
            } else {
                format!("{relative}/{name}")
            };

            // file_type() does not follow symlinks.
            let file_type = item.file_type().map_err(ScanError::io(&path))?;
            if file_type.is_dir() {
                if depth == 0 && self.options.skip_dirs.contains(&name) {
                    continue;
                }
                let filter_path = format!("{}/{}", self.filter_prefix, child_relative);
                if !self.options.accepts_dir(&filter_path) {
                    tracing::debug!(path = %filter_path, "directory filtered out");
                    continue;
                }
                check_case(&mut seen, &child_relative, &path)?;
                subdirs.push(PendingDir {
                    name,
                    path,
                    relative: child_relative,
                });
            } else if is_document(&name)
                && (file_type.is_file() || is_linked_file(&file_type, &path))
            {
                check_case(&mut seen, &child_relative, &path)?;
                let raw = read_document(&path)?;
                let base_name = Path::new(&name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                entries.push(Entry::Document {
                    relative: child_relative,
                    document: Document {
                        source_path: path,
                        file_name: name,
                        base_name,
                        parent_dir: dir_name.map(str::to_string),
                        depth,
                        raw,
                    },
                });
            }
        }

        let scanned: Vec<Entry> = subdirs
            .into_par_iter()
            .map(|sub| -> Result<Entry, ScanError> {
                let children =
                    self.scan_directory(&sub.path, &sub.relative, Some(&sub.name), depth + 1)?;
                Ok(Entry::Directory {
                    name: sub.name,
                    relative: sub.relative,
                    children,
                })
            })
            .collect::<Result<_, _>>()?;
        entries.extend(scanned);

        Ok(entries)
    }
}

/// A symlink pointing at a regular file. Links to directories are never followed.
fn is_linked_file(file_type: &fs::FileType, path: &Path) -> bool {
    file_type.is_symlink() && path.is_file()
}

/// Read a document, replacing invalid UTF-8 instead of failing.
fn read_document(path: &Path) -> Result<String, ScanError> {
    let bytes = fs::read(path).map_err(ScanError::io(path))?;
    match String::from_utf8(bytes) {
        Ok(raw) => Ok(raw),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                "document is not valid UTF-8, replacing invalid bytes"
            );
            Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
        }
    }
}

fn check_case(
    seen: &mut HashMap<String, PathBuf>,
    relative: &str,
    path: &Path,
) -> Result<(), ScanError> {
    if let Some(first) = seen.insert(normalize_id(relative), path.to_path_buf()) {
        return Err(ScanError::CaseCollision {
            first,
            second: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Attach scanned entries (and their subtrees) under `parent`.
fn graft(tree: &mut DocTree, parent: NodeId, entries: Vec<Entry>) {
    for entry in entries {
        match entry {
            Entry::Directory {
                name,
                relative,
                children,
            } => {
                let id = tree.attach(
                    parent,
                    normalize_id(&relative),
                    NodeKind::Directory { name },
                );
                graft(tree, id, children);
            }
            Entry::Document { relative, document } => {
                tree.attach(parent, normalize_id(&relative), NodeKind::Document(document));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{doc_ids, setup_fixtures, write_tree};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn options() -> ScanOptions {
        ScanOptions::default()
    }

    #[test]
    fn scan_fixture_document_order() {
        let tmp = setup_fixtures();
        let tree = scan(tmp.path(), &options()).unwrap();
        assert_eq!(
            doc_ids(&tree),
            vec![
                "readme.md",
                "api/authflow.md",
                "api/endpoints.md",
                "drafts/wip.md",
                "guide/setup.md",
                "guide/advanced/tips.md",
            ]
        );
    }

    #[test]
    fn scan_reads_document_payload() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("guide/advanced/tips.md", "# Tips\n")]);
        let tree = scan(tmp.path(), &options()).unwrap();

        let id = tree.find("guide/advanced/tips.md").unwrap();
        let doc = tree.node(id).document().unwrap();
        assert_eq!(doc.file_name, "tips.md");
        assert_eq!(doc.base_name, "tips");
        assert_eq!(doc.parent_dir.as_deref(), Some("advanced"));
        assert_eq!(doc.depth, 2);
        assert_eq!(doc.raw, "# Tips\n");
        assert_eq!(doc.source_path, tmp.path().join("guide/advanced/tips.md"));
    }

    #[test]
    fn root_documents_have_no_parent_dir() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("README.md", "hi")]);
        let tree = scan(tmp.path(), &options()).unwrap();
        let doc = tree.node(tree.find("readme.md").unwrap()).document().unwrap();
        assert_eq!(doc.parent_dir, None);
        assert_eq!(doc.depth, 0);
    }

    #[test]
    fn empty_directories_not_content_bearing() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("README.md", ""), ("empty_dir/notes.txt", "x")]);
        fs::create_dir_all(tmp.path().join("really_empty")).unwrap();
        let tree = scan(tmp.path(), &options()).unwrap();

        let empty = tree.find("empty_dir").unwrap();
        assert!(!tree.node(empty).content_bearing);
        assert!(tree.node(empty).children.is_empty());
        assert!(!tree.node(tree.find("really_empty").unwrap()).content_bearing);
        assert_eq!(doc_ids(&tree), vec!["readme.md"]);
    }

    #[test]
    fn only_document_extensions_collected() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("a.md", ""),
                ("b.MD", ""),
                ("c.markdown", ""),
                ("d.txt", ""),
                ("e.mdx", ""),
                ("md", ""),
            ],
        );
        let tree = scan(tmp.path(), &options()).unwrap();
        assert_eq!(doc_ids(&tree), vec!["a.md", "b.md", "c.markdown"]);
    }

    #[test]
    fn invalid_utf8_document_is_read_lossily() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("README.md", "# Home\n")]);
        fs::write(tmp.path().join("latin1.md"), b"# Caf\xe9\n").unwrap();

        let tree = scan(tmp.path(), &options()).unwrap();
        assert_eq!(doc_ids(&tree), vec!["latin1.md", "readme.md"]);
        let doc = tree.node(tree.find("latin1.md").unwrap()).document().unwrap();
        assert_eq!(doc.raw, "# Caf\u{FFFD}\n");
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_document_is_scanned() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("README.md", ""), ("real/page.md", "# Linked\n")]);
        std::os::unix::fs::symlink(
            tmp.path().join("real/page.md"),
            tmp.path().join("linked.md"),
        )
        .unwrap();

        let tree = scan(tmp.path(), &options()).unwrap();
        assert_eq!(doc_ids(&tree), vec!["linked.md", "readme.md", "real/page.md"]);
        let doc = tree.node(tree.find("linked.md").unwrap()).document().unwrap();
        assert_eq!(doc.raw, "# Linked\n");
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_not_followed() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("README.md", ""), ("real/page.md", "")]);
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("alias")).unwrap();

        let tree = scan(tmp.path(), &options()).unwrap();
        assert_eq!(doc_ids(&tree), vec!["readme.md", "real/page.md"]);
        assert!(tree.find("alias").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_document_link_ignored() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("README.md", "")]);
        std::os::unix::fs::symlink(tmp.path().join("gone.md"), tmp.path().join("broken.md"))
            .unwrap();

        let tree = scan(tmp.path(), &options()).unwrap();
        assert_eq!(doc_ids(&tree), vec!["readme.md"]);
    }

    #[test]
    fn hidden_entries_skipped() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[("README.md", ""), (".git/HEAD.md", ""), (".draft.md", "")],
        );
        let tree = scan(tmp.path(), &options()).unwrap();
        assert_eq!(doc_ids(&tree), vec!["readme.md"]);
        assert!(tree.find(".git").is_none());
    }

    #[test]
    fn exclude_filter_skips_subtree() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[("README.md", ""), ("drafts/a.md", ""), ("drafts/deep/b.md", "")],
        );
        let opts = ScanOptions {
            exclude: Some(Regex::new("drafts").unwrap()),
            ..ScanOptions::default()
        };
        let tree = scan(tmp.path(), &opts).unwrap();
        assert_eq!(doc_ids(&tree), vec!["readme.md"]);
        assert!(tree.find("drafts").is_none());
    }

    #[test]
    fn include_filter_applies_to_directories_only() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[("README.md", ""), ("guide/setup.md", ""), ("api/auth.md", "")],
        );
        let opts = ScanOptions {
            include: Some(Regex::new("guide").unwrap()),
            ..ScanOptions::default()
        };
        let tree = scan(tmp.path(), &opts).unwrap();
        // Root documents are not directories, so the include filter keeps them.
        assert_eq!(doc_ids(&tree), vec!["readme.md", "guide/setup.md"]);
    }

    #[test]
    fn exclude_checked_before_include() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("README.md", ""), ("guide/setup.md", "")]);
        let opts = ScanOptions {
            include: Some(Regex::new("guide").unwrap()),
            exclude: Some(Regex::new("guide").unwrap()),
            ..ScanOptions::default()
        };
        let tree = scan(tmp.path(), &opts).unwrap();
        assert_eq!(doc_ids(&tree), vec!["readme.md"]);
    }

    #[test]
    fn filters_match_source_prefixed_path() {
        let opts = ScanOptions {
            exclude: Some(Regex::new("^docs/guide/advanced$").unwrap()),
            ..ScanOptions::default()
        };
        assert!(!opts.accepts_dir("docs/guide/advanced"));
        assert!(opts.accepts_dir("docs/guide"));
    }

    #[test]
    fn skip_dirs_only_at_root() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[("README.md", ""), ("assets/notes.md", ""), ("guide/assets/a.md", "")],
        );
        let opts = ScanOptions {
            skip_dirs: vec!["assets".into()],
            ..ScanOptions::default()
        };
        let tree = scan(tmp.path(), &opts).unwrap();
        assert_eq!(doc_ids(&tree), vec!["readme.md", "guide/assets/a.md"]);
    }

    #[test]
    fn no_documents_is_error() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("notes.txt", ""), ("empty/readme.txt", "")]);
        let err = scan(tmp.path(), &options()).unwrap_err();
        assert!(matches!(err, ScanError::NoDocuments(_)));
        assert!(err.to_string().contains("has no markdown files"));
    }

    #[test]
    fn filtered_out_documents_count_as_none() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("drafts/a.md", "")]);
        let opts = ScanOptions {
            exclude: Some(Regex::new("drafts").unwrap()),
            ..ScanOptions::default()
        };
        assert!(matches!(
            scan(tmp.path(), &opts),
            Err(ScanError::NoDocuments(_))
        ));
    }

    #[test]
    fn case_colliding_siblings_rejected() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("Guide/a.md", ""), ("guide/b.md", "")]);
        let err = scan(tmp.path(), &options()).unwrap_err();
        assert!(matches!(err, ScanError::CaseCollision { .. }));
    }

    #[test]
    fn missing_root_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            scan(&missing, &options()),
            Err(ScanError::Io { ref path, .. }) if *path == missing
        ));
    }

    #[test]
    fn scan_is_deterministic() {
        let tmp = setup_fixtures();
        let first = scan(tmp.path(), &options()).unwrap();
        let second = scan(tmp.path(), &options()).unwrap();
        assert_eq!(doc_ids(&first), doc_ids(&second));
    }

    #[test]
    fn is_document_checks_extension() {
        assert!(is_document("a.md"));
        assert!(is_document("A.Markdown"));
        assert!(!is_document("a.txt"));
        assert!(!is_document("md"));
    }
}
