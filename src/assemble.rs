//! Page assembly.
//!
//! Turns the finalized [`DocTree`] into the ordered list of pages to render.
//! Pages follow the tree's depth-first document order, each one carrying the
//! titles and output file name derived from its source names. Exactly one
//! page is flagged as the index and later duplicated to `index.html`.
//!
//! ## Index selection
//!
//! 1. The first page whose base name or file name equals the requested index
//!    name, ignoring case.
//! 2. Otherwise a `README` in the source root.
//! 3. Otherwise the first page.
//!
//! ## Output names
//!
//! Pages are written flat into the output directory, so two documents may
//! map to the same file (`a/x/intro.md` and `b/x/intro.md` both become
//! `x_intro.html`). Such collisions are reported instead of letting one page
//! overwrite the other. `index.html` is reserved for the index copy.

use crate::naming::{display_title, output_file_name};
use crate::tree::{DocTree, NodeId};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// File every site's landing page is duplicated to.
pub const INDEX_FILE_NAME: &str = "index.html";

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("the document tree has no documents")]
    Empty,
    #[error(
        "{} and {} would both be written to {file_name}",
        .first.display(),
        .second.display()
    )]
    OutputCollision {
        file_name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// A document ready to be rendered.
#[derive(Debug, Clone)]
pub struct Page {
    pub node: NodeId,
    pub source_path: PathBuf,
    pub file_name: String,
    pub base_name: String,
    pub parent_dir: Option<String>,
    pub depth: usize,
    /// Menu label, e.g. "Getting Started".
    pub title: String,
    /// Title of the containing directory; empty at the source root.
    pub parent_menu_title: String,
    /// `"{parent_menu_title} - {title}"`. Not unique: `foo-bar` and `foo_bar` share it.
    pub full_title: String,
    pub output_file_name: String,
    pub is_index: bool,
}

/// All pages of the site in render order.
#[derive(Debug, Clone)]
pub struct Site {
    pub pages: Vec<Page>,
    by_node: HashMap<NodeId, usize>,
}

impl Site {
    /// Page assembled from a document node.
    pub fn page_for(&self, node: NodeId) -> Option<&Page> {
        self.by_node.get(&node).map(|&i| &self.pages[i])
    }

    pub fn index_page(&self) -> Option<&Page> {
        self.pages.iter().find(|p| p.is_index)
    }
}

/// Build the page list from a finalized tree.
pub fn assemble(tree: &DocTree, index_name: Option<&str>) -> Result<Site, AssembleError> {
    let mut pages: Vec<Page> = tree
        .documents()
        .iter()
        .filter_map(|&id| {
            let doc = tree.node(id).document()?;
            let title = display_title(&doc.base_name);
            let parent_menu_title = doc.parent_dir.as_deref().map(display_title).unwrap_or_default();
            Some(Page {
                node: id,
                source_path: doc.source_path.clone(),
                file_name: doc.file_name.clone(),
                base_name: doc.base_name.clone(),
                parent_dir: doc.parent_dir.clone(),
                depth: doc.depth,
                full_title: format!("{parent_menu_title} - {title}"),
                title,
                parent_menu_title,
                output_file_name: output_file_name(doc.parent_dir.as_deref(), &doc.base_name),
                is_index: false,
            })
        })
        .collect();

    if pages.is_empty() {
        return Err(AssembleError::Empty);
    }

    let index = select_index(&pages, index_name);
    pages[index].is_index = true;
    check_collisions(&pages)?;

    let by_node = pages.iter().enumerate().map(|(i, p)| (p.node, i)).collect();
    Ok(Site { pages, by_node })
}

/// Position of the index page within `pages`. `pages` must not be empty.
pub fn select_index(pages: &[Page], index_name: Option<&str>) -> usize {
    if let Some(wanted) = index_name.map(str::to_lowercase) {
        let found = pages.iter().position(|p| {
            p.base_name.to_lowercase() == wanted || p.file_name.to_lowercase() == wanted
        });
        if let Some(found) = found {
            return found;
        }
    }
    pages
        .iter()
        .position(|p| p.parent_dir.is_none() && p.base_name.eq_ignore_ascii_case("readme"))
        .unwrap_or(0)
}

fn check_collisions(pages: &[Page]) -> Result<(), AssembleError> {
    let mut taken: HashMap<String, &Page> = HashMap::new();
    if let Some(index) = pages.iter().find(|p| p.is_index) {
        taken.insert(INDEX_FILE_NAME.to_string(), index);
    }
    for page in pages {
        // Case-insensitive filesystems would merge names differing only by case.
        let key = page.output_file_name.to_lowercase();
        if page.is_index && key == INDEX_FILE_NAME {
            continue;
        }
        if let Some(first) = taken.insert(key, page) {
            return Err(AssembleError::OutputCollision {
                file_name: page.output_file_name.clone(),
                first: first.source_path.clone(),
                second: page.source_path.clone(),
            });
        }
    }
    Ok(())
}
