//! Document tree model.
//!
//! The tree mirrors the source directory: the root stands for the source
//! directory itself, directories become inner nodes and markdown documents
//! become leaves. Nodes live in a flat arena owned by [`DocTree`] and are
//! addressed by [`NodeId`]; each node owns the ordered list of its children
//! while the parent link is a plain index used only to walk upward.
//!
//! ## Invariants
//!
//! - A node is *content-bearing* iff it is a document or has a document among
//!   its descendants. Attaching a document flips the flag on the document and
//!   on its whole ancestor chain, so the flag is never stale.
//! - After [`DocTree::finalize`], siblings are ordered documents first, then
//!   directories, each group ascending by normalized id.
//! - Node ids are relative paths, `/` separated and case-folded, so two
//!   entries that differ only by case map to the same id.
//!
//! ## Lifecycle
//!
//! The scanner attaches nodes while walking the filesystem, then calls
//! [`DocTree::finalize`] once the whole tree is materialized. From then on the
//! tree is read-only and the cached depth-first document order returned by
//! [`DocTree::documents`] is reused by every later stage.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Index of a node inside its [`DocTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Metadata carried by a node that is an actual markdown document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Path of the file as found on disk (source root joined with the relative path).
    pub source_path: PathBuf,
    /// File name with extension, e.g. `setup.md`.
    pub file_name: String,
    /// File name without extension, e.g. `setup`.
    pub base_name: String,
    /// Name of the directly containing directory; `None` for root-level documents.
    pub parent_dir: Option<String>,
    /// Nesting level: documents in the source root have depth 0.
    pub depth: usize,
    /// Raw markdown content.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root,
    Directory { name: String },
    Document(Document),
}

#[derive(Debug, Clone)]
pub struct Node {
    /// Normalized (case-folded) relative path from the tree root.
    pub id: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub content_bearing: bool,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_root(&self) -> bool {
        matches!(self.kind, NodeKind::Root)
    }

    pub fn is_document(&self) -> bool {
        matches!(self.kind, NodeKind::Document(_))
    }

    pub fn document(&self) -> Option<&Document> {
        match &self.kind {
            NodeKind::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Directory name or document file name; empty for the root.
    pub fn name(&self) -> &str {
        match &self.kind {
            NodeKind::Root => "",
            NodeKind::Directory { name } => name,
            NodeKind::Document(doc) => &doc.file_name,
        }
    }
}

/// Normalize a relative path into a node id: `/` separators, case-folded.
pub fn normalize_id(relative: &str) -> String {
    relative.replace('\\', "/").to_lowercase()
}

/// Arena-backed document tree rooted at the source directory.
#[derive(Debug, Clone)]
pub struct DocTree {
    root_path: PathBuf,
    nodes: Vec<Node>,
    flat: Vec<NodeId>,
    stale: bool,
}

impl DocTree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            nodes: vec![Node {
                id: String::new(),
                parent: None,
                children: Vec::new(),
                content_bearing: false,
                kind: NodeKind::Root,
            }],
            flat: Vec::new(),
            stale: false,
        }
    }

    /// The source directory this tree was scanned from.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT.0]
    }

    /// Look up a node. Ids are only ever handed out by this tree, so lookup
    /// cannot miss for ids obtained from it.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Find a node by its normalized id.
    pub fn find(&self, id: &str) -> Option<NodeId> {
        let wanted = normalize_id(id);
        self.nodes.iter().position(|n| n.id == wanted).map(NodeId)
    }

    /// Append a new child under `parent` and return its id.
    ///
    /// Attaching a document marks it and every ancestor as content-bearing.
    pub fn attach(&mut self, parent: NodeId, id: String, kind: NodeKind) -> NodeId {
        let is_document = matches!(kind, NodeKind::Document(_));
        let child = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            parent: Some(parent),
            children: Vec::new(),
            content_bearing: false,
            kind,
        });
        self.nodes[parent.0].children.push(child);
        if is_document {
            self.mark_content_bearing(child);
        }
        self.stale = true;
        child
    }

    /// Walk from `from` up to the root setting the content-bearing flag.
    ///
    /// Stops at the first node that already carries the flag: its ancestors
    /// were marked when it was.
    fn mark_content_bearing(&mut self, from: NodeId) {
        let mut current = Some(from);
        while let Some(id) = current {
            let node = &mut self.nodes[id.0];
            if node.content_bearing {
                break;
            }
            node.content_bearing = true;
            current = node.parent;
        }
    }

    /// Sort every sibling list: documents before directories, then by id.
    ///
    /// The sort is stable, so entries comparing equal keep attach order.
    pub fn sort(&mut self) {
        for index in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[index].children);
            children.sort_by(|a, b| self.sibling_order(*a, *b));
            self.nodes[index].children = children;
        }
        self.stale = true;
    }

    fn sibling_order(&self, a: NodeId, b: NodeId) -> Ordering {
        let (a, b) = (&self.nodes[a.0], &self.nodes[b.0]);
        b.is_document()
            .cmp(&a.is_document())
            .then_with(|| a.id.cmp(&b.id))
    }

    /// Sort the tree and cache the flattened document order.
    pub fn finalize(&mut self) {
        self.sort();
        self.flat = self.collect_documents();
        self.stale = false;
    }

    pub fn is_finalized(&self) -> bool {
        !self.stale
    }

    /// Document nodes in depth-first order, following sibling order.
    ///
    /// Returns the cached view when the tree has not changed since
    /// [`finalize`](Self::finalize), otherwise walks the tree again.
    pub fn documents(&self) -> Cow<'_, [NodeId]> {
        if self.stale {
            Cow::Owned(self.collect_documents())
        } else {
            Cow::Borrowed(&self.flat)
        }
    }

    fn collect_documents(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk_documents(Self::ROOT, &mut out);
        out
    }

    fn walk_documents(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[id.0].children {
            let node = &self.nodes[child.0];
            if node.is_document() {
                out.push(child);
            } else if node.content_bearing {
                self.walk_documents(child, out);
            }
        }
    }
}
