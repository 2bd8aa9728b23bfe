//! Arena-backed project tree.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`]. The tree always has
//! exactly one root ([`NodeId::ROOT`]); every other node has exactly one parent and children
//! keep the order in which they were appended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    #[default]
    Folder,
    SpreadSheet,
    Matrix,
    Excel,
    Graph,
    Note,
}

impl NodeKind {
    pub fn is_folder(self) -> bool {
        matches!(self, NodeKind::Folder)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectNode {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub hidden: bool,
    /// Index into the collection matching `kind` (spreadsheets, matrices, ...). Folders have none.
    #[serde(default)]
    pub object: Option<usize>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl ProjectNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectTree {
    nodes: Vec<ProjectNode>,
}

impl Default for ProjectTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectTree {
    /// Create a tree holding only the (unnamed) root folder.
    pub fn new() -> Self {
        Self {
            nodes: vec![ProjectNode::new("", NodeKind::Folder)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the tree holds only the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn get(&self, id: NodeId) -> Option<&ProjectNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ProjectNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Append `node` as the last child of `parent`.
    ///
    /// Returns `None` (and leaves the tree untouched) if `parent` is not a node of this tree.
    pub fn append_child(&mut self, parent: NodeId, mut node: ProjectNode) -> Option<NodeId> {
        if parent.0 >= self.nodes.len() {
            return None;
        }
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Some(id)
    }

    /// Number of edges between `id` and the root (`0` for the root itself).
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            depth += 1;
            cur = self.parent(p);
        }
        depth
    }

    /// Pre-order walk of every node below the root, yielding `(id, depth)` with depth 0 for
    /// the root's direct children.
    pub fn walk(&self) -> Walk<'_> {
        let stack: Vec<(NodeId, usize)> = self
            .children(NodeId::ROOT)
            .iter()
            .rev()
            .map(|&id| (id, 0))
            .collect();
        Walk { tree: self, stack }
    }

    /// Find the first node (pre-order) with the given name and kind.
    pub fn find(&self, name: &str, kind: NodeKind) -> Option<NodeId> {
        self.walk()
            .map(|(id, _)| id)
            .find(|&id| self.get(id).is_some_and(|n| n.kind == kind && n.name == name))
    }
}

pub struct Walk<'a> {
    tree: &'a ProjectTree,
    stack: Vec<(NodeId, usize)>,
}

impl Iterator for Walk<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        for &child in self.tree.children(id).iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((id, depth))
    }
}
