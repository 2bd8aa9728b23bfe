//! Rebuilds the project tree from depth-tagged node descriptors.

use opj_model::{NodeId, ProjectNode, ProjectTree};

use crate::diagnostics::DiagnosticsLog;

/// A node and the depth it was encoded at. Depth 0 nodes are children of the project root.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDescriptor {
    pub depth: usize,
    /// File offset of the encoded node, for diagnostics.
    pub offset: Option<usize>,
    pub node: ProjectNode,
}

impl NodeDescriptor {
    pub fn new(depth: usize, node: ProjectNode) -> Self {
        Self {
            depth,
            offset: None,
            node,
        }
    }
}

/// Depth-stack tree builder.
///
/// `stack[0]` is the root and `stack[k]` the most recent node at depth `k - 1`. A node at depth
/// `d` pops the stack to `d + 1` entries, becomes the last child of the top entry, and is pushed.
#[derive(Debug)]
pub struct TreeBuilder {
    tree: ProjectTree,
    stack: Vec<NodeId>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_tree(ProjectTree::new())
    }

    /// Continue building on `tree`; new depth-0 nodes go under its root.
    pub fn with_tree(tree: ProjectTree) -> Self {
        Self {
            tree,
            stack: vec![NodeId::ROOT],
        }
    }

    /// Attach one descriptor.
    ///
    /// A depth deeper than the open ancestor chain allows is structural corruption: the node is
    /// attached to the root, one entry is logged, and the ancestor chain is left as it was.
    pub fn push(&mut self, descriptor: NodeDescriptor, log: &mut DiagnosticsLog) -> Option<NodeId> {
        let NodeDescriptor {
            depth,
            offset,
            node,
        } = descriptor;

        if depth >= self.stack.len() {
            log.structural_corruption(
                offset,
                format!(
                    "node `{}` claims depth {depth} but the deepest open ancestor is at depth {}; attached to the project root",
                    node.name,
                    self.stack.len() - 1
                ),
            );
            return self.tree.append_child(NodeId::ROOT, node);
        }

        self.stack.truncate(depth + 1);
        let parent = self.stack.last().copied().unwrap_or(NodeId::ROOT);
        let id = self.tree.append_child(parent, node)?;
        self.stack.push(id);
        Some(id)
    }

    pub fn finish(self) -> ProjectTree {
        self.tree
    }
}

/// Build a whole tree from a descriptor stream.
pub fn build_tree(
    descriptors: impl IntoIterator<Item = NodeDescriptor>,
    log: &mut DiagnosticsLog,
) -> ProjectTree {
    let mut builder = TreeBuilder::new();
    for descriptor in descriptors {
        builder.push(descriptor, log);
    }
    builder.finish()
}
