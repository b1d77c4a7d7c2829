// SPDX-FileCopyrightText: The reactive-tree authors
// SPDX-License-Identifier: MPL-2.0

/// Inert blueprint of a node and its descendants.
///
/// Used for creating new nodes and subtrees and returned by
/// [`TreeNode::prop()`](crate::TreeNode::prop) when reconstructing the
/// shape of a live node. Not connected to any tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodeSpec<T> {
    pub data: T,
    pub children: Vec<NodeSpec<T>>,
}

impl<T> NodeSpec<T> {
    /// Blueprint of a leaf node.
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self {
            data,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(data: T, children: impl IntoIterator<Item = NodeSpec<T>>) -> Self {
        Self {
            data,
            children: children.into_iter().collect(),
        }
    }

    /// Append a child blueprint.
    #[must_use]
    pub fn child(mut self, child: NodeSpec<T>) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Height of the described subtree, counted in nodes.
    ///
    /// A leaf has height 1.
    #[must_use]
    pub fn height(&self) -> usize {
        1 + self.children.iter().map(Self::height).max().unwrap_or(0)
    }

    /// Number of nodes in the described subtree, including this one.
    #[must_use]
    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(Self::count_nodes).sum::<usize>()
    }
}

impl<T> From<T> for NodeSpec<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}
