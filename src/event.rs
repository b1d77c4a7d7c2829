// SPDX-FileCopyrightText: The reactive-tree authors
// SPDX-License-Identifier: MPL-2.0

use crate::{Children, TreeNode};

/// Event that originates from a single node.
pub trait NodeEvent<T> {
    /// The node that emitted the event.
    fn node(&self) -> &TreeNode<T>;
}

/// A removed node is its own removal event.
impl<T> NodeEvent<T> for TreeNode<T> {
    fn node(&self) -> &TreeNode<T> {
        self
    }
}

/// A new child has been inserted into the children of `node`.
#[derive(Debug, Clone)]
pub struct ChildAdded<T> {
    pub node: TreeNode<T>,

    /// Position of `added_node` within `children`.
    pub index: usize,

    pub added_node: TreeNode<T>,

    /// The children after the insertion.
    pub children: Children<T>,
}

/// A child has been removed from the children of `node`.
#[derive(Debug, Clone)]
pub struct ChildRemoved<T> {
    pub node: TreeNode<T>,

    /// The detached node.
    pub removed_node: TreeNode<T>,

    /// The children after the removal.
    pub children: Children<T>,

    /// Position of `removed_node` within `old_children`.
    pub old_index: usize,

    /// The children before the removal.
    pub old_children: Children<T>,
}

/// The subtree rooted at `node` has just been created.
#[derive(Debug, Clone)]
pub struct ChildInitialized<T> {
    pub node: TreeNode<T>,
    pub children: Children<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ChildChangeKind {
    Added,
    Removed,
    Initialized,
}

/// Structural change of the children of a node.
#[derive(Debug, Clone, derive_more::From)]
pub enum ChildChanged<T> {
    Added(ChildAdded<T>),
    Removed(ChildRemoved<T>),
    Initialized(ChildInitialized<T>),
}

impl<T> ChildChanged<T> {
    #[must_use]
    pub const fn kind(&self) -> ChildChangeKind {
        match self {
            Self::Added(_) => ChildChangeKind::Added,
            Self::Removed(_) => ChildChangeKind::Removed,
            Self::Initialized(_) => ChildChangeKind::Initialized,
        }
    }

    /// The current children of the affected node.
    #[must_use]
    pub const fn children(&self) -> &Children<T> {
        match self {
            Self::Added(ChildAdded { children, .. })
            | Self::Removed(ChildRemoved { children, .. })
            | Self::Initialized(ChildInitialized { children, .. }) => children,
        }
    }
}

impl<T> NodeEvent<T> for ChildChanged<T> {
    fn node(&self) -> &TreeNode<T> {
        match self {
            Self::Added(ChildAdded { node, .. })
            | Self::Removed(ChildRemoved { node, .. })
            | Self::Initialized(ChildInitialized { node, .. }) => node,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VisibilityChanged<T> {
    pub visible: bool,
    pub node: TreeNode<T>,
}

impl<T> NodeEvent<T> for VisibilityChanged<T> {
    fn node(&self) -> &TreeNode<T> {
        &self.node
    }
}

/// The data of `node` has been replaced.
#[derive(Debug, Clone)]
pub struct NodeUpdated<T> {
    pub data: T,
    pub previous: T,
    pub node: TreeNode<T>,
}

impl<T> NodeEvent<T> for NodeUpdated<T> {
    fn node(&self) -> &TreeNode<T> {
        &self.node
    }
}

#[derive(Debug, Clone)]
pub struct SelectionChanged<T> {
    pub selected: bool,
    pub node: TreeNode<T>,
}

impl<T> NodeEvent<T> for SelectionChanged<T> {
    fn node(&self) -> &TreeNode<T> {
        &self.node
    }
}
