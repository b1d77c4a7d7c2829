// SPDX-FileCopyrightText: The reactive-tree authors
// SPDX-License-Identifier: MPL-2.0

use std::{fmt, rc::Rc};

use crate::{
    resource::SharedResource, ChildChangeKind, ChildChanged, EventStream, NodeSpec,
    NodeUpdated, NodesQuery, SelectionChanged, TreeNode, VisibilityChanged,
};

/// Handle of a mutable tree.
///
/// Owns the root node and the notification channels shared by all nodes
/// of the tree. The streams returned by the `on_*` methods of the tree
/// report the events of all nodes, unlike the node-scoped streams of
/// [`TreeNode`].
pub struct Tree<T> {
    root: TreeNode<T>,
    resource: Rc<SharedResource<T>>,
}

impl<T: Clone + 'static> Tree<T> {
    /// Create a new tree from a blueprint.
    ///
    /// Each tree gets its own, independent notification channels.
    #[must_use]
    pub fn new(spec: NodeSpec<T>) -> Self {
        let resource = Rc::new(SharedResource::new());
        let root = TreeNode::new_root(spec, &resource);
        log::debug!(
            "Created tree with root node {root_id} and height {height}",
            root_id = root.id(),
            height = root.height()
        );
        Self { root, resource }
    }

    #[must_use]
    pub const fn root(&self) -> &TreeNode<T> {
        &self.root
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// See [`TreeNode::get_nodes()`].
    #[must_use]
    pub fn get_nodes(&self, query: impl Into<NodesQuery>) -> Vec<TreeNode<T>> {
        self.root.get_nodes(query)
    }

    /// Whether `node` is currently part of this tree.
    #[must_use]
    pub fn contains(&self, node: &TreeNode<T>) -> bool {
        self.root.contains(node)
    }

    /// See [`TreeNode::find()`].
    pub fn find(&self, predicate: impl FnMut(&TreeNode<T>) -> bool) -> Option<TreeNode<T>> {
        self.root.find(predicate)
    }

    /// Close all notification channels of this tree.
    ///
    /// All subscriptions end and no events are delivered afterwards.
    /// The nodes remain usable and can still be modified, but those
    /// changes are no longer published.
    pub fn destroy(&self) {
        if self.resource.is_closed() {
            return;
        }
        log::debug!(
            "Destroying tree with root node {root_id}",
            root_id = self.root.id()
        );
        self.resource.close();
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.resource.is_closed()
    }

    #[must_use]
    pub fn on_visibility_change(&self) -> EventStream<VisibilityChanged<T>> {
        self.resource.visibility_changed.stream()
    }

    #[must_use]
    pub fn on_selection_change(&self) -> EventStream<SelectionChanged<T>> {
        self.resource.selection_changed.stream()
    }

    #[must_use]
    pub fn on_updated(&self) -> EventStream<NodeUpdated<T>> {
        self.resource.updated.stream()
    }

    /// All nodes that are removed from this tree.
    #[must_use]
    pub fn on_removed(&self) -> EventStream<TreeNode<T>> {
        self.resource.removed.stream()
    }

    /// Creation of new nodes, including every node of an inserted subtree.
    ///
    /// Only reports [`ChildChanged::Initialized`] events.
    #[must_use]
    pub fn on_added(&self) -> EventStream<ChildChanged<T>> {
        self.resource
            .child_changed
            .stream()
            .filter(|event| event.kind() == ChildChangeKind::Initialized)
    }
}

impl<T: Clone + 'static> From<NodeSpec<T>> for Tree<T> {
    fn from(spec: NodeSpec<T>) -> Self {
        Self::new(spec)
    }
}

impl<T: fmt::Debug> fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("destroyed", &self.resource.is_closed())
            .finish()
    }
}
