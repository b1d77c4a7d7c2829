// SPDX-FileCopyrightText: The reactive-tree authors
// SPDX-License-Identifier: MPL-2.0

use std::{
    cell::{Ref, RefCell, RefMut},
    fmt,
    hash::{Hash, Hasher},
    rc::{Rc, Weak},
};

use crate::{
    channel::Channel, resource::SharedResource, ChildAdded, ChildChanged, ChildInitialized,
    ChildRemoved, EventStream, NodeEvent, NodeId, NodeSpec, NodeUpdated, OneShot,
    SelectionChanged, TreeError, VisibilityChanged,
};

/// Snapshot of the children of a node.
///
/// Persistent vector that shares its structure with the live children.
#[cfg(feature = "im")]
pub type Children<T> = im::Vector<TreeNode<T>>;

/// Snapshot of the children of a node.
#[cfg(not(feature = "im"))]
pub type Children<T> = Vec<TreeNode<T>>;

/// Position of a node relative to its tree.
pub enum Parent<T> {
    /// The node is the root of a [`Tree`](crate::Tree).
    Root,

    /// The node is a child of another node.
    Node(TreeNode<T>),

    /// The node has been removed from its tree.
    Detached,
}

impl<T> Parent<T> {
    #[must_use]
    pub const fn node(&self) -> Option<&TreeNode<T>> {
        match self {
            Self::Node(node) => Some(node),
            Self::Root | Self::Detached => None,
        }
    }
}

impl<T> Clone for Parent<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Root => Self::Root,
            Self::Node(node) => Self::Node(node.clone()),
            Self::Detached => Self::Detached,
        }
    }
}

impl<T> PartialEq for Parent<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Root, Self::Root) | (Self::Detached, Self::Detached) => true,
            (Self::Node(lhs), Self::Node(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl<T> Eq for Parent<T> {}

impl<T> fmt::Debug for Parent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("Root"),
            Self::Node(node) => f.debug_tuple("Node").field(&node.id()).finish(),
            Self::Detached => f.write_str("Detached"),
        }
    }
}

/// Back-reference from a node to its parent.
///
/// Never owns the parent.
enum ParentLink<T> {
    Root,
    Attached(Weak<NodeInner<T>>),
    Detached,
}

impl<T> ParentLink<T> {
    fn resolve(&self) -> Parent<T> {
        match self {
            Self::Root => Parent::Root,
            // A parent that no longer exists has taken its subtree with it.
            Self::Attached(parent) => parent
                .upgrade()
                .map_or(Parent::Detached, |parent| Parent::Node(TreeNode(parent))),
            Self::Detached => Parent::Detached,
        }
    }
}

struct NodeState<T> {
    data: T,
    parent: ParentLink<T>,
    children: Children<T>,
    selected: bool,
    visible: bool,
    height: usize,
}

struct NodeInner<T> {
    id: NodeId,
    resource: Rc<SharedResource<T>>,
    state: RefCell<NodeState<T>>,
}

/// Shared handle of a mutable node in a [`Tree`](crate::Tree).
///
/// Cloning the handle is cheap and all clones refer to the same node.
/// Handles compare equal if and only if they refer to the same node.
///
/// A node owns its children and only references its parent. All changes
/// are published synchronously to the subscribers of the tree, after the
/// tree has been updated consistently.
pub struct TreeNode<T>(Rc<NodeInner<T>>);

impl<T> TreeNode<T> {
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.0.id
    }

    fn state(&self) -> Ref<'_, NodeState<T>> {
        self.0.state.borrow()
    }

    fn state_mut(&self) -> RefMut<'_, NodeState<T>> {
        self.0.state.borrow_mut()
    }

    fn resource(&self) -> &SharedResource<T> {
        &self.0.resource
    }

    /// Snapshot of the current children.
    ///
    /// Modifying the returned collection doesn't affect the tree.
    #[must_use]
    pub fn children(&self) -> Children<T> {
        self.state().children.clone()
    }

    #[must_use]
    pub fn parent(&self) -> Parent<T> {
        self.state().parent.resolve()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        matches!(self.state().parent, ParentLink::Root)
    }

    /// Whether the node has been removed from its tree.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        matches!(self.parent(), Parent::Detached)
    }

    /// Whether the node is a direct child of `parent`.
    #[must_use]
    pub fn is_child_of(&self, parent: &TreeNode<T>) -> bool {
        self.parent().node() == Some(parent)
    }

    /// Number of nodes on the longest path down to a leaf.
    ///
    /// A leaf has height 1.
    #[must_use]
    pub fn height(&self) -> usize {
        self.state().height
    }

    #[must_use]
    pub fn selected(&self) -> bool {
        self.state().selected
    }

    #[must_use]
    pub fn visibility(&self) -> bool {
        self.state().visible
    }

    /// Location of the node within its tree.
    ///
    /// # Errors
    ///
    /// Not available yet. Always fails with [`TreeError::Unimplemented`].
    #[allow(clippy::unused_self)]
    pub const fn path(&self) -> Result<String, TreeError> {
        Err(TreeError::Unimplemented { operation: "path" })
    }

    fn child_index(&self, child: &TreeNode<T>) -> Option<usize> {
        self.state()
            .children
            .iter()
            .position(|candidate| candidate == child)
    }

    /// Recalculate the height of this node and all its ancestors.
    fn refresh_heights(&self) {
        let mut next_node = Some(self.clone());
        while let Some(node) = next_node {
            let height = height_of(&node.state().children);
            let mut state = node.state_mut();
            if state.height == height {
                // None of the ancestors is affected
                break;
            }
            log::trace!(
                "Updating height of node {id} from {old} to {height}",
                id = node.id(),
                old = state.height
            );
            state.height = height;
            next_node = state.parent.resolve().node().cloned();
        }
    }
}

fn height_of<T>(children: &Children<T>) -> usize {
    children
        .iter()
        .map(TreeNode::height)
        .max()
        .map_or(1, |max_child_height| max_child_height + 1)
}

/// Where to insert a sibling.
#[derive(Debug, Clone, Copy)]
enum Placement {
    Before,
    After,
}

impl<T: Clone + 'static> TreeNode<T> {
    pub(crate) fn new_root(spec: NodeSpec<T>, resource: &Rc<SharedResource<T>>) -> Self {
        let mut initialized = Vec::new();
        let root = Self::build(spec, ParentLink::Root, resource, &mut initialized);
        Self::emit_initialized(&root, initialized);
        root
    }

    /// Create the subtree described by `spec` without publishing any events.
    ///
    /// All new nodes are collected for publishing their initialization,
    /// children before their parents.
    fn build(
        spec: NodeSpec<T>,
        parent: ParentLink<T>,
        resource: &Rc<SharedResource<T>>,
        initialized: &mut Vec<Self>,
    ) -> Self {
        let NodeSpec { data, children } = spec;
        let node = Self(Rc::new(NodeInner {
            id: NodeId::next(),
            resource: Rc::clone(resource),
            state: RefCell::new(NodeState {
                data,
                parent,
                children: Children::new(),
                selected: false,
                visible: true,
                height: 1,
            }),
        }));
        let children = children
            .into_iter()
            .map(|child| {
                let parent = ParentLink::Attached(Rc::downgrade(&node.0));
                Self::build(child, parent, resource, initialized)
            })
            .collect::<Children<T>>();
        {
            let mut state = node.state_mut();
            state.height = height_of(&children);
            state.children = children;
        }
        initialized.push(node.clone());
        node
    }

    /// Publish the initialization of all nodes of a new subtree.
    ///
    /// Handlers may modify the subtree in between. Nodes that are no longer
    /// part of the attached subtree are skipped and the children snapshots
    /// are taken right before publishing.
    fn emit_initialized(subtree: &Self, initialized: Vec<Self>) {
        for node in initialized {
            if subtree.is_detached() || !subtree.contains(&node) {
                log::trace!(
                    "Skipping initialization of node {id} that has been moved out of subtree {subtree_id}",
                    id = node.id(),
                    subtree_id = subtree.id()
                );
                continue;
            }
            let children = node.children();
            subtree
                .resource()
                .child_changed
                .emit(&ChildChanged::from(ChildInitialized { node, children }));
        }
    }

    /// Insert the new subtree, then publish its insertion followed by the
    /// initialization of its nodes.
    fn insert_child(&self, index: usize, spec: NodeSpec<T>) -> Self {
        let mut initialized = Vec::new();
        let parent = ParentLink::Attached(Rc::downgrade(&self.0));
        let added_node = Self::build(spec, parent, &self.0.resource, &mut initialized);
        let children = {
            let mut state = self.state_mut();
            state.children.insert(index, added_node.clone());
            state.children.clone()
        };
        self.refresh_heights();
        log::debug!(
            "Inserted node {added_id} into the children of node {id} at index {index}",
            added_id = added_node.id(),
            id = self.id()
        );
        let event = ChildAdded {
            node: self.clone(),
            index,
            added_node: added_node.clone(),
            children,
        };
        self.resource()
            .child_changed
            .emit(&ChildChanged::from(event));
        Self::emit_initialized(&added_node, initialized);
        added_node
    }

    /// Create a new node from `spec` and append it as the last child.
    ///
    /// Returns the new node.
    pub fn append_child(&self, spec: NodeSpec<T>) -> Self {
        let index = self.state().children.len();
        self.insert_child(index, spec)
    }

    /// Create a new node from `spec` and insert it as the preceding sibling.
    ///
    /// Returns `false` without any effect if this node has no parent node.
    ///
    /// # Errors
    ///
    /// Fails if the parent node doesn't list this node among its children.
    pub fn append_before(&self, spec: NodeSpec<T>) -> Result<bool, TreeError> {
        self.insert_sibling(spec, Placement::Before)
    }

    /// Create a new node from `spec` and insert it as the following sibling.
    ///
    /// Returns `false` without any effect if this node has no parent node.
    ///
    /// # Errors
    ///
    /// Fails if the parent node doesn't list this node among its children.
    pub fn append_after(&self, spec: NodeSpec<T>) -> Result<bool, TreeError> {
        self.insert_sibling(spec, Placement::After)
    }

    fn insert_sibling(&self, spec: NodeSpec<T>, placement: Placement) -> Result<bool, TreeError> {
        let Parent::Node(parent) = self.parent() else {
            log::debug!(
                "Cannot insert a sibling of node {id} without a parent node",
                id = self.id()
            );
            return Ok(false);
        };
        let index = parent
            .child_index(self)
            .ok_or_else(|| TreeError::MissingChild {
                parent: parent.id(),
                child: self.id(),
            })?;
        let index = match placement {
            Placement::Before => index,
            Placement::After => index + 1,
        };
        parent.insert_child(index, spec);
        Ok(true)
    }

    /// Detach this node and its subtree from the parent node.
    ///
    /// A removed node stays detached forever. Returns `false` without any
    /// effect if this node has no parent node, i.e. if it is the root or
    /// has already been removed.
    ///
    /// The tree is updated completely before any events are published:
    /// this node is already [`Parent::Detached`] when the child removal
    /// event of the parent and then the removal event of this node are
    /// delivered.
    ///
    /// # Errors
    ///
    /// Fails if the parent node doesn't list this node among its children.
    pub fn remove(&self) -> Result<bool, TreeError> {
        let Parent::Node(parent) = self.parent() else {
            log::debug!(
                "Cannot remove node {id} without a parent node",
                id = self.id()
            );
            return Ok(false);
        };
        let (old_index, old_children, children) = {
            let mut state = parent.state_mut();
            let old_index = state
                .children
                .iter()
                .position(|child| child == self)
                .ok_or_else(|| TreeError::MissingChild {
                    parent: parent.id(),
                    child: self.id(),
                })?;
            let old_children = state.children.clone();
            let removed_node = state.children.remove(old_index);
            debug_assert!(removed_node == *self);
            (old_index, old_children, state.children.clone())
        };
        self.state_mut().parent = ParentLink::Detached;
        parent.refresh_heights();
        log::debug!(
            "Removed node {id} from the children of node {parent_id} at index {old_index}",
            id = self.id(),
            parent_id = parent.id()
        );
        let event = ChildRemoved {
            node: parent,
            removed_node: self.clone(),
            children,
            old_index,
            old_children,
        };
        self.resource()
            .child_changed
            .emit(&ChildChanged::from(event));
        self.resource().removed.emit(self);
        Ok(true)
    }

    /// Remove a direct child of this node.
    ///
    /// Returns `false` if `node` is not a child of this node.
    ///
    /// # Errors
    ///
    /// Fails if the child has been found but could not be removed.
    pub fn remove_child(&self, node: &TreeNode<T>) -> Result<bool, TreeError> {
        if self.child_index(node).is_none() {
            return Ok(false);
        }
        if node.remove()? {
            Ok(true)
        } else {
            Err(TreeError::RemovalRejected {
                parent: self.id(),
                child: node.id(),
            })
        }
    }

    /// Remove all direct children one after another.
    ///
    /// Children that are removed by event handlers in the meantime are
    /// skipped. Returns the number of children removed by this call.
    ///
    /// # Errors
    ///
    /// Aborts on the first child that could not be removed.
    pub fn remove_all_children(&self) -> Result<usize, TreeError> {
        let children = self.children();
        let mut removed_count = 0;
        for child in &children {
            if !child.is_child_of(self) {
                continue;
            }
            if !self.remove_child(child)? {
                return Err(TreeError::MissingChild {
                    parent: self.id(),
                    child: child.id(),
                });
            }
            removed_count += 1;
        }
        Ok(removed_count)
    }

    #[must_use]
    pub fn data(&self) -> T {
        self.state().data.clone()
    }

    /// Replace the data and publish the previous value.
    pub fn set_data(&self, data: T) {
        let previous = std::mem::replace(&mut self.state_mut().data, data.clone());
        log::trace!("Updated data of node {id}", id = self.id());
        self.resource().updated.emit(&NodeUpdated {
            data,
            previous,
            node: self.clone(),
        });
    }

    /// Blueprint of this node and its current descendants.
    #[must_use]
    pub fn prop(&self) -> NodeSpec<T> {
        NodeSpec {
            data: self.data(),
            children: self.children().iter().map(Self::prop).collect(),
        }
    }

    /// Mark this node as selected.
    ///
    /// Doesn't affect any other nodes.
    pub fn select(&self) {
        self.set_selected(true);
    }

    /// Mark this node as not selected.
    ///
    /// Doesn't affect any other nodes.
    pub fn deselect(&self) {
        self.set_selected(false);
    }

    fn set_selected(&self, selected: bool) {
        self.state_mut().selected = selected;
        log::trace!(
            "Updated selection of node {id} to {selected}",
            id = self.id()
        );
        self.resource()
            .selection_changed
            .emit(&SelectionChanged {
                selected,
                node: self.clone(),
            });
    }

    /// Show or hide this node.
    ///
    /// Doesn't affect any other nodes, neither ancestors nor descendants.
    pub fn set_visibility(&self, visible: bool) {
        self.state_mut().visible = visible;
        log::trace!(
            "Updated visibility of node {id} to {visible}",
            id = self.id()
        );
        self.resource()
            .visibility_changed
            .emit(&VisibilityChanged {
                visible,
                node: self.clone(),
            });
    }

    /// All selected nodes of this subtree in breadth-first order.
    #[must_use]
    pub fn selected_nodes(&self) -> Vec<Self> {
        self.breadth_first()
            .map(|visit| visit.node)
            .filter(TreeNode::selected)
            .collect()
    }

    fn scoped<E>(&self, channel: &Channel<E>) -> EventStream<E>
    where
        E: NodeEvent<T> + 'static,
    {
        // Filter by id to avoid holding a strong reference to this node.
        let id = self.id();
        channel.stream().filter(move |event| event.node().id() == id)
    }

    /// Changes of the children of this node.
    #[must_use]
    pub fn on_child_changed(&self) -> EventStream<ChildChanged<T>> {
        self.scoped(&self.resource().child_changed)
    }

    #[must_use]
    pub fn on_visibility_change(&self) -> EventStream<VisibilityChanged<T>> {
        self.scoped(&self.resource().visibility_changed)
    }

    #[must_use]
    pub fn on_updated(&self) -> EventStream<NodeUpdated<T>> {
        self.scoped(&self.resource().updated)
    }

    #[must_use]
    pub fn on_selection_change(&self) -> EventStream<SelectionChanged<T>> {
        self.scoped(&self.resource().selection_changed)
    }

    /// Resolves with this node once it has been removed from its tree.
    #[must_use]
    pub fn on_removed(&self) -> OneShot<Self> {
        self.scoped(&self.resource().removed).first()
    }
}

impl<T> Clone for TreeNode<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for TreeNode<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Eq for TreeNode<T> {}

impl<T> Hash for TreeNode<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for TreeNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("TreeNode");
        debug.field("id", &self.id());
        // Might be formatted while being modified
        if let Ok(state) = self.0.state.try_borrow() {
            debug
                .field("data", &state.data)
                .field("parent", &state.parent.resolve())
                .field("children", &state.children.len())
                .field("height", &state.height)
                .field("selected", &state.selected)
                .field("visible", &state.visible);
        }
        debug.finish_non_exhaustive()
    }
}
