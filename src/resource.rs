// SPDX-FileCopyrightText: The reactive-tree authors
// SPDX-License-Identifier: MPL-2.0

use crate::{
    channel::Channel, ChildChanged, NodeUpdated, SelectionChanged, TreeNode, VisibilityChanged,
};

/// Notification channels shared by all nodes of a single tree.
///
/// Created exactly once per [`Tree`](crate::Tree). Nodes only emit into
/// these channels, consumers only get read-only streams.
#[derive(Debug)]
pub(crate) struct SharedResource<T> {
    pub(crate) removed: Channel<TreeNode<T>>,
    pub(crate) visibility_changed: Channel<VisibilityChanged<T>>,
    pub(crate) updated: Channel<NodeUpdated<T>>,
    pub(crate) selection_changed: Channel<SelectionChanged<T>>,
    pub(crate) child_changed: Channel<ChildChanged<T>>,
}

impl<T: 'static> SharedResource<T> {
    pub(crate) fn new() -> Self {
        Self {
            removed: Channel::new("removed"),
            visibility_changed: Channel::new("visibility_changed"),
            updated: Channel::new("updated"),
            selection_changed: Channel::new("selection_changed"),
            child_changed: Channel::new("child_changed"),
        }
    }

    pub(crate) fn close(&self) {
        self.removed.close();
        self.visibility_changed.close();
        self.updated.close();
        self.selection_changed.close();
        self.child_changed.close();
    }
}

impl<T> SharedResource<T> {
    /// All channels are closed together.
    pub(crate) fn is_closed(&self) -> bool {
        self.child_changed.is_closed()
    }
}
