// SPDX-FileCopyrightText: The reactive-tree authors
// SPDX-License-Identifier: MPL-2.0

//! Mutable tree data structure with node-scoped change notifications.
//!
//! A [`Tree`] is created from a [`NodeSpec`] blueprint. Its nodes are
//! modified through the methods of [`TreeNode`] and every change is
//! published synchronously, after the tree has been updated, to the
//! subscribers of the affected node and of the whole tree.
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//!
//! use reactive_tree::{ChildChanged, NodeSpec, Tree};
//!
//! let tree = Tree::new(NodeSpec::new("root").child(NodeSpec::new("a")));
//! let added = Rc::new(RefCell::new(Vec::new()));
//! let subscription = tree.root().on_child_changed().subscribe({
//!     let added = Rc::clone(&added);
//!     move |event| {
//!         if let ChildChanged::Added(event) = event {
//!             added.borrow_mut().push((event.index, event.added_node.data()));
//!         }
//!     }
//! });
//! tree.root().append_child(NodeSpec::new("b"));
//! assert_eq!(vec![(1, "b")], *added.borrow());
//! assert_eq!(2, tree.height());
//! subscription.unsubscribe();
//! ```

mod channel;
pub use self::channel::{EventStream, Subscription};

mod error;
pub use self::error::TreeError;

mod event;
pub use self::event::{
    ChildAdded, ChildChangeKind, ChildChanged, ChildInitialized, ChildRemoved, NodeEvent,
    NodeUpdated, SelectionChanged, VisibilityChanged,
};

mod node;
pub use self::node::{Children, Parent, TreeNode};

mod node_id;
pub use self::node_id::NodeId;

mod node_spec;
pub use self::node_spec::NodeSpec;

mod one_shot;
pub use self::one_shot::OneShot;

mod resource;

mod traversal;
pub use self::traversal::{
    AncestorsIter, BreadthFirstIter, DepthFirstIter, NodesQuery, TraversalOrder, Visit,
};

mod tree;
pub use self::tree::Tree;
