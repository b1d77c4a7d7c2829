// SPDX-FileCopyrightText: The reactive-tree authors
// SPDX-License-Identifier: MPL-2.0

use thiserror::Error;

use crate::NodeId;

/// Defects detected while mutating or querying a tree.
///
/// Operations that are merely not applicable, e.g. removing a root node,
/// are reported through their regular return value and never as an error.
/// An error of this type indicates inconsistent bookkeeping inside the
/// tree and callers are not expected to recover from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {child} is missing from the children of its parent node {parent}")]
    MissingChild { parent: NodeId, child: NodeId },

    #[error("removal of child node {child} from parent node {parent} was rejected")]
    RemovalRejected { parent: NodeId, child: NodeId },

    #[error("{operation} is not implemented")]
    Unimplemented { operation: &'static str },
}
