// SPDX-FileCopyrightText: The reactive-tree authors
// SPDX-License-Identifier: MPL-2.0

use std::{
    num::NonZeroU64,
    sync::atomic::{AtomicU64, Ordering},
};

static NEXT_NODE_ID_VALUE: AtomicU64 = AtomicU64::new(1);

/// Ephemeral identity of a [`TreeNode`](crate::TreeNode).
///
/// Assigned once when a node is created and never reused while the
/// process is running, not even across different trees. Ids are not
/// stable between runs and must not be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub struct NodeId(NonZeroU64);

impl NodeId {
    pub(crate) fn next() -> Self {
        loop {
            // Only uniqueness matters, no ordering with other memory operations.
            let value = NEXT_NODE_ID_VALUE.fetch_add(1, Ordering::Relaxed);
            if let Some(value) = NonZeroU64::new(value) {
                return Self(value);
            }
            // The counter wrapped around and yielded 0, skip it.
        }
    }

    /// The raw, non-zero value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}
