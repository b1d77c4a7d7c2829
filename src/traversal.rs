// SPDX-FileCopyrightText: The reactive-tree authors
// SPDX-License-Identifier: MPL-2.0

use std::collections::VecDeque;

use crate::TreeNode;

/// A node encountered during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit<T> {
    pub node: TreeNode<T>,

    /// Distance from the node where the traversal started, i.e. 0 for
    /// the starting node itself.
    pub level: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    /// Level by level.
    #[default]
    BreadthFirst,

    /// Pre-order, i.e. each node before the subtrees of its children.
    DepthFirst,
}

/// Selects the nodes returned by [`TreeNode::get_nodes()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodesQuery {
    /// All nodes in breadth-first order.
    #[default]
    All,

    /// All nodes at the given level in breadth-first order.
    Level(usize),

    /// All nodes in the given order.
    Order(TraversalOrder),
}

impl From<usize> for NodesQuery {
    fn from(level: usize) -> Self {
        Self::Level(level)
    }
}

impl From<TraversalOrder> for NodesQuery {
    fn from(order: TraversalOrder) -> Self {
        Self::Order(order)
    }
}

/// Breadth-first iterator over a subtree, starting with its root.
#[derive(Debug)]
pub struct BreadthFirstIter<T> {
    queue: VecDeque<Visit<T>>,
}

impl<T> Iterator for BreadthFirstIter<T> {
    type Item = Visit<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.queue.pop_front()?;
        let level = visit.level + 1;
        self.queue.extend(visit.node.children().iter().map(|node| Visit {
            node: node.clone(),
            level,
        }));
        Some(visit)
    }
}

/// Pre-order, depth-first iterator over a subtree, starting with its root.
#[derive(Debug)]
pub struct DepthFirstIter<T> {
    stack: Vec<Visit<T>>,
}

impl<T> Iterator for DepthFirstIter<T> {
    type Item = Visit<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.stack.pop()?;
        let level = visit.level + 1;
        // Reversed for visiting the first child next
        self.stack
            .extend(visit.node.children().iter().rev().map(|node| Visit {
                node: node.clone(),
                level,
            }));
        Some(visit)
    }
}

/// Iterator over all ancestors of a node, up to the root.
#[derive(Debug)]
pub struct AncestorsIter<T> {
    next_node: Option<TreeNode<T>>,
}

impl<T> Iterator for AncestorsIter<T> {
    type Item = TreeNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next_node.take()?.parent().node().cloned()?;
        self.next_node = Some(node.clone());
        Some(node)
    }
}

impl<T> TreeNode<T> {
    /// Traverse this subtree level by level.
    ///
    /// The children of a node are captured when the node is visited.
    #[must_use]
    pub fn breadth_first(&self) -> BreadthFirstIter<T> {
        BreadthFirstIter {
            queue: VecDeque::from([Visit {
                node: self.clone(),
                level: 0,
            }]),
        }
    }

    /// Traverse this subtree in pre-order.
    #[must_use]
    pub fn depth_first(&self) -> DepthFirstIter<T> {
        DepthFirstIter {
            stack: vec![Visit {
                node: self.clone(),
                level: 0,
            }],
        }
    }

    /// Parent, grandparent, and so on.
    ///
    /// Empty for a root or detached node.
    #[must_use]
    pub fn ancestors(&self) -> AncestorsIter<T> {
        AncestorsIter {
            next_node: Some(self.clone()),
        }
    }

    /// Breadth-first search that collects all accepted nodes.
    ///
    /// Stops after the first accepted node if `stop_when_found` is set.
    pub fn bfs(
        &self,
        mut predicate: impl FnMut(&Visit<T>) -> bool,
        stop_when_found: bool,
    ) -> Vec<Visit<T>> {
        let mut visits = Vec::new();
        for visit in self.breadth_first() {
            if predicate(&visit) {
                visits.push(visit);
                if stop_when_found {
                    break;
                }
            }
        }
        visits
    }

    #[must_use]
    pub fn dfs(&self) -> Vec<Visit<T>> {
        self.depth_first().collect()
    }

    /// The first node in breadth-first order that matches the predicate.
    pub fn find(&self, mut predicate: impl FnMut(&TreeNode<T>) -> bool) -> Option<TreeNode<T>> {
        self.breadth_first()
            .map(|visit| visit.node)
            .find(|node| predicate(node))
    }

    /// Whether `node` is this node or one of its descendants.
    #[must_use]
    pub fn contains(&self, node: &TreeNode<T>) -> bool {
        node == self || node.ancestors().any(|ancestor| ancestor == *self)
    }

    /// Nodes of this subtree, including this node.
    ///
    /// Levels are counted from this node.
    #[must_use]
    pub fn get_nodes(&self, query: impl Into<NodesQuery>) -> Vec<TreeNode<T>> {
        match query.into() {
            NodesQuery::All | NodesQuery::Order(TraversalOrder::BreadthFirst) => {
                self.breadth_first().map(|visit| visit.node).collect()
            }
            NodesQuery::Order(TraversalOrder::DepthFirst) => {
                self.depth_first().map(|visit| visit.node).collect()
            }
            NodesQuery::Level(level) => self
                .breadth_first()
                // Levels never decrease in breadth-first order
                .take_while(|visit| visit.level <= level)
                .filter(|visit| visit.level == level)
                .map(|visit| visit.node)
                .collect(),
        }
    }
}
