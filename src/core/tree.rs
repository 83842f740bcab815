//! core::tree
//!
//! Parent/child index over the node arena.
//!
//! # Architecture
//!
//! The taxonomy is an n-ary forest where:
//! - Nodes are arena entries identified by [`NodeId`]
//! - Edges point from child to parent (stored as a parent pointer)
//! - Roots have no parent entry
//!
//! # Invariants
//!
//! - The index must be acyclic
//! - Every indexed node exists in the arena (enforced by the store)

use super::types::NodeId;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// The parent/child index derived from node parent pointers.
///
/// This is an in-memory structure kept consistent with the arena by the
/// store; it never outlives a mutation that changes structure.
#[derive(Debug, Default, Clone)]
pub struct TreeIndex {
    /// Parent pointer for each non-root node
    parents: HashMap<NodeId, NodeId>,
    /// Cached children sets (derived from parents)
    children: HashMap<NodeId, BTreeSet<NodeId>>,
}

impl TreeIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a parent relationship.
    ///
    /// This also updates the children cache.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) {
        self.children.entry(parent).or_default().insert(child);
        self.parents.insert(child, parent);
    }

    /// Remove a node's parent relationship, making it structurally a root.
    pub fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.parents.remove(&child) {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.remove(&child);
                if siblings.is_empty() {
                    self.children.remove(&parent);
                }
            }
        }
    }

    /// Drop every trace of a node (used on destroy).
    ///
    /// The caller is responsible for the node's descendants.
    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
        self.children.remove(&node);
    }

    /// Get the parent of a node.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents.get(&node).copied()
    }

    /// Get the children of a node, ordered by id.
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children.get(&node).into_iter().flatten().copied()
    }

    /// Whether the node has any children.
    pub fn has_children(&self, node: NodeId) -> bool {
        self.children.get(&node).is_some_and(|c| !c.is_empty())
    }

    /// Get all ancestors of a node, immediate parent first.
    ///
    /// # Example
    ///
    /// ```
    /// use vocabtree::core::tree::TreeIndex;
    /// use vocabtree::core::types::NodeId;
    ///
    /// let mut tree = TreeIndex::new();
    /// tree.attach(NodeId(2), NodeId(1));
    /// tree.attach(NodeId(3), NodeId(2));
    ///
    /// assert_eq!(tree.ancestors(NodeId(3)), vec![NodeId(2), NodeId(1)]);
    /// ```
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.parent(node);

        while let Some(parent) = current {
            result.push(parent);
            current = self.parent(parent);
        }

        result
    }

    /// Get all descendants of a node (children, grandchildren, ...).
    ///
    /// Breadth-first, so parents always precede their own children in the
    /// returned order. The node itself is not included.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        let mut queue: VecDeque<NodeId> = self.children(node).collect();

        while let Some(current) = queue.pop_front() {
            if seen.insert(current) {
                result.push(current);
                queue.extend(self.children(current));
            }
        }

        result
    }

    /// Check whether `candidate` is `node` itself or one of its descendants.
    ///
    /// Used as the cycle check for reparenting: a node may not be moved
    /// under itself or under anything below it.
    pub fn is_self_or_descendant(&self, node: NodeId, candidate: NodeId) -> bool {
        if node == candidate {
            return true;
        }
        // Walk up from the candidate; cheaper than materializing the subtree.
        let mut current = self.parent(candidate);
        while let Some(parent) = current {
            if parent == node {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// Check if the index contains a cycle.
    ///
    /// Returns `Some(node)` for a node on a cycle. The store never produces
    /// one; this backs the verification pass over loaded snapshots.
    pub fn find_cycle(&self) -> Option<NodeId> {
        let mut visited = HashSet::new();
        let mut path = HashSet::new();

        for node in self.parents.keys() {
            if self.has_cycle_from(*node, &mut visited, &mut path) {
                return Some(*node);
            }
        }
        None
    }

    fn has_cycle_from(
        &self,
        node: NodeId,
        visited: &mut HashSet<NodeId>,
        path: &mut HashSet<NodeId>,
    ) -> bool {
        if path.contains(&node) {
            return true;
        }
        if visited.contains(&node) {
            return false;
        }

        visited.insert(node);
        path.insert(node);

        if let Some(parent) = self.parent(node) {
            if self.has_cycle_from(parent, visited, path) {
                return true;
            }
        }

        path.remove(&node);
        false
    }
}
