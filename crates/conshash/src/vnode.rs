//! Virtual node abstractions.
//!
//! # Virtual Nodes
//!
//! Each node is placed on the ring at several positions rather than one. More
//! positions give a smoother spread of keys across nodes, and when a node
//! leaves, the keys it owned are handed to many different neighbours instead
//! of a single successor.
//!
//! - **Memory**: O(v) per node, where v = vnodes per node
//! - **Lookup**: O(log t), where t = total points on the ring

use crate::hash::vnode_hash;

/// A single virtual point owned by a node.
///
/// Ordered by hash first, so a sorted `Vec<VirtualNode>` is in ring order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Position on the ring.
    pub hash: u64,
    /// Index of this point within its node, in `[0, vnodes)`.
    pub index: usize,
}

impl VirtualNode {
    #[inline]
    pub fn new(hash: u64, index: usize) -> Self {
        Self { hash, index }
    }

    /// Derive point `index` for `node_key`.
    pub fn from_index(node_key: &str, index: usize) -> Self {
        Self::new(vnode_hash(node_key, index), index)
    }

    /// Derive all `count` points for `node_key`, in index order.
    pub fn derive_all(node_key: &str, count: usize) -> Vec<Self> {
        (0..count).map(|i| Self::from_index(node_key, i)).collect()
    }
}

impl std::fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VNode(hash={:016x}, index={})", self.hash, self.index)
    }
}
