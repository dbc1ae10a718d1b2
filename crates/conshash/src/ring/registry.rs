//! Node registry: which nodes exist, which points they own, and which node
//! owns each point.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::vnode::VirtualNode;

/// The three associated mappings behind a ring.
///
/// Not synchronized on its own; [`HashRing`](super::HashRing) keeps it behind
/// its lock together with the circle.
#[derive(Debug, Clone)]
pub struct Registry<V> {
    /// node key -> payload
    nodes: BTreeMap<String, V>,
    /// node key -> its virtual-point hashes, in index order
    node_points: BTreeMap<String, Vec<u64>>,
    /// point hash -> every node key that derived it, sorted ascending
    ///
    /// Almost always a single key. The first key is the owner, so a collision
    /// between two nodes resolves to the same owner regardless of insertion
    /// order.
    point_owners: HashMap<u64, Vec<String>>,
}

impl<V> Default for Registry<V> {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            node_points: BTreeMap::new(),
            point_owners: HashMap::new(),
        }
    }
}

impl<V> Registry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    /// Register `key` with its derived points. Returns `false` and changes
    /// nothing if `key` is already registered.
    pub fn insert(&mut self, key: String, value: V, vnodes: Vec<VirtualNode>) -> bool {
        if self.nodes.contains_key(&key) {
            return false;
        }

        let mut hashes = Vec::with_capacity(vnodes.len());
        for vnode in vnodes {
            hashes.push(vnode.hash);
            match self.point_owners.entry(vnode.hash) {
                Entry::Vacant(slot) => {
                    slot.insert(vec![key.clone()]);
                }
                Entry::Occupied(mut slot) => {
                    let claims = slot.get_mut();
                    if let Err(pos) = claims.binary_search(&key) {
                        warn!(
                            node = %key,
                            %vnode,
                            existing = %claims[0],
                            "virtual point collision"
                        );
                        claims.insert(pos, key.clone());
                    }
                }
            }
        }

        self.node_points.insert(key.clone(), hashes);
        self.nodes.insert(key, value);
        true
    }

    /// Drop `key` and its claims on every point. Points claimed by no other
    /// node disappear.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let value = self.nodes.remove(key)?;
        for hash in self.node_points.remove(key).unwrap_or_default() {
            if let Entry::Occupied(mut slot) = self.point_owners.entry(hash) {
                slot.get_mut().retain(|k| k != key);
                if slot.get().is_empty() {
                    slot.remove();
                }
            }
        }
        Some(value)
    }

    /// Owner of a point currently on the ring.
    pub fn owner(&self, point: u64) -> Option<&str> {
        self.point_owners
            .get(&point)
            .and_then(|claims| claims.first())
            .map(String::as_str)
    }

    pub fn value(&self, key: &str) -> Option<&V> {
        self.nodes.get(key)
    }

    pub fn node_points(&self, key: &str) -> Option<&[u64]> {
        self.node_points.get(key).map(Vec::as_slice)
    }

    /// Every distinct point hash across all live nodes.
    pub fn points(&self) -> impl Iterator<Item = u64> + '_ {
        self.point_owners.keys().copied()
    }

    pub fn nodes(&self) -> &BTreeMap<String, V> {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
