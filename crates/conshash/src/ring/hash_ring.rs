//! The consistent hash ring.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use super::builder::{RingConfig, DEFAULT_VNODES};
use super::circle::Circle;
use super::registry::Registry;
use crate::error::{Error, Result};
use crate::hash::hash_key;
use crate::vnode::VirtualNode;

/// Circle and registry, always mutated together.
#[derive(Debug, Clone)]
struct RingState<V> {
    registry: Registry<V>,
    circle: Circle,
}

impl<V> RingState<V> {
    fn new() -> Self {
        Self {
            registry: Registry::new(),
            circle: Circle::new(),
        }
    }

    fn rebuild(&mut self) {
        self.circle.rebuild(self.registry.points());
    }

    fn owner_of(&self, target: u64) -> Result<&str> {
        let point = self.circle.locate(target)?;
        // Circle and registry are rebuilt together, so every point has an owner.
        self.registry.owner(point).ok_or(Error::RingEmpty)
    }
}

/// A thread-safe consistent hash ring mapping arbitrary keys onto named nodes.
///
/// Every node is placed on the ring at `vnodes` virtual points. A lookup key
/// is owned by the first point at or after its hash, wrapping past the top of
/// the ring.
///
/// All state sits behind one reader/writer lock: lookups and enumeration share
/// it, inserts and removes hold it exclusively for the whole check-and-mutate
/// sequence.
///
/// # Example
///
/// ```rust
/// use conshash::HashRing;
///
/// let ring = HashRing::new(20)?;
/// ring.insert("server1", "10.0.0.1").insert("server2", "10.0.0.2");
///
/// let (node, addr) = ring.lookup("clientid42")?;
/// assert!(node == "server1" || node == "server2");
/// assert_eq!(ring.get(&node), Some(addr));
/// # Ok::<(), conshash::Error>(())
/// ```
#[derive(Debug)]
pub struct HashRing<V> {
    vnodes: usize,
    state: RwLock<RingState<V>>,
}

impl<V> HashRing<V> {
    /// Create an empty ring placing `vnodes` points per node.
    pub fn new(vnodes: usize) -> Result<Self> {
        if vnodes == 0 {
            return Err(Error::InvalidVnodeCount(vnodes));
        }
        Ok(Self {
            vnodes,
            state: RwLock::new(RingState::new()),
        })
    }

    pub fn with_config(config: &RingConfig) -> Result<Self> {
        Self::new(config.vnodes)
    }

    /// Virtual points per node, fixed for the ring's lifetime.
    pub fn vnode_count(&self) -> usize {
        self.vnodes
    }

    /// Add `key` unless it is already present. Returns whether it was added.
    ///
    /// A key that is already present keeps its original value and points.
    pub fn try_insert(&self, key: impl Into<String>, value: V) -> bool {
        let key = key.into();
        let vnodes = VirtualNode::derive_all(&key, self.vnodes);

        let mut state = self.state.write();
        if state.registry.contains(&key) {
            debug!(node = %key, "node already on ring");
            return false;
        }
        state.registry.insert(key.clone(), value, vnodes);
        state.rebuild();
        debug!(
            node = %key,
            points = self.vnodes,
            total_points = state.circle.len(),
            "inserted node"
        );
        true
    }

    /// Add `key` unless it is already present, returning the ring for chaining.
    pub fn insert(&self, key: impl Into<String>, value: V) -> &Self {
        self.try_insert(key, value);
        self
    }

    /// Remove `key` and its points, returning its value. `None` if the key
    /// was never inserted.
    pub fn remove(&self, key: &str) -> Option<V> {
        let mut state = self.state.write();
        let value = state.registry.remove(key)?;
        state.rebuild();
        debug!(
            node = %key,
            total_points = state.circle.len(),
            "removed node"
        );
        Some(value)
    }

    /// Node key owning `key`.
    pub fn owner(&self, key: impl AsRef<[u8]>) -> Result<String> {
        let target = hash_key(key);
        let state = self.state.read();
        let owner = state.owner_of(target)?;
        Ok(owner.to_string())
    }

    /// Virtual point owning `key`.
    pub fn lookup_point(&self, key: impl AsRef<[u8]>) -> Result<u64> {
        let target = hash_key(key);
        let state = self.state.read();
        state.circle.locate(target)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.state.read().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().registry.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.read().registry.contains(key)
    }

    /// Distinct points on the circle.
    pub fn point_count(&self) -> usize {
        self.state.read().circle.len()
    }

    /// Append every node key to `dest` in ascending order, returning how many
    /// were appended.
    pub fn keys_into(&self, dest: &mut Vec<String>) -> usize {
        let state = self.state.read();
        let nodes = state.registry.nodes();
        dest.extend(nodes.keys().cloned());
        nodes.len()
    }

    /// Snapshot of the circle: every point with its owning node, in ring order.
    pub fn points(&self) -> Vec<(u64, String)> {
        let state = self.state.read();
        state
            .circle
            .points()
            .iter()
            .filter_map(|&p| state.registry.owner(p).map(|o| (p, o.to_string())))
            .collect()
    }

    /// Points derived for `key`, in index order.
    pub fn node_points(&self, key: &str) -> Option<Vec<u64>> {
        self.state.read().registry.node_points(key).map(<[u64]>::to_vec)
    }

    /// Share of the hash space owned by each node, in `[0, 1]`.
    ///
    /// A point owns the arc from its predecessor (exclusive) up to itself.
    pub fn ownership(&self) -> BTreeMap<String, f64> {
        let state = self.state.read();
        let mut shares: BTreeMap<String, f64> = state
            .registry
            .nodes()
            .keys()
            .map(|k| (k.clone(), 0.0))
            .collect();

        let points = state.circle.points();
        let span = 2f64.powi(64);
        if let [only] = points {
            if let Some(owner) = state.registry.owner(*only) {
                shares.insert(owner.to_string(), 1.0);
            }
            return shares;
        }
        let mut prev = points.last().copied();
        for &p in points {
            if let (Some(before), Some(owner)) = (prev, state.registry.owner(p)) {
                if let Some(share) = shares.get_mut(owner) {
                    *share += p.wrapping_sub(before) as f64 / span;
                }
            }
            prev = Some(p);
        }
        shares
    }
}

impl<V: Clone> HashRing<V> {
    /// Node key and value owning `key`.
    ///
    /// `key` need not be a node key. Fails with [`Error::RingEmpty`] when no
    /// node is on the ring.
    pub fn lookup(&self, key: impl AsRef<[u8]>) -> Result<(String, V)> {
        let target = hash_key(key);
        let state = self.state.read();
        let owner = state.owner_of(target)?;
        let value = state.registry.value(owner).cloned().ok_or(Error::RingEmpty)?;
        Ok((owner.to_string(), value))
    }

    /// Value stored for node `key`.
    pub fn get(&self, key: &str) -> Option<V> {
        self.state.read().registry.value(key).cloned()
    }

    /// Copy of the full node table.
    pub fn entries(&self) -> BTreeMap<String, V> {
        self.state.read().registry.nodes().clone()
    }

    /// Append every node value to `dest` in ascending key order, returning
    /// how many were appended.
    pub fn values_into(&self, dest: &mut Vec<V>) -> usize {
        let state = self.state.read();
        let nodes = state.registry.nodes();
        dest.extend(nodes.values().cloned());
        nodes.len()
    }
}

impl<V> Default for HashRing<V> {
    fn default() -> Self {
        Self {
            vnodes: DEFAULT_VNODES,
            state: RwLock::new(RingState::new()),
        }
    }
}

/// Independent copy of the ring taken under the read lock.
impl<V: Clone> Clone for HashRing<V> {
    fn clone(&self) -> Self {
        Self {
            vnodes: self.vnodes,
            state: RwLock::new(RingState::clone(&self.state.read())),
        }
    }
}
