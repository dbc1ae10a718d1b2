//! Ring configuration and builder.

use serde::{Deserialize, Serialize};

use super::hash_ring::HashRing;
use crate::error::Result;

/// Virtual points per node when none is configured.
pub const DEFAULT_VNODES: usize = 256;

/// Settings fixed at ring construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Virtual points per node. Must be at least 1.
    pub vnodes: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            vnodes: DEFAULT_VNODES,
        }
    }
}

/// Builds a [`HashRing`] with an initial set of nodes.
///
/// ```rust
/// use conshash::RingBuilder;
///
/// let ring = RingBuilder::new()
///     .with_vnodes(20)
///     .add_node("server1", 1)
///     .add_node("server2", 2)
///     .build()?;
/// assert_eq!(ring.len(), 2);
/// assert_eq!(ring.point_count(), 40);
/// # Ok::<(), conshash::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RingBuilder<V> {
    config: RingConfig,
    nodes: Vec<(String, V)>,
}

impl<V> RingBuilder<V> {
    pub fn new() -> Self {
        Self::from_config(RingConfig::default())
    }

    pub fn from_config(config: RingConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
        }
    }

    pub fn with_vnodes(mut self, vnodes: usize) -> Self {
        self.config.vnodes = vnodes;
        self
    }

    /// Queue a node. If the same key is queued twice, the first value wins.
    pub fn add_node(mut self, key: impl Into<String>, value: V) -> Self {
        self.nodes.push((key.into(), value));
        self
    }

    /// Fails if the configured vnode count is zero.
    pub fn build(self) -> Result<HashRing<V>> {
        let ring = HashRing::with_config(&self.config)?;
        for (key, value) in self.nodes {
            ring.try_insert(key, value);
        }
        Ok(ring)
    }
}

impl<V> Default for RingBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_config_default() {
        assert_eq!(RingConfig::default().vnodes, DEFAULT_VNODES);
    }

    #[test]
    fn test_config_deserialize_fills_defaults() {
        let config: RingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RingConfig::default());

        let config: RingConfig = serde_json::from_str(r#"{"vnodes": 20}"#).unwrap();
        assert_eq!(config.vnodes, 20);
    }

    #[test]
    fn test_builder_duplicate_keeps_first() {
        let ring = RingBuilder::new()
            .with_vnodes(4)
            .add_node("a", 1)
            .add_node("a", 2)
            .build()
            .unwrap();
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.get("a"), Some(1));
    }

    #[test]
    fn test_builder_rejects_zero_vnodes() {
        let result = RingBuilder::<()>::new().with_vnodes(0).build();
        assert!(matches!(result, Err(Error::InvalidVnodeCount(0))));
    }
}
