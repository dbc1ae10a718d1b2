//! Error types for the ring.

use thiserror::Error;

/// Result type alias for the ring.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building or querying a ring.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Lookup on a ring with no live nodes.
    #[error("ring is empty")]
    RingEmpty,
    /// A ring needs at least one virtual point per node.
    #[error("invalid vnode count: {0} (must be at least 1)")]
    InvalidVnodeCount(usize),
}
