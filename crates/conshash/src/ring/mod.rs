//! Consistent hash ring implementation.
//!
//! The ring keeps a sorted circle of virtual-point hashes next to a registry
//! that maps points back to nodes, and answers "which node owns this key" with
//! a binary search over the circle.

pub mod builder;
pub mod circle;
pub mod hash_ring;
pub mod registry;

pub use builder::{RingBuilder, RingConfig, DEFAULT_VNODES};
pub use circle::Circle;
pub use hash_ring::HashRing;
pub use registry::Registry;
