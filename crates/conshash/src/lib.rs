//! Consistent hash ring.
//!
//! This crate maps arbitrary lookup keys onto a changing set of named nodes so
//! that adding or removing a node only moves the keys it has to:
//! - Hash function shared by point placement and key lookup
//! - Virtual nodes (several ring positions per node)
//! - The sorted circle and its node registry
//! - A thread-safe ring behind a single reader/writer lock
//! - Distribution and disruption analysis

pub mod distribution;
pub mod error;
pub mod hash;
pub mod ring;
pub mod vnode;

pub use distribution::{Distribution, Remap};
pub use error::{Error, Result};
pub use ring::{HashRing, RingBuilder, RingConfig};
pub use vnode::VirtualNode;
