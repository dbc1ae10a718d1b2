//! The sorted hash circle.

use crate::error::{Error, Result};

/// Ascending sequence of virtual-point hashes, read as a circle: the successor
/// of the last point is the first.
#[derive(Debug, Clone, Default)]
pub struct Circle {
    points: Vec<u64>,
}

impl Circle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the circle with a fresh sort of `points`.
    ///
    /// Always a full rebuild. Membership changes are expected to be rare next
    /// to lookups, so O(t log t) per change buys a flat `Vec` to search.
    pub fn rebuild<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = u64>,
    {
        let mut points: Vec<u64> = points.into_iter().collect();
        points.sort_unstable();
        points.dedup();
        self.points = points;
    }

    /// Find the point that owns `target`: the first point `>= target`, or the
    /// first point on the circle when `target` is past the last one.
    pub fn locate(&self, target: u64) -> Result<u64> {
        if self.points.is_empty() {
            return Err(Error::RingEmpty);
        }
        let idx = self.points.partition_point(|&p| p < target);
        let idx = if idx == self.points.len() { 0 } else { idx };
        Ok(self.points[idx])
    }

    pub fn points(&self) -> &[u64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
