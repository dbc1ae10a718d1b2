//! Load distribution and disruption analysis.
//!
//! Used to check that a ring spreads keys evenly across its nodes and that a
//! membership change moves only the keys it has to.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::ring::HashRing;

/// Keys `"{prefix}0"`, `"{prefix}1"`, ..., `"{prefix}{count - 1}"`.
pub fn numbered_keys(prefix: &str, count: usize) -> impl Iterator<Item = String> + '_ {
    (0..count).map(move |i| format!("{}{}", prefix, i))
}

/// How a sample of keys is spread across the nodes of a ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    /// Keys sampled.
    pub total_keys: usize,
    /// Keys assigned to each live node, including nodes that got none.
    pub counts: BTreeMap<String, usize>,
    pub mean: f64,
    /// Population variance of `counts`.
    pub variance: f64,
    pub std_dev: f64,
    pub min: usize,
    pub max: usize,
}

impl Distribution {
    /// Look up every key in `keys` and tally the owners.
    pub fn measure<V, I, K>(ring: &HashRing<V>, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        let mut nodes = Vec::new();
        if ring.keys_into(&mut nodes) == 0 {
            return Err(Error::RingEmpty);
        }
        let mut counts: BTreeMap<String, usize> = nodes.into_iter().map(|n| (n, 0)).collect();
        for key in keys {
            *counts.entry(ring.owner(key)?).or_insert(0) += 1;
        }
        Ok(Self::from_counts(counts))
    }

    /// Summarize per-node counts.
    pub fn from_counts(counts: BTreeMap<String, usize>) -> Self {
        let total_keys: usize = counts.values().sum();
        let n = counts.len();
        if n == 0 {
            return Self {
                total_keys,
                counts,
                mean: 0.0,
                variance: 0.0,
                std_dev: 0.0,
                min: 0,
                max: 0,
            };
        }

        let mean = total_keys as f64 / n as f64;
        let variance = counts
            .values()
            .map(|&c| {
                let d = c as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n as f64;

        Self {
            total_keys,
            mean,
            variance,
            std_dev: variance.sqrt(),
            min: counts.values().copied().min().unwrap_or(0),
            max: counts.values().copied().max().unwrap_or(0),
            counts,
        }
    }

    /// Squared deviation from the integer fair share, summed over nodes and
    /// divided by the number of keys.
    ///
    /// This is the figure the classic 100 node / 1,000,000 key benchmark
    /// reports. It is a regression signal, not a pass/fail threshold.
    pub fn reference_variance(&self) -> f64 {
        if self.total_keys == 0 || self.counts.is_empty() {
            return 0.0;
        }
        let fair = (self.total_keys / self.counts.len()) as i64;
        let sum: i64 = self
            .counts
            .values()
            .map(|&c| {
                let d = c as i64 - fair;
                d * d
            })
            .sum();
        sum as f64 / self.total_keys as f64
    }

    /// Largest relative distance of any node's count from the mean.
    pub fn max_deviation_ratio(&self) -> f64 {
        if self.mean == 0.0 {
            return 0.0;
        }
        let worst = (self.max as f64 - self.mean).max(self.mean - self.min as f64);
        worst / self.mean
    }
}

/// A key whose owner differs between two ring states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remap {
    pub key: String,
    pub from: String,
    pub to: String,
}

/// Keys from `keys` that `before` and `after` assign to different nodes.
pub fn remapped_keys<V, W, I, K>(
    before: &HashRing<V>,
    after: &HashRing<W>,
    keys: I,
) -> Result<Vec<Remap>>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let mut moved = Vec::new();
    for key in keys {
        let key = key.as_ref();
        let from = before.owner(key)?;
        let to = after.owner(key)?;
        if from != to {
            moved.push(Remap {
                key: key.to_string(),
                from,
                to,
            });
        }
    }
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_keys() {
        let keys: Vec<String> = numbered_keys("clientid", 3).collect();
        assert_eq!(keys, vec!["clientid0", "clientid1", "clientid2"]);
    }

    #[test]
    fn test_from_counts_stats() {
        let counts: BTreeMap<String, usize> = [("a", 2), ("b", 4), ("c", 6)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let dist = Distribution::from_counts(counts);

        assert_eq!(dist.total_keys, 12);
        assert_eq!(dist.mean, 4.0);
        assert!((dist.variance - 8.0 / 3.0).abs() < 1e-12);
        assert_eq!(dist.min, 2);
        assert_eq!(dist.max, 6);
        assert_eq!(dist.max_deviation_ratio(), 0.5);
        // fair share 4: (4 + 0 + 4) / 12
        assert!((dist.reference_variance() - 8.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_counts_empty() {
        let dist = Distribution::from_counts(BTreeMap::new());
        assert_eq!(dist.total_keys, 0);
        assert_eq!(dist.reference_variance(), 0.0);
        assert_eq!(dist.max_deviation_ratio(), 0.0);
    }

    #[test]
    fn test_measure_empty_ring() {
        let ring = HashRing::<()>::new(4).unwrap();
        let result = Distribution::measure(&ring, numbered_keys("k", 10));
        assert_eq!(result, Err(Error::RingEmpty));
    }

    #[test]
    fn test_measure_counts_every_key() {
        let ring = HashRing::new(8).unwrap();
        ring.insert("a", ()).insert("b", ()).insert("c", ());

        let dist = Distribution::measure(&ring, numbered_keys("k", 1000)).unwrap();
        assert_eq!(dist.total_keys, 1000);
        assert_eq!(dist.counts.len(), 3);
    }

    #[test]
    fn test_remapped_keys_identical_rings() {
        let ring = HashRing::new(8).unwrap();
        ring.insert("a", ()).insert("b", ());
        let moved = remapped_keys(&ring, &ring.clone(), numbered_keys("k", 500)).unwrap();
        assert!(moved.is_empty());
    }
}
