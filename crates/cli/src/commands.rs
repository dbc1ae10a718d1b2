//! CLI commands and their reports.

use std::fmt;
use std::time::Instant;

use anyhow::bail;
use clap::{Args, Subcommand};
use conshash::distribution::{numbered_keys, remapped_keys};
use conshash::{Distribution, HashRing};
use serde::Serialize;
use tracing::info;

/// Shape of the ring and the key sample.
#[derive(Debug, Clone, Args)]
pub struct RingArgs {
    /// Number of nodes, named `{node_prefix}0..`.
    #[arg(long, default_value_t = 100)]
    pub nodes: usize,

    /// Virtual points per node.
    #[arg(long, default_value_t = 20)]
    pub vnodes: usize,

    /// Number of lookup keys, named `{key_prefix}0..`.
    #[arg(long, default_value_t = 1_000_000)]
    pub keys: usize,

    #[arg(long, default_value = "server")]
    pub node_prefix: String,

    #[arg(long, default_value = "clientid")]
    pub key_prefix: String,
}

impl RingArgs {
    fn build_ring(&self) -> conshash::Result<HashRing<()>> {
        let ring = HashRing::new(self.vnodes)?;
        for key in numbered_keys(&self.node_prefix, self.nodes) {
            ring.insert(key, ());
        }
        info!(
            nodes = ring.len(),
            vnodes = self.vnodes,
            points = ring.point_count(),
            "built ring"
        );
        Ok(ring)
    }

    fn sample(&self) -> impl Iterator<Item = String> + '_ {
        numbered_keys(&self.key_prefix, self.keys)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Spread keys over a ring and report how many each node receives.
    Distribution {
        #[command(flatten)]
        ring: RingArgs,
    },
    /// Remove one node and report which keys change owner.
    Disruption {
        #[command(flatten)]
        ring: RingArgs,

        /// Node to remove.
        #[arg(long)]
        remove: String,
    },
}

impl Command {
    pub fn execute(&self) -> anyhow::Result<CommandResult> {
        match self {
            Command::Distribution { ring } => distribution(ring),
            Command::Disruption { ring, remove } => disruption(ring, remove),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandResult {
    Distribution {
        distribution: Distribution,
        reference_variance: f64,
    },
    Disruption {
        removed: String,
        total_keys: usize,
        /// Keys the removed node owned before removal.
        owned: usize,
        /// Keys whose owner changed.
        moved: usize,
        /// Moved keys that were not owned by the removed node. Always zero on
        /// a correct ring.
        unexpected: usize,
    },
}

fn distribution(args: &RingArgs) -> anyhow::Result<CommandResult> {
    let ring = args.build_ring()?;

    let started = Instant::now();
    let distribution = Distribution::measure(&ring, args.sample())?;
    info!(
        keys = distribution.total_keys,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "measured distribution"
    );

    Ok(CommandResult::Distribution {
        reference_variance: distribution.reference_variance(),
        distribution,
    })
}

fn disruption(args: &RingArgs, remove: &str) -> anyhow::Result<CommandResult> {
    let before = args.build_ring()?;
    let after = before.clone();
    if after.remove(remove).is_none() {
        bail!("node {:?} is not on the ring", remove);
    }

    let keys: Vec<String> = args.sample().collect();
    let owned = Distribution::measure(&before, &keys)?
        .counts
        .get(remove)
        .copied()
        .unwrap_or(0);
    let moved = remapped_keys(&before, &after, &keys)?;
    let unexpected = moved.iter().filter(|m| m.from != remove).count();
    info!(removed = %remove, moved = moved.len(), "measured disruption");

    Ok(CommandResult::Disruption {
        removed: remove.to_string(),
        total_keys: keys.len(),
        owned,
        moved: moved.len(),
        unexpected,
    })
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Distribution {
                distribution,
                reference_variance,
            } => {
                for (node, count) in &distribution.counts {
                    writeln!(f, "node: {} count: {}", node, count)?;
                }
                writeln!(
                    f,
                    "keys: {} mean: {:.1} std_dev: {:.1} min: {} max: {}",
                    distribution.total_keys,
                    distribution.mean,
                    distribution.std_dev,
                    distribution.min,
                    distribution.max
                )?;
                writeln!(f, "variance: {:.3}", reference_variance)
            }
            CommandResult::Disruption {
                removed,
                total_keys,
                owned,
                moved,
                unexpected,
            } => {
                writeln!(f, "removed: {}", removed)?;
                writeln!(f, "keys: {} owned: {} moved: {}", total_keys, owned, moved)?;
                writeln!(f, "moved from other nodes: {}", unexpected)
            }
        }
    }
}
