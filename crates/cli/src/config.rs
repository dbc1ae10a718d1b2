//! Command-line configuration.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

/// Run load-distribution experiments against a consistent hash ring.
#[derive(Debug, Parser)]
#[command(name = "conshash", version)]
pub struct CliConfig {
    /// Log level filter, used when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Print the result as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(self) -> anyhow::Result<()> {
        setup_tracing(&self.log_level);

        let result = self.command.execute()?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{}", result);
        }
        Ok(())
    }
}

/// Install the fmt subscriber on stderr so stdout carries only the report.
///
/// Respects `RUST_LOG` if set, otherwise uses `level`.
fn setup_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        CliConfig::command().debug_assert();
    }

    #[test]
    fn test_parse_distribution_defaults() {
        let config = CliConfig::try_parse_from(["conshash", "distribution"]).unwrap();
        assert_eq!(config.log_level, "info");
        assert!(!config.json);
        match config.command {
            Command::Distribution { ring } => {
                assert_eq!(ring.nodes, 100);
                assert_eq!(ring.vnodes, 20);
                assert_eq!(ring.keys, 1_000_000);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_disruption() {
        let config = CliConfig::try_parse_from([
            "conshash",
            "--json",
            "disruption",
            "--nodes",
            "10",
            "--remove",
            "server3",
        ])
        .unwrap();
        assert!(config.json);
        match config.command {
            Command::Disruption { ring, remove } => {
                assert_eq!(ring.nodes, 10);
                assert_eq!(remove, "server3");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_disruption_requires_remove() {
        assert!(CliConfig::try_parse_from(["conshash", "disruption"]).is_err());
    }
}
