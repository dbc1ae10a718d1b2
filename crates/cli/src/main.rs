//! CLI entry point for conshash.

use clap::Parser;
use conshash_cli::CliConfig;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    config.run()
}
