//! Command-line driver for the consistent hash ring.
//!
//! Provides commands for:
//! - Measuring how evenly a ring spreads keys
//! - Measuring how many keys move when a node leaves

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
