//! Command-line configuration.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::Level;

use crate::commands::Command;
use crate::inventory::Inventory;

/// Exercise extent placement against a fleet inventory.
#[derive(Debug, Parser)]
#[command(name = "placement-cli", version)]
pub struct CliConfig {
    /// Path to the JSON fleet inventory.
    #[arg(short, long)]
    pub inventory: PathBuf,

    /// Log verbosity (error, warn, info, debug, trace).
    #[arg(long, default_value = "warn")]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(self) -> anyhow::Result<()> {
        tracing_subscriber::fmt()
            .with_max_level(self.log_level)
            .with_writer(std::io::stderr)
            .init();

        let inventory = Inventory::load(&self.inventory)?;
        let placement = inventory.build().context("building placement")?;
        let result = self.command.execute(&placement)?;
        print!("{result}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let config = CliConfig::try_parse_from([
            "placement-cli",
            "--inventory",
            "fleet.json",
            "--log-level",
            "debug",
            "simulate",
            "--extents",
            "10",
        ])
        .unwrap();
        assert_eq!(config.inventory, PathBuf::from("fleet.json"));
        assert_eq!(config.log_level, Level::DEBUG);
        assert!(matches!(
            config.command,
            Command::Simulate { extents: 10, replicas: 3 }
        ));
    }

    #[test]
    fn test_inventory_is_required() {
        assert!(CliConfig::try_parse_from(["placement-cli", "eligible"]).is_err());
    }
}
