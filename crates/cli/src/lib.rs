//! CLI tool for exercising extent placement against a static fleet.
//!
//! Provides commands for:
//! - Listing eligible store hosts
//! - Picking store, input and output hosts
//! - Placing whole extents
//! - Simulating many placements to inspect fairness

pub mod commands;
pub mod config;
pub mod inventory;
pub mod topology;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
pub use inventory::Inventory;
pub use topology::LabelTopology;
