//! CLI subcommands.

use std::fmt;
use std::sync::Arc;

use clap::Subcommand;
use corelib::HostRecord;
use placement::{DistancePlacement, Placement};
use tracing::info;

/// What to do with the loaded fleet.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List store hosts that may take new extents.
    Eligible,
    /// Pick store hosts for one extent.
    PickStore {
        #[arg(short, long, default_value_t = 3)]
        count: usize,
    },
    /// Pick an input host.
    PickInput,
    /// Pick an output host.
    PickOutput,
    /// Place a whole extent: replicas first, then input and output hosts.
    Place {
        #[arg(short, long, default_value_t = 3)]
        replicas: usize,
    },
    /// Place many extents and report how often each host was chosen.
    Simulate {
        #[arg(short, long, default_value_t = 100)]
        extents: usize,
        #[arg(short, long, default_value_t = 3)]
        replicas: usize,
    },
}

/// Output of a command.
#[derive(Debug, Clone)]
pub enum CommandResult {
    Hosts(Vec<Arc<HostRecord>>),
    Extent {
        stores: Vec<Arc<HostRecord>>,
        input: Arc<HostRecord>,
        output: Arc<HostRecord>,
    },
    /// Per-host selection counts, sorted by host name.
    Tally { placed: usize, failed: usize, counts: Vec<(String, u64)> },
}

impl Command {
    pub fn execute(&self, placement: &DistancePlacement) -> anyhow::Result<CommandResult> {
        let result = match self {
            Command::Eligible => CommandResult::Hosts(placement.find_eligible_store_hosts()?),
            Command::PickStore { count } => {
                CommandResult::Hosts(placement.pick_store_hosts(*count)?)
            }
            Command::PickInput => CommandResult::Hosts(vec![placement.pick_input_host(&[])?]),
            Command::PickOutput => CommandResult::Hosts(vec![placement.pick_output_host(&[])?]),
            Command::Place { replicas } => {
                let stores = placement.pick_store_hosts(*replicas)?;
                let input = placement.pick_input_host(&stores)?;
                let output = placement.pick_output_host(&stores)?;
                CommandResult::Extent { stores, input, output }
            }
            Command::Simulate { extents, replicas } => simulate(placement, *extents, *replicas),
        };
        Ok(result)
    }
}

fn simulate(placement: &DistancePlacement, extents: usize, replicas: usize) -> CommandResult {
    let mut names = std::collections::HashMap::new();
    let mut placed = 0;
    for _ in 0..extents {
        match placement.pick_store_hosts(replicas) {
            Ok(stores) => {
                placed += 1;
                for host in stores {
                    names.insert(host.id, host.name.clone());
                }
            }
            Err(err) => info!(error = %err, "simulated placement failed"),
        }
    }

    let snapshot = placement.culler().snapshot();
    let mut counts: Vec<(String, u64)> = names
        .into_iter()
        .map(|(id, name)| (name, snapshot.get(&id).copied().unwrap_or(0)))
        .collect();
    counts.sort();
    CommandResult::Tally { placed, failed: extents - placed, counts }
}

fn write_hosts(f: &mut fmt::Formatter<'_>, hosts: &[Arc<HostRecord>]) -> fmt::Result {
    for host in hosts {
        writeln!(f, "{}\t{}\t{}\t{}", host.name, host.addr, host.sku, host.id)?;
    }
    Ok(())
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Hosts(hosts) => write_hosts(f, hosts),
            CommandResult::Extent { stores, input, output } => {
                writeln!(f, "input:  {} ({})", input.name, input.addr)?;
                writeln!(f, "output: {} ({})", output.name, output.addr)?;
                writeln!(f, "stores:")?;
                write_hosts(f, stores)
            }
            CommandResult::Tally { placed, failed, counts } => {
                writeln!(f, "placed {placed} extents, {failed} failed")?;
                for (name, count) in counts {
                    writeln!(f, "{name}\t{count}")?;
                }
                Ok(())
            }
        }
    }
}
