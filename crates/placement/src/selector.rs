//! Distance-constrained host selection.
//!
//! Asks the topology map for resources inside a distance band and resolves
//! the answer back to live hosts. Exactly one topology query is made per
//! call; relaxing the band is up to the caller.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use corelib::network::resource_of;
use corelib::{
    DistanceBand, HostAddr, HostRecord, ResourceId, ServiceRole, TopologyMap, NIC_RESOURCE_CLASS,
};
use tracing::{debug, error};

use crate::error::{PlacementError, PlacementResult};
use crate::registry::Registry;

/// Picks hosts whose resources satisfy a distance band.
pub struct DistanceSelector {
    registry: Arc<dyn Registry>,
    topology: Option<Arc<dyn TopologyMap>>,
}

impl DistanceSelector {
    /// `topology` is `None` for deployments without a topology map; such a
    /// selector ignores bands and hands back the head of the pool.
    pub fn new(registry: Arc<dyn Registry>, topology: Option<Arc<dyn TopologyMap>>) -> Self {
        Self { registry, topology }
    }

    /// Select `count` hosts of `role` from `pool`, each within `band` of
    /// every host in `sources`. With no sources the band applies between the
    /// selected hosts themselves.
    pub fn select(
        &self,
        role: ServiceRole,
        pool: &[Arc<HostRecord>],
        sources: &[Arc<HostRecord>],
        count: usize,
        band: DistanceBand,
    ) -> PlacementResult<Vec<Arc<HostRecord>>> {
        let Some(topology) = &self.topology else {
            if pool.len() < count {
                return Err(PlacementError::NoHealthyHosts);
            }
            return Ok(pool[..count].to_vec());
        };

        let ports = port_table(pool)?;
        let pool_resources: Vec<ResourceId> = pool.iter().map(|h| resource_of(&h.addr)).collect();
        let source_resources: Vec<ResourceId> =
            sources.iter().map(|h| resource_of(&h.addr)).collect();

        let resources = topology.find_resources(
            &pool_resources,
            &source_resources,
            NIC_RESOURCE_CLASS,
            count,
            band.min,
            band.max,
        )?;
        if resources.len() != count {
            return Err(corelib::Error::Topology(format!(
                "asked for {count} resources in {band}, got {}",
                resources.len()
            ))
            .into());
        }

        let mut hosts = Vec::with_capacity(count);
        let mut seen = HashSet::with_capacity(count);
        for resource in resources {
            let Some(&port) = ports.get(&resource) else {
                error!(
                    critical = true,
                    %resource,
                    %role,
                    "topology returned a resource outside the pool"
                );
                return Err(PlacementError::inventory_corrupt(format!(
                    "resource {resource} is not in the {role} pool"
                )));
            };
            let addr = HostAddr::join(&resource, port).to_string();
            let host = self.registry.find_host_for_addr(role, &addr)?;
            if !seen.insert(host.id) {
                return Err(corelib::Error::Topology(format!(
                    "resource {resource} returned twice"
                ))
                .into());
            }
            hosts.push(host);
        }

        debug!(%role, %band, count, "distance selection succeeded");
        Ok(hosts)
    }
}

/// Resource to port table for one call, so resources can be turned back
/// into registry addresses.
fn port_table(pool: &[Arc<HostRecord>]) -> PlacementResult<HashMap<ResourceId, u16>> {
    let mut ports = HashMap::with_capacity(pool.len());
    for host in pool {
        let addr = HostAddr::parse(&host.addr).map_err(|err| {
            error!(critical = true, host = %host.name, addr = %host.addr, "invalid host:port");
            PlacementError::inventory_corrupt(err.to_string())
        })?;
        ports.insert(addr.resource(), addr.port());
    }
    Ok(ports)
}
