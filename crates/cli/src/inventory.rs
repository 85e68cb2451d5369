//! Fleet inventory files.
//!
//! An inventory is a JSON document describing a fleet snapshot: placement
//! settings, live hosts per role, per-host and per-sku placement config,
//! free-disk samples and, optionally, topology locations.
//!
//! ```json
//! {
//!   "settings": { "min_store_to_store_distance": 2 },
//!   "hosts": {
//!     "store": [{ "name": "store1", "addr": "10.0.1.1:6190", "sku": "d2" }],
//!     "input": [{ "name": "in1", "addr": "10.0.2.1:6189" }]
//!   },
//!   "configs": { "hosts": { "store1": { "admin_status": "enabled" } } },
//!   "free_disk_bytes": { "store1": 536870912000 },
//!   "topology": { "10.0.1.1": "dc1/rack1/store1" }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use corelib::{HostAddr, HostId, HostRecord, ResourceId, ServiceRole, TopologyMap};
use placement::memory::{InMemoryRegistry, StaticConfigStore, StaticLoadMetrics};
use placement::{DistancePlacement, PlacementSettings, StorePlacementConfig};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::topology::LabelTopology;

/// One host as written in an inventory file.
#[derive(Debug, Clone, Deserialize)]
pub struct HostEntry {
    /// Generated when absent.
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub addr: String,
    #[serde(default)]
    pub sku: String,
}

/// Placement config entries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigEntries {
    pub hosts: HashMap<String, StorePlacementConfig>,
    pub skus: HashMap<String, StorePlacementConfig>,
}

/// A parsed inventory file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub settings: PlacementSettings,
    pub hosts: HashMap<ServiceRole, Vec<HostEntry>>,
    pub configs: ConfigEntries,
    /// Free disk bytes by host name.
    pub free_disk_bytes: HashMap<String, i64>,
    /// Location path by resource (address without port).
    pub topology: HashMap<String, String>,
}

impl Inventory {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading inventory {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing inventory {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Wire the inventory into a ready-to-use placement.
    pub fn build(&self) -> anyhow::Result<DistancePlacement> {
        let registry = Arc::new(InMemoryRegistry::new());
        let configs = Arc::new(StaticConfigStore::new());
        let load = Arc::new(StaticLoadMetrics::new());

        let mut ids_by_name = HashMap::new();
        for (role, entries) in &self.hosts {
            for entry in entries {
                let id = entry.id.map(HostId).unwrap_or_else(HostId::random);
                if ids_by_name.insert(entry.name.clone(), id).is_some() {
                    bail!("host name {:?} is listed twice", entry.name);
                }
                registry.add_host(
                    *role,
                    Arc::new(HostRecord::new(id, &entry.name, &entry.addr, &entry.sku)),
                );
            }
        }

        for (name, cfg) in &self.configs.hosts {
            configs.set_host(name, cfg.clone());
        }
        for (sku, cfg) in &self.configs.skus {
            configs.set_sku(sku, cfg.clone());
        }
        for (name, free) in &self.free_disk_bytes {
            match ids_by_name.get(name) {
                Some(id) => load.set(*id, *free),
                None => warn!(host = %name, "disk sample for a host not in the inventory"),
            }
        }

        let builder = DistancePlacement::builder(registry, configs, load)
            .with_settings(self.settings.clone());
        let placement = match self.topology_map()? {
            Some(topology) => builder.with_topology(topology).build(),
            None => {
                info!("no topology in inventory, store replicas are not separated");
                builder.build()
            }
        };
        Ok(placement)
    }

    fn topology_map(&self) -> anyhow::Result<Option<Arc<dyn TopologyMap>>> {
        if self.topology.is_empty() {
            return Ok(None);
        }
        let mut topology = LabelTopology::new();
        for (resource, path) in &self.topology {
            topology.insert(ResourceId::new(resource.as_str()), path);
        }
        // Every store host should be locatable, or every distance query fails.
        for entry in self.hosts.get(&ServiceRole::Store).into_iter().flatten() {
            let addr = HostAddr::parse(&entry.addr)
                .with_context(|| format!("store host {:?}", entry.name))?;
            if !self.topology.contains_key(addr.host()) {
                warn!(host = %entry.name, "store host has no topology location");
            }
        }
        let topology: Arc<dyn TopologyMap> = Arc::new(topology);
        Ok(Some(topology))
    }
}
