//! Shared fixtures for placement integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use corelib::{Distance, DistanceBand, HostId, HostRecord, ResourceId, ServiceRole, TopologyMap};
use parking_lot::Mutex;
use placement::memory::{InMemoryRegistry, StaticConfigStore, StaticLoadMetrics};
use placement::{DistancePlacement, PlacementSettings, RoundRobinCuller};
use uuid::Uuid;

/// Topology map that answers per band from a script and fails otherwise.
#[derive(Default)]
pub struct ScriptedTopology {
    answers: Mutex<HashMap<DistanceBand, Vec<ResourceId>>>,
    asked: Mutex<Vec<DistanceBand>>,
}

impl ScriptedTopology {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn answer(&self, band: DistanceBand, resources: &[&str]) {
        self.answers
            .lock()
            .insert(band, resources.iter().copied().map(ResourceId::new).collect());
    }

    /// Bands queried so far, in order.
    pub fn asked(&self) -> Vec<DistanceBand> {
        self.asked.lock().clone()
    }
}

impl TopologyMap for ScriptedTopology {
    fn find_resources(
        &self,
        _pool: &[ResourceId],
        _sources: &[ResourceId],
        _resource_class: &str,
        _count: usize,
        min: Distance,
        max: Distance,
    ) -> corelib::Result<Vec<ResourceId>> {
        let band = DistanceBand::new(min, max);
        self.asked.lock().push(band);
        self.answers
            .lock()
            .get(&band)
            .cloned()
            .ok_or_else(|| corelib::Error::Topology(format!("nothing fits {band}")))
    }
}

/// A small fleet backed by the in-memory collaborators.
pub struct Fleet {
    pub registry: Arc<InMemoryRegistry>,
    pub configs: Arc<StaticConfigStore>,
    pub load: Arc<StaticLoadMetrics>,
    pub culler: Arc<RoundRobinCuller>,
}

impl Fleet {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(InMemoryRegistry::new()),
            configs: Arc::new(StaticConfigStore::new()),
            load: Arc::new(StaticLoadMetrics::new()),
            culler: Arc::new(RoundRobinCuller::new()),
        }
    }

    /// Register `n` hosts of `role` named `{prefix}{i}` at `h{i}:{i*100}`.
    pub fn add_hosts(&self, role: ServiceRole, prefix: &str, n: usize) -> Vec<Arc<HostRecord>> {
        (1..=n)
            .map(|i| {
                let host = Arc::new(HostRecord::new(
                    HostId(Uuid::from_u128(((role as u128) << 64) | i as u128)),
                    format!("{prefix}{i}"),
                    format!("h{i}:{}", i * 100),
                    "std",
                ));
                self.registry.add_host(role, host.clone());
                host
            })
            .collect()
    }

    pub fn placement(
        &self,
        settings: PlacementSettings,
        topology: Option<Arc<ScriptedTopology>>,
    ) -> DistancePlacement {
        let builder = DistancePlacement::builder(
            self.registry.clone(),
            self.configs.clone(),
            self.load.clone(),
        )
        .with_settings(settings)
        .with_culler(self.culler.clone());
        match topology {
            Some(topology) => builder.with_topology(topology).build(),
            None => builder.build(),
        }
    }
}

pub fn names(hosts: &[Arc<HostRecord>]) -> Vec<&str> {
    hosts.iter().map(|h| h.name.as_str()).collect()
}
