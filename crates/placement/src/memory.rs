//! In-memory collaborators.
//!
//! Reference implementations of [`Registry`], [`ConfigStore`] and
//! [`LoadMetrics`] backed by plain maps. The CLI wires them up from an
//! inventory file; tests use them to script fleet state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use corelib::{Error, HostId, HostRecord, ServiceRole};
use parking_lot::RwLock;

use crate::config::{ConfigStore, StorePlacementConfig};
use crate::load::{Aggregation, LoadMetrics, MetricName};
use crate::registry::Registry;

/// Registry holding an ordered host list per role.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    hosts: RwLock<HashMap<ServiceRole, Vec<Arc<HostRecord>>>>,
    failing: RwLock<HashSet<ServiceRole>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live host. Hosts are listed in insertion order.
    pub fn add_host(&self, role: ServiceRole, host: Arc<HostRecord>) {
        self.hosts.write().entry(role).or_default().push(host);
    }

    /// Drop a host from the live set. Returns false if it wasn't registered.
    pub fn remove_host(&self, role: ServiceRole, id: HostId) -> bool {
        let mut hosts = self.hosts.write();
        let Some(list) = hosts.get_mut(&role) else {
            return false;
        };
        let before = list.len();
        list.retain(|h| h.id != id);
        list.len() != before
    }

    /// Make every lookup for `role` fail, as if the registry were unreachable.
    pub fn fail_role(&self, role: ServiceRole) {
        self.failing.write().insert(role);
    }

    pub fn heal_role(&self, role: ServiceRole) {
        self.failing.write().remove(&role);
    }

    fn check(&self, role: ServiceRole) -> corelib::Result<()> {
        if self.failing.read().contains(&role) {
            return Err(Error::Registry(format!("{role} membership unavailable")));
        }
        Ok(())
    }
}

impl Registry for InMemoryRegistry {
    fn get_hosts(&self, role: ServiceRole) -> corelib::Result<Vec<Arc<HostRecord>>> {
        self.check(role)?;
        Ok(self.hosts.read().get(&role).cloned().unwrap_or_default())
    }

    fn find_host_for_addr(
        &self,
        role: ServiceRole,
        addr: &str,
    ) -> corelib::Result<Arc<HostRecord>> {
        self.check(role)?;
        self.hosts
            .read()
            .get(&role)
            .and_then(|hosts| hosts.iter().find(|h| h.addr == addr).cloned())
            .ok_or_else(|| Error::HostNotFound(format!("{role} at {addr}")))
    }
}

/// Config store keyed by host name, with per-sku defaults.
#[derive(Debug, Default)]
pub struct StaticConfigStore {
    by_host: RwLock<HashMap<String, StorePlacementConfig>>,
    by_sku: RwLock<HashMap<String, StorePlacementConfig>>,
}

impl StaticConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_host(&self, host_name: &str, cfg: StorePlacementConfig) {
        self.by_host.write().insert(host_name.to_string(), cfg);
    }

    /// Config applied to every host of `sku` without a host entry.
    pub fn set_sku(&self, sku: &str, cfg: StorePlacementConfig) {
        self.by_sku.write().insert(sku.to_string(), cfg);
    }
}

impl ConfigStore for StaticConfigStore {
    fn get(
        &self,
        role: ServiceRole,
        _version: &str,
        sku: &str,
        host_name: &str,
    ) -> corelib::Result<StorePlacementConfig> {
        if let Some(cfg) = self.by_host.read().get(host_name) {
            return Ok(cfg.clone());
        }
        self.by_sku
            .read()
            .get(sku)
            .cloned()
            .ok_or_else(|| Error::Config(format!("no {role} config for {host_name} (sku {sku:?})")))
    }
}

/// Metrics store holding the latest free-disk sample per host.
#[derive(Debug, Default)]
pub struct StaticLoadMetrics {
    free_disk: RwLock<HashMap<HostId, i64>>,
}

impl StaticLoadMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, host: HostId, free_disk_space_bytes: i64) {
        self.free_disk.write().insert(host, free_disk_space_bytes);
    }
}

impl LoadMetrics for StaticLoadMetrics {
    fn get(
        &self,
        host: HostId,
        _tag: &str,
        metric: MetricName,
        _aggregation: Aggregation,
    ) -> corelib::Result<i64> {
        match metric {
            MetricName::RemainingDiskSpaceBytes => self
                .free_disk
                .read()
                .get(&host)
                .copied()
                .ok_or_else(|| Error::Metrics(format!("no {metric} sample for {host}"))),
        }
    }
}
