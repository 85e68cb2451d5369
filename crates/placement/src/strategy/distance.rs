//! Distance-aware placement.
//!
//! # Store replicas
//!
//! 1. Filter live store hosts down to the eligible ones
//! 2. Try the primary replica-to-replica distance band
//! 3. If the fallback band differs, try it once
//! 4. Fall back to round-robin culling over the eligible pool
//!
//! Each step runs at most once; the first success wins. A corrupt inventory
//! stops the call immediately instead of degrading to the next step. Hosts
//! picked by distance are recorded in the fairness table like culled ones.
//!
//! # Input and output hosts
//!
//! The input/output-to-store bands are normalized and logged but not
//! applied: the pick is a round-robin cull of every live host of the role.

use std::sync::Arc;

use corelib::{HostRecord, ServiceRole, TopologyMap};
use metrics::counter;
use tracing::{debug, error, warn};

use crate::config::{ConfigStore, PlacementSettings};
use crate::eligibility::EligibilityFilter;
use crate::error::{PlacementError, PlacementResult};
use crate::fairness::RoundRobinCuller;
use crate::load::LoadMetrics;
use crate::registry::Registry;
use crate::selector::DistanceSelector;
use crate::strategy::Placement;

const STORE_CULL_NOTE: &str = "PickStoreHosts";

/// Topology-aware placement with round-robin fairness.
pub struct DistancePlacement {
    settings: PlacementSettings,
    registry: Arc<dyn Registry>,
    eligibility: EligibilityFilter,
    selector: DistanceSelector,
    culler: Arc<RoundRobinCuller>,
}

impl DistancePlacement {
    /// Start building a placement over the given collaborators.
    pub fn builder(
        registry: Arc<dyn Registry>,
        configs: Arc<dyn ConfigStore>,
        load: Arc<dyn LoadMetrics>,
    ) -> PlacementBuilder {
        PlacementBuilder::new(registry, configs, load)
    }

    /// The fairness table this placement feeds.
    pub fn culler(&self) -> &Arc<RoundRobinCuller> {
        &self.culler
    }

    /// All live store hosts that may take a new extent.
    pub fn find_eligible_store_hosts(&self) -> PlacementResult<Vec<Arc<HostRecord>>> {
        self.eligibility.eligible_store_hosts()
    }

    fn pick_with_fallback(
        &self,
        role: ServiceRole,
        store_hosts: &[Arc<HostRecord>],
    ) -> PlacementResult<Arc<HostRecord>> {
        let hosts = self.registry.get_hosts(role).map_err(|err| {
            warn!(%role, error = %err, "failed to list hosts");
            PlacementError::NoHealthyHosts
        })?;

        let (primary, fallback) = self.settings.bands(role);
        debug!(
            %role,
            primary = %primary.normalized(),
            fallback = %fallback.normalized(),
            store_hosts = store_hosts.len(),
            "picking by round robin; distance bands to store hosts are not applied"
        );

        let mut culled = self
            .culler
            .cull(&hosts, 1, role.service_name())
            .ok_or(PlacementError::NoHealthyHosts)?;
        Ok(culled.remove(0))
    }

    fn pick_single(
        &self,
        role: ServiceRole,
        store_hosts: &[Arc<HostRecord>],
    ) -> PlacementResult<Arc<HostRecord>> {
        self.pick_with_fallback(role, store_hosts).map_err(|_| {
            counter!("placement_failures", "role" => role.service_name()).increment(1);
            PlacementError::unavailable(role)
        })
    }

    fn place_stores(&self, count: usize) -> PlacementResult<Vec<Arc<HostRecord>>> {
        let role = ServiceRole::Store;
        if count == 0 {
            warn!("asked for zero store hosts");
            return Err(PlacementError::NoStoreHostsAvailable);
        }

        let eligible = self.find_eligible_store_hosts()?;
        if eligible.len() < count {
            warn!(count, eligible = eligible.len(), "not enough eligible store hosts");
            return Err(PlacementError::NoStoreHostsAvailable);
        }

        let (primary, fallback) = self.settings.bands(role);
        let primary = primary.for_replicas();
        match self.selector.select(role, &eligible, &[], count, primary) {
            Ok(hosts) => return Ok(self.accept(hosts, "primary")),
            Err(err) => self.give_up_if_corrupt(err, "primary")?,
        }

        let fallback = fallback.for_replicas();
        if fallback != primary {
            match self.selector.select(role, &eligible, &[], count, fallback) {
                Ok(hosts) => return Ok(self.accept(hosts, "fallback")),
                Err(err) => self.give_up_if_corrupt(err, "fallback")?,
            }
        }

        self.culler
            .cull(&eligible, count, STORE_CULL_NOTE)
            .map(|hosts| {
                counter!("placement_store_picks", "path" => "round_robin").increment(1);
                hosts
            })
            .ok_or(PlacementError::NoStoreHostsAvailable)
    }

    /// Swallow a retryable distance failure; surface corruption.
    fn give_up_if_corrupt(&self, err: PlacementError, attempt: &str) -> PlacementResult<()> {
        if err.is_retryable() {
            debug!(attempt, error = %err, "distance selection failed, relaxing");
            return Ok(());
        }
        error!(critical = true, attempt, error = %err, "store placement aborted");
        Err(err)
    }

    /// Hosts chosen by distance still count towards fairness.
    fn accept(&self, hosts: Vec<Arc<HostRecord>>, path: &'static str) -> Vec<Arc<HostRecord>> {
        self.culler.record(&hosts);
        counter!("placement_store_picks", "path" => path).increment(1);
        hosts
    }
}

impl Placement for DistancePlacement {
    fn pick_input_host(&self, store_hosts: &[Arc<HostRecord>]) -> PlacementResult<Arc<HostRecord>> {
        self.pick_single(ServiceRole::Input, store_hosts)
    }

    fn pick_output_host(
        &self,
        store_hosts: &[Arc<HostRecord>],
    ) -> PlacementResult<Arc<HostRecord>> {
        self.pick_single(ServiceRole::Output, store_hosts)
    }

    fn pick_store_hosts(&self, count: usize) -> PlacementResult<Vec<Arc<HostRecord>>> {
        self.place_stores(count).map_err(|err| {
            counter!("placement_failures", "role" => ServiceRole::Store.service_name())
                .increment(1);
            match err {
                PlacementError::InventoryCorrupt { .. } => err,
                _ => PlacementError::NoStoreHostsAvailable,
            }
        })
    }

    fn name(&self) -> &'static str {
        "DistancePlacement"
    }
}

/// Builder for [`DistancePlacement`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use placement::memory::{InMemoryRegistry, StaticConfigStore, StaticLoadMetrics};
/// use placement::{DistancePlacement, PlacementSettings};
///
/// let placement = DistancePlacement::builder(
///     Arc::new(InMemoryRegistry::new()),
///     Arc::new(StaticConfigStore::new()),
///     Arc::new(StaticLoadMetrics::new()),
/// )
/// .with_settings(PlacementSettings::default())
/// .build();
/// assert!(placement.find_eligible_store_hosts().is_err());
/// ```
pub struct PlacementBuilder {
    registry: Arc<dyn Registry>,
    configs: Arc<dyn ConfigStore>,
    load: Arc<dyn LoadMetrics>,
    topology: Option<Arc<dyn TopologyMap>>,
    settings: PlacementSettings,
    culler: Option<Arc<RoundRobinCuller>>,
}

impl PlacementBuilder {
    pub fn new(
        registry: Arc<dyn Registry>,
        configs: Arc<dyn ConfigStore>,
        load: Arc<dyn LoadMetrics>,
    ) -> Self {
        Self {
            registry,
            configs,
            load,
            topology: None,
            settings: PlacementSettings::default(),
            culler: None,
        }
    }

    /// Use a topology map for store replica separation. Without one, store
    /// placement takes the head of the eligible pool.
    pub fn with_topology(mut self, topology: Arc<dyn TopologyMap>) -> Self {
        self.topology = Some(topology);
        self
    }

    pub fn with_settings(mut self, settings: PlacementSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Share a fairness table with other placements. By default each
    /// placement gets its own.
    pub fn with_culler(mut self, culler: Arc<RoundRobinCuller>) -> Self {
        self.culler = Some(culler);
        self
    }

    pub fn build(self) -> DistancePlacement {
        DistancePlacement {
            settings: self.settings,
            eligibility: EligibilityFilter::new(
                Arc::clone(&self.registry),
                self.configs,
                self.load,
            ),
            selector: DistanceSelector::new(Arc::clone(&self.registry), self.topology),
            registry: self.registry,
            culler: self.culler.unwrap_or_default(),
        }
    }
}
