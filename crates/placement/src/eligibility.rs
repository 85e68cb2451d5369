//! Store host eligibility.
//!
//! A store host may take new extents unless an operator disabled it or it is
//! running out of disk. Missing data never excludes a host: an unconfigured
//! host or one without telemetry is admitted, and each of those two fail-open
//! branches is reported separately so they stay auditable.

use std::sync::Arc;

use corelib::{HostRecord, ServiceRole};
use metrics::counter;
use tracing::{debug, info, warn};

use crate::config::{AdminStatus, ConfigStore, WILDCARD};
use crate::error::{PlacementError, PlacementResult};
use crate::load::{Aggregation, LoadMetrics, MetricName, EMPTY_TAG};
use crate::registry::Registry;

/// Why a host was admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Enabled and above its disk threshold.
    Passed,
    /// No placement config could be found for the host.
    ConfigUnavailable,
    /// Enabled, but no disk-space sample could be read.
    MetricsUnavailable,
}

/// Why a host was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    AdminDisabled,
    DiskSpaceTooLow,
}

impl ExclusionReason {
    /// Stable name used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionReason::AdminDisabled => "AdminDisabled",
            ExclusionReason::DiskSpaceTooLow => "DiskSpaceTooLow",
        }
    }
}

/// Outcome of checking one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Admitted(Admission),
    Excluded(ExclusionReason),
}

impl Verdict {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Verdict::Admitted(_))
    }
}

/// Decides which store hosts may receive new placements.
pub struct EligibilityFilter {
    registry: Arc<dyn Registry>,
    configs: Arc<dyn ConfigStore>,
    load: Arc<dyn LoadMetrics>,
}

impl EligibilityFilter {
    pub fn new(
        registry: Arc<dyn Registry>,
        configs: Arc<dyn ConfigStore>,
        load: Arc<dyn LoadMetrics>,
    ) -> Self {
        Self {
            registry,
            configs,
            load,
        }
    }

    /// Check a single store host against its admin status and disk threshold.
    pub fn check(&self, host: &HostRecord) -> Verdict {
        let cfg = match self
            .configs
            .get(ServiceRole::Store, WILDCARD, &host.sku, &host.name)
        {
            Ok(cfg) => cfg,
            Err(err) => {
                debug!(
                    host = %host.addr,
                    error = %err,
                    "no placement config, admitting store host"
                );
                return Verdict::Admitted(Admission::ConfigUnavailable);
            }
        };

        if cfg.admin_status != AdminStatus::Enabled {
            return self.exclude(host, ExclusionReason::AdminDisabled, None);
        }

        let free = match self.load.get(
            host.id,
            EMPTY_TAG,
            MetricName::RemainingDiskSpaceBytes,
            Aggregation::OneMinuteAverage,
        ) {
            Ok(free) => free,
            Err(err) => {
                debug!(
                    host = %host.addr,
                    error = %err,
                    "no disk space sample, admitting store host"
                );
                return Verdict::Admitted(Admission::MetricsUnavailable);
            }
        };

        if free <= cfg.min_free_disk_space_bytes {
            return self.exclude(host, ExclusionReason::DiskSpaceTooLow, Some(free));
        }

        Verdict::Admitted(Admission::Passed)
    }

    pub fn is_eligible(&self, host: &HostRecord) -> bool {
        self.check(host).is_eligible()
    }

    /// All live store hosts that may take a new extent, in registry order.
    pub fn eligible_store_hosts(&self) -> PlacementResult<Vec<Arc<HostRecord>>> {
        let hosts = self.registry.get_hosts(ServiceRole::Store).map_err(|err| {
            warn!(error = %err, "failed to list store hosts");
            PlacementError::NoHealthyHosts
        })?;

        let eligible: Vec<_> = hosts
            .into_iter()
            .filter(|host| self.is_eligible(host))
            .collect();

        // Everything alive is disabled or full; let the caller decide.
        if eligible.is_empty() {
            return Err(PlacementError::NoStoreHostsAvailable);
        }

        Ok(eligible)
    }

    fn exclude(&self, host: &HostRecord, reason: ExclusionReason, free: Option<i64>) -> Verdict {
        match free {
            Some(free) => info!(
                host = %host.addr,
                free_disk_space_bytes = free,
                reason = reason.as_str(),
                "Placement ignoring store host"
            ),
            None => info!(
                host = %host.addr,
                reason = reason.as_str(),
                "Placement ignoring store host"
            ),
        }
        counter!("placement_hosts_excluded", "reason" => reason.as_str()).increment(1);
        Verdict::Excluded(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorePlacementConfig;
    use crate::memory::{InMemoryRegistry, StaticConfigStore, StaticLoadMetrics};
    use corelib::HostId;
    use tracing_test::traced_test;

    fn store(n: u8) -> Arc<HostRecord> {
        Arc::new(HostRecord::new(
            HostId::random(),
            format!("store{n}"),
            format!("h{n}:{}", n as u16 * 100),
            "std",
        ))
    }

    struct Fixture {
        registry: Arc<InMemoryRegistry>,
        configs: Arc<StaticConfigStore>,
        load: Arc<StaticLoadMetrics>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: Arc::new(InMemoryRegistry::new()),
                configs: Arc::new(StaticConfigStore::new()),
                load: Arc::new(StaticLoadMetrics::new()),
            }
        }

        fn filter(&self) -> EligibilityFilter {
            EligibilityFilter::new(self.registry.clone(), self.configs.clone(), self.load.clone())
        }
    }

    #[test]
    fn test_unconfigured_host_without_metrics_is_eligible() {
        let fx = Fixture::new();
        let host = store(1);
        assert_eq!(
            fx.filter().check(&host),
            Verdict::Admitted(Admission::ConfigUnavailable)
        );
    }

    #[test]
    fn test_missing_metrics_admits_enabled_host() {
        let fx = Fixture::new();
        let host = store(1);
        fx.configs.set_host(&host.name, StorePlacementConfig::enabled(1_000));
        assert_eq!(
            fx.filter().check(&host),
            Verdict::Admitted(Admission::MetricsUnavailable)
        );
    }

    #[test]
    fn test_disabled_host_is_excluded() {
        let fx = Fixture::new();
        let host = store(1);
        fx.configs.set_host(&host.name, StorePlacementConfig::disabled());
        fx.load.set(host.id, 1 << 40);
        assert_eq!(
            fx.filter().check(&host),
            Verdict::Excluded(ExclusionReason::AdminDisabled)
        );
    }

    #[test]
    fn test_disk_threshold_is_inclusive() {
        let fx = Fixture::new();
        let host = store(1);
        fx.configs.set_host(&host.name, StorePlacementConfig::enabled(1_000));

        fx.load.set(host.id, 1_000);
        assert_eq!(
            fx.filter().check(&host),
            Verdict::Excluded(ExclusionReason::DiskSpaceTooLow)
        );
        assert_eq!(ExclusionReason::DiskSpaceTooLow.as_str(), "DiskSpaceTooLow");

        fx.load.set(host.id, 1_001);
        assert_eq!(fx.filter().check(&host), Verdict::Admitted(Admission::Passed));
    }

    #[test]
    #[traced_test]
    fn test_low_disk_exclusion_is_logged() {
        let fx = Fixture::new();
        let host = store(1);
        fx.configs.set_sku("std", StorePlacementConfig::enabled(1_000));
        fx.load.set(host.id, 1_000);

        assert!(!fx.filter().is_eligible(&host));
        assert!(logs_contain("Placement ignoring store host"));
        assert!(logs_contain("DiskSpaceTooLow"));
        assert!(logs_contain("free_disk_space_bytes=1000"));
        assert!(!logs_contain("AdminDisabled"));
    }

    #[test]
    #[traced_test]
    fn test_admin_disabled_exclusion_is_logged() {
        let fx = Fixture::new();
        let host = store(2);
        fx.configs.set_host(&host.name, StorePlacementConfig::disabled());

        assert!(!fx.filter().is_eligible(&host));
        assert!(logs_contain("Placement ignoring store host"));
        assert!(logs_contain("AdminDisabled"));
        assert!(!logs_contain("DiskSpaceTooLow"));
    }

    #[test]
    #[traced_test]
    fn test_fail_open_admissions_log_no_exclusion() {
        let fx = Fixture::new();
        let unconfigured = store(3);
        let unsampled = store(4);
        fx.configs.set_host(&unsampled.name, StorePlacementConfig::enabled(1_000));

        assert!(fx.filter().is_eligible(&unconfigured));
        assert!(fx.filter().is_eligible(&unsampled));
        assert!(!logs_contain("Placement ignoring store host"));
    }

    #[test]
    fn test_eligible_store_hosts_filters_and_keeps_order() {
        let fx = Fixture::new();
        let hosts: Vec<_> = (1..=4).map(store).collect();
        for host in &hosts {
            fx.registry.add_host(ServiceRole::Store, host.clone());
        }
        fx.configs.set_host(&hosts[1].name, StorePlacementConfig::disabled());

        let eligible = fx.filter().eligible_store_hosts().unwrap();
        let names: Vec<_> = eligible.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["store1", "store3", "store4"]);
    }

    #[test]
    fn test_all_excluded_is_no_store_hosts() {
        let fx = Fixture::new();
        let host = store(1);
        fx.registry.add_host(ServiceRole::Store, host.clone());
        fx.configs.set_host(&host.name, StorePlacementConfig::disabled());

        assert!(matches!(
            fx.filter().eligible_store_hosts(),
            Err(PlacementError::NoStoreHostsAvailable)
        ));
    }

    #[test]
    fn test_registry_failure_is_no_healthy_hosts() {
        let fx = Fixture::new();
        fx.registry.fail_role(ServiceRole::Store);
        assert!(matches!(
            fx.filter().eligible_store_hosts(),
            Err(PlacementError::NoHealthyHosts)
        ));
    }
}
