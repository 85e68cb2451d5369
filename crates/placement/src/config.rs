//! Placement configuration.
//!
//! Two kinds of configuration feed placement:
//! - [`PlacementSettings`]: controller-wide distance bands, loaded once
//! - [`StorePlacementConfig`]: per-host admin status and disk threshold,
//!   looked up from a [`ConfigStore`] on every eligibility check

use corelib::{Distance, DistanceBand, ServiceRole};
use serde::{Deserialize, Serialize};

/// Wildcard used for the service-version component of config lookups.
pub const WILDCARD: &str = "*";

/// Distance bands used by the controller when placing an extent.
///
/// Every field defaults to zero, which normalizes to "at least one hop apart,
/// no upper bound" for replicas and "anywhere" for input/output hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    pub min_input_to_store_distance: Distance,
    pub max_input_to_store_distance: Distance,
    pub min_input_to_store_fallback_distance: Distance,
    pub max_input_to_store_fallback_distance: Distance,

    pub min_output_to_store_distance: Distance,
    pub max_output_to_store_distance: Distance,
    pub min_output_to_store_fallback_distance: Distance,
    pub max_output_to_store_fallback_distance: Distance,

    pub min_store_to_store_distance: Distance,
    pub max_store_to_store_distance: Distance,
    pub min_store_to_store_fallback_distance: Distance,
    pub max_store_to_store_fallback_distance: Distance,
}

impl PlacementSettings {
    /// Primary and fallback bands between a `role` host and the store hosts
    /// of the same extent. For [`ServiceRole::Store`] these are the
    /// replica-to-replica bands.
    pub fn bands(&self, role: ServiceRole) -> (DistanceBand, DistanceBand) {
        match role {
            ServiceRole::Input => (
                DistanceBand::new(
                    self.min_input_to_store_distance,
                    self.max_input_to_store_distance,
                ),
                DistanceBand::new(
                    self.min_input_to_store_fallback_distance,
                    self.max_input_to_store_fallback_distance,
                ),
            ),
            ServiceRole::Output => (
                DistanceBand::new(
                    self.min_output_to_store_distance,
                    self.max_output_to_store_distance,
                ),
                DistanceBand::new(
                    self.min_output_to_store_fallback_distance,
                    self.max_output_to_store_fallback_distance,
                ),
            ),
            ServiceRole::Store => (
                DistanceBand::new(
                    self.min_store_to_store_distance,
                    self.max_store_to_store_distance,
                ),
                DistanceBand::new(
                    self.min_store_to_store_fallback_distance,
                    self.max_store_to_store_fallback_distance,
                ),
            ),
        }
    }
}

/// Administrative state of a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminStatus {
    #[default]
    Enabled,
    Disabled,
    /// Anything an operator wrote that isn't `enabled`.
    #[serde(other)]
    Unknown,
}

/// Per-host placement configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorePlacementConfig {
    pub admin_status: AdminStatus,
    /// A host reporting this much free space or less gets no new extents.
    pub min_free_disk_space_bytes: i64,
}

impl StorePlacementConfig {
    pub fn enabled(min_free_disk_space_bytes: i64) -> Self {
        Self {
            admin_status: AdminStatus::Enabled,
            min_free_disk_space_bytes,
        }
    }

    pub fn disabled() -> Self {
        Self {
            admin_status: AdminStatus::Disabled,
            min_free_disk_space_bytes: 0,
        }
    }
}

/// Source of per-host placement configuration.
pub trait ConfigStore: Send + Sync + 'static {
    /// Look up the config for a host, keyed the way the config manager keys
    /// it: service, version (usually [`WILDCARD`]), sku, host name.
    fn get(
        &self,
        role: ServiceRole,
        version: &str,
        sku: &str,
        host_name: &str,
    ) -> corelib::Result<StorePlacementConfig>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_per_role() {
        let settings = PlacementSettings {
            min_store_to_store_distance: 2,
            max_store_to_store_distance: 6,
            min_store_to_store_fallback_distance: 1,
            max_store_to_store_fallback_distance: 8,
            min_input_to_store_distance: 3,
            ..Default::default()
        };
        assert_eq!(
            settings.bands(ServiceRole::Store),
            (DistanceBand::new(2, 6), DistanceBand::new(1, 8))
        );
        assert_eq!(settings.bands(ServiceRole::Input).0, DistanceBand::new(3, 0));
        assert_eq!(
            settings.bands(ServiceRole::Output),
            (DistanceBand::default(), DistanceBand::default())
        );
    }

    #[test]
    fn test_admin_status_defaults_to_enabled() {
        assert_eq!(StorePlacementConfig::default().admin_status, AdminStatus::Enabled);
        assert_eq!(StorePlacementConfig::disabled().admin_status, AdminStatus::Disabled);
    }
}
