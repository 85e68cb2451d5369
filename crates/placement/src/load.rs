//! Load metrics seam.
//!
//! Hosts report load samples (free disk space and friends) to a metrics
//! store. Placement only reads the remaining disk space of store hosts.

use std::fmt;

use corelib::HostId;

/// Tag used for host-wide (untagged) metrics.
pub const EMPTY_TAG: &str = "";

/// Metrics placement knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    /// Free bytes left on the host's data volume.
    RemainingDiskSpaceBytes,
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricName::RemainingDiskSpaceBytes => f.write_str("remDiskSpaceBytes"),
        }
    }
}

/// How samples are combined into a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregation {
    OneMinuteAverage,
}

/// Live load-metric lookup.
pub trait LoadMetrics: Send + Sync + 'static {
    fn get(
        &self,
        host: HostId,
        tag: &str,
        metric: MetricName,
        aggregation: Aggregation,
    ) -> corelib::Result<i64>;
}
