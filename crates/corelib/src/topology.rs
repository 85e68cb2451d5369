//! Topology abstractions.
//!
//! The topology map is an external service that knows how far apart two
//! resources are and can search a pool for members inside a distance band.
//! This module only defines the vocabulary and the seam; the search itself
//! lives with whoever implements [`TopologyMap`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Topological distance between two resources.
pub type Distance = u16;

/// Distance between a resource and itself.
pub const ZERO_DISTANCE: Distance = 0;

/// Upper bound meaning "no limit".
pub const INFINITE_DISTANCE: Distance = Distance::MAX;

/// Resource class used as the unit of distance measurement for hosts.
pub const NIC_RESOURCE_CLASS: &str = "nic";

/// The topology map's name for a host: its address without the port.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An inclusive `[min, max]` distance window.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct DistanceBand {
    pub min: Distance,
    pub max: Distance,
}

impl DistanceBand {
    pub const fn new(min: Distance, max: Distance) -> Self {
        Self { min, max }
    }

    /// Promote a degenerate or inverted band (`max <= min`) to an unbounded one.
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.max <= self.min {
            Self::new(self.min, INFINITE_DISTANCE)
        } else {
            self
        }
    }

    /// Normalize a band used between replicas of the same extent.
    ///
    /// Zero distance means the same physical resource, so the lower bound is
    /// lifted to one before the usual normalization.
    #[must_use]
    pub fn for_replicas(self) -> Self {
        let min = if self.min <= ZERO_DISTANCE {
            ZERO_DISTANCE + 1
        } else {
            self.min
        };
        Self::new(min, self.max).normalized()
    }

    pub fn is_unbounded(&self) -> bool {
        self.max == INFINITE_DISTANCE
    }
}

impl fmt::Display for DistanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() {
            write!(f, "[{}, inf]", self.min)
        } else {
            write!(f, "[{}, {}]", self.min, self.max)
        }
    }
}

/// Trait for topology distance services.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync) as a single map is
/// shared by every concurrent placement call.
pub trait TopologyMap: Send + Sync + 'static {
    /// Pick `count` resources from `pool` that lie within `[min, max]` of
    /// every resource in `sources`.
    ///
    /// With an empty `sources`, the chosen resources must instead be within
    /// the band of one another.
    fn find_resources(
        &self,
        pool: &[ResourceId],
        sources: &[ResourceId],
        resource_class: &str,
        count: usize,
        min: Distance,
        max: Distance,
    ) -> Result<Vec<ResourceId>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_keeps_valid_band() {
        assert_eq!(DistanceBand::new(2, 5).normalized(), DistanceBand::new(2, 5));
    }

    #[test]
    fn test_normalized_promotes_degenerate_band() {
        assert_eq!(
            DistanceBand::new(3, 3).normalized(),
            DistanceBand::new(3, INFINITE_DISTANCE)
        );
        assert_eq!(
            DistanceBand::new(4, 1).normalized(),
            DistanceBand::new(4, INFINITE_DISTANCE)
        );
    }

    #[test]
    fn test_for_replicas_lifts_zero_lower_bound() {
        assert_eq!(DistanceBand::new(0, 4).for_replicas(), DistanceBand::new(1, 4));
        assert_eq!(
            DistanceBand::new(0, 0).for_replicas(),
            DistanceBand::new(1, INFINITE_DISTANCE)
        );
        assert_eq!(
            DistanceBand::new(0, 1).for_replicas(),
            DistanceBand::new(1, INFINITE_DISTANCE)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(DistanceBand::new(1, 4).to_string(), "[1, 4]");
        assert_eq!(DistanceBand::new(1, INFINITE_DISTANCE).to_string(), "[1, inf]");
    }
}
