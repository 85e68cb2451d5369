//! Placement strategy abstractions.
//!
//! A placement strategy decides which hosts serve a new extent:
//!
//! - one **input host** that accepts writes,
//! - one **output host** that serves reads,
//! - **N store hosts** that hold the replicas.
//!
//! `DistancePlacement` is the production strategy: topology-aware for store
//! replicas, round-robin fair everywhere.

pub mod distance;

pub use distance::{DistancePlacement, PlacementBuilder};

use std::sync::Arc;

use corelib::HostRecord;

use crate::error::PlacementResult;

/// Trait for placement strategies.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync); one instance serves
/// every concurrent placement request of a controller.
pub trait Placement: Send + Sync + 'static {
    /// Pick an input host for an extent whose replicas live on `store_hosts`.
    ///
    /// # Arguments
    /// * `store_hosts` - Replica hosts already chosen for the extent
    ///
    /// # Returns
    /// One live input host, or `NoInputHostAvailable`
    ///
    /// # Performance
    /// One registry listing plus one fairness cull (serialized across callers)
    fn pick_input_host(&self, store_hosts: &[Arc<HostRecord>]) -> PlacementResult<Arc<HostRecord>>;

    /// Pick an output host for an extent whose replicas live on `store_hosts`.
    ///
    /// # Arguments
    /// * `store_hosts` - Replica hosts already chosen for the extent
    ///
    /// # Returns
    /// One live output host, or `NoOutputHostAvailable`
    ///
    /// # Performance
    /// One registry listing plus one fairness cull (serialized across callers)
    fn pick_output_host(&self, store_hosts: &[Arc<HostRecord>])
        -> PlacementResult<Arc<HostRecord>>;

    /// Pick exactly `count` distinct store hosts for the replicas of an extent.
    ///
    /// # Arguments
    /// * `count` - Replication factor (typically 3)
    ///
    /// # Returns
    /// Exactly `count` hosts, `NoStoreHostsAvailable`, or `InventoryCorrupt`
    /// when the host inventory itself is broken. Never a partial set.
    ///
    /// # Performance
    /// - One registry listing and one config/metrics lookup per store host
    /// - At most two topology queries, then at most one fairness cull
    fn pick_store_hosts(&self, count: usize) -> PlacementResult<Vec<Arc<HostRecord>>>;

    /// Get the strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}
