//! Host placement for replicated log extents.
//!
//! This crate decides which hosts serve a new extent:
//! - Which store hosts hold its replicas, kept apart by topology distance
//! - Which input and output hosts front it
//! - How load is spread fairly across the fleet over many placements
//!
//! Collaborators (registry, config store, load metrics, topology map) are
//! traits; [`memory`] has in-memory versions of the first three.

pub mod config;
pub mod eligibility;
pub mod error;
pub mod fairness;
pub mod load;
pub mod memory;
pub mod registry;
pub mod selector;
pub mod strategy;

pub use config::{AdminStatus, ConfigStore, PlacementSettings, StorePlacementConfig};
pub use eligibility::{Admission, EligibilityFilter, ExclusionReason, Verdict};
pub use error::{PlacementError, PlacementResult};
pub use fairness::RoundRobinCuller;
pub use load::{Aggregation, LoadMetrics, MetricName};
pub use registry::Registry;
pub use selector::DistanceSelector;
pub use strategy::{DistancePlacement, Placement, PlacementBuilder};
