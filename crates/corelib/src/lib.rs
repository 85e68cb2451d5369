//! Core library for extent host placement.
//!
//! This crate provides the vocabulary shared by the placement engine and its
//! collaborators:
//! - Host identity and service roles
//! - `host:port` address handling and the resource projection
//! - Topology distances, distance bands and the topology map seam

pub mod error;
pub mod network;
pub mod node;
pub mod topology;

pub use error::{Error, Result};
pub use network::HostAddr;
pub use node::{HostId, HostRecord, ServiceRole};
pub use topology::{
    Distance, DistanceBand, ResourceId, TopologyMap, INFINITE_DISTANCE, NIC_RESOURCE_CLASS,
    ZERO_DISTANCE,
};
