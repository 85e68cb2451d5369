//! Host abstractions for placement.
//!
//! Hosts are the physical or logical machines that run one of the data-plane
//! services. They are identified by a compact `HostId` that is cheap to
//! compare and hash.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a host in the fleet.
///
/// Newtype over `Uuid` so comparisons and hashing stay cheap and ids of
/// other entities can't be passed by mistake.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostId(pub Uuid);

impl HostId {
    /// Generate a fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// The data-plane service a host runs.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceRole {
    /// Accepts writes from publishers.
    Input,
    /// Serves reads to consumers.
    Output,
    /// Durably stores extent replicas.
    Store,
}

impl ServiceRole {
    /// Stable service name, used as registry key and log field.
    pub fn service_name(&self) -> &'static str {
        match self {
            ServiceRole::Input => "inputhost",
            ServiceRole::Output => "outputhost",
            ServiceRole::Store => "storehost",
        }
    }
}

impl fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.service_name())
    }
}

/// A live host as reported by the registry.
///
/// Keep this struct small; the registry hands out `Arc<HostRecord>` and the
/// placement engine only ever passes those references around.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    pub id: HostId,
    /// Human‑readable host name.
    pub name: String,
    /// Network address in `host:port` form.
    pub addr: String,
    /// Hardware class, used to look up per-sku placement config.
    #[serde(default)]
    pub sku: String,
}

impl HostRecord {
    /// Construct a host record.
    pub fn new(
        id: HostId,
        name: impl Into<String>,
        addr: impl Into<String>,
        sku: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            addr: addr.into(),
            sku: sku.into(),
        }
    }
}
