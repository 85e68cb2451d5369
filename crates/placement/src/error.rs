//! Error types for host placement.

use corelib::ServiceRole;
use thiserror::Error;

/// Result type for placement operations.
pub type PlacementResult<T> = Result<T, PlacementError>;

/// Errors that can occur while placing an extent.
#[derive(Debug, Clone, Error)]
pub enum PlacementError {
    /// No usable host set could be assembled.
    #[error("Unable to find healthy hosts")]
    NoHealthyHosts,

    /// No input host could be picked.
    #[error("Unable to find healthy input host")]
    NoInputHostAvailable,

    /// No output host could be picked.
    #[error("Unable to find healthy output host")]
    NoOutputHostAvailable,

    /// Not enough store hosts could be picked.
    #[error("Unable to find healthy store hosts")]
    NoStoreHostsAvailable,

    /// The host inventory violates an invariant (malformed address, a
    /// resource that maps back to no pool host). Never retried.
    #[error("Host inventory is corrupt: {detail}")]
    InventoryCorrupt {
        /// What was found to be wrong.
        detail: String,
    },

    /// A collaborator (registry, topology map) failed.
    #[error(transparent)]
    Collaborator(#[from] corelib::Error),
}

impl PlacementError {
    /// Create an inventory corruption error.
    pub fn inventory_corrupt(detail: impl Into<String>) -> Self {
        Self::InventoryCorrupt { detail: detail.into() }
    }

    /// The role-specific "nothing available" error for `role`.
    pub fn unavailable(role: ServiceRole) -> Self {
        match role {
            ServiceRole::Input => Self::NoInputHostAvailable,
            ServiceRole::Output => Self::NoOutputHostAvailable,
            ServiceRole::Store => Self::NoStoreHostsAvailable,
        }
    }

    /// Whether a caller may retry the operation later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InventoryCorrupt { .. })
    }
}
