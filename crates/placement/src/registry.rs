//! Host registry seam.
//!
//! The registry tracks which hosts are currently alive for each service role.
//! Placement never caches what it returns; every call works on a fresh
//! snapshot.

use std::sync::Arc;

use corelib::{HostRecord, ServiceRole};

/// Live host discovery.
pub trait Registry: Send + Sync + 'static {
    /// All live hosts for `role`, in the registry's listing order.
    fn get_hosts(&self, role: ServiceRole) -> corelib::Result<Vec<Arc<HostRecord>>>;

    /// Resolve a `host:port` address back to a live host of `role`.
    fn find_host_for_addr(&self, role: ServiceRole, addr: &str)
        -> corelib::Result<Arc<HostRecord>>;
}
