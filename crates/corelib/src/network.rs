//! Host address handling.
//!
//! Hosts register with a `host:port` address. The topology map only knows
//! about the host part (a network interface), so placement projects addresses
//! down to a [`ResourceId`] and later rebuilds the full address from a
//! per-call port table.

use std::fmt;

use crate::error::{Error, Result};
use crate::topology::ResourceId;

/// A parsed `host:port` address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HostAddr {
    host: String,
    port: u16,
}

impl HostAddr {
    /// Parse a strict `host:port` address.
    ///
    /// Exactly one `:` separator, a non-empty host and a numeric port are
    /// required.
    pub fn parse(addr: &str) -> Result<Self> {
        let mut parts = addr.split(':');
        let (host, port) = match (parts.next(), parts.next(), parts.next()) {
            (Some(host), Some(port), None) => (host, port),
            _ => return Err(Error::InvalidAddress(format!("{addr:?} is not host:port"))),
        };
        if host.is_empty() {
            return Err(Error::InvalidAddress(format!("{addr:?} has an empty host")));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| Error::InvalidAddress(format!("{addr:?} has an invalid port")))?;
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    /// Rebuild an address from a resource and the port it was registered with.
    pub fn join(resource: &ResourceId, port: u16) -> Self {
        Self {
            host: resource.as_str().to_string(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The topology resource this address lives on.
    pub fn resource(&self) -> ResourceId {
        ResourceId::new(self.host.clone())
    }
}

impl fmt::Display for HostAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Lenient projection of an address to its resource: everything before the
/// first `:`, or the whole string when there is no port.
pub fn resource_of(addr: &str) -> ResourceId {
    let host = addr.split(':').next().unwrap_or(addr);
    ResourceId::new(host)
}
