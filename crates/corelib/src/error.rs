//! Error types for the core library.

use std::fmt;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library and in placement collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Address is not in `host:port` form
    InvalidAddress(String),
    /// No live host matched the lookup
    HostNotFound(String),
    /// Host registry failure
    Registry(String),
    /// Topology map failure
    Topology(String),
    /// Config store failure or missing entry
    Config(String),
    /// Load metrics failure or missing value
    Metrics(String),
    /// Internal error
    Internal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            Error::HostNotFound(msg) => write!(f, "Host not found: {}", msg),
            Error::Registry(msg) => write!(f, "Registry error: {}", msg),
            Error::Topology(msg) => write!(f, "Topology error: {}", msg),
            Error::Config(msg) => write!(f, "Config error: {}", msg),
            Error::Metrics(msg) => write!(f, "Metrics error: {}", msg),
            Error::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
