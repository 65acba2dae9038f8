use std::time::Duration;

use thiserror::Error;

/// Problems with the run configuration. Always fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid TARGET_NETWORK CIDR: {value}")]
    InvalidTargetNetwork { value: String },

    #[error("Request timeout must be greater than zero, got {0:?}")]
    ZeroTimeout(Duration),

    #[error("Invalid Proxmox host URL '{value}': {reason}")]
    InvalidHost { value: String, reason: String },
}

/// Raised by the address classifier for strings that are not IPv4 addresses.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("'{0}' is not a valid IPv4 address")]
    InvalidAddress(String),
}
