//! # Target Network
//!
//! The optional IPv4 subnet that discovered addresses must fall into.
//!
//! Accepts CIDR notation (`10.0.0.0/24`) or a bare address (treated as `/32`).
//! Host bits are allowed and masked off, so `10.0.0.7/24` is the same network
//! as `10.0.0.0/24`.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetNetwork(Ipv4Network);

impl TargetNetwork {
    /// Parses an optional setting. `None`, empty and whitespace-only input mean "no restriction".
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, ConfigError> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some),
        }
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.0.contains(addr)
    }
}

impl FromStr for TargetNetwork {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidTargetNetwork {
            value: s.to_string(),
        };

        let parsed: Ipv4Network = s.trim().parse().map_err(|_| invalid())?;
        let normalized =
            Ipv4Network::new(parsed.network(), parsed.prefix()).map_err(|_| invalid())?;

        Ok(Self(normalized))
    }
}

impl fmt::Display for TargetNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0.network(), self.0.prefix())
    }
}
