//! # Address Classifier
//!
//! Decides whether an address reported by a guest agent is a usable scrape
//! endpoint. Rules are applied in order:
//!
//! 1. loopback (`127.0.0.0/8`) is rejected,
//! 2. link-local (`169.254.0.0/16`) is rejected,
//! 3. the unspecified address (`0.0.0.0`) is rejected,
//! 4. with a target network configured, anything outside it is rejected.

use std::fmt;
use std::net::Ipv4Addr;

use crate::error::AddressError;
use crate::network::subnet::TargetNetwork;

/// Why an otherwise valid address was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Loopback,
    LinkLocal,
    Unspecified,
    OutsideTargetNetwork,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::Loopback => "loopback",
            Rejection::LinkLocal => "link-local",
            Rejection::Unspecified => "unspecified",
            Rejection::OutsideTargetNetwork => "outside target network",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Eligible(Ipv4Addr),
    Rejected(Ipv4Addr, Rejection),
}

impl Verdict {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Verdict::Eligible(_))
    }
}

/// Parses `candidate` and applies the eligibility rules.
pub fn classify(
    candidate: &str,
    target_network: Option<&TargetNetwork>,
) -> Result<Verdict, AddressError> {
    let addr: Ipv4Addr = candidate
        .trim()
        .parse()
        .map_err(|_| AddressError::InvalidAddress(candidate.to_string()))?;

    Ok(classify_addr(addr, target_network))
}

pub fn classify_addr(addr: Ipv4Addr, target_network: Option<&TargetNetwork>) -> Verdict {
    let rejection = if addr.is_loopback() {
        Some(Rejection::Loopback)
    } else if addr.is_link_local() {
        Some(Rejection::LinkLocal)
    } else if addr.is_unspecified() {
        Some(Rejection::Unspecified)
    } else if target_network.is_some_and(|net| !net.contains(addr)) {
        Some(Rejection::OutsideTargetNetwork)
    } else {
        None
    };

    match rejection {
        Some(reason) => Verdict::Rejected(addr, reason),
        None => Verdict::Eligible(addr),
    }
}
