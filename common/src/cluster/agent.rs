//! # Interface Extractor
//!
//! Models the QEMU guest agent `network-get-interfaces` report and flattens it
//! into the IPv4 address candidates the classifier looks at.

use serde::Deserialize;

pub const IPV4: &str = "ipv4";

/// Payload of `GET /api2/json/nodes/{node}/qemu/{vmid}/agent/network-get-interfaces`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AgentInterfaces {
    #[serde(default)]
    pub result: Vec<GuestInterface>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GuestInterface {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "hardware-address")]
    pub hardware_address: Option<String>,
    #[serde(default, rename = "ip-addresses")]
    pub ip_addresses: Vec<GuestAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuestAddress {
    #[serde(rename = "ip-address-type")]
    pub family: String,
    #[serde(rename = "ip-address")]
    pub address: String,
    #[serde(default)]
    pub prefix: Option<u8>,
}

impl GuestAddress {
    pub fn is_ipv4(&self) -> bool {
        self.family.eq_ignore_ascii_case(IPV4)
    }
}

impl AgentInterfaces {
    /// IPv4 address strings in interface order, then address order.
    pub fn ipv4_candidates(&self) -> Vec<&str> {
        self.result
            .iter()
            .flat_map(|iface| iface.ip_addresses.iter())
            .filter(|addr| addr.is_ipv4())
            .map(|addr| addr.address.as_str())
            .collect()
    }
}
