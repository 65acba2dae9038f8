//! # Proxmox API models
//!
//! Wire representations of the three endpoints the discovery pipeline reads.
//! Only the fields the pipeline needs are modelled; everything else the API
//! returns is ignored during deserialization.

use serde::Deserialize;

pub mod agent;
pub mod node;
pub mod vm;

/// Every Proxmox response wraps its payload in `{"data": ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub data: Option<T>,
}

impl<T: Default> ApiEnvelope<T> {
    /// Returns the payload, treating a missing or `null` `data` field as empty.
    pub fn into_data(self) -> T {
        self.data.unwrap_or_default()
    }
}
