//! The boundary between the pipeline and the Proxmox management API.
//!
//! The discovery logic depends only on [`ClusterApi`]; [`http::ProxmoxClient`]
//! is the production implementation.

use async_trait::async_trait;
use thiserror::Error;

use pvesd_common::cluster::{agent::AgentInterfaces, node::NodeEntry, vm::VmEntry};

pub mod http;

pub use http::ProxmoxClient;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("API token cannot be sent as an HTTP header")]
    InvalidToken,

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("request to {endpoint} failed: {error}")]
    Transport {
        endpoint: String,
        error: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

/// Read-only view of a Proxmox cluster.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// `GET /nodes`
    async fn list_nodes(&self) -> Result<Vec<NodeEntry>, ApiError>;

    /// `GET /nodes/{node}/qemu`
    async fn list_vms(&self, node: &str) -> Result<Vec<VmEntry>, ApiError>;

    /// `GET /nodes/{node}/qemu/{vmid}/agent/network-get-interfaces`
    async fn guest_interfaces(&self, node: &str, vmid: u32) -> Result<AgentInterfaces, ApiError>;
}
