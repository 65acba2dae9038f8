//! # Discovery Target
//!
//! One entry of a Prometheus `file_sd_configs` document:
//!
//! ```json
//! { "targets": ["10.0.0.5:9100"], "labels": { "job": "node_exporter", "name": "web-01", "node": "pve1" } }
//! ```

use std::net::{Ipv4Addr, SocketAddrV4};

use serde::Serialize;

pub const DEFAULT_EXPORTER_PORT: u16 = 9100;
pub const DEFAULT_EXPORTER_JOB: &str = "node_exporter";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetLabels {
    pub job: String,
    pub name: String,
    pub node: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryTarget {
    targets: Vec<String>,
    labels: TargetLabels,
}

impl DiscoveryTarget {
    pub fn new(endpoint: SocketAddrV4, labels: TargetLabels) -> Self {
        Self {
            targets: vec![endpoint.to_string()],
            labels,
        }
    }

    pub fn for_vm(addr: Ipv4Addr, port: u16, job: &str, vm_name: &str, node: &str) -> Self {
        Self::new(
            SocketAddrV4::new(addr, port),
            TargetLabels {
                job: job.to_string(),
                name: vm_name.to_string(),
                node: node.to_string(),
            },
        )
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn labels(&self) -> &TargetLabels {
        &self.labels
    }
}
