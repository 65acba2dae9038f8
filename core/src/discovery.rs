//! # Discovery Service
//!
//! Turns the live state of a cluster into discovery targets.
//!
//! Failures are contained at the smallest scope that still lets the run
//! produce useful output: a failing agent query drops one VM, a failing VM
//! listing drops one node. Only the node listing itself is reported upwards.

use pvesd_common::cluster::vm::VmEntry;
use pvesd_common::config::Config;
use pvesd_common::network::address::{self, Rejection, Verdict};
use pvesd_common::target::DiscoveryTarget;
use pvesd_common::{debug, error, info, warn};

use crate::cluster::{ApiError, ClusterApi};

/// Targets found on a single node along with what was skipped on the way.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeScan {
    pub targets: Vec<DiscoveryTarget>,
    pub vms_inspected: usize,
    pub vms_failed: usize,
    pub addresses_rejected: usize,
    pub addresses_invalid: usize,
}

/// Everything one run discovered, in node order, then VM order, then address order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiscoveryReport {
    pub targets: Vec<DiscoveryTarget>,
    pub nodes_scanned: usize,
    pub nodes_failed: usize,
    pub vms_inspected: usize,
    pub vms_failed: usize,
    pub addresses_rejected: usize,
    pub addresses_invalid: usize,
}

impl DiscoveryReport {
    pub fn record_node(&mut self, scan: NodeScan) {
        self.nodes_scanned += 1;
        self.vms_inspected += scan.vms_inspected;
        self.vms_failed += scan.vms_failed;
        self.addresses_rejected += scan.addresses_rejected;
        self.addresses_invalid += scan.addresses_invalid;
        self.targets.extend(scan.targets);
    }

    pub fn record_failed_node(&mut self) {
        self.nodes_scanned += 1;
        self.nodes_failed += 1;
    }
}

pub struct DiscoveryService<'a> {
    api: &'a dyn ClusterApi,
    config: &'a Config,
}

impl<'a> DiscoveryService<'a> {
    pub fn new(api: &'a dyn ClusterApi, config: &'a Config) -> Self {
        Self { api, config }
    }

    /// Names of all nodes reporting `online`, in the order the API lists them.
    pub async fn online_nodes(&self) -> Result<Vec<String>, ApiError> {
        let nodes = self.api.list_nodes().await.inspect_err(|e| {
            error!("Failed to fetch nodes: {e}");
        })?;

        Ok(nodes
            .into_iter()
            .filter(|node| node.is_online())
            .map(|node| node.node)
            .collect())
    }

    /// Collects targets for every running VM on `node`.
    ///
    /// Only a failing VM listing is returned as an error; agent failures are
    /// logged and counted in the returned [`NodeScan`].
    pub async fn scan_node(&self, node: &str) -> Result<NodeScan, ApiError> {
        let vms = self.api.list_vms(node).await.inspect_err(|e| {
            error!("Failed to fetch QEMU VMs for node {node}: {e}");
        })?;

        let mut scan = NodeScan::default();

        for vm in vms.iter().filter(|vm| vm.is_running()) {
            scan.vms_inspected += 1;

            if let Err(e) = self.inspect_vm(node, vm, &mut scan).await {
                warn!("Could not fetch network info for QEMU {} on {node}: {e}", vm.vmid);
                scan.vms_failed += 1;
            }
        }

        Ok(scan)
    }

    async fn inspect_vm(
        &self,
        node: &str,
        vm: &VmEntry,
        scan: &mut NodeScan,
    ) -> Result<(), ApiError> {
        let report = self.api.guest_interfaces(node, vm.vmid).await?;
        let vm_name = vm.display_name();
        let target_network = self.config.target_network.as_ref();
        let exporter = &self.config.exporter;

        for candidate in report.ipv4_candidates() {
            match address::classify(candidate, target_network) {
                Ok(Verdict::Eligible(addr)) => {
                    scan.targets.push(DiscoveryTarget::for_vm(
                        addr,
                        exporter.port,
                        &exporter.job,
                        &vm_name,
                        node,
                    ));
                }
                Ok(Verdict::Rejected(addr, Rejection::OutsideTargetNetwork)) => {
                    if let Some(net) = target_network {
                        info!("Skipping {addr}, not in {net}");
                    }
                    scan.addresses_rejected += 1;
                }
                Ok(Verdict::Rejected(addr, reason)) => {
                    debug!("Skipping {reason} address {addr} of {vm_name}");
                    scan.addresses_rejected += 1;
                }
                Err(e) => {
                    debug!("Ignoring address reported by {vm_name} on {node}: {e}");
                    scan.addresses_invalid += 1;
                }
            }
        }

        Ok(())
    }
}
