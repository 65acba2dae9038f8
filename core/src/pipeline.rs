//! # Pipeline
//!
//! One discovery run: online nodes → running VMs per node → eligible guest
//! addresses → one document. Nodes and VMs are visited strictly one after the
//! other, so the document order is fully determined by the API responses.

use thiserror::Error;

use pvesd_common::config::Config;
use pvesd_common::{info, success};

use crate::cluster::{ApiError, ClusterApi, ProxmoxClient};
use crate::discovery::{DiscoveryReport, DiscoveryService};
use crate::publish::{self, PublishError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not set up the Proxmox API client")]
    Client(#[source] ApiError),

    #[error("No active Proxmox nodes found")]
    NoOnlineNodes(#[source] Option<ApiError>),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

pub fn connect(config: &Config) -> Result<ProxmoxClient, PipelineError> {
    ProxmoxClient::new(&config.api).map_err(PipelineError::Client)
}

/// Walks the cluster and collects every eligible target.
///
/// Fails only when no online node could be determined; node and VM level
/// failures are logged where they happen and absorbed into the report.
/// Returned errors are left for the caller to log.
pub async fn discover(
    api: &dyn ClusterApi,
    config: &Config,
) -> Result<DiscoveryReport, PipelineError> {
    let service = DiscoveryService::new(api, config);

    let nodes = match service.online_nodes().await {
        Ok(nodes) if !nodes.is_empty() => nodes,
        Ok(_) => return Err(PipelineError::NoOnlineNodes(None)),
        Err(e) => return Err(PipelineError::NoOnlineNodes(Some(e))),
    };

    info!("Found {} online node(s): {}", nodes.len(), nodes.join(", "));

    let mut report = DiscoveryReport::default();
    for node in &nodes {
        match service.scan_node(node).await {
            Ok(scan) => report.record_node(scan),
            Err(_) => report.record_failed_node(),
        }
    }

    Ok(report)
}

/// Runs discovery and returns the rendered document without touching the output file.
pub async fn render(
    api: &dyn ClusterApi,
    config: &Config,
) -> Result<(DiscoveryReport, String), PipelineError> {
    let report = discover(api, config).await?;
    let document = publish::render(&report.targets)?;
    Ok((report, document))
}

/// Runs discovery and atomically publishes the document to `config.output`.
pub async fn generate(
    api: &dyn ClusterApi,
    config: &Config,
) -> Result<DiscoveryReport, PipelineError> {
    let (report, document) = render(api, config).await?;

    publish::publish(&config.output, &document)?;

    success!("Configuration file generated: {}", config.output.display());
    summarize(&report);

    Ok(report)
}

pub fn summarize(report: &DiscoveryReport) {
    for line in summary_lines(report) {
        info!("{line}");
    }
}

fn summary_lines(report: &DiscoveryReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} target(s) from {} running VM(s) on {} node(s)",
        report.targets.len(),
        report.vms_inspected,
        report.nodes_scanned
    )];

    if report.nodes_failed > 0 || report.vms_failed > 0 {
        lines.push(format!(
            "Skipped {} node(s) and {} VM(s) that could not be queried",
            report.nodes_failed, report.vms_failed
        ));
    }

    if report.addresses_rejected > 0 || report.addresses_invalid > 0 {
        lines.push(format!(
            "Ignored {} filtered and {} unparseable guest address(es)",
            report.addresses_rejected, report.addresses_invalid
        ));
    }

    lines
}
