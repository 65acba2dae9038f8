use std::fs;
use std::net::Ipv4Addr;

use httpmock::prelude::*;
use serde_json::{Value, json};

use pvesd_common::network::address::classify;
use pvesd_core::pipeline::{self, PipelineError};

use crate::support::{config, mock_agent, mock_json};

/// Two online nodes, one offline node, a stopped VM, an unnamed VM and a VM
/// whose guest agent is not running.
async fn cluster() -> MockServer {
    let server = MockServer::start_async().await;

    mock_json(
        &server,
        "/api2/json/nodes",
        200,
        json!({
            "data": [
                { "node": "pve1", "status": "online", "type": "node" },
                { "node": "pve2", "status": "offline", "type": "node" },
                { "node": "pve3", "status": "online", "type": "node" }
            ]
        }),
    )
    .await;

    mock_json(
        &server,
        "/api2/json/nodes/pve1/qemu",
        200,
        json!({
            "data": [
                { "vmid": 100, "name": "web-01", "status": "running" },
                { "vmid": 101, "name": "web-02", "status": "running" },
                { "vmid": 102, "name": "old", "status": "stopped" }
            ]
        }),
    )
    .await;

    mock_json(
        &server,
        "/api2/json/nodes/pve3/qemu",
        200,
        json!({
            "data": [
                { "vmid": 105, "status": "running" },
                { "vmid": 106, "name": "db-01", "status": "running" }
            ]
        }),
    )
    .await;

    mock_agent(&server, "pve1", 100, &["10.0.0.5", "fe80::be24:11ff:fe12:3456"]).await;
    mock_json(
        &server,
        "/api2/json/nodes/pve1/qemu/101/agent/network-get-interfaces",
        500,
        json!({ "data": null, "message": "QEMU guest agent is not running" }),
    )
    .await;
    mock_agent(&server, "pve3", 105, &["10.0.1.5", "169.254.1.1"]).await;
    mock_agent(&server, "pve3", 106, &["10.0.0.6", "0.0.0.0", "10.0.0.7"]).await;

    server
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn generate_without_target_network() {
    let server = cluster().await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("prometheus").join("proxmox_sd.json");
    let cfg = config(&server, output.clone(), None);
    let client = pipeline::connect(&cfg).unwrap();

    let report = pipeline::generate(&client, &cfg).await.unwrap();

    assert_eq!(
        read_json(&output),
        json!([
            {
                "targets": ["10.0.0.5:9100"],
                "labels": { "job": "node_exporter", "name": "web-01", "node": "pve1" }
            },
            {
                "targets": ["10.0.1.5:9100"],
                "labels": { "job": "node_exporter", "name": "VM-105", "node": "pve3" }
            },
            {
                "targets": ["10.0.0.6:9100"],
                "labels": { "job": "node_exporter", "name": "db-01", "node": "pve3" }
            },
            {
                "targets": ["10.0.0.7:9100"],
                "labels": { "job": "node_exporter", "name": "db-01", "node": "pve3" }
            }
        ])
    );
    assert_eq!(report.nodes_scanned, 2);
    assert_eq!(report.vms_inspected, 4);
    assert_eq!(report.vms_failed, 1);
}

#[tokio::test]
async fn generate_with_target_network() {
    let server = cluster().await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("proxmox_sd.json");
    let cfg = config(&server, output.clone(), Some("10.0.0.0/24"));
    let client = pipeline::connect(&cfg).unwrap();

    pipeline::generate(&client, &cfg).await.unwrap();

    let document = read_json(&output);
    let endpoints: Vec<&str> = document
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["targets"][0].as_str().unwrap())
        .collect();
    assert_eq!(endpoints, vec!["10.0.0.5:9100", "10.0.0.6:9100", "10.0.0.7:9100"]);

    // Every published address passes the classifier under the same network.
    let network = cfg.target_network.as_ref();
    for endpoint in endpoints {
        let (addr, port) = endpoint.split_once(':').unwrap();
        assert_eq!(port, "9100");
        assert!(classify(addr, network).unwrap().is_eligible(), "{addr} should not be published");
    }
}

#[tokio::test]
async fn special_addresses_never_published() {
    let server = cluster().await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("proxmox_sd.json");
    let cfg = config(&server, output.clone(), Some("0.0.0.0/0"));
    let client = pipeline::connect(&cfg).unwrap();

    pipeline::generate(&client, &cfg).await.unwrap();

    let raw = fs::read_to_string(&output).unwrap();
    for forbidden in [Ipv4Addr::LOCALHOST, Ipv4Addr::new(169, 254, 1, 1), Ipv4Addr::UNSPECIFIED] {
        assert!(!raw.contains(&format!("\"{forbidden}:")), "{forbidden} leaked into {raw}");
    }
}

#[tokio::test]
async fn repeated_runs_are_byte_identical() {
    let server = cluster().await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("proxmox_sd.json");
    let cfg = config(&server, output.clone(), None);
    let client = pipeline::connect(&cfg).unwrap();

    pipeline::generate(&client, &cfg).await.unwrap();
    let first = fs::read(&output).unwrap();
    pipeline::generate(&client, &cfg).await.unwrap();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn no_online_nodes_is_fatal_and_keeps_previous_file() {
    let server = MockServer::start_async().await;
    mock_json(
        &server,
        "/api2/json/nodes",
        200,
        json!({ "data": [{ "node": "pve1", "status": "offline" }] }),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("proxmox_sd.json");
    let previous =
        r#"[{"targets":["10.0.0.1:9100"],"labels":{"job":"node_exporter","name":"a","node":"pve1"}}]"#;
    fs::write(&output, previous).unwrap();

    let cfg = config(&server, output.clone(), None);
    let client = pipeline::connect(&cfg).unwrap();

    let err = pipeline::generate(&client, &cfg).await.unwrap_err();

    assert!(matches!(err, PipelineError::NoOnlineNodes(None)));
    assert_eq!(fs::read_to_string(&output).unwrap(), previous);
}

#[tokio::test]
async fn unreachable_node_listing_creates_no_file() {
    let server = MockServer::start_async().await;
    mock_json(&server, "/api2/json/nodes", 401, json!({ "data": null })).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("proxmox_sd.json");
    let cfg = config(&server, output.clone(), None);
    let client = pipeline::connect(&cfg).unwrap();

    let err = pipeline::generate(&client, &cfg).await.unwrap_err();

    assert!(matches!(err, PipelineError::NoOnlineNodes(Some(_))));
    assert!(!output.exists());
}

#[tokio::test]
async fn node_with_failing_vm_listing_is_skipped() {
    let server = MockServer::start_async().await;
    mock_json(
        &server,
        "/api2/json/nodes",
        200,
        json!({ "data": [
            { "node": "pve1", "status": "online" },
            { "node": "pve2", "status": "online" }
        ] }),
    )
    .await;
    mock_json(&server, "/api2/json/nodes/pve1/qemu", 595, json!({ "data": null })).await;
    mock_json(
        &server,
        "/api2/json/nodes/pve2/qemu",
        200,
        json!({ "data": [{ "vmid": 200, "name": "mail", "status": "running" }] }),
    )
    .await;
    mock_agent(&server, "pve2", 200, &["192.168.1.20"]).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("proxmox_sd.json");
    let cfg = config(&server, output.clone(), None);
    let client = pipeline::connect(&cfg).unwrap();

    let report = pipeline::generate(&client, &cfg).await.unwrap();

    assert_eq!(report.nodes_failed, 1);
    assert_eq!(
        read_json(&output),
        json!([{
            "targets": ["192.168.1.20:9100"],
            "labels": { "job": "node_exporter", "name": "mail", "node": "pve2" }
        }])
    );
}

#[tokio::test]
async fn empty_cluster_publishes_empty_array() {
    let server = MockServer::start_async().await;
    mock_json(
        &server,
        "/api2/json/nodes",
        200,
        json!({ "data": [{ "node": "pve1", "status": "online" }] }),
    )
    .await;
    mock_json(&server, "/api2/json/nodes/pve1/qemu", 200, json!({ "data": [] })).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("proxmox_sd.json");
    let cfg = config(&server, output.clone(), None);
    let client = pipeline::connect(&cfg).unwrap();

    pipeline::generate(&client, &cfg).await.unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "[]");
}
