use std::path::PathBuf;
use std::time::Duration;

use httpmock::prelude::*;
use secrecy::SecretString;
use serde_json::{Value, json};

use pvesd_common::config::{ApiConfig, ApiToken, Config, ExporterConfig};
use pvesd_common::network::subnet::TargetNetwork;

pub const AUTHORIZATION: &str = "PVEAPIToken=root@pam!metrics=integration-secret";

pub fn config(server: &MockServer, output: PathBuf, target_network: Option<&str>) -> Config {
    let token = ApiToken::new(
        "root@pam",
        "metrics",
        SecretString::from("integration-secret".to_string()),
    );

    Config {
        api: ApiConfig::new(&server.base_url(), token, true, Duration::from_secs(2)).unwrap(),
        output,
        target_network: TargetNetwork::parse_optional(target_network).unwrap(),
        exporter: ExporterConfig::default(),
    }
}

pub fn interfaces(addrs: &[&str]) -> Value {
    let ip_addresses: Vec<Value> = addrs
        .iter()
        .map(|addr| {
            let family = if addr.contains(':') { "ipv6" } else { "ipv4" };
            json!({ "ip-address-type": family, "ip-address": addr, "prefix": 24 })
        })
        .collect();

    json!({
        "data": {
            "result": [
                {
                    "name": "lo",
                    "hardware-address": "00:00:00:00:00:00",
                    "ip-addresses": [
                        { "ip-address-type": "ipv4", "ip-address": "127.0.0.1", "prefix": 8 },
                        { "ip-address-type": "ipv6", "ip-address": "::1", "prefix": 128 }
                    ]
                },
                {
                    "name": "eth0",
                    "hardware-address": "bc:24:11:12:34:56",
                    "ip-addresses": ip_addresses
                }
            ]
        }
    })
}

pub async fn mock_json(server: &MockServer, path: &str, status: u16, body: Value) {
    let path = path.to_string();
    server
        .mock_async(move |when, then| {
            when.method(GET).path(path).header("authorization", AUTHORIZATION);
            then.status(status).json_body(body);
        })
        .await;
}

pub async fn mock_agent(server: &MockServer, node: &str, vmid: u32, addrs: &[&str]) {
    let path = format!("/api2/json/nodes/{node}/qemu/{vmid}/agent/network-get-interfaces");
    mock_json(server, &path, 200, interfaces(addrs)).await;
}
