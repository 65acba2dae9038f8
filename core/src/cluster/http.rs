//! HTTP implementation of [`ClusterApi`] on top of `reqwest`.
//!
//! Every request carries the API token header and is bounded by the configured
//! timeout. Certificate verification follows [`ApiConfig::verify_tls`].

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use pvesd_common::cluster::{ApiEnvelope, agent::AgentInterfaces, node::NodeEntry, vm::VmEntry};
use pvesd_common::config::ApiConfig;
use pvesd_common::debug;

use super::{ApiError, ClusterApi};

const API_ROOT: [&str; 2] = ["api2", "json"];

pub struct ProxmoxClient {
    http: reqwest::Client,
    base: Url,
}

impl ProxmoxClient {
    pub fn new(cfg: &ApiConfig) -> Result<Self, ApiError> {
        let invalid_url = |reason: String| ApiError::InvalidUrl {
            url: cfg.host().to_string(),
            reason,
        };

        let base = Url::parse(cfg.host()).map_err(|e| invalid_url(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid_url("URL cannot carry a path".to_string()));
        }

        let mut authorization =
            HeaderValue::from_str(&cfg.token.authorization()).map_err(|_| ApiError::InvalidToken)?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(cfg.timeout)
            .danger_accept_invalid_certs(!cfg.verify_tls)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self { http, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                url: self.base.to_string(),
                reason: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(API_ROOT)
            .extend(segments);
        Ok(url)
    }

    async fn get<T>(&self, url: Url) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        let endpoint = url.path().to_string();
        debug!("GET {endpoint}");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|error| ApiError::Transport {
                endpoint: endpoint.clone(),
                error,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|error| ApiError::Transport {
            endpoint: endpoint.clone(),
            error,
        })?;

        let envelope: ApiEnvelope<T> = serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            endpoint,
            reason: e.to_string(),
        })?;

        Ok(envelope.into_data())
    }
}

#[async_trait]
impl ClusterApi for ProxmoxClient {
    async fn list_nodes(&self) -> Result<Vec<NodeEntry>, ApiError> {
        self.get(self.endpoint(&["nodes"])?).await
    }

    async fn list_vms(&self, node: &str) -> Result<Vec<VmEntry>, ApiError> {
        self.get(self.endpoint(&["nodes", node, "qemu"])?).await
    }

    async fn guest_interfaces(
        &self,
        node: &str,
        vmid: u32,
    ) -> Result<AgentInterfaces, ApiError> {
        let vmid = vmid.to_string();
        let url =
            self.endpoint(&["nodes", node, "qemu", &vmid, "agent", "network-get-interfaces"])?;
        self.get(url).await
    }
}
