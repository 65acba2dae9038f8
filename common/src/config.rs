//! # Run configuration
//!
//! A single immutable value built once at startup and passed by reference to
//! every component. Nothing in the workspace reads the environment after the
//! binary has produced a [`Config`].

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;
use crate::network::subnet::TargetNetwork;
use crate::target::{DEFAULT_EXPORTER_JOB, DEFAULT_EXPORTER_PORT};

pub const DEFAULT_HOST: &str = "https://your-proxmox-host:8006";
pub const DEFAULT_USER: &str = "root@pam";
pub const DEFAULT_TOKEN_ID: &str = "metrics";
pub const DEFAULT_TOKEN_SECRET: &str = "your-secret-token";
pub const DEFAULT_OUTPUT_FILE: &str = "/etc/prometheus/proxmox_sd.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
pub struct Config {
    pub api: ApiConfig,
    /// Final location of the service discovery document.
    pub output: PathBuf,
    /// Only addresses inside this network become targets, when set.
    pub target_network: Option<TargetNetwork>,
    pub exporter: ExporterConfig,
}

/// Connection settings for the Proxmox management API.
#[derive(Debug)]
pub struct ApiConfig {
    host: String,
    pub token: ApiToken,
    pub verify_tls: bool,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(
        host: &str,
        token: ApiToken,
        verify_tls: bool,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let trimmed = host.trim();

        let (scheme, rest) = match trimmed.split_once("://") {
            Some((scheme @ ("http" | "https"), rest)) => (scheme, rest),
            _ => {
                return Err(ConfigError::InvalidHost {
                    value: trimmed.to_string(),
                    reason: "expected an http:// or https:// URL".to_string(),
                });
            }
        };

        // Only slashes after the authority go; the scheme separator stays intact.
        let host = format!("{scheme}://{}", rest.trim_end_matches('/'));

        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout(timeout));
        }

        Ok(Self {
            host,
            token,
            verify_tls,
            timeout,
        })
    }

    /// Base URL without a trailing slash, e.g. `https://pve.example:8006`.
    pub fn host(&self) -> &str {
        &self.host
    }
}

/// A Proxmox API token (`<user>!<token-id>` plus its secret).
pub struct ApiToken {
    pub user: String,
    pub id: String,
    secret: SecretString,
}

impl ApiToken {
    pub fn new(user: impl Into<String>, id: impl Into<String>, secret: SecretString) -> Self {
        Self {
            user: user.into(),
            id: id.into(),
            secret,
        }
    }

    /// Value of the `Authorization` header. Contains the secret in clear text.
    pub fn authorization(&self) -> String {
        format!(
            "PVEAPIToken={}!{}={}",
            self.user,
            self.id,
            self.secret.expose_secret()
        )
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiToken")
            .field("user", &self.user)
            .field("id", &self.id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Port and job label written into every discovery target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
    pub port: u16,
    pub job: String,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_EXPORTER_PORT,
            job: DEFAULT_EXPORTER_JOB.to_string(),
        }
    }
}

/// TLS verification stays on only for the literal `true` (any case).
pub fn parse_verify_tls(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
