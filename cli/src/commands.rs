pub mod generate;
pub mod print;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use secrecy::SecretString;

use pvesd_common::config::{
    ApiConfig, ApiToken, Config, DEFAULT_HOST, DEFAULT_OUTPUT_FILE, DEFAULT_TIMEOUT_SECS,
    DEFAULT_TOKEN_ID, DEFAULT_TOKEN_SECRET, DEFAULT_USER, ExporterConfig, parse_verify_tls,
};
use pvesd_common::error::ConfigError;
use pvesd_common::network::subnet::TargetNetwork;
use pvesd_common::target::{DEFAULT_EXPORTER_JOB, DEFAULT_EXPORTER_PORT};

#[derive(Parser)]
#[command(name = "pvesd", version)]
#[command(about = "Prometheus file-based service discovery for Proxmox VE virtual machines.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub settings: Settings,

    /// Lower console verbosity (-q warnings, -qq errors only)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand, Clone, Copy, Default)]
pub enum Commands {
    /// Discover targets and atomically replace the output file (default)
    #[default]
    #[command(alias = "g")]
    Generate,
    /// Discover targets and print the document to stdout
    #[command(alias = "p")]
    Print,
}

#[derive(Args)]
pub struct Settings {
    /// Proxmox API base URL
    #[arg(long, env = "PROXMOX_HOST", default_value = DEFAULT_HOST, global = true)]
    pub host: String,

    /// User owning the API token
    #[arg(long, env = "PROXMOX_USER", default_value = DEFAULT_USER, global = true)]
    pub user: String,

    /// API token identifier
    #[arg(long, env = "PROXMOX_TOKEN_ID", default_value = DEFAULT_TOKEN_ID, global = true)]
    pub token_id: String,

    /// API token secret
    #[arg(
        long,
        env = "PROXMOX_TOKEN_SECRET",
        default_value = DEFAULT_TOKEN_SECRET,
        hide_env_values = true,
        hide_default_value = true,
        global = true
    )]
    pub token_secret: String,

    /// Verify the API certificate; anything but "true" disables verification
    #[arg(long, env = "PROXMOX_VERIFY_SSL", default_value = "true", global = true)]
    pub verify_ssl: String,

    /// Where the service discovery file is written
    #[arg(short, long, env = "PROXMOX_SD_FILE", default_value = DEFAULT_OUTPUT_FILE, global = true)]
    pub output: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout: u64,

    /// Only emit addresses inside this IPv4 network (CIDR)
    #[arg(long, env = "TARGET_NETWORK", global = true)]
    pub target_network: Option<String>,

    /// Port appended to every discovered address
    #[arg(long, env = "EXPORTER_PORT", default_value_t = DEFAULT_EXPORTER_PORT, global = true)]
    pub port: u16,

    /// Value of the `job` label
    #[arg(long, env = "EXPORTER_JOB", default_value = DEFAULT_EXPORTER_JOB, global = true)]
    pub job: String,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Settings {
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let token = ApiToken::new(
            self.user.as_str(),
            self.token_id.as_str(),
            SecretString::from(self.token_secret.clone()),
        );

        let api = ApiConfig::new(
            &self.host,
            token,
            parse_verify_tls(&self.verify_ssl),
            Duration::from_secs(self.timeout),
        )?;

        Ok(Config {
            api,
            output: self.output.clone(),
            target_network: TargetNetwork::parse_optional(self.target_network.as_deref())?,
            exporter: ExporterConfig {
                port: self.port,
                job: self.job.clone(),
            },
        })
    }
}
