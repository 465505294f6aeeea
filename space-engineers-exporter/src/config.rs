use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::LogFormat;

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Command line flags. Anything given here overrides the config file.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "space-engineers-exporter",
    version,
    about = "Prometheus exporter for Space Engineers dedicated servers"
)]
pub struct Args {
    /// Path of a TOML config file (config.toml is used when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// URL of the remote API
    #[arg(long = "remote-api.url")]
    pub remote_api_url: Option<String>,

    /// The secret key used to communicate with the remote API
    #[arg(long = "remote-api.key", env = "SE_REMOTE_API_KEY", hide_env_values = true)]
    pub remote_api_key: Option<String>,

    /// Path of the file containing the remote API secret key
    #[arg(long = "remote-api.key-file", env = "SE_REMOTE_API_KEY_FILE")]
    pub remote_api_key_file: Option<PathBuf>,

    /// Verify the remote API SSL certificate
    #[arg(long = "remote-api.ssl-verify", action = ArgAction::Set)]
    pub remote_api_ssl_verify: Option<bool>,

    /// Address to listen on, e.g. 0.0.0.0:9815
    #[arg(long = "web.listen-address")]
    pub listen_address: Option<String>,

    /// Path under which to expose metrics
    #[arg(long = "web.telemetry-path")]
    pub metrics_path: Option<String>,

    /// One of trace, debug, info, warn, error
    #[arg(long = "log.level")]
    pub log_level: Option<String>,

    /// Output format of log messages
    #[arg(long = "log.format", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Directory for daily rolling log files; empty logs to the console only
    #[arg(long = "log.dir")]
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,

    #[serde(default)]
    pub key: Option<String>,

    /// Takes precedence over `key`
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    #[serde(default = "default_ssl_verify")]
    pub ssl_verify: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Empty disables file logging
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default)]
    pub remote_api: RemoteApiConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9815
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_api_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_ssl_verify() -> bool {
    true
}

impl Default for RemoteApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            key: None,
            key_file: None,
            ssl_verify: default_ssl_verify(),
        }
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            metrics_path: default_metrics_path(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            log_dir: default_log_dir(),
            remote_api: RemoteApiConfig::default(),
        }
    }
}

impl ExporterConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;
        let config: ExporterConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;
        Ok(config)
    }

    /// Defaults, then the config file, then command line and environment.
    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        config.apply_args(args)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_args(&mut self, args: &Args) -> anyhow::Result<()> {
        if let Some(url) = &args.remote_api_url {
            self.remote_api.url = url.clone();
        }
        if let Some(key) = &args.remote_api_key {
            self.remote_api.key = Some(key.clone());
        }
        if let Some(key_file) = &args.remote_api_key_file {
            self.remote_api.key_file = Some(key_file.clone());
        }
        if let Some(verify) = args.remote_api_ssl_verify {
            self.remote_api.ssl_verify = verify;
        }
        if let Some(address) = &args.listen_address {
            let (host, port) = address
                .rsplit_once(':')
                .ok_or_else(|| anyhow::anyhow!("Invalid listen address '{}'", address))?;
            self.host = if host.is_empty() { default_host() } else { host.to_string() };
            self.port = port.parse().map_err(|e| {
                anyhow::anyhow!("Invalid port in listen address '{}': {}", address, e)
            })?;
        }
        if let Some(path) = &args.metrics_path {
            self.metrics_path = path.clone();
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
        if let Some(format) = args.log_format {
            self.log_format = format;
        }
        if let Some(dir) = &args.log_dir {
            self.log_dir = dir.clone();
        }
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !self.metrics_path.starts_with('/') {
            anyhow::bail!("Metrics path must start with '/': {}", self.metrics_path);
        }
        if self.metrics_path == "/health" {
            anyhow::bail!("Metrics path cannot be /health");
        }
        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Where rolling log files go, or `None` to log to the console only.
    pub fn log_dir(&self) -> Option<&Path> {
        let dir = self.log_dir.trim();
        (!dir.is_empty()).then(|| Path::new(dir))
    }
}
