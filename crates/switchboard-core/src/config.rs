//! switchboard.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_BACKENDS_PATH: &str = "/v0/backends";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Address the dashboard HTTP server binds to.
    pub listen: SocketAddr,
    pub poll_interval_ms: u64,
    pub upstream: UpstreamConfig,
    pub page: PageConfig,
}

/// Where the proxy API lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// `host:port` of the proxy API.
    pub address: String,
    pub path: String,
    pub timeout_ms: u64,
}

/// Static page content: header text, proxy label and asset lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    /// Header brand text next to the logo.
    pub brand: String,
    pub title: String,
    pub proxy_name: String,
    pub proxy_address: String,
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
    pub body_class: String,
    /// Directory of static UI files (stylesheets, logo) served at `/`.
    pub static_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            upstream: UpstreamConfig::default(),
            page: PageConfig::default(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:9200".to_string(),
            path: DEFAULT_BACKENDS_PATH.to_string(),
            timeout_ms: 5000,
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            brand: "Pivotal Switchboard".to_string(),
            title: "CloudyApp".to_string(),
            proxy_name: "Proxy0".to_string(),
            proxy_address: "0.0.0.16".to_string(),
            stylesheets: vec![
                "pivotal-ui.min.css".to_string(),
                "application.css".to_string(),
            ],
            scripts: vec!["application.js".to_string()],
            body_class: "bg-neutral-9".to_string(),
            static_dir: None,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub listen: Option<SocketAddr>,
    pub upstream: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub static_dir: Option<PathBuf>,
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Layer CLI values over this config and re-validate.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> ConfigResult<Self> {
        if let Some(listen) = overrides.listen {
            self.listen = listen;
        }
        if let Some(upstream) = overrides.upstream {
            self.upstream.address = upstream;
        }
        if let Some(ms) = overrides.poll_interval_ms {
            self.poll_interval_ms = ms;
        }
        if let Some(dir) = overrides.static_dir {
            self.page.static_dir = Some(dir);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.upstream.address.trim().is_empty() {
            return Err(ConfigError::Invalid("upstream.address is empty".to_string()));
        }
        if !self.upstream.path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "upstream.path must start with '/': {}",
                self.upstream.path
            )));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
