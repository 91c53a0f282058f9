// src/config/models.rs
use crate::endpoint::Endpoint;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("at least one endpoint must be configured")]
    NoEndpoints,

    #[error("endpoint {0:?} is configured more than once")]
    DuplicateEndpoint(String),

    #[error("endpoint names must not be empty")]
    EmptyEndpoint,

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("invalid webhook URL {url:?}: {source}")]
    InvalidWebhook {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("metrics path must start with '/', got {0:?}")]
    InvalidMetricsPath(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoints: Vec<Endpoint>,
    pub probe_timeout_ms: u64,
    pub interval_ms: u64,
    pub max_tries: u32,
    /// Empty disables delivery.
    pub webhook_url: String,
    pub notify_timeout_ms: u64,
    pub debug: bool,
    pub probe: ProbeConfig,
    pub metrics: MetricsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: ["google.com", "facebook.com", "twitter.com"]
                .into_iter()
                .map(Endpoint::from)
                .collect(),
            probe_timeout_ms: 300,
            interval_ms: 500,
            max_tries: 4,
            webhook_url: String::new(),
            notify_timeout_ms: 5000,
            debug: false,
            probe: ProbeConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Config {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_millis(self.notify_timeout_ms)
    }

    /// Parsed webhook, `None` when notifications are disabled.
    pub fn webhook(&self) -> Result<Option<Url>, ConfigError> {
        let raw = self.webhook_url.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        Url::parse(raw)
            .map(Some)
            .map_err(|source| ConfigError::InvalidWebhook {
                url: raw.to_string(),
                source,
            })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }

        let mut seen = HashSet::new();
        for endpoint in &self.endpoints {
            if endpoint.as_str().trim().is_empty() {
                return Err(ConfigError::EmptyEndpoint);
            }
            if !seen.insert(endpoint.as_str()) {
                return Err(ConfigError::DuplicateEndpoint(endpoint.to_string()));
            }
        }

        if self.probe_timeout_ms == 0 {
            return Err(ConfigError::Zero("probe_timeout_ms"));
        }
        if self.interval_ms == 0 {
            return Err(ConfigError::Zero("interval_ms"));
        }
        if self.max_tries == 0 {
            return Err(ConfigError::Zero("max_tries"));
        }
        if self.notify_timeout_ms == 0 {
            return Err(ConfigError::Zero("notify_timeout_ms"));
        }
        if self.probe.kind == ProbeKind::Tcp && self.probe.port == 0 {
            return Err(ConfigError::Zero("probe.port"));
        }

        self.webhook()?;

        if !self.metrics.path.starts_with('/') {
            return Err(ConfigError::InvalidMetricsPath(self.metrics.path.clone()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    Icmp,
    Tcp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub kind: ProbeKind,
    /// Only used by TCP probes.
    pub port: u16,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            kind: ProbeKind::Icmp,
            port: 443,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub port: u16,
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 9090,
            path: "/metrics".to_string(),
        }
    }
}
