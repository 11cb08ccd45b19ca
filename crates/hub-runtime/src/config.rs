//! Runtime configuration: defaults plus environment overrides.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, warn};
use websub_hub::HubConfig;

pub const DEFAULT_TOPIC: &str = "oil-price";

/// Everything the executable needs to start a hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub host: String,
    pub port: u16,
    /// Topics registered at startup.
    pub topics: Vec<String>,
    pub hub: HubConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            topics: vec![DEFAULT_TOPIC.to_string()],
            hub: HubConfig::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load configuration from the process environment.
pub fn load_config() -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Apply `HUB_*` overrides from `lookup`. Unparsable values are ignored.
pub fn apply_overrides<F>(config: &mut RuntimeConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("HUB_HOST") {
        config.host = host;
    }
    override_parsed(&lookup, "HUB_PORT", &mut config.port);

    if let Some(raw) = lookup("HUB_TOPICS") {
        let topics: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
        if topics.is_empty() {
            warn!("HUB_TOPICS is empty, keeping default topics");
        } else {
            info!(count = topics.len(), "Loaded topics from environment");
            config.topics = topics;
        }
    }

    let hub = &mut config.hub;
    override_parsed(&lookup, "HUB_NOTIFY_INTERVAL_SECS", &mut hub.notify_interval_secs);
    override_parsed(&lookup, "HUB_SWEEP_INTERVAL_SECS", &mut hub.sweep_interval_secs);
    override_parsed(&lookup, "HUB_HTTP_TIMEOUT_SECS", &mut hub.http_timeout_secs);
    override_parsed(&lookup, "HUB_DEFAULT_LEASE_SECONDS", &mut hub.default_lease_seconds);
}

fn override_parsed<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => warn!(key, value = %raw, "Ignoring unparsable environment override"),
        }
    }
}
