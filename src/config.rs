//! Service configuration
//!
//! Layered loading: built-in defaults, then `config/snapsrv.yaml`,
//! then `SNAPSRV_`-prefixed environment variables.

use crate::pagination::PageLimits;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/snapsrv.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "snapsrv".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8084,
        }
    }
}

/// Snapshot cache bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Maximum cached snapshots; oldest evicted first
    pub capacity: usize,
    /// Snapshot lifetime in seconds
    pub ttl_secs: u64,
    /// How often the sweeper drops expired snapshots
    pub sweep_interval_secs: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            capacity: crate::snapshot::DEFAULT_CAPACITY,
            ttl_secs: crate::snapshot::DEFAULT_TTL_SECS,
            sweep_interval_secs: 60,
        }
    }
}

impl SnapshotConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub snapshots: SnapshotConfig,
    #[serde(default)]
    pub pagination: PageLimits,
    /// YAML file mapping alarm type to priority label; empty map if unset
    #[serde(default)]
    pub priority_map: Option<PathBuf>,
}

impl Config {
    /// Load with the default config file path
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("SNAPSRV_").split("__"))
            .extract()
            .context("failed to load configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.service.name, "snapsrv");
        assert_eq!(config.service.port, 8084);
        assert_eq!(config.snapshots.capacity, 64);
        assert_eq!(config.pagination.default_limit, 100);
        assert_eq!(config.pagination.max_limit, 1000);
        assert!(config.priority_map.is_none());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = Config::load_from("/nonexistent/snapsrv.yaml").unwrap();
        assert_eq!(config.service.port, 8084);
        assert_eq!(config.snapshots.ttl_secs, 600);
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        use std::io::Write;
        writeln!(
            file,
            "service:\n  name: snapsrv\n  host: 127.0.0.1\n  port: 9090\nsnapshots:\n  capacity: 8\n  ttl_secs: 30\n  sweep_interval_secs: 5"
        )
        .unwrap();

        let config = Config::load_from(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.service.port, 9090);
        assert_eq!(config.snapshots.capacity, 8);
        assert_eq!(config.snapshots.ttl(), Duration::from_secs(30));
        // Sections absent from the file keep their defaults
        assert_eq!(config.pagination.default_limit, 100);
    }
}
