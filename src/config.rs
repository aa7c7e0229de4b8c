//! Configuration Management
//!
//! Handles persistent configuration storage for teda.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server used when nothing else is configured
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

/// Keys the app may start on; everything else needs a parent record
const STARTABLE_RESOURCES: &[&str] = &["audit-rules", "audit-hosts", "jobs"];

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server base URL
    #[serde(default)]
    pub server: Option<String>,
    /// Last viewed collection
    #[serde(default)]
    pub last_resource: Option<String>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("teda").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Get effective server (CLI flag beats this; here env > config > default)
    pub fn effective_server(&self) -> String {
        std::env::var("TEDA_SERVER")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.server.clone())
            .unwrap_or_else(|| DEFAULT_SERVER.to_string())
    }

    /// Collection to open on startup
    pub fn initial_resource(&self) -> &str {
        self.last_resource
            .as_deref()
            .filter(|key| STARTABLE_RESOURCES.contains(key))
            .unwrap_or("audit-rules")
    }

    /// Set last viewed collection and save
    pub fn set_last_resource(&mut self, key: &str) -> Result<()> {
        if self.last_resource.as_deref() == Some(key) {
            return Ok(());
        }
        self.last_resource = Some(key.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_resource_defaults_to_audit_rules() {
        let config = Config::default();
        assert_eq!(config.initial_resource(), "audit-rules");
    }

    #[test]
    fn initial_resource_rejects_sub_collections() {
        let config = Config {
            server: None,
            last_resource: Some("audit-rule-jobs".to_string()),
        };
        assert_eq!(config.initial_resource(), "audit-rules");
    }

    #[test]
    fn initial_resource_keeps_startable_keys() {
        let config = Config {
            server: None,
            last_resource: Some("jobs".to_string()),
        };
        assert_eq!(config.initial_resource(), "jobs");
    }
}
