// Application configuration.
// Loads the JSON config file and layers environment and CLI overrides on top.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TileError};
use crate::paths;
use crate::registry::TabRegistry;
use crate::remote::DEFAULT_BASE_URL;
use crate::state::Item;

/// Settings read from `config.json`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Simulated latency for tabs without an endpoint.
    pub unknown_tab_delay_ms: u64,
    /// Fallback filter when RUST_LOG is unset.
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    /// Startup visibility per tab id.
    pub tab_visibility: BTreeMap<String, bool>,
    /// Replaces the built-in items when set.
    pub items: Option<Vec<Item>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            unknown_tab_delay_ms: 800,
            log_level: "info".to_string(),
            log_file: None,
            tab_visibility: BTreeMap::new(),
            items: None,
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load from an explicit path, or from the default location if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match paths::config_path() {
                Some(default) if default.exists() => Self::from_file(&default),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| TileError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| TileError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(base_url) = &overrides.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(log_file) = &overrides.log_file {
            self.log_file = Some(log_file.clone());
        }
    }

    /// Reject settings the app cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(TileError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(TileError::Config("timeout_secs must be positive".to_string()));
        }
        if let Some(items) = &self.items {
            let mut seen = HashSet::new();
            for item in items {
                if item.id.trim().is_empty() {
                    return Err(TileError::Config("item id must not be empty".to_string()));
                }
                if !seen.insert(item.id.as_str()) {
                    return Err(TileError::Config(format!("duplicate item id '{}'", item.id)));
                }
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn unknown_tab_delay(&self) -> Duration {
        Duration::from_millis(self.unknown_tab_delay_ms)
    }

    /// Configured items, or the built-in samples.
    pub fn items(&self) -> Vec<Item> {
        self.items.clone().unwrap_or_else(Item::samples)
    }

    /// Default registry with startup visibility applied.
    pub fn registry(&self) -> TabRegistry {
        let mut registry = TabRegistry::default();
        for (tab_id, visible) in &self.tab_visibility {
            if !registry.set_visibility(tab_id, *visible) {
                warn!(tab = %tab_id, "ignoring visibility for unknown tab");
            }
        }
        registry
    }

    /// Log file location: configured, else the cache directory.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(paths::log_path)
    }
}
