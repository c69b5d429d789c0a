//! Settings schema for `config.toml`.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::registry::{DEFAULT_RAW_CONTENT_URL, DEFAULT_REGISTRY_URL};
use crate::search::DEFAULT_DEBOUNCE;

/// Root settings file.
///
/// Every section is optional; missing keys fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub registry: RegistrySettings,
    pub search: SearchSettings,
    pub cli: CliSettings,
    /// Owner → company display name, used by the company facet
    pub companies: BTreeMap<String, String>,
}

/// Registry endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Registry base URL (search API and skill pages)
    pub base_url: String,
    /// Base URL for raw README content
    pub raw_content_url: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_URL.to_string(),
            raw_content_url: DEFAULT_RAW_CONTENT_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl RegistrySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Debounced search settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub debounce_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// How the external skills CLI is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    /// Program to run
    pub program: String,
    /// Arguments placed before every subcommand
    pub args: Vec<String>,
    /// Per-invocation timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            program: "npx".to_string(),
            args: vec!["-y".to_string(), "skills".to_string()],
            timeout_secs: 120,
        }
    }
}

impl CliSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
