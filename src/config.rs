use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};
use tracing::debug;

use crate::providers::currency_api;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RatesProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub rates: Option<RatesProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            rates: Some(RatesProviderConfig {
                base_url: currency_api::DEFAULT_BASE_URL.to_string(),
            }),
        }
    }
}

/// User settings: the currency to convert into and per-domain overrides
/// for ambiguous symbols (lowercase hostname -> currency code).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_target_currency")]
    pub target_currency: String,
    #[serde(default)]
    pub domain_mappings: HashMap<String, String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

fn default_target_currency() -> String {
    "USD".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            target_currency: default_target_currency(),
            domain_mappings: HashMap::new(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Like [`load`](Self::load), but a missing config file yields the
    /// defaults instead of an error. A present-but-broken file still fails.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_cache_path() -> Result<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        Ok(proj_dirs.cache_dir().join("rates"))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("io", "curman", "curman")
            .context("Could not determine project directories")
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        // Hostname keys are matched lowercase
        config.domain_mappings = config
            .domain_mappings
            .into_iter()
            .map(|(domain, code)| (domain.to_lowercase(), code))
            .collect();

        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn rates_base_url(&self) -> &str {
        self.providers
            .rates
            .as_ref()
            .map_or(currency_api::DEFAULT_BASE_URL, |p| &p.base_url)
    }
}
