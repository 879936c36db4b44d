use crate::error::{EdgeClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use xray_edge_common::endpoint::DEFAULT_BASE_URL;
use xray_edge_common::pagination::DEFAULT_MAX_VISIBLE;

/// Environment variable that overrides the configured API base address.
pub const BASE_URL_ENV: &str = "XRAY_EDGE_API_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub max_visible_pages: usize,
    pub download_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_seconds: 120,
            max_visible_pages: DEFAULT_MAX_VISIBLE,
            download_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| EdgeClientError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("xray-edge").join("config.json"))
    }

    /// Base address to use: CLI flag, then environment, then the file.
    pub fn resolve_base_url(&self, cli_override: Option<&str>) -> String {
        if let Some(url) = cli_override.filter(|u| !u.trim().is_empty()) {
            return url.trim().to_string();
        }
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => self.base_url.clone(),
        }
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(EdgeClientError::Config(format!(
                "base URL must start with http:// or https://: {}",
                url
            )));
        }
        self.base_url = url.trim_end_matches('/').to_string();
        self.save()
    }

    pub fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(EdgeClientError::Config("timeout must be at least 1 second".into()));
        }
        self.timeout_seconds = seconds;
        self.save()
    }
}
