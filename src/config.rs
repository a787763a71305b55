use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils;

const DEFAULT_API_URL: &str = "http://localhost:3001";
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub page_size: u32,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("VIVE_API_URL").filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(secs) = lookup("VIVE_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            self.request_timeout_secs = secs;
        }
        if let Some(size) = lookup("VIVE_PAGE_SIZE")
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|size| *size > 0)
        {
            self.page_size = size;
        }
        if let Some(level) = lookup("VIVE_LOG").filter(|level| !level.trim().is_empty()) {
            self.log_level = level;
        }
        self
    }
}

pub struct ConfigStore {
    path: PathBuf,
    data: Mutex<AppConfig>,
}

impl ConfigStore {
    pub fn load() -> Self {
        Self::load_from(utils::config_path())
    }

    /// Falls back to defaults when the file is missing or unreadable.
    pub fn load_from(path: PathBuf) -> Self {
        let data = match read_config(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), "using default config: {err:#}");
                AppConfig::default()
            }
        };
        Self {
            path,
            data: Mutex::new(data.with_env()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> AppConfig {
        match self.data.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update<F>(&self, transform: F) -> Result<AppConfig>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut guard = self
            .data
            .lock()
            .map_err(|_| anyhow!("config mutex poisoned"))?;
        transform(&mut guard);
        write_config(&self.path, &guard)?;
        Ok(guard.clone())
    }
}

fn read_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("unable to read config at {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("invalid config json at {}", path.display()))
}

fn write_config(path: &Path, config: &AppConfig) -> Result<()> {
    utils::ensure_parent(path)
        .with_context(|| format!("unable to create config dir for {}", path.display()))?;
    let contents = serde_json::to_string_pretty(config).context("config serialization")?;
    fs::write(path, contents).with_context(|| format!("unable to write {}", path.display()))
}
