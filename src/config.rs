use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};

use crate::ai::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const APP_DIR: &str = "lailpuriya";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Adopt a captured API key and write this config to `path`.
    ///
    /// An existing file that does not parse is left untouched; the key is
    /// still kept in memory for the session.
    pub fn save_api_key_to(&mut self, path: &Path, key: &str) -> Result<()> {
        self.gemini_api_key = Some(key.trim().to_string());

        if path.exists() {
            Self::load_from(path)
                .with_context(|| format!("not overwriting unreadable config {}", path.display()))?;
        }
        self.save_to(path)
    }

    /// API key from `GEMINI_API_KEY`, then `API_KEY`, then the config file.
    pub fn api_key(&self) -> Option<String> {
        env_non_empty("GEMINI_API_KEY")
            .or_else(|| env_non_empty("API_KEY"))
            .or_else(|| self.gemini_api_key.clone().filter(|k| !k.trim().is_empty()))
    }

    /// Where the active key came from: "env", "config", or None
    pub fn key_source(&self) -> Option<&'static str> {
        if env_non_empty("GEMINI_API_KEY").is_some() || env_non_empty("API_KEY").is_some() {
            Some("env")
        } else if self.gemini_api_key.as_deref().is_some_and(|k| !k.trim().is_empty()) {
            Some("config")
        } else {
            None
        }
    }

    pub fn model(&self) -> String {
        env_non_empty("LAILPURIYA_MODEL")
            .or_else(|| self.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn log_level(&self) -> String {
        env_non_empty("LAILPURIYA_LOG")
            .or_else(|| self.log_level.clone())
            .unwrap_or_else(|| "info".to_string())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join(APP_DIR))
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
