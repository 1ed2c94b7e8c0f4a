// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::ParableError;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub sessions: SessionsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding icons, the service worker, and other flat assets.
    pub static_dir: String,
    /// PWA manifest file, relative to the working directory.
    pub manifest: String,
    /// Extra origins allowed to call the API cross-site. Empty serves
    /// same-origin clients only.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            static_dir: "static".into(),
            manifest: "manifest.webmanifest".into(),
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model: String,
    pub base_url: String,
    /// Environment variable the API key is read from.
    pub api_key_env: String,
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-mini".into(),
            base_url: "https://api.openai.com/v1".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Cap on stored history entries (user + assistant turns).
    pub max_history: usize,
    /// Drop sessions idle for this long. Unset keeps them for the process lifetime.
    pub idle_timeout_seconds: Option<u64>,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_history: 8,
            idle_timeout_seconds: None,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ParableError> {
        let max = self.sessions.max_history;
        if max == 0 || max % 2 != 0 {
            return Err(ParableError::Config(format!(
                "sessions.max_history must be a positive even number, got {max}"
            )));
        }
        if self.model.timeout_seconds == 0 {
            return Err(ParableError::Config(
                "model.timeout_seconds must be greater than zero".into(),
            ));
        }
        if self.sessions.idle_timeout_seconds == Some(0) {
            return Err(ParableError::Config(
                "sessions.idle_timeout_seconds must be greater than zero when set".into(),
            ));
        }
        for origin in &self.server.cors_origins {
            let scheme_ok = origin.starts_with("http://") || origin.starts_with("https://");
            if !scheme_ok || origin.ends_with('/') || !origin.is_ascii() {
                return Err(ParableError::Config(format!(
                    "server.cors_origins entry {origin:?} must look like \"https://host[:port]\""
                )));
            }
        }
        Ok(())
    }

    /// Address the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
