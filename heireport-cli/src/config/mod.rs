//! Configuration management
//!
//! Settings live in `<config_dir>/heireport/config.toml`; the session token
//! is stored separately in `credentials.toml`. Environment variables
//! override both:
//! - `HEIREPORT_CONFIG_DIR`: configuration directory
//! - `HEIREPORT_API_URL`: API base URL
//! - `HEIREPORT_TOKEN`: bearer token

mod credentials;

pub use credentials::Credentials;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::excel::upload::MAX_UPLOAD_BYTES;
use crate::submit::{DEFAULT_BATCH_SIZE, SubmitMode};

pub const ENV_CONFIG_DIR: &str = "HEIREPORT_CONFIG_DIR";
pub const ENV_API_URL: &str = "HEIREPORT_API_URL";
pub const ENV_TOKEN: &str = "HEIREPORT_TOKEN";

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiSettings,
    pub upload: UploadSettings,

    /// Directory the configuration was loaded from
    #[serde(skip)]
    dir: PathBuf,

    /// Token taken from the environment, if any
    #[serde(skip)]
    env_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub max_file_bytes: u64,
    pub mode: SubmitMode,
    pub batch_size: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_file_bytes: MAX_UPLOAD_BYTES,
            mode: SubmitMode::Sequential,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            upload: UploadSettings::default(),
            dir: default_config_dir(),
            env_token: None,
        }
    }
}

/// `$HEIREPORT_CONFIG_DIR`, else the platform config dir (e.g. ~/.config/heireport)
pub fn default_config_dir() -> PathBuf {
    match std::env::var(ENV_CONFIG_DIR) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("heireport"),
    }
}

impl Config {
    /// Load from the default directory and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&default_config_dir())?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load `config.toml` from `dir`; a missing file yields defaults
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str::<Config>(&content)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?
        } else {
            debug!("No configuration at {}, using defaults", path.display());
            Config::default()
        };
        config.dir = dir.to_path_buf();
        Ok(config)
    }

    /// Apply environment overrides through `var`
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            debug!("API URL overridden by {}", ENV_API_URL);
            self.api.base_url = url.trim().to_string();
        }
        self.env_token = var(ENV_TOKEN).filter(|v| !v.trim().is_empty());
    }

    pub fn save(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stored credentials, if logged in
    pub fn credentials(&self) -> Option<Credentials> {
        match Credentials::load(&self.dir) {
            Ok(credentials) => credentials,
            Err(e) => {
                log::warn!("Ignoring unreadable credentials: {:#}", e);
                None
            }
        }
    }

    /// Bearer token: `HEIREPORT_TOKEN` first, then stored credentials
    pub fn token(&self) -> Option<String> {
        self.env_token
            .clone()
            .or_else(|| self.credentials().map(|c| c.token))
    }

    /// Where the token comes from, for `auth status`
    pub fn token_source(&self) -> Option<&'static str> {
        if self.env_token.is_some() {
            Some(ENV_TOKEN)
        } else if self.credentials().is_some() {
            Some("credentials file")
        } else {
            None
        }
    }
}
