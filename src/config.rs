//! Configuration module for Stevedore
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (STEVEDORE_*)
//! 3. Project config (stevedore.toml)
//! 4. User config (~/.config/stevedore/config.toml)
//! 5. Built-in defaults (lowest priority)
//!
//! Deploy credentials are deliberately NOT part of the config file format;
//! they resolve from `STEVEDORE_DEPLOY_USERNAME` / `STEVEDORE_DEPLOY_PASSWORD`
//! or CLI flags only.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::deploy::DEFAULT_MAX_RETRIES;
use crate::error::{StevedoreError, StevedoreResult};
use crate::models::ResourceMapping;

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "stevedore.toml";

/// Target application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Kudu-style SCM endpoint of the target site
    #[serde(default)]
    pub url: Option<String>,
}

/// Deployment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Upper bound on attempts per deploy call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Declared resource mappings, staged and published in order
    #[serde(default)]
    pub resources: Vec<ResourceMapping>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            resources: Vec::new(),
        }
    }
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub deploy: DeployConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> StevedoreResult<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| StevedoreError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from project config, user config, or defaults
    pub fn load_or_default(project_root: Option<&Path>) -> Self {
        // Try project config first
        if let Some(root) = project_root {
            let project_config = root.join(CONFIG_FILE);
            if project_config.exists() {
                if let Ok(config) = Self::load(&project_config) {
                    return config.with_env_overrides();
                }
            }
        }

        // Try user config
        if let Some(user_config_dir) = dirs_config_dir() {
            let user_config = user_config_dir.join("stevedore/config.toml");
            if user_config.exists() {
                if let Ok(config) = Self::load(&user_config) {
                    return config.with_env_overrides();
                }
            }
        }

        // Return defaults with env overrides
        Self::default().with_env_overrides()
    }

    /// Apply environment variable overrides (STEVEDORE_* prefix)
    pub fn with_env_overrides(mut self) -> Self {
        // STEVEDORE_APP_URL
        if let Ok(url) = std::env::var("STEVEDORE_APP_URL") {
            if !url.is_empty() {
                self.app.url = Some(url);
            }
        }

        // STEVEDORE_MAX_RETRIES
        if let Ok(retries) = std::env::var("STEVEDORE_MAX_RETRIES") {
            if let Ok(parsed) = retries.parse::<u32>() {
                self.deploy.max_retries = parsed;
            }
        }

        self
    }
}

/// HTTP basic-auth credentials for the deploy endpoint
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Resolve credentials from the environment, if both halves are present
    pub fn from_env() -> Option<Self> {
        let username = std::env::var("STEVEDORE_DEPLOY_USERNAME").ok()?;
        let password = std::env::var("STEVEDORE_DEPLOY_PASSWORD").ok()?;
        if username.is_empty() {
            return None;
        }
        Some(Self { username, password })
    }
}

/// Get XDG config directory
fn dirs_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
}
