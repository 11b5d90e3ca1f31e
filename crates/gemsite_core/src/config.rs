//! Workspace configuration.
//!
//! # Responsibility
//! - Load `config.json` from the data directory with per-field defaults.
//! - Resolve the database and log locations under the data directory.
//!
//! # Invariants
//! - A missing or unparsable file never blocks startup; defaults apply.

use crate::repo::content_repo::DEFAULT_STORAGE_QUOTA_BYTES;
use crate::share::DEFAULT_SHARE_URL_LIMIT;
use crate::suggest::gemini::{DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL, DEFAULT_TIMEOUT_SECS};
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DB_FILE_NAME: &str = "gemsite.sqlite3";
const LOG_DIR_NAME: &str = "logs";
const APP_DIR_NAME: &str = "gemsite";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config io error: {err}"),
            Self::Json(err) => write!(f, "config json error: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Page the share links point at.
    #[serde(default = "default_page_url")]
    pub page_url: String,

    #[serde(default = "default_share_url_limit")]
    pub share_url_limit: usize,

    #[serde(default = "default_storage_quota_bytes")]
    pub storage_quota_bytes: usize,

    #[serde(default)]
    pub ai: AiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_ai_model")]
    pub model: String,

    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_log_level() -> String {
    crate::logging::default_log_level().to_string()
}

fn default_page_url() -> String {
    "http://localhost:3000/".to_string()
}

fn default_share_url_limit() -> usize {
    DEFAULT_SHARE_URL_LIMIT
}

fn default_storage_quota_bytes() -> usize {
    DEFAULT_STORAGE_QUOTA_BYTES
}

fn default_ai_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_ai_endpoint() -> String {
    DEFAULT_GEMINI_ENDPOINT.to_string()
}

fn default_ai_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: default_ai_model(),
            endpoint: default_ai_endpoint(),
            timeout_secs: default_ai_timeout_secs(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            page_url: default_page_url(),
            share_url_limit: default_share_url_limit(),
            storage_quota_bytes: default_storage_quota_bytes(),
            ai: AiConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Loads `config.json` from `data_dir`, or defaults.
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let path = data_dir.join(CONFIG_FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(err) => {
                    warn!(
                        "event=config_load module=config status=error path={} error={err}",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save_to_dir(&self, data_dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(data_dir)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(data_dir.join(CONFIG_FILE_NAME), json)?;
        Ok(())
    }
}

/// Platform data directory for the site, e.g. `~/.local/share/gemsite`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DB_FILE_NAME)
}

pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_DIR_NAME)
}
