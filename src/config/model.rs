//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the application works out of the box.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::expand_home;
use crate::store::api::DEFAULT_API_URL;
use crate::store::{LocalStyleStore, StoreOptions};

/// Root application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where styles are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Try the style server before falling back to local storage.
    #[serde(default = "default_true")]
    pub prefer_api: bool,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Directory for the local store (default: `<data_dir>/stylesmith/styles`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles_dir: Option<String>,
    /// Style adopted after a reset. The built-in style is used when unset or
    /// unreachable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_style_url: Option<String>,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            prefer_api: true,
            api_url: default_api_url(),
            styles_dir: None,
            default_style_url: None,
            probe_timeout_secs: default_probe_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl StoreConfig {
    pub fn styles_dir(&self) -> PathBuf {
        match &self.styles_dir {
            Some(dir) => expand_home(dir),
            None => LocalStyleStore::default_dir(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn options(&self) -> StoreOptions {
        StoreOptions {
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
            request_timeout: self.request_timeout(),
            default_style_url: self.default_style_url.clone(),
        }
    }
}

/// Style download settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

impl ExportConfig {
    pub fn dir(&self) -> PathBuf {
        expand_home(&self.dir)
    }
}

/// UI appearance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    /// How long status notices stay on screen.
    #[serde(default = "default_notice_secs")]
    pub notice_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
            notice_secs: default_notice_secs(),
        }
    }
}

/// Diagnostic log file settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_dir: default_log_dir(),
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_probe_timeout() -> u64 {
    2
}
fn default_request_timeout() -> u64 {
    10
}
fn default_export_dir() -> String {
    ".".to_string()
}
fn default_timestamp_format() -> String {
    "%H:%M:%S".to_string()
}
fn default_notice_secs() -> u64 {
    5
}
fn default_log_dir() -> String {
    "~/.local/share/stylesmith/logs".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
