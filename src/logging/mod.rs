//! Diagnostic logging to disk.
//!
//! The terminal belongs to the UI, so `tracing` output goes to a daily log
//! file named `stylesmith_<date>.log` in the configured log directory
//! (default: `~/.local/share/stylesmith/logs/`). `RUST_LOG` overrides the
//! configured level.

use crate::config::{expand_home, LoggingConfig};
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Log file for `date` inside the configured directory.
pub fn log_file_path(config: &LoggingConfig, date: NaiveDate) -> PathBuf {
    expand_home(&config.log_dir).join(format!("stylesmith_{}.log", date.format("%Y-%m-%d")))
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Returns the log file path, or `None` when
/// logging is disabled.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    if !config.enabled {
        return Ok(None);
    }

    let path = log_file_path(config, chrono::Local::now().date_naive());
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(env_filter(config))
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_named_by_date() {
        let config = LoggingConfig {
            enabled: true,
            log_dir: "/var/log/stylesmith".into(),
            level: "debug".into(),
        };
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            log_file_path(&config, date),
            PathBuf::from("/var/log/stylesmith/stylesmith_2024-03-09.log")
        );
    }

    #[test]
    fn disabled_logging_installs_nothing() {
        let config = LoggingConfig {
            enabled: false,
            ..LoggingConfig::default()
        };
        assert_eq!(init_logging(&config).unwrap(), None);
    }
}
