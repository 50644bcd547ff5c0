//! User preferences persisted across sessions.
//!
//! Kept apart from `config.toml` because the editor writes it while running.
//! Reads and writes are synchronous so a changed value is on disk before the
//! call returns.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// `<config_dir>/stylesmith/settings.toml`.
    pub fn default_path() -> PathBuf {
        super::config_dir().join("settings.toml")
    }

    /// Open the settings file at `path`; a missing file means empty settings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse settings file {}", path.display()))?
        } else {
            Settings::default()
        };
        Ok(Self { path, settings })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn access_token(&self) -> Option<&str> {
        self.settings.access_token.as_deref()
    }

    /// Update the access token and write the settings file.
    ///
    /// The in-memory value is updated even when writing fails.
    pub fn set_access_token(&mut self, token: Option<String>) -> Result<()> {
        self.settings.access_token = token;
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let contents =
            toml::to_string_pretty(&self.settings).with_context(|| "Failed to serialize settings")?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let mut store = SettingsStore::open(&path).unwrap();
        assert_eq!(store.access_token(), None);
        store.set_access_token(Some("tok123".into())).unwrap();
        assert_eq!(store.access_token(), Some("tok123"));

        let reopened = SettingsStore::open(&path).unwrap();
        assert_eq!(reopened.access_token(), Some("tok123"));
    }

    #[test]
    fn clearing_token_removes_it_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let mut store = SettingsStore::open(&path).unwrap();
        store.set_access_token(Some("tok".into())).unwrap();
        store.set_access_token(None).unwrap();

        assert!(!std::fs::read_to_string(&path).unwrap().contains("access_token"));
        assert_eq!(SettingsStore::open(&path).unwrap().access_token(), None);
    }

    #[test]
    fn write_failure_still_updates_memory() {
        let dir = tempfile::tempdir().unwrap();
        // The parent "directory" is a file, so the write must fail
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let mut store = SettingsStore::open(blocker.join("settings.toml")).unwrap();
        assert!(store.set_access_token(Some("tok".into())).is_err());
        assert_eq!(store.access_token(), Some("tok"));
    }
}
