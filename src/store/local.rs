//! Directory-backed style store.
//!
//! Each style lives in `<styles_dir>/<id>.json`. A `latest_style` pointer file
//! holds the id of the most recently saved style.

use super::{StoreError, StoreKind, StyleStore};
use crate::export::sanitize::style_file_name;
use crate::style::{default_style, StyleDocument};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const LATEST_POINTER: &str = "latest_style";

pub struct LocalStyleStore {
    styles_dir: PathBuf,
}

impl LocalStyleStore {
    pub fn new(styles_dir: impl Into<PathBuf>) -> Self {
        Self {
            styles_dir: styles_dir.into(),
        }
    }

    /// `<data_dir>/stylesmith/styles`.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stylesmith")
            .join("styles")
    }

    pub fn styles_dir(&self) -> &Path {
        &self.styles_dir
    }

    fn style_path(&self, id: &str) -> PathBuf {
        self.styles_dir.join(style_file_name(id))
    }

    fn pointer_path(&self) -> PathBuf {
        self.styles_dir.join(LATEST_POINTER)
    }

    /// Id recorded by the last save, if any.
    async fn latest_id(&self) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.pointer_path()).await {
            Ok(id) => {
                let id = id.trim();
                Ok((!id.is_empty()).then(|| id.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl StyleStore for LocalStyleStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Local
    }

    async fn supported(&self) -> bool {
        tokio::fs::create_dir_all(&self.styles_dir).await.is_ok()
    }

    async fn latest_style(&self) -> Result<StyleDocument, StoreError> {
        let Some(id) = self.latest_id().await? else {
            debug!("no saved style, using default");
            return Ok(default_style());
        };

        let path = self.style_path(&id);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("latest style {} is missing, using default", id);
                return Ok(default_style());
            }
            Err(e) => return Err(e.into()),
        };

        StyleDocument::from_json_str(&contents)
            .map_err(|e| StoreError::InvalidData(format!("{}: {}", path.display(), e)))
    }

    async fn save(&self, style: StyleDocument) -> Result<StyleDocument, StoreError> {
        let style = style.ensure_metadata();
        let json = style.to_pretty_json()?;

        tokio::fs::create_dir_all(&self.styles_dir).await?;
        tokio::fs::write(self.style_path(&style.id), json).await?;
        tokio::fs::write(self.pointer_path(), &style.id).await?;

        debug!("saved style {} to {}", style.id, self.styles_dir.display());
        Ok(style)
    }

    async fn purge(&self) -> Result<(), StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.styles_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_style = path.extension().is_some_and(|ext| ext == "json");
            if is_style || path.file_name().is_some_and(|n| n == LATEST_POINTER) {
                tokio::fs::remove_file(&path).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, LocalStyleStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStyleStore::new(dir.path().join("styles"));
        (dir, store)
    }

    #[tokio::test]
    async fn empty_store_yields_default_style() {
        let (_dir, store) = store();
        assert!(store.supported().await);
        assert_eq!(store.latest_style().await.unwrap(), default_style());
    }

    #[tokio::test]
    async fn save_fills_metadata_and_becomes_latest() {
        let (_dir, store) = store();
        let mut style = StyleDocument::empty();
        style.id.clear();
        style.created = None;

        let saved = store.save(style).await.unwrap();
        assert!(!saved.id.is_empty());
        assert!(saved.created.is_some());
        assert_eq!(store.latest_style().await.unwrap(), saved);

        let second = store.save(StyleDocument::empty()).await.unwrap();
        assert_eq!(store.latest_style().await.unwrap(), second);
    }

    #[tokio::test]
    async fn purge_forgets_everything() {
        let (_dir, store) = store();
        store.save(StyleDocument::empty()).await.unwrap();
        store.save(StyleDocument::empty()).await.unwrap();

        store.purge().await.unwrap();

        let remaining = std::fs::read_dir(store.styles_dir()).unwrap().count();
        assert_eq!(remaining, 0);
        assert_eq!(store.latest_style().await.unwrap(), default_style());
    }

    #[tokio::test]
    async fn purge_of_missing_directory_is_ok() {
        let (_dir, store) = store();
        store.purge().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_style_file_is_invalid_data() {
        let (_dir, store) = store();
        let saved = store.save(StyleDocument::empty()).await.unwrap();
        std::fs::write(store.style_path(&saved.id), "{ not json").unwrap();

        let err = store.latest_style().await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn dangling_pointer_falls_back_to_default() {
        let (_dir, store) = store();
        let saved = store.save(StyleDocument::empty()).await.unwrap();
        std::fs::remove_file(store.style_path(&saved.id)).unwrap();
        assert_eq!(store.latest_style().await.unwrap(), default_style());
    }
}
