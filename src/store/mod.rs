//! Style persistence.
//!
//! A [`StyleStore`] persists style documents. Two implementations exist: the
//! [`ApiStyleStore`] talks to a local style server over HTTP and the
//! [`LocalStyleStore`] keeps one JSON file per style on disk. The store used
//! for a session is picked once by [`select_store`], which probes the
//! preferred store and falls back when it is not usable. All store I/O runs
//! on the store worker (see [`worker`]).

pub mod api;
pub mod local;
pub mod worker;

pub use api::ApiStyleStore;
pub use local::LocalStyleStore;
pub use worker::{spawn_store_worker, StoreClient, StoreOptions};

use crate::style::{default_style, StyleDocument, StyleError};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Api,
    Local,
}

impl StoreKind {
    pub fn label(&self) -> &'static str {
        match self {
            StoreKind::Api => "style server",
            StoreKind::Local => "local storage",
        }
    }
}

/// Which store call an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Load,
    Save,
    Purge,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOperation::Load => write!(f, "Loading style"),
            StoreOperation::Save => write!(f, "Saving style"),
            StoreOperation::Purge => write!(f, "Deleting saved styles"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("store rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid style data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Network(_) | StoreError::Timeout(_) | StoreError::Io(_) => true,
            StoreError::Rejected { status, .. } => *status >= 500,
            StoreError::NotFound(_) | StoreError::InvalidData(_) => false,
        }
    }
}

impl From<StyleError> for StoreError {
    fn from(e: StyleError) -> Self {
        StoreError::InvalidData(e.to_string())
    }
}

/// Capability set every style store provides.
#[async_trait]
pub trait StyleStore: Send + Sync {
    fn kind(&self) -> StoreKind;

    /// Whether this store can be used at all.
    async fn supported(&self) -> bool;

    /// The most recently saved style, or the default style when none is stored.
    async fn latest_style(&self) -> Result<StyleDocument, StoreError>;

    /// Persist `style` and return it as stored (id and timestamps filled in).
    async fn save(&self, style: StyleDocument) -> Result<StyleDocument, StoreError>;

    /// Delete every persisted style.
    async fn purge(&self) -> Result<(), StoreError>;
}

/// Pick the store for this session.
///
/// Returns `preferred` when its probe reports support within `probe_timeout`,
/// otherwise `fallback`.
pub async fn select_store(
    preferred: Box<dyn StyleStore>,
    fallback: Box<dyn StyleStore>,
    probe_timeout: Duration,
) -> Box<dyn StyleStore> {
    let supported = match tokio::time::timeout(probe_timeout, preferred.supported()).await {
        Ok(supported) => supported,
        Err(_) => {
            warn!(
                "{} did not answer within {:?}",
                preferred.kind().label(),
                probe_timeout
            );
            false
        }
    };

    if supported {
        info!("Storing styles in {}", preferred.kind().label());
        preferred
    } else {
        info!("Falling back to local storage for storing styles");
        fallback
    }
}

/// The style adopted after a reset.
///
/// Fetches `url` when one is configured and falls back to the built-in style
/// if that fails.
pub async fn load_default_style(client: &reqwest::Client, url: Option<&str>) -> StyleDocument {
    let Some(url) = url else {
        return default_style();
    };
    match api::fetch_style(client, url).await {
        Ok(style) => style.ensure_metadata(),
        Err(e) => {
            warn!("Could not fetch default style from {}: {}", url, e);
            default_style()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MemoryStore;
    use super::*;

    struct SlowStore;

    #[async_trait]
    impl StyleStore for SlowStore {
        fn kind(&self) -> StoreKind {
            StoreKind::Api
        }
        async fn supported(&self) -> bool {
            tokio::time::sleep(Duration::from_secs(60)).await;
            true
        }
        async fn latest_style(&self) -> Result<StyleDocument, StoreError> {
            Ok(default_style())
        }
        async fn save(&self, style: StyleDocument) -> Result<StyleDocument, StoreError> {
            Ok(style)
        }
        async fn purge(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn unsupported_store_falls_back_to_local() {
        let dir = tempfile::tempdir().unwrap();
        let store = select_store(
            Box::new(MemoryStore::unsupported()),
            Box::new(LocalStyleStore::new(dir.path())),
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(store.kind(), StoreKind::Local);

        let saved = store.save(StyleDocument::empty()).await.unwrap();
        assert_eq!(store.latest_style().await.unwrap(), saved);
    }

    #[tokio::test]
    async fn supported_store_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = select_store(
            Box::new(MemoryStore::supported()),
            Box::new(LocalStyleStore::new(dir.path())),
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(store.kind(), StoreKind::Api);
    }

    #[tokio::test(start_paused = true)]
    async fn probe_timeout_counts_as_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let store = select_store(
            Box::new(SlowStore),
            Box::new(LocalStyleStore::new(dir.path())),
            Duration::from_secs(2),
        )
        .await;
        assert_eq!(store.kind(), StoreKind::Local);
    }

    #[test]
    fn error_classification() {
        assert!(StoreError::Network("reset".into()).is_transient());
        assert!(StoreError::Timeout(Duration::from_secs(1)).is_transient());
        assert!(StoreError::Rejected { status: 503, message: String::new() }.is_transient());
        assert!(!StoreError::Rejected { status: 400, message: String::new() }.is_transient());
        assert!(!StoreError::NotFound("abc".into()).is_transient());
        assert!(!StoreError::InvalidData("bad".into()).is_transient());
    }

    #[tokio::test]
    async fn default_style_without_url_is_builtin() {
        let client = reqwest::Client::new();
        assert_eq!(load_default_style(&client, None).await, default_style());
    }
}
