//! Background task owning the session's style store.
//!
//! The worker selects the store before serving anything, then handles
//! requests strictly in arrival order. Requests sent while the probe is still
//! running wait in the queue, so no save can reach a store that is about to be
//! replaced by the fallback.

use super::{load_default_style, select_store, StoreError, StoreOperation, StyleStore};
use crate::app::event::AppEvent;
use crate::style::StyleDocument;
use anyhow::{anyhow, Result};
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub probe_timeout: Duration,
    pub request_timeout: Duration,
    pub default_style_url: Option<String>,
}

#[derive(Debug)]
enum StoreRequest {
    Save {
        style: StyleDocument,
        adopt: bool,
        revision: u64,
    },
    Reset,
}

/// Handle for queueing store requests.
#[derive(Clone)]
pub struct StoreClient {
    tx: mpsc::UnboundedSender<StoreRequest>,
}

impl StoreClient {
    /// Persist `style`. With `adopt`, the stored value replaces the current
    /// style once the save completes. `revision` comes back unchanged in
    /// `AppEvent::StyleSaved`.
    pub fn save(&self, style: StyleDocument, adopt: bool, revision: u64) -> Result<()> {
        self.send(StoreRequest::Save {
            style,
            adopt,
            revision,
        })
    }

    /// Purge every saved style, then load the default style.
    pub fn reset(&self) -> Result<()> {
        self.send(StoreRequest::Reset)
    }

    fn send(&self, request: StoreRequest) -> Result<()> {
        self.tx
            .send(request)
            .map_err(|_| anyhow!("style store worker has stopped"))
    }
}

/// Spawn the store worker. It picks between `preferred` and `fallback`, loads
/// the latest style and then serves requests until the client is dropped.
pub fn spawn_store_worker(
    preferred: Box<dyn StyleStore>,
    fallback: Box<dyn StyleStore>,
    options: StoreOptions,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) -> StoreClient {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run(preferred, fallback, options, rx, event_tx));
    StoreClient { tx }
}

async fn run(
    preferred: Box<dyn StyleStore>,
    fallback: Box<dyn StyleStore>,
    options: StoreOptions,
    mut rx: mpsc::UnboundedReceiver<StoreRequest>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) {
    let store = select_store(preferred, fallback, options.probe_timeout).await;
    let http = reqwest::Client::builder()
        .timeout(options.request_timeout)
        .build()
        .unwrap_or_default();
    let worker = Worker {
        store,
        options,
        http,
        event_tx,
    };

    if !worker.emit(AppEvent::StoreSelected {
        kind: worker.store.kind(),
    }) {
        return;
    }
    if !worker.load_latest().await {
        return;
    }

    while let Some(request) = rx.recv().await {
        let delivered = match request {
            StoreRequest::Save {
                style,
                adopt,
                revision,
            } => worker.save(style, adopt, revision).await,
            StoreRequest::Reset => worker.reset().await,
        };
        if !delivered {
            break;
        }
    }
}

struct Worker {
    store: Box<dyn StyleStore>,
    options: StoreOptions,
    http: reqwest::Client,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Worker {
    /// Returns false once the UI side has gone away.
    fn emit(&self, event: AppEvent) -> bool {
        self.event_tx.send(event).is_ok()
    }

    fn failed(&self, operation: StoreOperation, error: StoreError) -> bool {
        warn!("{} failed: {}", operation, error);
        self.emit(AppEvent::StoreFailed {
            operation,
            error: error.to_string(),
        })
    }

    async fn timed<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        let limit = self.options.request_timeout;
        tokio::time::timeout(limit, call)
            .await
            .unwrap_or(Err(StoreError::Timeout(limit)))
    }

    /// Run a store call, retrying once if it fails transiently.
    async fn call<T, F, Fut>(&self, operation: StoreOperation, make_call: F) -> Result<T, StoreError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        match self.timed(make_call()).await {
            Err(e) if e.is_transient() => {
                warn!("{} failed ({}), retrying once", operation, e);
                self.timed(make_call()).await
            }
            result => result,
        }
    }

    async fn load_latest(&self) -> bool {
        match self
            .call(StoreOperation::Load, || self.store.latest_style())
            .await
        {
            Ok(style) => {
                info!("Loaded style {}", style.id);
                self.emit(AppEvent::LatestStyleLoaded { style })
            }
            Err(e) => self.failed(StoreOperation::Load, e),
        }
    }

    async fn save(&self, style: StyleDocument, adopt: bool, revision: u64) -> bool {
        match self
            .call(StoreOperation::Save, || self.store.save(style.clone()))
            .await
        {
            Ok(style) => {
                info!("Saved style {}", style.id);
                self.emit(AppEvent::StyleSaved {
                    style,
                    adopt,
                    revision,
                })
            }
            Err(e) => self.failed(StoreOperation::Save, e),
        }
    }

    async fn reset(&self) -> bool {
        if let Err(e) = self.call(StoreOperation::Purge, || self.store.purge()).await {
            return self.failed(StoreOperation::Purge, e);
        }
        info!("Purged saved styles");
        let style =
            load_default_style(&self.http, self.options.default_style_url.as_deref()).await;
        self.emit(AppEvent::DefaultStyleLoaded { style })
    }
}
