//! HTTP style server store.
//!
//! Talks to a style server exposing:
//!
//! - `GET /styles` returning a JSON array of style ids
//! - `GET /styles/{id}` returning a style document
//! - `PUT /styles/{id}` storing a style document
//! - `DELETE /styles/{id}` removing a style

use super::{StoreError, StoreKind, StyleStore};
use crate::style::{default_style, StyleDocument};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub struct ApiStyleStore {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl ApiStyleStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            base_url,
            client,
            timeout,
        })
    }

    fn styles_url(&self) -> String {
        format!("{}/styles", self.base_url)
    }

    fn style_url(&self, id: &str) -> String {
        let encoded: String = id
            .bytes()
            .map(|b| match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    (b as char).to_string()
                }
                _ => format!("%{:02X}", b),
            })
            .collect();
        format!("{}/styles/{}", self.base_url, encoded)
    }

    fn request_error(&self, e: reqwest::Error) -> StoreError {
        if e.is_timeout() {
            StoreError::Timeout(self.timeout)
        } else {
            StoreError::Network(e.to_string())
        }
    }

    async fn style_ids(&self) -> Result<Vec<String>, StoreError> {
        let url = self.styles_url();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        let response = check_status(response, &url).await?;
        response
            .json()
            .await
            .map_err(|e| StoreError::InvalidData(e.to_string()))
    }
}

async fn check_status(response: Response, url: &str) -> Result<Response, StoreError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound(url.to_string()));
    }
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}

/// Fetch a style document from an arbitrary URL.
pub async fn fetch_style(client: &Client, url: &str) -> Result<StyleDocument, StoreError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| StoreError::Network(e.to_string()))?;
    let response = check_status(response, url).await?;
    let value: serde_json::Value = response
        .json()
        .await
        .map_err(|e| StoreError::InvalidData(e.to_string()))?;
    Ok(StyleDocument::from_value(value)?)
}

#[async_trait]
impl StyleStore for ApiStyleStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Api
    }

    async fn supported(&self) -> bool {
        match self.style_ids().await {
            Ok(_) => true,
            Err(e) => {
                debug!("style server at {} unavailable: {}", self.base_url, e);
                false
            }
        }
    }

    async fn latest_style(&self) -> Result<StyleDocument, StoreError> {
        let ids = self.style_ids().await?;
        match ids.first() {
            Some(id) => fetch_style(&self.client, &self.style_url(id)).await,
            None => Ok(default_style()),
        }
    }

    async fn save(&self, style: StyleDocument) -> Result<StyleDocument, StoreError> {
        let style = style.ensure_metadata();
        let url = self.style_url(&style.id);
        let response = self
            .client
            .put(&url)
            .json(&style)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        check_status(response, &url).await?;
        debug!("saved style {} to {}", style.id, url);
        Ok(style)
    }

    async fn purge(&self) -> Result<(), StoreError> {
        for id in self.style_ids().await? {
            let url = self.style_url(&id);
            let response = self
                .client
                .delete(&url)
                .send()
                .await
                .map_err(|e| self.request_error(e))?;
            match check_status(response, &url).await {
                Ok(_) | Err(StoreError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
