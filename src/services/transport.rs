// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Fetching robots.txt and sitemap payloads over HTTP.

use crate::error::TransportError;
use crate::models::settings::TransportSettings;
use crate::services::logging::redact_url;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, PRAGMA};
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::debug;

/// Source of raw document bytes, one call per URL
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError>;

    /// Fetch a text document, replacing invalid UTF-8 sequences
    async fn fetch_text(&self, url: &str) -> Result<String, TransportError> {
        let bytes = self.fetch_bytes(url).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// [`Transport`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    max_content_size: usize,
}

impl HttpTransport {
    pub fn new(settings: &TransportSettings) -> reqwest::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/xml,text/xml,text/plain;q=0.9,*/*;q=0.8"),
        );
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .redirect(Policy::limited(settings.max_redirects))
            .build()?;

        Ok(Self {
            client,
            max_content_size: settings.max_content_size,
        })
    }

    fn too_large(&self, url: &str, size: u64) -> TransportError {
        TransportError::new(
            url,
            format!(
                "content too large: {} bytes (limit {})",
                size, self.max_content_size
            ),
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        debug!(url = %redact_url(url), "fetching");

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::new(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::with_status(
                url,
                status.as_u16(),
                status.canonical_reason().unwrap_or("unexpected status"),
            ));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_content_size as u64 {
                return Err(self.too_large(url, length));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| TransportError::new(url, e.to_string()))?
        {
            append_within_limit(&mut body, &chunk, self.max_content_size)
                .map_err(|size| self.too_large(url, size as u64))?;
        }

        debug!(url = %redact_url(url), bytes = body.len(), status = status.as_u16(), "fetched");
        Ok(body)
    }
}

/// Append `chunk` unless the body would exceed `limit`; the error carries the
/// size reached
fn append_within_limit(body: &mut Vec<u8>, chunk: &[u8], limit: usize) -> Result<(), usize> {
    let size = body.len() + chunk.len();
    if size > limit {
        return Err(size);
    }
    body.extend_from_slice(chunk);
    Ok(())
}
