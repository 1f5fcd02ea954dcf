// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Recursive sitemap resolution.
//!
//! Every node returns its own [`Resolution`] and the parent concatenates its
//! children in document order. Sibling documents may be prefetched
//! concurrently, but claiming and expanding always walk the tree depth-first
//! in document order, so a concurrent run yields the same output, duplicates
//! and failures as a sequential one.

use crate::error::SitemapError;
use crate::models::settings::ResolverSettings;
use crate::models::sitemap::{Resolution, SitemapDocument, SitemapEntry, UrlEntry};
use crate::services::decoding::{decode_payload, payload_text};
use crate::services::deserializer::deserialize;
use crate::services::logging::redact_url;
use crate::services::transport::Transport;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Observer called with the running entry total after each urlset
pub type ProgressSink = Arc<dyn Fn(usize) + Send + Sync>;

type NodeFuture<'s> = BoxFuture<'s, Result<Resolution, SitemapError>>;
type Fetched = Result<SitemapDocument, SitemapError>;

/// Walks sitemap index trees into a flat list of [`UrlEntry`] records
pub struct SitemapResolver {
    transport: Arc<dyn Transport>,
    settings: ResolverSettings,
    progress: Option<ProgressSink>,
    cancel: CancellationToken,
}

impl SitemapResolver {
    pub fn new(transport: Arc<dyn Transport>, settings: ResolverSettings) -> Self {
        Self {
            transport,
            settings,
            progress: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Stop issuing fetches once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Token that cancels runs of this resolver
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Resolve one sitemap or sitemap index
    pub async fn resolve(&self, url: &str) -> Result<Resolution, SitemapError> {
        self.resolve_all(&[url.to_string()]).await
    }

    /// Resolve several roots in one run, sharing duplicate detection
    pub async fn resolve_all(&self, urls: &[String]) -> Result<Resolution, SitemapError> {
        let run = Run::new(self);
        let mut resolution = Resolution::default();

        for url in urls {
            resolution.merge(run.resolve_node(url.clone(), 0).await?);
        }

        info!(
            roots = urls.len(),
            entries = resolution.len(),
            failures = resolution.failures.len(),
            duplicates = resolution.skipped_duplicates.len(),
            cancelled = resolution.cancelled,
            "sitemap resolution finished"
        );
        Ok(resolution)
    }

    /// Fetch, decompress and deserialize a single document without recursing
    pub async fn fetch_document(&self, url: &str) -> Result<SitemapDocument, SitemapError> {
        let bytes = self.transport.fetch_bytes(url).await?;
        let bytes = decode_payload(url, bytes, self.settings.decompression);
        let text = payload_text(&bytes);
        Ok(deserialize(url, &text, self.settings.repair_malformed)?)
    }

    /// Child sitemaps listed by `url` when it is a sitemap index, otherwise empty
    pub async fn fetch_index(&self, url: &str) -> Result<Vec<SitemapEntry>, SitemapError> {
        match self.fetch_document(url).await? {
            SitemapDocument::Index(entries) => Ok(entries),
            SitemapDocument::UrlSet(_) => Ok(Vec::new()),
        }
    }

    /// Report a branch failure, or keep it in the report when suppressing
    fn fail(&self, url: &str, error: SitemapError) -> Result<Resolution, SitemapError> {
        if !self.settings.suppress_errors {
            return Err(error);
        }
        warn!(url = %redact_url(url), error = %error, "skipping sitemap");
        Ok(Resolution::failed(url, error))
    }
}

/// State shared by all nodes of one resolution run
struct Run<'r> {
    resolver: &'r SitemapResolver,
    visited: Mutex<HashSet<String>>,
    /// Documents fetched ahead of their turn, consumed when the walk reaches them
    prefetched: Mutex<HashMap<String, Fetched>>,
    total: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<'r> Run<'r> {
    fn new(resolver: &'r SitemapResolver) -> Self {
        Self {
            resolver,
            visited: Mutex::new(HashSet::new()),
            prefetched: Mutex::new(HashMap::new()),
            total: AtomicUsize::new(0),
        }
    }

    /// Returns false when the URL was already claimed in this run
    fn claim(&self, url: &str) -> bool {
        lock(&self.visited).insert(url.to_string())
    }

    fn resolve_node(&self, url: String, depth: usize) -> NodeFuture<'_> {
        async move {
            let resolver = self.resolver;
            if resolver.cancel.is_cancelled() {
                return Ok(Resolution::cancelled());
            }
            if !self.claim(&url) {
                debug!(url = %redact_url(&url), "sitemap already visited in this run");
                return Ok(Resolution::duplicate(url));
            }
            if depth > resolver.settings.max_depth {
                let max_depth = resolver.settings.max_depth;
                return resolver.fail(&url, SitemapError::DepthExceeded { url: url.clone(), max_depth });
            }

            let Some(fetched) = self.fetch(&url).await else {
                return Ok(Resolution::cancelled());
            };

            match fetched {
                Ok(SitemapDocument::Index(children)) => self.expand_index(&url, children, depth).await,
                Ok(SitemapDocument::UrlSet(entries)) => Ok(self.finish_urlset(&url, entries)),
                Err(error) => resolver.fail(&url, error),
            }
        }
        .boxed()
    }

    /// The prefetched document for `url`, or a fresh fetch; `None` when cancelled
    async fn fetch(&self, url: &str) -> Option<Fetched> {
        let prefetched = lock(&self.prefetched).remove(url);
        if prefetched.is_some() {
            return prefetched;
        }

        let resolver = self.resolver;
        tokio::select! {
            biased;
            _ = resolver.cancel.cancelled() => None,
            fetched = resolver.fetch_document(url) => Some(fetched),
        }
    }

    async fn expand_index(
        &self,
        url: &str,
        children: Vec<SitemapEntry>,
        depth: usize,
    ) -> Result<Resolution, SitemapError> {
        debug!(url = %redact_url(url), children = children.len(), depth, "expanding sitemap index");
        self.prefetch(&children, depth + 1).await;

        let mut resolution = Resolution::default();
        for child in children {
            resolution.merge(self.resolve_node(child.loc, depth + 1).await?);
        }
        Ok(resolution)
    }

    /// Fetch sibling documents concurrently ahead of the walk. URLs already
    /// claimed or prefetched are skipped, so nothing is fetched twice.
    async fn prefetch(&self, children: &[SitemapEntry], depth: usize) {
        let resolver = self.resolver;
        let fan_out = resolver.settings.max_concurrent_fetches;
        if fan_out <= 1 || depth > resolver.settings.max_depth {
            return;
        }

        let pending = self.unseen(children);
        let fetched: Vec<(String, Option<Fetched>)> = stream::iter(pending)
            .map(|url| async move {
                let fetched = tokio::select! {
                    biased;
                    _ = resolver.cancel.cancelled() => None,
                    fetched = resolver.fetch_document(&url) => Some(fetched),
                };
                (url, fetched)
            })
            .buffer_unordered(fan_out)
            .collect()
            .await;

        let mut prefetched = lock(&self.prefetched);
        for (url, result) in fetched {
            if let Some(result) = result {
                prefetched.insert(url, result);
            }
        }
    }

    /// Child URLs neither claimed nor prefetched yet, without repeats
    fn unseen(&self, children: &[SitemapEntry]) -> Vec<String> {
        let visited = lock(&self.visited);
        let prefetched = lock(&self.prefetched);
        let mut seen = HashSet::new();
        children
            .iter()
            .map(|child| child.loc.clone())
            .filter(|url| !visited.contains(url) && !prefetched.contains_key(url))
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }

    fn finish_urlset(&self, url: &str, entries: Vec<UrlEntry>) -> Resolution {
        let total = self.total.fetch_add(entries.len(), Ordering::SeqCst) + entries.len();
        debug!(url = %redact_url(url), entries = entries.len(), total, "resolved urlset");

        if let Some(progress) = &self.resolver.progress {
            progress(total);
        }
        Resolution::from_entries(entries)
    }
}
