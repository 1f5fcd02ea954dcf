// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Loaded robots.txt state plus sitemap access for one site.

use crate::error::{DeserializationError, RobotsError, SitemapError, XmlError};
use crate::models::robots::{RobotsDocument, UserAgentRule};
use crate::models::settings::{ParseMode, ResolverSettings, TransportSettings};
use crate::models::sitemap::{Resolution, SitemapDocument, SitemapEntry, UrlEntry};
use crate::services::logging::redact_url;
use crate::services::matcher;
use crate::services::parser::parse_with_mode;
use crate::services::resolver::{ProgressSink, SitemapResolver};
use crate::services::transport::{HttpTransport, Transport};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const ROBOTS_PATH: &str = "/robots.txt";

/// Location of the robots.txt that governs `site_url`:
/// "https://example.com:8080/a/b?c" -> "https://example.com:8080/robots.txt"
pub fn robots_url_for(site_url: &str) -> Result<String, RobotsError> {
    let invalid = |reason: &str| RobotsError::InvalidUrl {
        url: site_url.to_string(),
        reason: reason.to_string(),
    };

    let mut url = url::Url::parse(site_url).map_err(|e| invalid(&e.to_string()))?;
    if !url.host_str().is_some_and(|host| !host.is_empty()) {
        return Err(invalid("url has no host"));
    }

    url.set_path(ROBOTS_PATH);
    url.set_query(None);
    url.set_fragment(None);
    url.set_username("").map_err(|_| invalid("cannot strip credentials"))?;
    url.set_password(None).map_err(|_| invalid("cannot strip credentials"))?;
    Ok(url.to_string())
}

/// robots.txt queries and sitemap resolution for one site
pub struct Robots {
    transport: Arc<dyn Transport>,
    resolver: SitemapResolver,
    parse_mode: ParseMode,
    document: Option<RobotsDocument>,
}

impl Robots {
    pub fn new(transport: Arc<dyn Transport>, settings: ResolverSettings) -> Self {
        Self {
            resolver: SitemapResolver::new(transport.clone(), settings),
            transport,
            parse_mode: ParseMode::default(),
            document: None,
        }
    }

    /// Robots backed by the HTTP transport
    pub fn http(transport: &TransportSettings, settings: ResolverSettings) -> reqwest::Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(transport)?), settings))
    }

    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }

    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.resolver = self.resolver.with_progress(sink);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.resolver = self.resolver.with_cancellation(token);
        self
    }

    /// Parse robots.txt text, replacing the loaded document only on success
    pub fn load_from_text(&mut self, text: &str) -> Result<&RobotsDocument, RobotsError> {
        let document = parse_with_mode(text, self.parse_mode)?;
        info!(
            groups = document.groups().len(),
            sitemaps = document.sitemaps().len(),
            "robots.txt loaded"
        );
        Ok(self.document.insert(document))
    }

    /// Fetch and parse robots.txt from `robots_url`
    pub async fn load_from_url(&mut self, robots_url: &str) -> Result<&RobotsDocument, RobotsError> {
        let text = self.transport.fetch_text(robots_url).await?;
        self.load_from_text(&text)
    }

    /// Fetch and parse the robots.txt governing any URL of a site
    pub async fn load_for_site(&mut self, site_url: &str) -> Result<&RobotsDocument, RobotsError> {
        let robots_url = robots_url_for(site_url)?;
        self.load_from_url(&robots_url).await
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn document(&self) -> Result<&RobotsDocument, RobotsError> {
        self.document.as_ref().ok_or(RobotsError::NotLoaded)
    }

    /// Groups in the order they were declared
    pub fn user_agents(&self) -> Result<&[UserAgentRule], RobotsError> {
        Ok(self.document()?.groups())
    }

    pub fn user_agent_count(&self) -> Result<usize, RobotsError> {
        Ok(self.document()?.groups().len())
    }

    pub fn sitemaps(&self) -> Result<&[String], RobotsError> {
        Ok(self.document()?.sitemaps())
    }

    /// Allow entries of the agent's group, or of `*` when it has none
    pub fn allowed_paths(&self, agent: &str) -> Result<&BTreeSet<String>, RobotsError> {
        Ok(&self.document()?.group_or_wildcard(agent).allowed)
    }

    /// Disallow entries of the agent's group, or of `*` when it has none
    pub fn disallowed_paths(&self, agent: &str) -> Result<&BTreeSet<String>, RobotsError> {
        Ok(&self.document()?.group_or_wildcard(agent).disallowed)
    }

    pub fn is_path_allowed(&self, path: &str, agent: &str) -> Result<bool, RobotsError> {
        Ok(matcher::is_path_allowed(self.document()?, path, agent))
    }

    pub fn is_path_disallowed(&self, path: &str, agent: &str) -> Result<bool, RobotsError> {
        Ok(matcher::is_path_disallowed(self.document()?, path, agent))
    }

    pub fn crawl_delay(&self, agent: &str) -> Result<i32, RobotsError> {
        Ok(matcher::crawl_delay(self.document()?, agent))
    }

    /// Entries of every known sitemap that is a sitemap index, one level deep
    pub async fn sitemap_indexes(&self, extra_url: Option<&str>) -> Result<Vec<SitemapEntry>, SitemapError> {
        let mut indexes = Vec::new();
        for url in self.sitemap_urls(extra_url)? {
            match self.resolver.fetch_index(&url).await {
                Ok(entries) => indexes.extend(entries),
                Err(error) => self.suppress(&url, error)?,
            }
        }
        Ok(indexes)
    }

    /// Entries of one leaf sitemap
    pub async fn urls(&self, entry: &SitemapEntry) -> Result<Vec<UrlEntry>, SitemapError> {
        let error = match self.resolver.fetch_document(&entry.loc).await {
            Ok(SitemapDocument::UrlSet(entries)) => return Ok(entries),
            Ok(document) => SitemapError::Deserialization(DeserializationError {
                url: entry.loc.clone(),
                cause: XmlError::UnexpectedRoot {
                    expected: "urlset",
                    found: document.root_name().to_string(),
                },
            }),
            Err(error) => error,
        };
        self.suppress(&entry.loc, error).map(|()| Vec::new())
    }

    /// Recursively resolve every sitemap declared by robots.txt, plus `extra_url`
    pub async fn resolve_sitemaps(&self, extra_url: Option<&str>) -> Result<Resolution, SitemapError> {
        let urls = self.sitemap_urls(extra_url)?;
        self.resolver.resolve_all(&urls).await
    }

    fn sitemap_urls(&self, extra_url: Option<&str>) -> Result<Vec<String>, SitemapError> {
        let mut urls: Vec<String> = match &self.document {
            Some(document) => document.sitemaps().to_vec(),
            None if extra_url.is_none() => return Err(SitemapError::NotLoaded),
            None => Vec::new(),
        };
        if let Some(extra) = extra_url {
            if !urls.iter().any(|url| url == extra) {
                urls.push(extra.to_string());
            }
        }
        Ok(urls)
    }

    fn suppress(&self, url: &str, error: SitemapError) -> Result<(), SitemapError> {
        if !self.resolver.settings().suppress_errors {
            return Err(error);
        }
        warn!(url = %redact_url(url), error = %error, "skipping sitemap");
        Ok(())
    }
}
