// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::SitemapError;
use serde::{Deserialize, Serialize};

/// A `<sitemap>` record of a sitemap index
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SitemapEntry {
    /// Location of the child sitemap
    pub loc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
}

/// A `<url>` record of a urlset. Optional fields pass through uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UrlEntry {
    /// Location of the page
    pub loc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl UrlEntry {
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            ..Self::default()
        }
    }
}

/// A deserialized sitemap payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>` listing other sitemaps
    Index(Vec<SitemapEntry>),
    /// `<urlset>` listing pages
    UrlSet(Vec<UrlEntry>),
}

impl SitemapDocument {
    /// Root element name of this document kind
    pub fn root_name(&self) -> &'static str {
        match self {
            SitemapDocument::Index(_) => "sitemapindex",
            SitemapDocument::UrlSet(_) => "urlset",
        }
    }
}

/// A sitemap that contributed nothing because it failed while errors were suppressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapFailure {
    pub url: String,
    pub error: SitemapError,
}

/// Outcome of one resolution run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Flattened entries in document order
    pub entries: Vec<UrlEntry>,
    /// Branches that failed and were suppressed, with their cause
    pub failures: Vec<SitemapFailure>,
    /// Sitemap URLs met again in the same run and not fetched twice
    pub skipped_duplicates: Vec<String>,
    /// Set when the run was cancelled before every branch was visited
    pub cancelled: bool,
}

impl Resolution {
    pub fn from_entries(entries: Vec<UrlEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn failed(url: impl Into<String>, error: SitemapError) -> Self {
        Self {
            failures: vec![SitemapFailure {
                url: url.into(),
                error,
            }],
            ..Self::default()
        }
    }

    pub fn duplicate(url: impl Into<String>) -> Self {
        Self {
            skipped_duplicates: vec![url.into()],
            ..Self::default()
        }
    }

    pub fn cancelled() -> Self {
        Self {
            cancelled: true,
            ..Self::default()
        }
    }

    /// Append a sibling branch, keeping its entries after the current ones
    pub fn merge(&mut self, other: Resolution) {
        self.entries.extend(other.entries);
        self.failures.extend(other.failures);
        self.skipped_duplicates.extend(other.skipped_duplicates);
        self.cancelled |= other.cancelled;
    }

    /// True when every branch was visited without a suppressed failure
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;

    #[test]
    fn test_merge_preserves_order() {
        let mut first = Resolution::from_entries(vec![UrlEntry::new("a"), UrlEntry::new("b")]);
        first.merge(Resolution::from_entries(vec![UrlEntry::new("c")]));

        let locs: Vec<&str> = first.entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(locs, vec!["a", "b", "c"]);
        assert!(first.is_complete());
    }

    #[test]
    fn test_merge_carries_failures_and_cancellation() {
        let mut run = Resolution::from_entries(vec![UrlEntry::new("a")]);
        run.merge(Resolution::failed(
            "https://example.com/broken.xml",
            TransportError::with_status("https://example.com/broken.xml", 500, "boom").into(),
        ));
        run.merge(Resolution::cancelled());

        assert_eq!(run.len(), 1);
        assert_eq!(run.failures.len(), 1);
        assert!(run.cancelled);
        assert!(!run.is_complete());
    }

    #[test]
    fn test_url_entry_serializes_without_missing_fields() {
        let entry = UrlEntry::new("https://example.com/page");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"loc":"https://example.com/page"}"#);
    }

    #[test]
    fn test_document_root_name() {
        assert_eq!(SitemapDocument::Index(Vec::new()).root_name(), "sitemapindex");
        assert_eq!(SitemapDocument::UrlSet(Vec::new()).root_name(), "urlset");
    }
}
