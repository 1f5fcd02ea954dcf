// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::compression::CompressionType;
use std::env;
use std::str::FromStr;

/// How robots.txt lines outside the directive grammar are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Every unknown non-blank, non-comment line is an error
    Strict,
    /// Additionally skips a `<!DOCTYPE html>` line left by servers that
    /// answer robots.txt with an HTML page
    #[default]
    Lenient,
}

/// When a fetched sitemap payload is run through the gzip decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecompressionMode {
    /// Try gzip on every payload, keeping the raw bytes when it fails
    #[default]
    Always,
    /// Only try gzip when the URL ends in `.gz`
    BySuffix,
}

impl DecompressionMode {
    pub fn should_decompress(&self, url: &str) -> bool {
        match self {
            DecompressionMode::Always => true,
            DecompressionMode::BySuffix => CompressionType::from_url(url) == CompressionType::Gzip,
        }
    }
}

impl FromStr for DecompressionMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "always" => Ok(DecompressionMode::Always),
            "suffix" => Ok(DecompressionMode::BySuffix),
            other => Err(format!(
                "decompression mode must be 'always' or 'suffix', got: {}",
                other
            )),
        }
    }
}

/// Sitemap resolution behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// A failing sitemap contributes nothing instead of aborting the run
    pub suppress_errors: bool,
    /// Strip empty `<loc/>` tags and drop incomplete entries, then retry once
    pub repair_malformed: bool,
    pub decompression: DecompressionMode,
    /// Sibling sitemaps fetched at once within one index (1 = sequential)
    pub max_concurrent_fetches: usize,
    /// Deepest chain of nested sitemap indexes followed
    pub max_depth: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            suppress_errors: false,
            repair_malformed: true,
            decompression: DecompressionMode::Always,
            max_concurrent_fetches: 1,
            max_depth: 16,
        }
    }
}

impl ResolverSettings {
    /// Load settings from environment variables, keeping defaults for unset
    /// or unparsable values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            suppress_errors: env_or("SITEMAP_SUPPRESS_ERRORS", defaults.suppress_errors),
            repair_malformed: env_or("SITEMAP_REPAIR_MALFORMED", defaults.repair_malformed),
            decompression: env_or("SITEMAP_DECOMPRESSION", defaults.decompression),
            max_concurrent_fetches: env_or(
                "SITEMAP_MAX_CONCURRENT_FETCHES",
                defaults.max_concurrent_fetches,
            )
            .max(1),
            max_depth: env_or("SITEMAP_MAX_DEPTH", defaults.max_depth),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_redirects: usize,
    /// Bodies larger than this are rejected
    pub max_content_size: usize,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            user_agent: format!("robots-sitemap/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            max_redirects: 15,
            max_content_size: 50 * 1024 * 1024,
        }
    }
}

impl TransportSettings {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            user_agent: env::var("USER_AGENT").unwrap_or(defaults.user_agent),
            timeout_secs: env_or("HTTP_TIMEOUT_SECS", defaults.timeout_secs),
            max_redirects: env_or("HTTP_MAX_REDIRECTS", defaults.max_redirects),
            max_content_size: env_or("HTTP_MAX_CONTENT_SIZE", defaults.max_content_size),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
