// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Typed errors for robots.txt loading and sitemap resolution.

use thiserror::Error;

/// A robots.txt line that could not be interpreted.
///
/// Line numbers are 1-based. Any parse error aborts the whole load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unable to parse line {line_number} in robots.txt: {line:?}")]
    UnrecognizedLine { line_number: usize, line: String },

    #[error("invalid crawl-delay on line {line_number}: {value:?}")]
    InvalidCrawlDelay { line_number: usize, value: String },
}

impl ParseError {
    /// Line of the robots.txt document that failed to parse
    pub fn line_number(&self) -> usize {
        match self {
            ParseError::UnrecognizedLine { line_number, .. }
            | ParseError::InvalidCrawlDelay { line_number, .. } => *line_number,
        }
    }
}

/// Network or HTTP failure while fetching a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to fetch {url}: {message}")]
pub struct TransportError {
    pub url: String,
    /// HTTP status when the server answered with a non-success code
    pub status_code: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_code: None,
            message: message.into(),
        }
    }

    pub fn with_status(url: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_code: Some(status_code),
            message: message.into(),
        }
    }
}

/// Why a payload could not be read as a sitemap document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Syntax(String),

    #[error("document has no root element")]
    Empty,

    #[error("expected <{expected}> root element, found <{found}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },

    #[error("entry {entry_index} has no <loc>")]
    MissingLoc { entry_index: usize },

    #[error("entry {entry_index} has an empty <loc>")]
    EmptyLoc { entry_index: usize },
}

/// Content fetched from `url` is neither a `sitemapindex` nor a `urlset`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to deserialize sitemap content from {url}: {cause}")]
pub struct DeserializationError {
    pub url: String,
    #[source]
    pub cause: XmlError,
}

/// Failure while resolving a sitemap tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SitemapError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Deserialization(#[from] DeserializationError),

    #[error("sitemap index nesting deeper than {max_depth} levels at {url}")]
    DepthExceeded { url: String, max_depth: usize },

    #[error("no robots.txt loaded and no sitemap url supplied")]
    NotLoaded,
}

/// Failure while loading or querying robots.txt.
#[derive(Debug, Error)]
pub enum RobotsError {
    #[error("robots.txt has not been loaded")]
    NotLoaded,

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unable to derive robots.txt location from {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}
