// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! robots.txt directive parsing, path matching and recursive sitemap resolution.

pub mod error;
pub mod models;
pub mod services;

pub use error::{
    DeserializationError, ParseError, RobotsError, SitemapError, TransportError, XmlError,
};
pub use models::robots::{RobotsDocument, UserAgentRule, WILDCARD_AGENT};
pub use models::settings::{DecompressionMode, ParseMode, ResolverSettings, TransportSettings};
pub use models::sitemap::{Resolution, SitemapDocument, SitemapEntry, SitemapFailure, UrlEntry};
pub use services::resolver::{ProgressSink, SitemapResolver};
pub use services::robots::{robots_url_for, Robots};
pub use services::transport::{HttpTransport, Transport};
