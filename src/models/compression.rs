// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

/// Compression type of a fetched sitemap payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    /// Plain XML
    None,
    /// Gzip-compressed XML
    Gzip,
}

impl CompressionType {
    /// Guess the compression from the URL suffix, ignoring query and fragment
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        if path.to_ascii_lowercase().ends_with(".gz") {
            CompressionType::Gzip
        } else {
            CompressionType::None
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CompressionType::None => "none",
            CompressionType::Gzip => "gzip",
        }
    }
}

impl std::fmt::Display for CompressionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
