// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Logging setup and redaction of sensitive data before it is logged.

use tracing_subscriber::EnvFilter;

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG`, using
/// `default_directive` when the variable is unset or invalid.
///
/// Returns false when a global subscriber was already installed.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

/// Redact a URL for logging.
/// Drops credentials, query string and fragment, which may carry access tokens:
/// "https://user:pw@example.com/s.xml?token=x" -> "https://example.com/s.xml"
pub fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            // Only fails for URLs that cannot carry credentials in the first place
            let _ = parsed.set_username("");
            let _ = parsed.set_password(None);
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => raw
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}
