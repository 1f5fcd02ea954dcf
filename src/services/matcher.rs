// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Allow / disallow / crawl-delay queries against a [`RobotsDocument`].
//!
//! The group named exactly like the agent answers first. When it is missing
//! or answers `false` / `0`, the `*` group answers instead, so a specific
//! group can add permissions or restrictions but never silence the wildcard.

use crate::models::robots::{RobotsDocument, UserAgentRule, WILDCARD_AGENT};

/// Check if any allow entry of the agent's group (or `*`) occurs in `path`
pub fn is_path_allowed(document: &RobotsDocument, path: &str, agent: &str) -> bool {
    with_fallback(document, agent, |group| group.is_allowed(path))
}

/// Check if the agent's group (or `*`) disallows `path`
pub fn is_path_disallowed(document: &RobotsDocument, path: &str, agent: &str) -> bool {
    with_fallback(document, agent, |group| group.is_disallowed(path))
}

/// Crawl delay in seconds for the agent, falling back to `*` when zero
pub fn crawl_delay(document: &RobotsDocument, agent: &str) -> i32 {
    let specific = document.group(agent).map_or(0, |group| group.crawl_delay);
    if specific != 0 || agent == WILDCARD_AGENT {
        return specific;
    }
    document.wildcard().crawl_delay
}

fn with_fallback<F>(document: &RobotsDocument, agent: &str, query: F) -> bool
where
    F: Fn(&UserAgentRule) -> bool,
{
    let specific = document.group(agent).is_some_and(&query);
    if specific || agent == WILDCARD_AGENT {
        return specific;
    }
    query(document.wildcard())
}
