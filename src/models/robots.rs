// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Agent name of the fallback group
pub const WILDCARD_AGENT: &str = "*";

/// A disallow entry that forbids every path for its group
pub const BLANKET_DISALLOW: &str = "/";

/// Directives declared under one `user-agent:` line
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserAgentRule {
    /// Agent name, compared case-sensitively at query time
    pub name: String,
    pub allowed: BTreeSet<String>,
    pub disallowed: BTreeSet<String>,
    /// Seconds between requests, 0 when not declared
    pub crawl_delay: i32,
}

impl UserAgentRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check if this group carries `disallow: /`
    pub fn disallows_all(&self) -> bool {
        self.disallowed.contains(BLANKET_DISALLOW)
    }

    /// Check if any allow entry occurs anywhere in `path`
    pub fn is_allowed(&self, path: &str) -> bool {
        contains_any(&self.allowed, path)
    }

    /// Check if the group disallows `path`, either by blanket disallow or
    /// because a disallow entry occurs anywhere in it
    pub fn is_disallowed(&self, path: &str) -> bool {
        self.disallows_all() || contains_any(&self.disallowed, path)
    }
}

// An empty entry (`Disallow:` with no value) occurs in every path and matches it.
fn contains_any(patterns: &BTreeSet<String>, path: &str) -> bool {
    patterns.iter().any(|pattern| path.contains(pattern.as_str()))
}

/// A parsed robots.txt: agent groups in declaration order plus the global
/// sitemap list. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RobotsDocument {
    groups: Vec<UserAgentRule>,
    sitemaps: Vec<String>,
    #[serde(skip)]
    wildcard: usize,
}

impl RobotsDocument {
    /// Build a document with exactly one `*` group.
    ///
    /// Later `*` groups are folded into the first one, and an empty `*` group
    /// is appended when none was declared so every query has a default.
    pub fn new(groups: Vec<UserAgentRule>, sitemaps: Vec<String>) -> Self {
        let mut groups = merge_wildcards(groups);
        let wildcard = match groups.iter().position(|g| g.name == WILDCARD_AGENT) {
            Some(index) => index,
            None => {
                groups.push(UserAgentRule::new(WILDCARD_AGENT));
                groups.len() - 1
            }
        };

        let mut unique: Vec<String> = Vec::with_capacity(sitemaps.len());
        for sitemap in sitemaps {
            if !unique.contains(&sitemap) {
                unique.push(sitemap);
            }
        }

        Self {
            groups,
            sitemaps: unique,
            wildcard,
        }
    }

    /// All groups in the order they were declared
    pub fn groups(&self) -> &[UserAgentRule] {
        &self.groups
    }

    /// Sitemap URLs declared anywhere in the document, without duplicates
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// First group whose name equals `agent` exactly
    pub fn group(&self, agent: &str) -> Option<&UserAgentRule> {
        self.groups.iter().find(|g| g.name == agent)
    }

    /// The first `*` group. Always present.
    pub fn wildcard(&self) -> &UserAgentRule {
        &self.groups[self.wildcard]
    }

    /// The group answering for `agent`: its own when declared, otherwise `*`
    pub fn group_or_wildcard(&self, agent: &str) -> &UserAgentRule {
        self.group(agent).unwrap_or_else(|| self.wildcard())
    }
}

// A later non-zero crawl delay replaces an earlier one, as within a single block.
fn merge_wildcards(groups: Vec<UserAgentRule>) -> Vec<UserAgentRule> {
    let mut merged: Vec<UserAgentRule> = Vec::with_capacity(groups.len());
    let mut wildcard: Option<usize> = None;

    for group in groups {
        match wildcard {
            Some(index) if group.name == WILDCARD_AGENT => {
                let first = &mut merged[index];
                first.allowed.extend(group.allowed);
                first.disallowed.extend(group.disallowed);
                if group.crawl_delay != 0 {
                    first.crawl_delay = group.crawl_delay;
                }
            }
            _ => {
                if group.name == WILDCARD_AGENT {
                    wildcard = Some(merged.len());
                }
                merged.push(group);
            }
        }
    }
    merged
}

impl Default for RobotsDocument {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, allowed: &[&str], disallowed: &[&str]) -> UserAgentRule {
        UserAgentRule {
            name: name.to_string(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
            disallowed: disallowed.iter().map(|s| s.to_string()).collect(),
            crawl_delay: 0,
        }
    }

    #[test]
    fn test_blanket_disallow_ignores_allow_entries() {
        let group = rule("*", &["/public/"], &["/"]);
        assert!(group.disallows_all());
        assert!(group.is_disallowed("/public/page"));
        assert!(group.is_disallowed(""));
    }

    #[test]
    fn test_matching_is_substring_containment() {
        let group = rule("*", &[], &["/search/"]);
        assert!(group.is_disallowed("/search/x"));
        assert!(group.is_disallowed("https://example.com/search/x"));
        assert!(!group.is_disallowed("/searching"));
    }

    #[test]
    fn test_empty_entry_matches_every_path() {
        let group = rule("*", &[""], &[""]);
        assert!(group.is_allowed("/anything"));
        assert!(group.is_disallowed("/anything"));
        assert!(group.is_disallowed(""));
    }

    #[test]
    fn test_new_folds_repeated_wildcard_groups() {
        let mut later = rule("*", &["/open"], &["/b"]);
        later.crawl_delay = 4;
        let doc = RobotsDocument::new(
            vec![rule("*", &[], &["/a"]), rule("Bot", &[], &["/bot"]), later],
            Vec::new(),
        );

        let names: Vec<&str> = doc.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["*", "Bot"]);
        assert!(doc.wildcard().disallowed.contains("/a"));
        assert!(doc.wildcard().disallowed.contains("/b"));
        assert!(doc.wildcard().allowed.contains("/open"));
        assert_eq!(doc.wildcard().crawl_delay, 4);
    }

    #[test]
    fn test_new_materializes_wildcard_group() {
        let doc = RobotsDocument::new(vec![rule("Googlebot", &[], &["/x"])], Vec::new());
        assert_eq!(doc.groups().len(), 2);
        assert_eq!(doc.wildcard().name, "*");
        assert!(doc.wildcard().disallowed.is_empty());
    }

    #[test]
    fn test_new_keeps_declared_wildcard() {
        let doc = RobotsDocument::new(vec![rule("*", &[], &["/x"])], Vec::new());
        assert_eq!(doc.groups().len(), 1);
        assert!(doc.wildcard().disallowed.contains("/x"));
    }

    #[test]
    fn test_sitemaps_are_unique() {
        let doc = RobotsDocument::new(
            Vec::new(),
            vec![
                "https://example.com/a.xml".to_string(),
                "https://example.com/b.xml".to_string(),
                "https://example.com/a.xml".to_string(),
            ],
        );
        assert_eq!(
            doc.sitemaps(),
            &["https://example.com/a.xml", "https://example.com/b.xml"]
        );
    }

    #[test]
    fn test_group_lookup_is_case_sensitive() {
        let doc = RobotsDocument::new(vec![rule("Googlebot", &[], &[])], Vec::new());
        assert!(doc.group("Googlebot").is_some());
        assert!(doc.group("googlebot").is_none());
        assert_eq!(doc.group_or_wildcard("googlebot").name, "*");
    }
}
