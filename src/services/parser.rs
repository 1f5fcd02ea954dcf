// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Directive parser turning robots.txt text into a [`RobotsDocument`].

use crate::error::ParseError;
use crate::models::robots::{RobotsDocument, UserAgentRule, WILDCARD_AGENT};
use crate::models::settings::ParseMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    UserAgent,
    Disallow,
    Allow,
    Sitemap,
    CrawlDelay,
}

/// Directive prefixes, compared case-insensitively against the start of a line
const DIRECTIVES: [(&str, Directive); 5] = [
    ("user-agent:", Directive::UserAgent),
    ("disallow:", Directive::Disallow),
    ("allow:", Directive::Allow),
    ("sitemap:", Directive::Sitemap),
    ("crawl-delay:", Directive::CrawlDelay),
];

const HTML_DOCTYPE: &str = "<!doctype html";

/// Parse robots.txt text in lenient mode
pub fn parse(text: &str) -> Result<RobotsDocument, ParseError> {
    parse_with_mode(text, ParseMode::Lenient)
}

/// Parse robots.txt text.
///
/// Directives always apply to the most recently declared group. Directives
/// that appear before any `user-agent:` line go to an implicit `*` group,
/// which is only kept when it received at least one directive.
pub fn parse_with_mode(text: &str, mode: ParseMode) -> Result<RobotsDocument, ParseError> {
    let mut builder = DocumentBuilder::new();

    for (index, raw) in text.split('\n').enumerate() {
        let line_number = index + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let line = line.trim_start_matches([' ', '\t']);

        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        match split_directive(line) {
            Some((directive, value)) => builder.apply(directive, trim_spaces(value), line_number)?,
            None if mode == ParseMode::Lenient && is_html_doctype(line) => continue,
            None => {
                return Err(ParseError::UnrecognizedLine {
                    line_number,
                    line: line.to_string(),
                })
            }
        }
    }

    Ok(builder.finish())
}

struct DocumentBuilder {
    groups: Vec<UserAgentRule>,
    sitemaps: Vec<String>,
    current: usize,
    implicit_used: bool,
}

impl DocumentBuilder {
    fn new() -> Self {
        Self {
            groups: vec![UserAgentRule::new(WILDCARD_AGENT)],
            sitemaps: Vec::new(),
            current: 0,
            implicit_used: false,
        }
    }

    fn apply(
        &mut self,
        directive: Directive,
        value: &str,
        line_number: usize,
    ) -> Result<(), ParseError> {
        match directive {
            Directive::UserAgent => {
                self.groups.push(UserAgentRule::new(value));
                self.current = self.groups.len() - 1;
            }
            Directive::Disallow => {
                self.current_group().disallowed.insert(value.to_string());
            }
            Directive::Allow => {
                self.current_group().allowed.insert(value.to_string());
            }
            Directive::Sitemap => self.sitemaps.push(value.to_string()),
            Directive::CrawlDelay => {
                let delay = value
                    .parse::<i32>()
                    .map_err(|_| ParseError::InvalidCrawlDelay {
                        line_number,
                        value: value.to_string(),
                    })?;
                self.current_group().crawl_delay = delay;
            }
        }
        Ok(())
    }

    fn current_group(&mut self) -> &mut UserAgentRule {
        if self.current == 0 {
            self.implicit_used = true;
        }
        &mut self.groups[self.current]
    }

    fn finish(mut self) -> RobotsDocument {
        if !self.implicit_used {
            self.groups.remove(0);
        }
        RobotsDocument::new(self.groups, self.sitemaps)
    }
}

fn split_directive(line: &str) -> Option<(Directive, &str)> {
    DIRECTIVES.iter().find_map(|(prefix, directive)| {
        let head = line.get(..prefix.len())?;
        if head.eq_ignore_ascii_case(prefix) {
            Some((*directive, &line[prefix.len()..]))
        } else {
            None
        }
    })
}

// Only the space character is trimmed; tabs and other whitespace are kept.
fn trim_spaces(value: &str) -> &str {
    value.trim_matches(' ')
}

fn is_html_doctype(line: &str) -> bool {
    line.get(..HTML_DOCTYPE.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(HTML_DOCTYPE))
}
