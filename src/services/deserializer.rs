// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Sitemap XML to struct mapping.
//!
//! Elements are matched by local name, so documents that omit the sitemap
//! namespace, declare the `http`/`https` variant, or use a prefix all read
//! the same. Only `<loc>`, `<lastmod>`, `<changefreq>` and `<priority>`
//! directly under an entry are read; extension elements such as
//! `<image:image><image:loc/></image:image>` are skipped.

use crate::error::{DeserializationError, XmlError};
use crate::models::sitemap::{SitemapDocument, SitemapEntry, UrlEntry};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use tracing::debug;

const SITEMAP_INDEX_ROOT: &str = "sitemapindex";
const SITEMAP_ENTRY: &str = "sitemap";
const URLSET_ROOT: &str = "urlset";
const URL_ENTRY: &str = "url";

/// Empty `<loc>` forms some generators emit for entries without a location
const MALFORMED_LOC_TAGS: [&str; 3] = ["<loc/>", "<loc />", "<loc></loc>"];

/// Fields read from the direct children of one entry element
#[derive(Debug, Default)]
struct RawEntry {
    loc: Option<String>,
    lastmod: Option<String>,
    changefreq: Option<String>,
    priority: Option<String>,
}

impl RawEntry {
    fn set(&mut self, field: &str, value: String) {
        match field {
            "loc" => self.loc = Some(value),
            "lastmod" => self.lastmod = Some(value),
            "changefreq" => self.changefreq = Some(value),
            "priority" => self.priority = Some(value),
            _ => {}
        }
    }
}

/// What to do with an entry whose `<loc>` is missing or empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Incomplete {
    Reject,
    Drop,
}

/// Read a `<sitemapindex>` document
pub fn deserialize_sitemap_index(xml: &str) -> Result<Vec<SitemapEntry>, XmlError> {
    read_index(xml, Incomplete::Reject)
}

/// Read a `<urlset>` document
pub fn deserialize_urlset(xml: &str) -> Result<Vec<UrlEntry>, XmlError> {
    read_urlset(xml, Incomplete::Reject)
}

/// Read a payload as a sitemap index first, then as a urlset.
///
/// With `repair` set, a payload failing both is retried once after
/// [`strip_malformed`], dropping entries left without a location.
pub fn deserialize(url: &str, xml: &str, repair: bool) -> Result<SitemapDocument, DeserializationError> {
    let cause = match read_document(xml, Incomplete::Reject) {
        Ok(document) => return Ok(document),
        Err(cause) => cause,
    };

    if !repair {
        return Err(DeserializationError {
            url: url.to_string(),
            cause,
        });
    }

    debug!(error = %cause, "retrying sitemap after stripping malformed constructs");
    read_document(&strip_malformed(xml), Incomplete::Drop).map_err(|_| DeserializationError {
        url: url.to_string(),
        cause,
    })
}

/// Remove self-closing and empty `<loc>` tags
pub fn strip_malformed(xml: &str) -> Cow<'_, str> {
    if !MALFORMED_LOC_TAGS.iter().any(|tag| xml.contains(tag)) {
        return Cow::Borrowed(xml);
    }

    let mut repaired = xml.to_string();
    for tag in MALFORMED_LOC_TAGS {
        repaired = repaired.replace(tag, "");
    }
    Cow::Owned(repaired)
}

fn read_document(xml: &str, incomplete: Incomplete) -> Result<SitemapDocument, XmlError> {
    let index_error = match read_index(xml, incomplete) {
        Ok(entries) => return Ok(SitemapDocument::Index(entries)),
        Err(e) => e,
    };

    match read_urlset(xml, incomplete) {
        Ok(entries) => Ok(SitemapDocument::UrlSet(entries)),
        // Report the index failure when the payload really was an index
        Err(urlset_error) => match index_error {
            XmlError::UnexpectedRoot { .. } => Err(urlset_error),
            other => Err(other),
        },
    }
}

fn read_index(xml: &str, incomplete: Incomplete) -> Result<Vec<SitemapEntry>, XmlError> {
    let raw = read_entries(xml, SITEMAP_INDEX_ROOT, SITEMAP_ENTRY, incomplete)?;
    Ok(raw
        .into_iter()
        .filter_map(|entry| {
            Some(SitemapEntry {
                loc: entry.loc?,
                lastmod: entry.lastmod,
            })
        })
        .collect())
}

fn read_urlset(xml: &str, incomplete: Incomplete) -> Result<Vec<UrlEntry>, XmlError> {
    let raw = read_entries(xml, URLSET_ROOT, URL_ENTRY, incomplete)?;
    Ok(raw
        .into_iter()
        .filter_map(|entry| {
            Some(UrlEntry {
                loc: entry.loc?,
                lastmod: entry.lastmod,
                changefreq: entry.changefreq,
                priority: entry.priority,
            })
        })
        .collect())
}

/// Cursor state while walking one document
struct EntryReader<'a> {
    root: &'static str,
    entry: &'a str,
    incomplete: Incomplete,
    depth: usize,
    root_seen: bool,
    current: Option<RawEntry>,
    field: Option<(String, String)>,
    entries: Vec<RawEntry>,
}

fn read_entries(
    xml: &str,
    root: &'static str,
    entry: &str,
    incomplete: Incomplete,
) -> Result<Vec<RawEntry>, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut state = EntryReader {
        root,
        entry,
        incomplete,
        depth: 0,
        root_seen: false,
        current: None,
        field: None,
        entries: Vec::new(),
    };

    loop {
        let event = reader
            .read_event()
            .map_err(|e| XmlError::Syntax(e.to_string()))?;
        match event {
            Event::Start(e) => state.open(&e)?,
            Event::Empty(e) => state.empty(&e)?,
            Event::End(_) => state.close()?,
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| XmlError::Syntax(e.to_string()))?;
                state.text(&text);
            }
            Event::CData(c) => state.text(&String::from_utf8_lossy(&c)),
            Event::Eof => break,
            _ => {}
        }
    }

    state.finish()
}

impl EntryReader<'_> {
    fn open(&mut self, element: &BytesStart<'_>) -> Result<(), XmlError> {
        self.depth += 1;
        let name = local_name(element);
        match self.depth {
            1 => self.check_root(&name)?,
            2 if name == self.entry => self.current = Some(RawEntry::default()),
            3 if self.current.is_some() => self.field = Some((name, String::new())),
            _ => {}
        }
        Ok(())
    }

    fn empty(&mut self, element: &BytesStart<'_>) -> Result<(), XmlError> {
        let name = local_name(element);
        match self.depth + 1 {
            1 => self.check_root(&name),
            2 if name == self.entry => {
                self.current = Some(RawEntry::default());
                self.finish_entry()
            }
            3 if name == "loc" && self.current.is_some() => match self.incomplete {
                Incomplete::Reject => Err(XmlError::EmptyLoc {
                    entry_index: self.entries.len(),
                }),
                Incomplete::Drop => Ok(()),
            },
            _ => Ok(()),
        }
    }

    fn close(&mut self) -> Result<(), XmlError> {
        match self.depth {
            3 => self.finish_field(),
            2 if self.current.is_some() => self.finish_entry()?,
            _ => {}
        }
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if self.depth == 3 {
            if let Some((_, value)) = self.field.as_mut() {
                value.push_str(text);
            }
        }
    }

    fn check_root(&mut self, name: &str) -> Result<(), XmlError> {
        if name != self.root {
            return Err(XmlError::UnexpectedRoot {
                expected: self.root,
                found: name.to_string(),
            });
        }
        self.root_seen = true;
        Ok(())
    }

    fn finish_field(&mut self) {
        if let (Some((name, value)), Some(entry)) = (self.field.take(), self.current.as_mut()) {
            entry.set(&name, value.trim().to_string());
        }
    }

    fn finish_entry(&mut self) -> Result<(), XmlError> {
        let Some(entry) = self.current.take() else {
            return Ok(());
        };
        let entry_index = self.entries.len();

        let problem = match entry.loc.as_deref() {
            None => Some(XmlError::MissingLoc { entry_index }),
            Some("") => Some(XmlError::EmptyLoc { entry_index }),
            Some(_) => None,
        };

        match (problem, self.incomplete) {
            (None, _) => self.entries.push(entry),
            (Some(_), Incomplete::Drop) => {}
            (Some(error), Incomplete::Reject) => return Err(error),
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<RawEntry>, XmlError> {
        if self.depth != 0 {
            return Err(XmlError::Syntax("unexpected end of document".to_string()));
        }
        if !self.root_seen {
            return Err(XmlError::Empty);
        }
        Ok(self.entries)
    }
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}
