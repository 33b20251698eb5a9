//! Outbound link collection.
//!
//! Every anchor is resolved against the document base and annotated with
//! its follow status. The list never holds two entries with the same URL.
//!
//! Anchors whose href has a scheme but no host (`mailto:`, `tel:`, `data:`,
//! `javascript:`) are dropped, not appended to the base.

use std::collections::HashSet;

use dom_query::Document;
use serde::{Deserialize, Serialize};

use crate::dom;
use crate::url_utils::{self, resolve_url};

/// One outbound link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    /// Absolute URL.
    pub url: String,
    /// `false` when the anchor is marked `nofollow`.
    pub follow: bool,
}

/// How [`FetchResult::links`](crate::FetchResult::links) shapes its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkOptions {
    /// Return `scheme://host/path` only, re-deduplicating afterwards.
    pub strip_query: bool,
}

/// Collect every `<a href>` of `doc` as an absolute link.
///
/// Anchors that fail to resolve are skipped, as is anything containing
/// `javascript:`. The first occurrence of a URL wins; later duplicates are
/// discarded even if their follow status differs.
#[must_use]
pub fn collect_links(doc: &Document, base: &str) -> Vec<LinkEntry> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in dom::elements(doc, "a[href]") {
        let Some(href) = dom::get_attribute(&anchor, "href") else {
            continue;
        };
        let Some(url) = resolve_url(&href, base) else {
            tracing::debug!(href = %href, "skipping unresolvable link");
            continue;
        };
        if url.contains("javascript:") {
            continue;
        }
        if !seen.insert(url.clone()) {
            continue;
        }

        let rel = dom::get_attribute(&anchor, "rel").unwrap_or_default();
        links.push(LinkEntry {
            url,
            follow: !is_nofollow(&href, &rel),
        });
    }

    links
}

/// `nofollow` appears in the raw href or in the `rel` attribute.
fn is_nofollow(href: &str, rel: &str) -> bool {
    href.to_lowercase().contains("nofollow") || rel.to_lowercase().contains("nofollow")
}

/// Apply `options` to a collected link list.
#[must_use]
pub fn shape_links(links: &[LinkEntry], options: LinkOptions) -> Vec<LinkEntry> {
    if !options.strip_query {
        return links.to_vec();
    }

    let mut seen = HashSet::new();
    links
        .iter()
        .filter_map(|link| {
            let url = url_utils::strip_query(&link.url)?;
            seen.insert(url.clone()).then_some(LinkEntry {
                url,
                follow: link.follow,
            })
        })
        .collect()
}
