//! HTML Meta Tag Extraction
//!
//! Title, description, site name and image come from ranked rules over the
//! document's `<meta>` tags. A rule lists its sources in precedence order
//! (Open Graph, then Twitter card, then generic meta); the first source with
//! any candidate decides the value. Within a source the rule's tie-break
//! picks among several matching tags.

use dom_query::Document;

use crate::dom;
use crate::encoding;

/// Naming convention a meta key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// `og:*`, matched on `property` (or `name`, which many pages use).
    OpenGraph,
    /// `twitter:*`, matched on `name` (or `property`).
    TwitterCard,
    /// Plain `<meta name=...>`.
    Meta,
}

/// How to choose between several candidates from the same source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    /// Longest value wins; pages often emit a truncated and a full variant.
    Longest,
    /// First value in document order wins.
    First,
}

/// Extraction rule for one metadata field.
#[derive(Debug, Clone, Copy)]
pub struct MetadataRule {
    /// Sources in precedence order, each with the keys it accepts.
    pub sources: &'static [(Source, &'static [&'static str])],
    pub tie_break: TieBreak,
    /// Fall back to the `<title>` element when no meta tag matches.
    pub title_fallback: bool,
}

pub const TITLE_RULE: MetadataRule = MetadataRule {
    sources: &[
        (Source::OpenGraph, &["og:title"]),
        (Source::TwitterCard, &["twitter:title"]),
        (Source::Meta, &["title"]),
    ],
    tie_break: TieBreak::Longest,
    title_fallback: true,
};

pub const DESCRIPTION_RULE: MetadataRule = MetadataRule {
    sources: &[
        (Source::OpenGraph, &["og:description"]),
        (Source::TwitterCard, &["twitter:description"]),
        (Source::Meta, &["description"]),
    ],
    tie_break: TieBreak::Longest,
    title_fallback: false,
};

pub const SITE_NAME_RULE: MetadataRule = MetadataRule {
    sources: &[
        (Source::OpenGraph, &["og:site_name"]),
        (Source::TwitterCard, &["twitter:site"]),
        (Source::Meta, &["application-name"]),
    ],
    tie_break: TieBreak::Longest,
    title_fallback: false,
};

pub const IMAGE_RULE: MetadataRule = MetadataRule {
    sources: &[
        (Source::OpenGraph, &["og:image"]),
        (Source::TwitterCard, &["twitter:image", "twitter:image:src"]),
    ],
    tie_break: TieBreak::First,
    title_fallback: false,
};

/// One `<meta>` element, keys lower-cased.
#[derive(Debug, Clone, Default)]
pub struct MetaTag {
    pub name: Option<String>,
    pub property: Option<String>,
    pub content: Option<String>,
}

impl MetaTag {
    fn key_matches(&self, source: Source, keys: &[&str]) -> bool {
        let hit = |attr: &Option<String>| attr.as_deref().is_some_and(|k| keys.contains(&k));
        match source {
            Source::OpenGraph | Source::TwitterCard => hit(&self.property) || hit(&self.name),
            Source::Meta => hit(&self.name),
        }
    }
}

/// Read every `<meta>` element once.
#[must_use]
pub fn scan_meta(doc: &Document) -> Vec<MetaTag> {
    dom::elements(doc, "meta")
        .iter()
        .map(|meta| MetaTag {
            name: dom::get_attribute(meta, "name").map(|n| n.trim().to_ascii_lowercase()),
            property: dom::get_attribute(meta, "property").map(|p| p.trim().to_ascii_lowercase()),
            content: dom::get_attribute(meta, "content"),
        })
        .collect()
}

/// Trim and entity-decode a value; empty values are absent.
#[must_use]
pub fn clean_value(raw: &str) -> Option<String> {
    let decoded = encoding::decode_entities(raw.trim());
    let trimmed = decoded.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Evaluate `rule` against scanned meta tags.
#[must_use]
pub fn apply_rule(doc: &Document, metas: &[MetaTag], rule: &MetadataRule) -> Option<String> {
    for (source, keys) in rule.sources {
        let candidates = metas
            .iter()
            .filter(|meta| meta.key_matches(*source, keys))
            .filter_map(|meta| meta.content.as_deref().and_then(clean_value));

        if let Some(value) = pick(candidates, rule.tie_break) {
            return Some(value);
        }
    }

    if rule.title_fallback {
        return title_element(doc);
    }
    None
}

fn pick(mut candidates: impl Iterator<Item = String>, tie_break: TieBreak) -> Option<String> {
    match tie_break {
        TieBreak::First => candidates.next(),
        TieBreak::Longest => candidates.fold(None, |best: Option<String>, candidate| match best {
            Some(current) if current.chars().count() >= candidate.chars().count() => Some(current),
            _ => Some(candidate),
        }),
    }
}

/// Text of the first `<title>` element.
#[must_use]
pub fn title_element(doc: &Document) -> Option<String> {
    let title = dom::first(doc, "title")?;
    clean_value(&dom::text_content(&title))
}
