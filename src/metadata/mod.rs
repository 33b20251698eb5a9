//! Metadata extraction module.
//!
//! Preview metadata (title, description, site name, featured image) and
//! robots directives, read from a parsed document in one pass over its
//! `<meta>` tags.

pub mod image;
pub mod meta_tags;
pub mod robots;

use dom_query::Document;
use serde::{Deserialize, Serialize};

use crate::url_utils::resolve_url;

pub use image::{FetchedImage, HttpImageFetcher, ImageFetcher, ImageMode};
pub use meta_tags::{MetadataRule, Source, TieBreak};
pub use robots::RobotsDirectives;

/// Metadata extracted from a rendered page.
///
/// Every string is trimmed and entity-decoded; absent values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub site_name: Option<String>,
    /// Featured image, resolved to an absolute URL.
    pub image: Option<String>,
    pub robots: RobotsDirectives,
}

/// Extract all metadata from a document.
///
/// `base` is the document base from [`base_path`](crate::base::base_path);
/// without one only an already-absolute image URL survives.
#[must_use]
pub fn extract_metadata(doc: &Document, base: Option<&str>) -> Metadata {
    let metas = meta_tags::scan_meta(doc);

    let image = meta_tags::apply_rule(doc, &metas, &meta_tags::IMAGE_RULE).and_then(|raw| {
        let resolved = resolve_url(&raw, base.unwrap_or_default());
        if resolved.is_none() {
            tracing::debug!(image = %raw, "featured image did not resolve");
        }
        resolved
    });

    Metadata {
        title: meta_tags::apply_rule(doc, &metas, &meta_tags::TITLE_RULE),
        description: meta_tags::apply_rule(doc, &metas, &meta_tags::DESCRIPTION_RULE),
        site_name: meta_tags::apply_rule(doc, &metas, &meta_tags::SITE_NAME_RULE),
        image,
        robots: robots::read_robots(doc),
    }
}
