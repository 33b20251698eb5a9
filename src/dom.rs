//! DOM Operations Adapter
//!
//! Thin layer over `dom_query` so the rest of the crate never touches the
//! HTML parser directly.

pub use dom_query::{Document, Selection};
pub use tendril::StrTendril;

use crate::encoding;

/// Parse normalized content into a document.
///
/// Non-ASCII characters are turned into character references first; the
/// parser decodes them back while building the tree.
#[must_use]
pub fn parse(content: &str) -> Document {
    let escaped = encoding::escape_non_ascii(content);
    Document::from(&*escaped)
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Attribute value compared ASCII case-insensitively against `expected`.
#[must_use]
pub fn attribute_eq(sel: &Selection, name: &str, expected: &str) -> bool {
    sel.attr(name)
        .is_some_and(|value| value.trim().eq_ignore_ascii_case(expected))
}

/// Get all text content of node and descendants
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Every element matching `selector`, in document order, one selection each.
#[must_use]
pub fn elements<'a>(doc: &'a Document, selector: &str) -> Vec<Selection<'a>> {
    doc.select(selector)
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .collect()
}

/// First element matching `selector`.
#[must_use]
pub fn first<'a>(doc: &'a Document, selector: &str) -> Option<Selection<'a>> {
    doc.select(selector).nodes().first().map(|node| Selection::from(*node))
}
