//! Page-level robots directives from `<meta name="robots">`.

use dom_query::Document;
use serde::{Deserialize, Serialize};

use crate::dom;

/// Indexing directives of a page. Permissive unless the page says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsDirectives {
    pub index: bool,
    pub follow: bool,
}

impl Default for RobotsDirectives {
    fn default() -> Self {
        Self {
            index: true,
            follow: true,
        }
    }
}

/// Read the first `meta[name=robots]`; later ones are ignored.
#[must_use]
pub fn read_robots(doc: &Document) -> RobotsDirectives {
    let Some(meta) = dom::elements(doc, "meta[name]")
        .into_iter()
        .find(|meta| dom::attribute_eq(meta, "name", "robots"))
    else {
        return RobotsDirectives::default();
    };

    let content = dom::get_attribute(&meta, "content")
        .unwrap_or_default()
        .to_lowercase();
    RobotsDirectives {
        index: !content.contains("noindex"),
        follow: !content.contains("nofollow"),
    }
}
