//! Result types for harvesting output.
//!
//! A `FetchResult` is built once per fetch and never changes afterwards;
//! every accessor is a plain read.

use std::sync::LazyLock;

use base64::{prelude::BASE64_STANDARD, Engine};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::links::{self, LinkEntry, LinkOptions};
use crate::metadata::image::{self, ImageFetcher, ImageMode};
use crate::metadata::Metadata;
use crate::url_utils::UrlComponents;

/// Match `data:image/<type>;base64,<payload>`
#[allow(clippy::expect_used)]
static IMAGE_DATA_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:(image/[A-Za-z0-9.+-]+);base64,([A-Za-z0-9+/=]*)$").expect("valid regex")
});

/// Rendered page with its extracted preview metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    pub(crate) status_code: u16,
    pub(crate) requested_url: UrlComponents,
    pub(crate) real_url: UrlComponents,
    pub(crate) content: String,
    pub(crate) base_path: Option<String>,
    pub(crate) links: Vec<LinkEntry>,
    pub(crate) metadata: Metadata,
    pub(crate) fetched_at: DateTime<Utc>,
}

impl FetchResult {
    /// Rendered HTML as UTF-8.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// URL handed to the renderer.
    #[must_use]
    pub fn requested_url(&self) -> &UrlComponents {
        &self.requested_url
    }

    /// URL that finally answered, after redirects.
    #[must_use]
    pub fn real_url(&self) -> &UrlComponents {
        &self.real_url
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.metadata.title.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.metadata.description.as_deref()
    }

    #[must_use]
    pub fn site_name(&self) -> Option<&str> {
        self.metadata.site_name.as_deref()
    }

    /// Absolute URL of the featured image.
    #[must_use]
    pub fn featured_image_url(&self) -> Option<&str> {
        self.metadata.image.as_deref()
    }

    /// Featured image as a URL or as a base64 data URI.
    ///
    /// `fetcher` is only used in [`ImageMode::Base64`].
    ///
    /// # Errors
    ///
    /// In base64 mode, a failed download, a non-200 response or a media
    /// type other than JPEG/PNG.
    pub fn featured_image(
        &self,
        mode: ImageMode,
        fetcher: &dyn ImageFetcher,
    ) -> Result<Option<String>> {
        image::render_featured_image(self.featured_image_url(), mode, fetcher)
    }

    /// Outbound links in document order.
    #[must_use]
    pub fn links(&self, options: LinkOptions) -> Vec<LinkEntry> {
        links::shape_links(&self.links, options)
    }

    /// Outbound link URLs without follow flags.
    #[must_use]
    pub fn link_urls(&self, options: LinkOptions) -> Vec<String> {
        self.links(options).into_iter().map(|link| link.url).collect()
    }

    #[must_use]
    pub fn is_indexable(&self) -> bool {
        self.metadata.robots.index
    }

    #[must_use]
    pub fn is_followable(&self) -> bool {
        self.metadata.robots.follow
    }

    /// Prefix relative links were resolved against, if one could be established.
    #[must_use]
    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// When the renderer output was processed.
    #[must_use]
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

/// Screenshot captured by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
    pub(crate) status_code: u16,
    pub(crate) requested_url: UrlComponents,
    pub(crate) real_url: UrlComponents,
    pub(crate) data_uri: String,
    pub(crate) fetched_at: DateTime<Utc>,
}

impl Screenshot {
    /// Build from a decoded content line.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedOutput`] unless `data_uri` is a base64 image data URI.
    pub(crate) fn new(
        status_code: u16,
        requested_url: UrlComponents,
        real_url: UrlComponents,
        data_uri: &str,
    ) -> Result<Self> {
        let data_uri = data_uri.trim();
        if !IMAGE_DATA_URI_RE.is_match(data_uri) {
            return Err(Error::MalformedOutput(
                "screenshot content is not a base64 image data URI".to_string(),
            ));
        }
        Ok(Self {
            status_code,
            requested_url,
            real_url,
            data_uri: data_uri.to_string(),
            fetched_at: Utc::now(),
        })
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    #[must_use]
    pub fn requested_url(&self) -> &UrlComponents {
        &self.requested_url
    }

    #[must_use]
    pub fn real_url(&self) -> &UrlComponents {
        &self.real_url
    }

    /// The `data:image/...;base64,...` line as emitted by the renderer.
    #[must_use]
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// Media type of the image, e.g. `image/png`.
    #[must_use]
    pub fn media_type(&self) -> &str {
        IMAGE_DATA_URI_RE
            .captures(&self.data_uri)
            .and_then(|c| c.get(1))
            .map_or("", |m| m.as_str())
    }

    /// Decoded image bytes.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedOutput`] when the payload is not valid base64.
    pub fn decode_image(&self) -> Result<Vec<u8>> {
        let payload = IMAGE_DATA_URI_RE
            .captures(&self.data_uri)
            .and_then(|c| c.get(2))
            .map_or("", |m| m.as_str());
        BASE64_STANDARD
            .decode(payload)
            .map_err(|err| Error::MalformedOutput(format!("screenshot payload: {err}")))
    }

    #[must_use]
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}
