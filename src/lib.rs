//! # web-harvester
//!
//! Link-preview harvesting from headless-renderer output.
//!
//! A renderer loads a page and prints three header lines (status code,
//! requested URL, real URL) followed by the rendered HTML. This crate
//! decodes that output, normalizes each content line to UTF-8, and extracts
//! what a link preview needs: title, description, site name, featured image,
//! outbound links and robots directives.
//!
//! ## Quick Start
//!
//! ```rust
//! use web_harvester::{harvest_lines, LinkOptions, Options};
//!
//! let lines = [
//!     "200",
//!     "http://example.com",
//!     "https://example.com/",
//!     "<html><head><title>Hello</title></head>",
//!     "<body><a href=\"/about\">About</a></body></html>",
//! ];
//!
//! let result = harvest_lines(&lines, &Options::default())?;
//! assert_eq!(result.title(), Some("Hello"));
//! assert_eq!(result.link_urls(LinkOptions::default()), vec!["https://example.com/about"]);
//! # Ok::<(), web_harvester::Error>(())
//! ```
//!
//! ## Rendering
//!
//! Spawning the renderer is left to a [`Renderer`] implementation;
//! [`Harvester`] calls it and runs the pipeline on what it returns.

mod error;
mod extract;
mod options;
mod result;

/// DOM adapter over `dom_query`.
pub mod dom;

/// Renderer output line protocol.
pub mod protocol;

/// Per-line charset detection and transcoding.
pub mod encoding;

/// Base URL of a document.
pub mod base;

/// URL components, canonical form and relative resolution.
pub mod url_utils;

/// Outbound link collection.
pub mod links;

/// Preview metadata and robots directives.
pub mod metadata;

/// Renderer trait and fetch orchestration.
pub mod harvester;

// Public API - re-exports
pub use encoding::Charset;
pub use error::{Error, Result};
pub use harvester::{Harvester, RenderMode, Renderer};
pub use links::{LinkEntry, LinkOptions};
pub use metadata::{HttpImageFetcher, ImageFetcher, ImageMode, Metadata, RobotsDirectives};
pub use options::{Options, RendererOptions};
pub use result::{FetchResult, Screenshot};
pub use url_utils::UrlComponents;

/// Build a [`FetchResult`] from renderer output lines.
///
/// # Errors
///
/// [`Error::MalformedOutput`] when the header lines are missing or invalid,
/// [`Error::EncodingDetection`] when a content line matches no charset in
/// `options.charsets`.
pub fn harvest_lines<L: AsRef<[u8]>>(lines: &[L], options: &Options) -> Result<FetchResult> {
    let output = protocol::decode_output(lines)?;
    extract::build_fetch_result(output, options)
}

/// Build a [`FetchResult`] from raw renderer stdout.
///
/// # Example
///
/// ```rust
/// use web_harvester::{harvest_bytes, Options};
///
/// // Latin-1 content line
/// let raw = b"200\nhttp://example.com\nhttp://example.com\n<title>Caf\xE9</title>\n";
/// let result = harvest_bytes(raw, &Options::default())?;
/// assert_eq!(result.title(), Some("Café"));
/// # Ok::<(), web_harvester::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn harvest_bytes(raw: &[u8], options: &Options) -> Result<FetchResult> {
    harvest_lines(&protocol::split_lines(raw), options)
}

/// Build a [`Screenshot`] from renderer output lines.
///
/// # Errors
///
/// [`Error::MalformedOutput`] when the header lines are invalid or the
/// first content line is not a base64 image data URI.
pub fn screenshot_lines<L: AsRef<[u8]>>(lines: &[L]) -> Result<Screenshot> {
    let output = protocol::decode_output(lines)?;
    extract::build_screenshot(output)
}
