//! Error types for web-harvester.
//!
//! Structural failures (bad renderer output, undecodable content, renderer
//! exit) abort a fetch. Item-level failures such as one unparseable link are
//! skipped where they occur and never reach the caller.

/// Error type for harvesting operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The renderer output did not follow the line protocol.
    #[error("Malformed renderer output: {0}")]
    MalformedOutput(String),

    /// No configured charset validated against a content line.
    #[error("Encoding detection failed for content line {line}")]
    EncodingDetection {
        /// Zero-based index of the content line (not counting header lines).
        line: usize,
    },

    /// A URL or `<base href>` could not be parsed.
    #[error("URL parsing failed: {0}")]
    UrlParse(String),

    /// A base URL could not be established because no host is known.
    #[error("No host available to build a base URL")]
    MissingHost,

    /// The featured image was fetched but is not JPEG or PNG.
    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    /// The featured image could not be fetched.
    #[error("Image fetch failed: {0}")]
    ImageFetch(String),

    /// The caller asked for an output mode that does not exist.
    #[error("Invalid extraction mode: {0}")]
    InvalidMode(String),

    /// The renderer process failed (non-zero exit, timeout, spawn error).
    #[error("Renderer failed: {0}")]
    Renderer(String),

    /// An empty URL was passed to the harvester.
    #[error("Empty URL")]
    EmptyUrl,
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::ImageFetch(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::UrlParse(err.to_string())
    }
}

/// Result type alias for harvesting operations.
pub type Result<T> = std::result::Result<T, Error>;
