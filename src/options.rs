//! Configuration options for harvesting.
//!
//! `Options` controls the post-fetch pipeline. `RendererOptions` is carried
//! through untouched to the [`Renderer`](crate::Renderer) implementation.

use std::time::Duration;

use crate::encoding::{Charset, DEFAULT_CHARSETS};

/// Default timeout for fetching a featured image as a data URI.
pub const IMAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration options for the harvesting pipeline.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use web_harvester::Options;
///
/// let options = Options {
///     image_timeout: Duration::from_secs(3),
///     ..Options::default()
/// };
/// assert_eq!(options.renderer.resource_timeout_ms, 2500);
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Charsets tested against each content line, in priority order.
    ///
    /// The first charset that validates a line wins. If none does, the
    /// whole fetch fails with [`Error::EncodingDetection`](crate::Error).
    ///
    /// Default: [`DEFAULT_CHARSETS`]
    pub charsets: Vec<Charset>,

    /// Connect and read timeout for the featured image download.
    ///
    /// Default: `10s`
    pub image_timeout: Duration,

    /// User agent sent when downloading the featured image.
    ///
    /// Default: `None` (reqwest's default)
    pub image_user_agent: Option<String>,

    /// Settings passed through to the renderer.
    pub renderer: RendererOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            charsets: DEFAULT_CHARSETS.to_vec(),
            image_timeout: IMAGE_FETCH_TIMEOUT,
            image_user_agent: None,
            renderer: RendererOptions::default(),
        }
    }
}

/// Settings for the external renderer.
///
/// None of these affect extraction; they exist so callers configure the
/// renderer in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct RendererOptions {
    /// User agent the renderer presents. `None` keeps the renderer's own.
    pub user_agent: Option<String>,

    /// Milliseconds to wait for each sub-resource (css, fonts, images).
    ///
    /// Default: `2500`
    pub resource_timeout_ms: u64,

    /// Milliseconds to wait after the load event, e.g. for late AJAX content.
    ///
    /// Default: `0`
    pub wait_after_load_ms: u64,

    /// Continue on TLS certificate errors.
    ///
    /// Default: `true`
    pub ignore_ssl_errors: bool,

    /// Overall time budget in milliseconds. `0` means no limit.
    ///
    /// Default: `0`
    pub max_execution_time_ms: u64,

    /// Wait for images while loading.
    ///
    /// Default: `false`
    pub load_images: bool,

    /// Execute page JavaScript.
    ///
    /// Default: `true`
    pub exec_javascript: bool,

    /// Enforce same-origin policy in the renderer.
    ///
    /// Default: `true`
    pub web_security: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            resource_timeout_ms: 2500,
            wait_after_load_ms: 0,
            ignore_ssl_errors: true,
            max_execution_time_ms: 0,
            load_images: false,
            exec_javascript: true,
            web_security: true,
        }
    }
}

impl RendererOptions {
    /// Overall time budget, or `None` when unlimited.
    #[must_use]
    pub fn max_execution_time(&self) -> Option<Duration> {
        (self.max_execution_time_ms > 0).then(|| Duration::from_millis(self.max_execution_time_ms))
    }
}
