//! Fetch orchestration.
//!
//! A [`Harvester`] drives a [`Renderer`] and runs the post-render pipeline
//! on its output. It holds no per-fetch state: every `load` returns a new
//! [`FetchResult`].

use crate::error::{Error, Result};
use crate::extract;
use crate::metadata::HttpImageFetcher;
use crate::options::{Options, RendererOptions};
use crate::protocol;
use crate::result::{FetchResult, Screenshot};

/// What the renderer is asked to produce after the three header lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Rendered HTML, one or more lines.
    Page,
    /// One `data:image/...;base64,...` line.
    Screenshot,
}

/// A headless page renderer.
///
/// Implementations usually spawn an external process; the returned lines
/// are its standard output, split on `\n`.
pub trait Renderer {
    /// Render `url`.
    ///
    /// # Errors
    ///
    /// [`Error::Renderer`] when the renderer fails. No partial output is
    /// returned in that case.
    fn render(&self, url: &str, mode: RenderMode, options: &RendererOptions) -> Result<Vec<Vec<u8>>>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn render(&self, url: &str, mode: RenderMode, options: &RendererOptions) -> Result<Vec<Vec<u8>>> {
        (**self).render(url, mode, options)
    }
}

/// Renders pages and extracts their previews.
#[derive(Debug, Clone)]
pub struct Harvester<R> {
    renderer: R,
    options: Options,
}

impl<R: Renderer> Harvester<R> {
    /// Harvester with default [`Options`].
    #[must_use]
    pub fn new(renderer: R) -> Self {
        Self::with_options(renderer, Options::default())
    }

    #[must_use]
    pub fn with_options(renderer: R, options: Options) -> Self {
        Self { renderer, options }
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Render `url` and build its [`FetchResult`].
    ///
    /// # Errors
    ///
    /// [`Error::EmptyUrl`] for a blank URL, otherwise any renderer, protocol
    /// or encoding failure.
    pub fn load(&self, url: &str) -> Result<FetchResult> {
        let lines = self.render(url, RenderMode::Page)?;
        protocol::decode_output(&lines)
            .and_then(|output| extract::build_fetch_result(output, &self.options))
            .inspect_err(|err| tracing::warn!(url, error = %err, "fetch aborted"))
    }

    /// Render `url` as a screenshot.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyUrl`] for a blank URL, a renderer failure, or
    /// [`Error::MalformedOutput`] when the output is not an image data URI.
    pub fn take_screenshot(&self, url: &str) -> Result<Screenshot> {
        let lines = self.render(url, RenderMode::Screenshot)?;
        protocol::decode_output(&lines)
            .and_then(extract::build_screenshot)
            .inspect_err(|err| tracing::warn!(url, error = %err, "screenshot aborted"))
    }

    /// HTTP client for [`FetchResult::featured_image`] using these options.
    ///
    /// # Errors
    ///
    /// [`Error::ImageFetch`] when the HTTP client cannot be built.
    pub fn image_fetcher(&self) -> Result<HttpImageFetcher> {
        HttpImageFetcher::new(&self.options)
    }

    fn render(&self, url: &str, mode: RenderMode) -> Result<Vec<Vec<u8>>> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::EmptyUrl);
        }
        tracing::debug!(url, ?mode, "rendering");
        self.renderer
            .render(url, mode, &self.options.renderer)
            .inspect_err(|err| tracing::warn!(url, error = %err, "renderer failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Replays canned output and records every call.
    struct StubRenderer {
        page: Vec<&'static str>,
        calls: RefCell<Vec<(String, RenderMode)>>,
    }

    impl StubRenderer {
        fn new(page: Vec<&'static str>) -> Self {
            Self {
                page,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Renderer for StubRenderer {
        fn render(&self, url: &str, mode: RenderMode, _options: &RendererOptions) -> Result<Vec<Vec<u8>>> {
            self.calls.borrow_mut().push((url.to_string(), mode));
            Ok(self.page.iter().map(|line| line.as_bytes().to_vec()).collect())
        }
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn render(&self, _url: &str, _mode: RenderMode, _options: &RendererOptions) -> Result<Vec<Vec<u8>>> {
            Err(Error::Renderer("exit status 1".to_string()))
        }
    }

    #[test]
    fn test_empty_url_rejected() {
        let renderer = StubRenderer::new(vec!["200", "a", "b"]);
        let harvester = Harvester::new(&renderer);

        assert!(matches!(harvester.load("  "), Err(Error::EmptyUrl)));
        assert!(matches!(harvester.take_screenshot(""), Err(Error::EmptyUrl)));
        assert!(renderer.calls.borrow().is_empty());
    }

    #[test]
    fn test_load_passes_page_mode() {
        let renderer = StubRenderer::new(vec![
            "200",
            "http://example.com",
            "https://example.com/",
            "<title>Home</title>",
        ]);
        let harvester = Harvester::new(&renderer);

        let result = match harvester.load(" http://example.com ") {
            Ok(result) => result,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };
        assert_eq!(result.title(), Some("Home"));
        assert_eq!(
            renderer.calls.borrow().as_slice(),
            &[("http://example.com".to_string(), RenderMode::Page)]
        );
    }

    #[test]
    fn test_renderer_failure_propagates() {
        let harvester = Harvester::new(FailingRenderer);
        assert!(matches!(harvester.load("http://a.test"), Err(Error::Renderer(_))));
    }

    #[test]
    fn test_each_load_is_independent() {
        let renderer = StubRenderer::new(vec!["200", "http://a.test", "http://a.test/", "<title>A</title>"]);
        let harvester = Harvester::new(&renderer);

        let first = harvester.load("http://a.test");
        let second = harvester.load("http://a.test");
        assert!(first.is_ok_and(|f| second.is_ok_and(|s| f.title() == s.title())));
        assert_eq!(renderer.calls.borrow().len(), 2);
    }

    #[test]
    fn test_screenshot_mode() {
        let renderer = StubRenderer::new(vec![
            "200",
            "http://a.test",
            "http://a.test/",
            "data:image/png;base64,AAAA",
        ]);
        let harvester = Harvester::new(&renderer);

        assert!(harvester
            .take_screenshot("http://a.test")
            .is_ok_and(|shot| shot.decode_image().is_ok_and(|bytes| bytes == vec![0, 0, 0])));
        assert_eq!(renderer.calls.borrow()[0].1, RenderMode::Screenshot);
    }
}
