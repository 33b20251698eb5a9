//! URL Utility Functions
//!
//! Parsing of renderer-reported URLs into components, and resolution of
//! `href` values into canonical absolute URLs.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use url::{ParseError, Url};

/// Throwaway base used only to validate the authority of `//host/path` references.
#[allow(clippy::expect_used)]
static NETWORK_PATH_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://network-path.invalid/").expect("valid base URL"));

/// Components of a URL string, parsed once.
///
/// Only `full` is always present. Relative references keep whatever parts
/// they carry (`/a?b` has a path and a query but no scheme or host).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlComponents {
    /// The string exactly as given.
    pub full: String,
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl UrlComponents {
    /// Parse a URL or relative reference.
    ///
    /// Returns `None` when the string cannot be a URL at all (for example
    /// `http://` with no host, or an invalid domain).
    #[must_use]
    pub fn parse(full: &str) -> Option<Self> {
        let trimmed = full.trim();
        match Url::parse(trimmed) {
            Ok(url) => Some(Self::from_url(full, &url)),
            Err(ParseError::RelativeUrlWithoutBase) => Self::from_relative(full, trimmed),
            Err(_) => None,
        }
    }

    /// Components of a string that failed to parse, keeping only `full`.
    #[must_use]
    pub fn unparsed(full: &str) -> Self {
        Self {
            full: full.to_string(),
            ..Self::default()
        }
    }

    fn from_url(full: &str, url: &Url) -> Self {
        Self {
            full: full.to_string(),
            scheme: Some(url.scheme().to_string()),
            host: url.host_str().map(str::to_string),
            port: url.port(),
            path: non_empty(url.path()),
            query: url.query().map(str::to_string),
            fragment: url.fragment().map(str::to_string),
        }
    }

    fn from_relative(full: &str, reference: &str) -> Option<Self> {
        if reference.starts_with("//") {
            // Scheme-relative: the authority is real, only the scheme is missing.
            let url = NETWORK_PATH_BASE.join(reference).ok()?;
            url.host_str()?;
            return Some(Self {
                scheme: None,
                ..Self::from_url(full, &url)
            });
        }

        let (rest, fragment) = split_off(reference, '#');
        let (path, query) = split_off(rest, '?');
        Some(Self {
            full: full.to_string(),
            scheme: None,
            host: None,
            port: None,
            path: non_empty(path),
            query: query.map(str::to_string),
            fragment: fragment.map(str::to_string),
        })
    }

    /// Whether this URL carries a host.
    #[must_use]
    pub fn has_host(&self) -> bool {
        self.host.as_deref().is_some_and(|h| !h.is_empty())
    }

    /// Rebuild as `scheme://host/path?query`, or `None` without a host.
    ///
    /// The scheme defaults to `http`. Port, userinfo and fragment are dropped.
    #[must_use]
    pub fn canonical(&self, with_query: bool) -> Option<String> {
        let host = self.host.as_deref().filter(|h| !h.is_empty())?;
        let scheme = self.scheme.as_deref().unwrap_or("http");
        let mut out = format!("{scheme}://{host}{}", self.path.as_deref().unwrap_or(""));
        if with_query {
            if let Some(query) = &self.query {
                out.push('?');
                out.push_str(query);
            }
        }
        Some(out)
    }
}

fn split_off(s: &str, delimiter: char) -> (&str, Option<&str>) {
    match s.split_once(delimiter) {
        Some((before, after)) => (before, Some(after)),
        None => (s, None),
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Resolve an `href` into a canonical absolute URL.
///
/// * empty or unparseable input gives `None`;
/// * a reference without a host is relative: its fragment is dropped, one
///   leading `/` is stripped and the rest is appended to `base`;
/// * a reference with a host is rebuilt canonically (see
///   [`UrlComponents::canonical`]);
/// * a reference with a scheme but no host (`mailto:`, `javascript:`) gives `None`.
///
/// # Examples
/// ```
/// use web_harvester::url_utils::resolve_url;
///
/// let base = "https://example.com/";
/// assert_eq!(resolve_url("/foo?x=1", base).as_deref(), Some("https://example.com/foo?x=1"));
/// assert_eq!(resolve_url("//cdn.example.com/a.png", base).as_deref(), Some("http://cdn.example.com/a.png"));
/// assert_eq!(resolve_url("mailto:me@example.com", base), None);
/// ```
#[must_use]
pub fn resolve_url(raw: &str, base: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parts = UrlComponents::parse(raw)?;
    if parts.has_host() {
        return parts.canonical(true);
    }
    if parts.scheme.is_some() {
        return None;
    }

    let (without_fragment, _) = split_off(raw, '#');
    let relative = without_fragment.strip_prefix('/').unwrap_or(without_fragment);
    UrlComponents::parse(&format!("{base}{relative}"))?.canonical(true)
}

/// Drop the query of an absolute URL, keeping scheme, host and path.
#[must_use]
pub fn strip_query(absolute: &str) -> Option<String> {
    UrlComponents::parse(absolute)?.canonical(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute() {
        let parts = UrlComponents::parse("https://user@Example.com:8443/a/b?x=1#top");
        let parts = parts.unwrap_or_default();
        assert_eq!(parts.full, "https://user@Example.com:8443/a/b?x=1#top");
        assert_eq!(parts.scheme.as_deref(), Some("https"));
        assert_eq!(parts.host.as_deref(), Some("example.com"));
        assert_eq!(parts.port, Some(8443));
        assert_eq!(parts.path.as_deref(), Some("/a/b"));
        assert_eq!(parts.query.as_deref(), Some("x=1"));
        assert_eq!(parts.fragment.as_deref(), Some("top"));
    }

    #[test]
    fn test_parse_relative() {
        let parts = UrlComponents::parse("page.html?v=2#s").unwrap_or_default();
        assert!(parts.scheme.is_none());
        assert!(parts.host.is_none());
        assert_eq!(parts.path.as_deref(), Some("page.html"));
        assert_eq!(parts.query.as_deref(), Some("v=2"));
        assert_eq!(parts.fragment.as_deref(), Some("s"));
    }

    #[test]
    fn test_parse_network_path() {
        let parts = UrlComponents::parse("//cdn.example.com:81/img/a.png").unwrap_or_default();
        assert!(parts.scheme.is_none());
        assert_eq!(parts.host.as_deref(), Some("cdn.example.com"));
        assert_eq!(parts.port, Some(81));
        assert_eq!(parts.path.as_deref(), Some("/img/a.png"));
    }

    #[test]
    fn test_parse_empty_reference() {
        let parts = UrlComponents::parse("").unwrap_or_else(|| UrlComponents::unparsed("x"));
        assert_eq!(parts.full, "");
        assert!(parts.path.is_none());
    }

    #[test]
    fn test_parse_failure() {
        assert!(UrlComponents::parse("http://").is_none());
        assert!(UrlComponents::parse("http://exa mple.com/").is_none());
    }

    #[test]
    fn test_resolve_relative() {
        let base = "https://example.com/";
        assert_eq!(
            resolve_url("/foo?x=1", base).as_deref(),
            Some("https://example.com/foo?x=1")
        );
        assert_eq!(
            resolve_url("foo/bar.html#frag", base).as_deref(),
            Some("https://example.com/foo/bar.html")
        );
    }

    #[test]
    fn test_resolve_relative_against_directory_base() {
        let base = "https://example.com/docs/";
        assert_eq!(
            resolve_url("guide.html", base).as_deref(),
            Some("https://example.com/docs/guide.html")
        );
        assert_eq!(
            resolve_url("../about", base).as_deref(),
            Some("https://example.com/about")
        );
    }

    #[test]
    fn test_resolve_absolute_drops_fragment_and_port() {
        assert_eq!(
            resolve_url("https://Example.com:8080/a?b=c#d", "https://base.test/").as_deref(),
            Some("https://example.com/a?b=c")
        );
    }

    #[test]
    fn test_resolve_rejects_empty_and_non_web() {
        let base = "https://example.com/";
        assert_eq!(resolve_url("", base), None);
        assert_eq!(resolve_url("   ", base), None);
        assert_eq!(resolve_url("javascript:void(0)", base), None);
        assert_eq!(resolve_url("tel:+1234567890", base), None);
        assert_eq!(resolve_url("http://", base), None);
    }

    #[test]
    fn test_resolve_fragment_only_is_base() {
        assert_eq!(
            resolve_url("#top", "https://example.com/").as_deref(),
            Some("https://example.com/")
        );
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let base = "https://example.com/dir/";
        let inputs = [
            "/foo?x=1",
            "a b.html",
            "https://EXAMPLE.com/p?q#f",
            "//cdn.example.com/x.png",
            "../up?z=%20",
            "#",
        ];
        for input in inputs {
            let once = resolve_url(input, base);
            let twice = once.as_deref().and_then(|u| resolve_url(u, base));
            assert_eq!(once, twice, "input: {input}");
        }
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(
            strip_query("https://example.com/foo?x=1").as_deref(),
            Some("https://example.com/foo")
        );
        assert_eq!(strip_query("/relative"), None);
    }
}
