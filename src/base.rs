//! Base URL resolution.
//!
//! Relative links in a document resolve against its `<base href>` when one
//! exists, otherwise against the scheme and host of the real (post-redirect)
//! URL.

use dom_query::Document;

use crate::dom;
use crate::error::{Error, Result};
use crate::url_utils::UrlComponents;

/// Compute the prefix relative hrefs are appended to.
///
/// The prefix always ends in `/`. Each component comes from the first
/// `<base href>` if it has one, then from `real_url`, then from a default
/// (`http` for the scheme, `/` for the path).
///
/// # Errors
///
/// [`Error::UrlParse`] when the `<base href>` is not a URL at all, and
/// [`Error::MissingHost`] when neither source supplies a host.
pub fn base_path(doc: &Document, real_url: &UrlComponents) -> Result<String> {
    let Some(base) = dom::first(doc, "base") else {
        let host = non_empty(real_url.host.as_deref()).ok_or(Error::MissingHost)?;
        let scheme = real_url.scheme.as_deref().unwrap_or("http");
        return Ok(format!("{scheme}://{host}/"));
    };

    let href = dom::get_attribute(&base, "href").unwrap_or_default();
    let parsed = UrlComponents::parse(&href).ok_or_else(|| Error::UrlParse(href.clone()))?;

    let host = non_empty(parsed.host.as_deref())
        .or_else(|| non_empty(real_url.host.as_deref()))
        .ok_or(Error::MissingHost)?;
    let scheme = parsed
        .scheme
        .as_deref()
        .or(real_url.scheme.as_deref())
        .unwrap_or("http");
    let path = parsed
        .path
        .as_deref()
        .or(real_url.path.as_deref())
        .unwrap_or("/");

    Ok(format!("{scheme}://{host}{}", directory(path)))
}

fn non_empty(host: Option<&str>) -> Option<&str> {
    host.filter(|h| !h.is_empty())
}

/// Directory part of a path: everything up to and including the last `/`.
fn directory(path: &str) -> String {
    let rooted = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    match rooted.rfind('/') {
        Some(idx) => rooted[..=idx].to_string(),
        None => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(url: &str) -> UrlComponents {
        UrlComponents::parse(url).unwrap_or_else(|| UrlComponents::unparsed(url))
    }

    fn base_of(html: &str, real_url: &str) -> Result<String> {
        let doc = dom::parse(html);
        base_path(&doc, &real(real_url))
    }

    #[test]
    fn no_base_uses_real_scheme_and_host() {
        let base = base_of("<p>x</p>", "https://example.com/articles/page.html");
        assert_eq!(base.ok().as_deref(), Some("https://example.com/"));
    }

    #[test]
    fn absolute_base_href() {
        let html = r#"<head><base href="https://cdn.example.com/static/index.html"></head>"#;
        let base = base_of(html, "https://example.com/");
        assert_eq!(base.ok().as_deref(), Some("https://cdn.example.com/static/"));
    }

    #[test]
    fn relative_base_href_takes_real_host() {
        let html = r#"<base href="/sub/">"#;
        let base = base_of(html, "http://example.org/a/b");
        assert_eq!(base.ok().as_deref(), Some("http://example.org/sub/"));
    }

    #[test]
    fn base_without_href_uses_real_path() {
        let html = r#"<base target="_blank">"#;
        let base = base_of(html, "https://example.com/articles/page.html");
        assert_eq!(base.ok().as_deref(), Some("https://example.com/articles/"));
    }

    #[test]
    fn first_base_wins() {
        let html = r#"<base href="https://one.test/x/"><base href="https://two.test/y/">"#;
        let base = base_of(html, "https://example.com/");
        assert_eq!(base.ok().as_deref(), Some("https://one.test/x/"));
    }

    #[test]
    fn missing_host_fails() {
        let doc = dom::parse(r#"<base href="/sub/">"#);
        let result = base_path(&doc, &UrlComponents::unparsed("not a url"));
        assert!(matches!(result, Err(Error::MissingHost)));

        let doc = dom::parse("<p>no base</p>");
        let result = base_path(&doc, &UrlComponents::unparsed(""));
        assert!(matches!(result, Err(Error::MissingHost)));
    }

    #[test]
    fn unparseable_base_href_fails() {
        let result = base_of(r#"<base href="http://">"#, "https://example.com/");
        assert!(matches!(result, Err(Error::UrlParse(_))));
    }

    #[test]
    fn directory_of_paths() {
        assert_eq!(directory("/"), "/");
        assert_eq!(directory("/a/b.html"), "/a/");
        assert_eq!(directory("/a/b/"), "/a/b/");
        assert_eq!(directory("rel/x"), "/rel/");
    }
}
