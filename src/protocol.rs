//! Renderer output protocol.
//!
//! The renderer writes a fixed positional layout, one item per line:
//!
//! ```text
//! 0: HTTP status code (decimal)
//! 1: requested URL
//! 2: real URL after redirects
//! 3..: page content, or a single data URI for screenshots
//! ```

use crate::error::{Error, Result};
use crate::url_utils::UrlComponents;

/// Number of header lines preceding the content.
pub const HEADER_LINES: usize = 3;

/// Decoded renderer output. Content lines are still raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererOutput {
    pub status_code: u16,
    pub requested_url: UrlComponents,
    pub real_url: UrlComponents,
    pub content_lines: Vec<Vec<u8>>,
}

/// Decode the positional line layout.
///
/// # Errors
///
/// [`Error::MalformedOutput`] with fewer than three lines or a status line
/// that is not a decimal number.
pub fn decode_output<L: AsRef<[u8]>>(lines: &[L]) -> Result<RendererOutput> {
    if lines.len() < HEADER_LINES {
        return Err(Error::MalformedOutput(format!(
            "expected at least {HEADER_LINES} lines, got {}",
            lines.len()
        )));
    }

    let status_line = String::from_utf8_lossy(lines[0].as_ref());
    let status_code = status_line.trim().parse::<u16>().map_err(|_| {
        Error::MalformedOutput(format!("status line is not a number: {status_line:?}"))
    })?;

    let requested = String::from_utf8_lossy(lines[1].as_ref());
    let real = String::from_utf8_lossy(lines[2].as_ref());

    Ok(RendererOutput {
        status_code,
        requested_url: url_components(&requested),
        real_url: url_components(&real),
        content_lines: lines[HEADER_LINES..]
            .iter()
            .map(|line| line.as_ref().to_vec())
            .collect(),
    })
}

/// Split raw process output into lines, dropping a trailing `\r` on each.
#[must_use]
pub fn split_lines(raw: &[u8]) -> Vec<Vec<u8>> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line).to_vec())
        .collect()
}

fn url_components(url: &str) -> UrlComponents {
    UrlComponents::parse(url).unwrap_or_else(|| {
        tracing::debug!(url, "renderer reported an unparseable URL");
        UrlComponents::unparsed(url)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_header_and_content() {
        let lines: [&[u8]; 5] = [
            b"200",
            b"http://example.com",
            b"https://www.example.com/home",
            b"<html>",
            b"</html>",
        ];
        let out = match decode_output(&lines) {
            Ok(out) => out,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };

        assert_eq!(out.status_code, 200);
        assert_eq!(out.requested_url.full, "http://example.com");
        assert_eq!(out.real_url.full, "https://www.example.com/home");
        assert_eq!(out.real_url.host.as_deref(), Some("www.example.com"));
        assert_eq!(out.content_lines, vec![b"<html>".to_vec(), b"</html>".to_vec()]);
    }

    #[test]
    fn three_lines_means_empty_content() {
        let lines = ["301", "a", "b"];
        let out = decode_output(&lines);
        assert!(out.is_ok_and(|o| o.content_lines.is_empty() && o.status_code == 301));
    }

    #[test]
    fn too_few_lines() {
        let lines = ["200", "http://example.com"];
        assert!(matches!(decode_output(&lines), Err(Error::MalformedOutput(_))));
        let none: [&str; 0] = [];
        assert!(matches!(decode_output(&none), Err(Error::MalformedOutput(_))));
    }

    #[test]
    fn non_numeric_status() {
        let lines = ["http://example.com", "http://example.com", "<html>"];
        assert!(matches!(decode_output(&lines), Err(Error::MalformedOutput(_))));
    }

    #[test]
    fn urls_kept_verbatim() {
        let requested = "  http://Example.com/a b ";
        let real = "not a url at all";
        let lines = ["200", requested, real];
        let out = decode_output(&lines);
        assert!(out.is_ok_and(|o| o.requested_url.full == requested && o.real_url.full == real));
    }

    #[test]
    fn split_lines_handles_crlf() {
        let lines = split_lines(b"200\r\nhttp://a.test\r\nhttp://b.test\n<p>x</p>\n");
        assert_eq!(
            lines,
            vec![
                b"200".to_vec(),
                b"http://a.test".to_vec(),
                b"http://b.test".to_vec(),
                b"<p>x</p>".to_vec()
            ]
        );
        assert!(split_lines(b"").is_empty());
    }
}
