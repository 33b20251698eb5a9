//! Character encoding detection and transcoding.
//!
//! Renderer output is assembled from arbitrary third-party pages, so each
//! content line is detected on its own against a prioritized charset list
//! and converted to UTF-8.

use std::borrow::Cow;
use std::fmt::Write as _;

use base64::{prelude::BASE64_STANDARD, Engine};
use encoding_rs::{
    Encoding, ISO_8859_10, ISO_8859_13, ISO_8859_14, ISO_8859_15, ISO_8859_2, ISO_8859_3,
    ISO_8859_4, ISO_8859_5, ISO_8859_6, ISO_8859_7, ISO_8859_8, UTF_16BE, UTF_16LE,
    WINDOWS_1251, WINDOWS_1252, WINDOWS_1254,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Charsets a content line may be detected as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Charset {
    Ascii,
    Utf8,
    Iso8859_1,
    /// UTF-16 with either byte-order mark.
    Utf16,
    Utf16Be,
    Utf16Le,
    Cp1251,
    Cp1252,
    /// Standard base64 wrapping UTF-8 text.
    Base64,
    Iso8859_2,
    Iso8859_3,
    Iso8859_4,
    Iso8859_5,
    Iso8859_6,
    Iso8859_7,
    Iso8859_8,
    Iso8859_9,
    Iso8859_10,
    Iso8859_13,
    Iso8859_14,
    Iso8859_15,
}

/// Detection order used by [`Options::default`](crate::Options).
pub const DEFAULT_CHARSETS: &[Charset] = &[
    Charset::Ascii,
    Charset::Utf8,
    Charset::Iso8859_1,
    Charset::Utf16,
    Charset::Utf16Be,
    Charset::Utf16Le,
    Charset::Cp1251,
    Charset::Cp1252,
    Charset::Base64,
    Charset::Iso8859_2,
    Charset::Iso8859_3,
    Charset::Iso8859_4,
    Charset::Iso8859_5,
    Charset::Iso8859_6,
    Charset::Iso8859_7,
    Charset::Iso8859_8,
    Charset::Iso8859_9,
    Charset::Iso8859_10,
    Charset::Iso8859_13,
    Charset::Iso8859_14,
    Charset::Iso8859_15,
];

const BOM_BE: [u8; 2] = [0xFE, 0xFF];
const BOM_LE: [u8; 2] = [0xFF, 0xFE];

impl Charset {
    /// Conventional label for this charset.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Charset::Ascii => "ASCII",
            Charset::Utf8 => "UTF-8",
            Charset::Iso8859_1 => "ISO-8859-1",
            Charset::Utf16 => "UTF-16",
            Charset::Utf16Be => "UTF-16BE",
            Charset::Utf16Le => "UTF-16LE",
            Charset::Cp1251 => "CP1251",
            Charset::Cp1252 => "CP1252",
            Charset::Base64 => "BASE64",
            Charset::Iso8859_2 => "ISO-8859-2",
            Charset::Iso8859_3 => "ISO-8859-3",
            Charset::Iso8859_4 => "ISO-8859-4",
            Charset::Iso8859_5 => "ISO-8859-5",
            Charset::Iso8859_6 => "ISO-8859-6",
            Charset::Iso8859_7 => "ISO-8859-7",
            Charset::Iso8859_8 => "ISO-8859-8",
            Charset::Iso8859_9 => "ISO-8859-9",
            Charset::Iso8859_10 => "ISO-8859-10",
            Charset::Iso8859_13 => "ISO-8859-13",
            Charset::Iso8859_14 => "ISO-8859-14",
            Charset::Iso8859_15 => "ISO-8859-15",
        }
    }

    /// Whether text in this charset is already valid UTF-8 as-is.
    #[must_use]
    pub fn is_canonical(self) -> bool {
        matches!(self, Charset::Ascii | Charset::Utf8)
    }

    /// Validate `bytes` against this charset and decode them to UTF-8.
    ///
    /// Returns `None` when the bytes are not valid in this charset. ASCII
    /// and UTF-8 input is borrowed, never re-encoded.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            Charset::Ascii => bytes
                .is_ascii()
                .then(|| std::str::from_utf8(bytes).ok().map(Cow::Borrowed))
                .flatten(),
            Charset::Utf8 => std::str::from_utf8(bytes).ok().map(Cow::Borrowed),
            // Every byte is a Latin-1 code point, C1 range included.
            Charset::Iso8859_1 => Some(encoding_rs::mem::decode_latin1(bytes)),
            Charset::Utf16 => {
                if bytes.starts_with(&BOM_BE) {
                    decode_utf16(UTF_16BE, bytes)
                } else {
                    decode_utf16(UTF_16LE, bytes)
                }
            }
            Charset::Utf16Be => bytes
                .starts_with(&BOM_BE)
                .then(|| decode_utf16(UTF_16BE, bytes))
                .flatten(),
            Charset::Utf16Le => bytes
                .starts_with(&BOM_LE)
                .then(|| decode_utf16(UTF_16LE, bytes))
                .flatten(),
            Charset::Base64 => decode_base64(bytes).map(Cow::Owned),
            single_byte => single_byte
                .encoding()
                .and_then(|enc| enc.decode_without_bom_handling_and_without_replacement(bytes))
                .and_then(printable),
        }
    }

    /// The `encoding_rs` table backing a single-byte charset.
    fn encoding(self) -> Option<&'static Encoding> {
        let encoding = match self {
            Charset::Cp1251 => WINDOWS_1251,
            Charset::Cp1252 => WINDOWS_1252,
            Charset::Iso8859_2 => ISO_8859_2,
            Charset::Iso8859_3 => ISO_8859_3,
            Charset::Iso8859_4 => ISO_8859_4,
            Charset::Iso8859_5 => ISO_8859_5,
            Charset::Iso8859_6 => ISO_8859_6,
            Charset::Iso8859_7 => ISO_8859_7,
            Charset::Iso8859_8 => ISO_8859_8,
            // WHATWG folds ISO-8859-9 into windows-1254; the printable range is identical.
            Charset::Iso8859_9 => WINDOWS_1254,
            Charset::Iso8859_10 => ISO_8859_10,
            Charset::Iso8859_13 => ISO_8859_13,
            Charset::Iso8859_14 => ISO_8859_14,
            Charset::Iso8859_15 => ISO_8859_15,
            _ => return None,
        };
        Some(encoding)
    }
}

/// Reject decoded text containing control characters other than whitespace.
///
/// Applied to the code-page charsets after ISO-8859-1, so they fail on
/// binary data or on text in a different charset.
fn printable(text: Cow<'_, str>) -> Option<Cow<'_, str>> {
    let ok = text
        .chars()
        .all(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r' | '\x0C'));
    ok.then_some(text)
}

fn decode_utf16<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
    if bytes.len() < 2 || bytes.len() % 2 != 0 {
        return None;
    }
    let bom = if encoding == UTF_16BE { BOM_BE } else { BOM_LE };
    let body = bytes.strip_prefix(&bom)?;
    encoding.decode_without_bom_handling_and_without_replacement(body)
}

fn decode_base64(bytes: &[u8]) -> Option<String> {
    let trimmed = bytes.trim_ascii();
    if trimmed.is_empty() {
        return None;
    }
    let payload = BASE64_STANDARD.decode(trimmed).ok()?;
    String::from_utf8(payload).ok()
}

/// First charset in `charsets` that validates `bytes`.
#[must_use]
pub fn detect_charset(bytes: &[u8], charsets: &[Charset]) -> Option<Charset> {
    charsets
        .iter()
        .copied()
        .find(|charset| charset.decode(bytes).is_some())
}

/// Detect the charset of one line and convert it to UTF-8.
///
/// Returns `None` when no charset in `charsets` validates.
#[must_use]
pub fn normalize_line<'a>(bytes: &'a [u8], charsets: &[Charset]) -> Option<Cow<'a, str>> {
    charsets.iter().find_map(|charset| charset.decode(bytes))
}

/// Normalize every content line and join them with `\n`.
///
/// # Errors
///
/// Returns [`Error::EncodingDetection`] for the first line no charset
/// validates; a partially decoded buffer is never returned.
pub fn normalize_lines<L: AsRef<[u8]>>(lines: &[L], charsets: &[Charset]) -> Result<String> {
    let mut content = String::new();
    for (index, line) in lines.iter().enumerate() {
        let text = normalize_line(line.as_ref(), charsets)
            .ok_or(Error::EncodingDetection { line: index })?;
        if index > 0 {
            content.push('\n');
        }
        content.push_str(&text);
    }
    Ok(content)
}

/// Replace every non-ASCII character with a numeric character reference.
///
/// The DOM parser decodes the references again, so what it sees is plain
/// ASCII with no charset ambiguity left.
#[must_use]
pub fn escape_non_ascii(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let _ = write!(out, "&#{};", u32::from(c));
        }
    }
    Cow::Owned(out)
}

/// Decode HTML entities in an extracted value (`&amp;` → `&`, `&#233;` → `é`).
#[must_use]
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}
