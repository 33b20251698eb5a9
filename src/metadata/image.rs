//! Featured image output.
//!
//! The preview image is exposed either as its absolute URL or as a
//! `data:` URI built from a fresh download. The download only succeeds for
//! an HTTP 200 response carrying JPEG or PNG.

use std::str::FromStr;

use base64::{prelude::BASE64_STANDARD, Engine};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::error::{Error, Result};
use crate::options::Options;

/// Media types accepted for data URIs.
pub const SUPPORTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Output form of [`FetchResult::featured_image`](crate::FetchResult::featured_image).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode {
    /// Absolute URL of the image.
    Url,
    /// `data:<mime>;base64,<payload>` of the downloaded image.
    Base64,
}

impl FromStr for ImageMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "url" => Ok(ImageMode::Url),
            "base64" => Ok(ImageMode::Base64),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

/// Raw outcome of an image download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedImage {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Downloads featured images.
pub trait ImageFetcher {
    /// Download `url`. Transport failures are errors; HTTP statuses are not.
    ///
    /// # Errors
    ///
    /// [`Error::ImageFetch`] when no response could be obtained.
    fn fetch(&self, url: &str) -> Result<FetchedImage>;
}

/// [`ImageFetcher`] over a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Build a client with the connect/read timeout from `options`.
    ///
    /// # Errors
    ///
    /// [`Error::ImageFetch`] when the TLS backend cannot be initialized.
    pub fn new(options: &Options) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(options.image_timeout)
            .connect_timeout(options.image_timeout);
        if let Some(agent) = &options.image_user_agent {
            builder = builder.user_agent(agent.clone());
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedImage> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if status != 200 {
            return Ok(FetchedImage {
                status,
                content_type,
                body: Vec::new(),
            });
        }

        let body = response.bytes()?.to_vec();
        Ok(FetchedImage {
            status,
            content_type,
            body,
        })
    }
}

/// Media type of a `Content-Type` header value, lower-cased, parameters dropped.
#[must_use]
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Turn a download into a data URI.
///
/// # Errors
///
/// [`Error::ImageFetch`] for a non-200 status or an empty body,
/// [`Error::UnsupportedImageFormat`] for anything but JPEG or PNG.
pub fn to_data_uri(image: &FetchedImage) -> Result<String> {
    if image.status != 200 {
        return Err(Error::ImageFetch(format!("HTTP status {}", image.status)));
    }

    let mime = media_type(image.content_type.as_deref().unwrap_or_default());
    if !SUPPORTED_IMAGE_TYPES.contains(&mime.as_str()) {
        return Err(Error::UnsupportedImageFormat(mime));
    }
    if image.body.is_empty() {
        return Err(Error::ImageFetch("empty body".to_string()));
    }

    Ok(format!("data:{mime};base64,{}", BASE64_STANDARD.encode(&image.body)))
}

/// Render the featured image in `mode`.
///
/// `Ok(None)` when the page has no featured image.
///
/// # Errors
///
/// In [`ImageMode::Base64`], any failure to download or validate the image.
pub fn render_featured_image(
    image_url: Option<&str>,
    mode: ImageMode,
    fetcher: &dyn ImageFetcher,
) -> Result<Option<String>> {
    let Some(url) = image_url else {
        return Ok(None);
    };

    match mode {
        ImageMode::Url => Ok(Some(url.to_string())),
        ImageMode::Base64 => {
            let image = fetcher.fetch(url)?;
            let uri = to_data_uri(&image).inspect_err(|err| {
                tracing::debug!(url, error = %err, "featured image rejected");
            })?;
            Ok(Some(uri))
        }
    }
}
