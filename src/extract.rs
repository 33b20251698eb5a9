//! Post-render pipeline.
//!
//! Turns decoded renderer output into a [`FetchResult`]: normalize the
//! content encoding, parse it, establish the base URL, then collect links
//! and metadata from the same document.

use chrono::Utc;

use crate::base;
use crate::dom;
use crate::encoding;
use crate::error::{Error, Result};
use crate::links;
use crate::metadata;
use crate::options::Options;
use crate::protocol::RendererOutput;
use crate::result::{FetchResult, Screenshot};

/// Build a page result from renderer output.
///
/// Only an undecodable content line aborts. A page whose base URL cannot
/// be established still yields a result, without links and with only
/// already-absolute image URLs.
pub(crate) fn build_fetch_result(output: RendererOutput, options: &Options) -> Result<FetchResult> {
    let content = encoding::normalize_lines(&output.content_lines, &options.charsets)?;
    let document = dom::parse(&content);

    let base_path = match base::base_path(&document, &output.real_url) {
        Ok(base) => Some(base),
        Err(err) => {
            tracing::debug!(url = %output.real_url.full, error = %err, "no base URL");
            None
        }
    };

    let links = base_path
        .as_deref()
        .map(|base| links::collect_links(&document, base))
        .unwrap_or_default();
    let metadata = metadata::extract_metadata(&document, base_path.as_deref());

    tracing::debug!(
        status = output.status_code,
        links = links.len(),
        title = metadata.title.as_deref().unwrap_or_default(),
        "page processed"
    );

    Ok(FetchResult {
        status_code: output.status_code,
        requested_url: output.requested_url,
        real_url: output.real_url,
        content,
        base_path,
        links,
        metadata,
        fetched_at: Utc::now(),
    })
}

/// Build a screenshot from renderer output run in screenshot mode.
pub(crate) fn build_screenshot(output: RendererOutput) -> Result<Screenshot> {
    let Some(line) = output.content_lines.first() else {
        return Err(Error::MalformedOutput("screenshot output has no content line".to_string()));
    };
    let data_uri = std::str::from_utf8(line)
        .map_err(|_| Error::MalformedOutput("screenshot data URI is not ASCII".to_string()))?;

    Screenshot::new(output.status_code, output.requested_url, output.real_url, data_uri)
}
