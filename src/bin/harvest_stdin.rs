//! Simple CLI that reads renderer output from stdin and prints the link
//! preview as JSON on stdout.
//!
//! Pass `--strip-query` to drop query strings from the reported links.
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::io::{self, Read};

use serde::Serialize;
use tracing_subscriber::EnvFilter;
use web_harvester::{harvest_bytes, LinkEntry, LinkOptions, Options};

#[derive(Serialize)]
struct Output {
    status_code: u16,
    requested_url: String,
    real_url: String,
    title: Option<String>,
    description: Option<String>,
    site_name: Option<String>,
    image: Option<String>,
    indexable: bool,
    followable: bool,
    links: Vec<LinkEntry>,
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,web_harvester=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();

    let link_options = LinkOptions {
        strip_query: std::env::args().skip(1).any(|arg| arg == "--strip-query"),
    };

    let mut raw = Vec::new();
    if let Err(err) = io::stdin().read_to_end(&mut raw) {
        tracing::error!(error = %err, "failed to read from stdin");
        std::process::exit(1);
    }

    let result = match harvest_bytes(&raw, &Options::default()) {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(error = %err, "harvest failed");
            std::process::exit(1);
        }
    };

    let output = Output {
        status_code: result.status_code(),
        requested_url: result.requested_url().full.clone(),
        real_url: result.real_url().full.clone(),
        title: result.title().map(str::to_string),
        description: result.description().map(str::to_string),
        site_name: result.site_name().map(str::to_string),
        image: result.featured_image_url().map(str::to_string),
        indexable: result.is_indexable(),
        followable: result.is_followable(),
        links: result.links(link_options),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize output");
            std::process::exit(1);
        }
    }
}
