//! Plain HTTP GET of the source document.

use anyhow::Context;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("cleanpg/", env!("CARGO_PKG_VERSION"));

/// Prefix scheme-less URLs with `https://`.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Fetch `url` and return the unfiltered body bytes.
///
/// A non-success status is logged but its body is still returned, like any
/// plain GET would.
pub fn read_html(url: &str) -> anyhow::Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("could not build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("could not get url [{url}]"))?;

    let status = response.status();
    if !status.is_success() {
        warn!(%status, url, "server answered with a non-success status");
    }

    let body = response
        .bytes()
        .with_context(|| format!("could not read bytes from [{url}]"))?;
    debug!(bytes = body.len(), "fetched source document");

    Ok(body.to_vec())
}
