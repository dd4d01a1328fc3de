//! EDHREC build id discovery
//!
//! Deck detail URLs embed the Next.js build id of the current EDHREC
//! deployment. It is not published anywhere, so it is scraped from the
//! homepage HTML, where it sits between a `/_next/static/` path prefix and
//! a `_buildManifest.js` script reference. The id changes on every EDHREC
//! deploy, which is why callers memoize it per run instead of hardcoding it.

use crate::error::{HarvestError, Result};

/// Script filename that follows the build id in the homepage HTML
const MANIFEST_MARKER: &str = "_buildManifest.js";
/// Path prefix that precedes the build id
const STATIC_MARKER: &str = "/_next/static/";
/// Anything shorter than this is a stray path segment, not a build id
const MIN_BUILD_ID_LEN: usize = 5;

/// Extract the build id from homepage HTML.
///
/// Finds the first `_buildManifest.js` reference, walks back to the nearest
/// `/_next/static/` before it, and takes the path segment in between.
pub fn extract_build_id(html: &str) -> Result<String> {
    let manifest_idx = html
        .find(MANIFEST_MARKER)
        .ok_or(HarvestError::BuildIdNotFound(MANIFEST_MARKER))?;
    let prefix = &html[..manifest_idx];

    let static_idx = prefix
        .rfind(STATIC_MARKER)
        .ok_or(HarvestError::BuildIdNotFound(STATIC_MARKER))?;
    let start = static_idx + STATIC_MARKER.len();

    let id = match prefix[start..].find('/') {
        Some(end) => &prefix[start..start + end],
        None => &prefix[start..],
    };

    if id.len() < MIN_BUILD_ID_LEN {
        return Err(HarvestError::BuildIdMalformed(id.to_string()));
    }
    Ok(id.to_string())
}

/// Fetch the homepage and extract the build id.
///
/// Callers are expected to rate-limit and memoize; see `Harvester::build_id`.
pub async fn fetch_build_id(client: &reqwest::Client, base_url: &str) -> Result<String> {
    let response = client.get(base_url).send().await?;
    if !response.status().is_success() {
        return Err(HarvestError::HttpStatus(response.status()));
    }
    let html = response.text().await?;
    let id = extract_build_id(&html)?;
    log::info!("EDHREC build id detected: {}", id);
    Ok(id)
}
