//! Deck documents and commander name normalization

use serde::{Deserialize, Serialize};

use crate::error::{HarvestError, Result};

/// A single submitted deck as served by the deckpreview endpoint.
///
/// `cards` holds `"quantity cardName"` lines. Whatever else the endpoint
/// returns rides along in `extra`, so cached documents keep fields this
/// version does not interpret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default)]
    pub cards: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Canonical commander identifier used in EDHREC URLs.
///
/// Drops every character that is not alphanumeric, underscore or whitespace
/// (so apostrophes and commas vanish rather than hyphenate), lowercases the
/// rest, and turns each space into a hyphen.
pub fn normalize_commander_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .replace(' ', "-")
}

/// Fetch one deck document by url hash.
///
/// Per-deck failures are expected during batch harvests, so a non-success
/// status becomes an error for this deck only; callers decide whether that
/// sinks the run.
pub async fn fetch_deck(
    client: &reqwest::Client,
    base_url: &str,
    build_id: &str,
    urlhash: &str,
) -> Result<Deck> {
    let url = format!(
        "{}/_next/data/{}/deckpreview/{}.json?deckId={}",
        base_url, build_id, urlhash, urlhash
    );
    log::debug!("Fetching deck {} from EDHREC", urlhash);

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        log::warn!("Deck {} fetch failed: HTTP {}", urlhash, response.status());
        return Err(HarvestError::HttpStatus(response.status()));
    }

    let body: serde_json::Value = response.json().await?;
    let deck_value = body
        .get("pageProps")
        .and_then(|v| v.get("data"))
        .and_then(|v| v.get("deck"))
        .filter(|v| !v.is_null())
        .cloned()
        .ok_or_else(|| HarvestError::DeckShape(urlhash.to_string()))?;

    Ok(serde_json::from_value(deck_value)?)
}
