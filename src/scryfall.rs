//! Scryfall API client for card metadata
//!
//! Uses async reqwest for non-blocking HTTP requests. A failed lookup is
//! represented as a cacheable "Unknown" record rather than an error: cards
//! whose upstream entry is gone or misspelled should not be re-queried on
//! every run.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Type line stored when Scryfall has no usable answer
pub const UNKNOWN_TYPE_LINE: &str = "Unknown";

/// Scryfall card response
#[derive(Debug, Deserialize)]
pub struct ScryfallCard {
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    /// For double-faced cards, images are nested in card_faces
    #[serde(default)]
    pub card_faces: Option<Vec<CardFace>>,
    #[serde(default)]
    pub scryfall_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImageUris {
    pub normal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CardFace {
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

impl ScryfallCard {
    /// Get the primary image URL (normal size), falling back to the front
    /// face for double-faced cards
    pub fn image_url(&self) -> Option<&str> {
        if let Some(ref uris) = self.image_uris {
            if let Some(ref normal) = uris.normal {
                return Some(normal);
            }
        }
        if let Some(ref faces) = self.card_faces {
            if let Some(face) = faces.first() {
                if let Some(ref uris) = face.image_uris {
                    return uris.normal.as_deref();
                }
            }
        }
        None
    }

    /// Project the response into the slim record the cache stores
    pub fn metadata(&self) -> CardMetadata {
        CardMetadata {
            type_line: self
                .type_line
                .clone()
                .unwrap_or_else(|| UNKNOWN_TYPE_LINE.to_string()),
            image_url: self.image_url().map(|s| s.to_string()),
            scryfall_uri: self.scryfall_uri.clone(),
        }
    }
}

/// Slim per-card record persisted in the metadata cache.
///
/// Field names are the cache file's on-disk keys. Older cache files store a
/// bare type-line string per card instead of this record; those entries are
/// upgraded on first read (see `CardCache::get_or_fetch`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardMetadata {
    pub type_line: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub scryfall_uri: Option<String>,
}

impl CardMetadata {
    /// Placeholder for cards Scryfall cannot resolve; cached like any hit
    pub fn unknown() -> Self {
        Self {
            type_line: UNKNOWN_TYPE_LINE.to_string(),
            image_url: None,
            scryfall_uri: None,
        }
    }
}

/// Fetch metadata for a card by exact name.
///
/// A non-success status yields the Unknown placeholder, not an error.
/// Network and decode failures still propagate.
pub async fn fetch_card_metadata(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
) -> Result<CardMetadata> {
    let url = format!("{}/cards/named?exact={}", base_url, urlencoding::encode(name));
    log::debug!("Fetching card metadata from Scryfall: {}", name);

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        log::warn!("Scryfall returned {} for {:?}", response.status(), name);
        return Ok(CardMetadata::unknown());
    }

    let card = response.json::<ScryfallCard>().await?;
    Ok(card.metadata())
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
