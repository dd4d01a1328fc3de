//! Harvest context: HTTP client, rate limiter, caches and base URLs
//!
//! Everything a run needs lives here and is passed explicitly; there is no
//! global state. Base URLs are fields so tests can point the context at a
//! local mock server.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};

use crate::cache::{CardCache, DeckCache};
use crate::edhrec::{self, Deck, DeckIndex};
use crate::error::Result;
use crate::fetcher::{fetch_all, FetchBatch, MAX_PARALLEL_FETCHES};
use crate::rate_limit::{RateLimiter, Service};
use crate::scryfall::{self, CardMetadata};

/// Default EDHREC host (homepage and deck detail)
const EDHREC_BASE_URL: &str = "https://edhrec.com";
/// Default EDHREC JSON host (deck index)
const EDHREC_JSON_BASE_URL: &str = "https://json.edhrec.com";
/// Default Scryfall API host
const SCRYFALL_BASE_URL: &str = "https://api.scryfall.com";

/// User agent sent with every request
const USER_AGENT: &str = concat!("deck_harvest/", env!("CARGO_PKG_VERSION"));
/// Cap on how long any single request may take end to end
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared context for one harvest run
pub struct Harvester {
    pub(crate) client: reqwest::Client,
    pub limits: RateLimiter,
    pub decks: DeckCache,
    pub cards: Mutex<CardCache>,
    build_id: RwLock<Option<String>>,
    pub(crate) edhrec_base: String,
    pub(crate) edhrec_json_base: String,
    pub(crate) scryfall_base: String,
}

impl Harvester {
    /// Build a context rooted at `cache_root`. Cache directories and the
    /// card metadata map are ready once this returns; the build id is
    /// resolved lazily on first use.
    pub fn new(cache_root: &Path) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            limits: RateLimiter::new(),
            decks: DeckCache::new(cache_root),
            cards: Mutex::new(CardCache::load(cache_root)),
            build_id: RwLock::new(None),
            edhrec_base: EDHREC_BASE_URL.to_string(),
            edhrec_json_base: EDHREC_JSON_BASE_URL.to_string(),
            scryfall_base: SCRYFALL_BASE_URL.to_string(),
        })
    }

    /// The current EDHREC build id, fetched and memoized on first use.
    ///
    /// Concurrent first calls resolve the id once: the write lock is held
    /// across the fetch and late arrivals find the slot filled.
    pub async fn build_id(&self) -> Result<String> {
        if let Some(id) = self.build_id.read().await.clone() {
            return Ok(id);
        }

        let mut slot = self.build_id.write().await;
        if let Some(id) = slot.as_ref() {
            return Ok(id.clone());
        }
        self.limits.acquire(Service::Edhrec).await;
        let id = edhrec::fetch_build_id(&self.client, &self.edhrec_base).await?;
        *slot = Some(id.clone());
        Ok(id)
    }

    /// Fetch the deck index for a normalized commander name, rate limited
    pub async fn deck_index(&self, commander: &str) -> Result<DeckIndex> {
        self.limits.acquire(Service::Edhrec).await;
        edhrec::fetch_deck_index(&self.client, &self.edhrec_json_base, commander).await
    }

    /// Fetch one deck, serving from the cache when possible.
    ///
    /// Cache hits touch neither the network nor the rate limiter. A fetched
    /// deck that cannot be written to the cache is still returned; the next
    /// run just fetches it again.
    pub async fn fetch_deck_cached(&self, urlhash: &str) -> Result<Deck> {
        if let Some(deck) = self.decks.get(urlhash) {
            return Ok(deck);
        }

        let build_id = self.build_id().await?;
        self.limits.acquire(Service::Edhrec).await;
        let deck = edhrec::fetch_deck(&self.client, &self.edhrec_base, &build_id, urlhash).await?;

        if let Err(e) = self.decks.insert(urlhash, &deck) {
            log::warn!("Failed to cache deck {}: {}", urlhash, e);
        }
        Ok(deck)
    }

    /// Fetch metadata for one card, serving current-format cache entries
    /// without a request and upgrading legacy entries in place.
    ///
    /// The card cache lock is held across the whole check-fetch-store
    /// sequence, so a name is never fetched twice by racing workers.
    pub async fn fetch_card_metadata_cached(&self, name: &str) -> Result<CardMetadata> {
        let mut cards = self.cards.lock().await;
        cards
            .get_or_fetch(name, |card_name| async move {
                self.limits.acquire(Service::Scryfall).await;
                scryfall::fetch_card_metadata(&self.client, &self.scryfall_base, &card_name).await
            })
            .await
    }

    /// Fetch a batch of decks under the parallelism cap, streaming results
    /// in completion order
    pub fn fetch_decks_with_progress(self: &Arc<Self>, hashes: Vec<String>) -> FetchBatch<Deck> {
        let harvester = Arc::clone(self);
        fetch_all(hashes, MAX_PARALLEL_FETCHES, move |hash| {
            let harvester = Arc::clone(&harvester);
            async move { harvester.fetch_deck_cached(&hash).await }
        })
    }

    /// Fetch metadata for a batch of card names, pairing each name with its
    /// record so consumers can build a lookup map
    pub fn fetch_card_metadata_with_progress(
        self: &Arc<Self>,
        names: Vec<String>,
    ) -> FetchBatch<(String, CardMetadata)> {
        let harvester = Arc::clone(self);
        fetch_all(names, MAX_PARALLEL_FETCHES, move |name| {
            let harvester = Arc::clone(&harvester);
            async move {
                let meta = harvester.fetch_card_metadata_cached(&name).await?;
                Ok((name, meta))
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;
