//! deck_harvest - EDHREC deck harvesting with Scryfall enrichment
//!
//! Fetches the most recent decklists for a commander from EDHREC, caches
//! every network artifact, and enriches card names with Scryfall metadata.
//! All upstream traffic goes through per-service rate limits and a bounded
//! concurrency cap.

pub mod analysis;
pub mod cache;
pub mod edhrec;
pub mod error;
pub mod fetcher;
pub mod harvester;
pub mod rate_limit;
pub mod report;
pub mod scryfall;

pub use cache::{CacheEntry, CardCache, DeckCache};
pub use edhrec::{filter_deck_hashes, normalize_commander_name, Deck, DeckIndex, DeckSummary};
pub use error::{HarvestError, Result};
pub use fetcher::{fetch_all, FetchBatch, FetchOutcome, FetchProgress, MAX_PARALLEL_FETCHES};
pub use harvester::Harvester;
pub use rate_limit::{RateLimiter, Service};
pub use scryfall::{CardMetadata, ScryfallCard};
