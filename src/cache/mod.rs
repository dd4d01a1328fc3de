//! Caching layer for deck documents and card metadata
//!
//! Both upstream services are slow by contract (rate limited), so every
//! fetched artifact is persisted: decks as one JSON file per url hash,
//! card metadata as a single aggregate JSON document.

pub mod card_cache;
pub mod deck_cache;

pub use card_cache::{CacheEntry, CardCache};
pub use deck_cache::DeckCache;
