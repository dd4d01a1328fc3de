//! Persistent cache for fetched deck documents
//!
//! Deck bodies are large and numerous, so each one gets its own JSON file
//! keyed by url hash instead of sharing one aggregate document. A deck is
//! fetched at most once per hash; the file is never rewritten afterwards.

use std::path::{Path, PathBuf};

use crate::edhrec::Deck;
use crate::error::Result;

/// Per-deck file store under `<cache root>/deck_cache/`
pub struct DeckCache {
    cache_dir: PathBuf,
}

impl DeckCache {
    /// Create the store, ensuring its directory exists
    pub fn new(cache_root: &Path) -> Self {
        let cache_dir = cache_root.join("deck_cache");

        if let Err(e) = std::fs::create_dir_all(&cache_dir) {
            log::warn!("Failed to create deck cache directory: {}", e);
        } else {
            log::debug!("Deck cache directory: {:?}", cache_dir);
        }

        Self { cache_dir }
    }

    /// Get the full path for a cached deck by url hash
    fn deck_path(&self, urlhash: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", urlhash))
    }

    /// Load a cached deck. Corrupt or unreadable files count as absent, so
    /// the deck is simply fetched again.
    pub fn get(&self, urlhash: &str) -> Option<Deck> {
        let path = self.deck_path(urlhash);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Failed to read cached deck {}: {}", urlhash, e);
                }
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(deck) => {
                log::debug!("Deck cache hit for {}", urlhash);
                Some(deck)
            }
            Err(e) => {
                log::warn!("Discarding unreadable cached deck {}: {}", urlhash, e);
                None
            }
        }
    }

    /// Persist a deck, replacing any previous file for the hash
    pub fn insert(&self, urlhash: &str, deck: &Deck) -> Result<()> {
        let content = serde_json::to_string_pretty(deck)?;
        std::fs::write(self.deck_path(urlhash), content)?;
        log::debug!("Cached deck {}", urlhash);
        Ok(())
    }
}
