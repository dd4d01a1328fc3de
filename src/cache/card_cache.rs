//! Persistent cache for Scryfall card metadata
//!
//! One aggregate JSON document mapping card name to metadata, loaded in full
//! at startup and rewritten in full after every new entry. Cache files
//! written by older versions store a bare type-line string per card; those
//! entries still load and are upgraded to the structured record the first
//! time they are read through `get_or_fetch`.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scryfall::CardMetadata;

/// Cache file name under the cache root
const CACHE_FILE: &str = "scryfall_cache.json";

/// On-disk shape of one cache entry. Untagged so both the current record
/// and the legacy bare string deserialize; only `Current` is ever written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheEntry {
    Current(CardMetadata),
    Legacy(String),
}

/// Aggregate card metadata cache
pub struct CardCache {
    path: PathBuf,
    entries: HashMap<String, CacheEntry>,
}

impl CardCache {
    /// Load the cache from `<cache root>/scryfall_cache.json`, or start
    /// empty if the file is missing or does not parse
    pub fn load(cache_root: &Path) -> Self {
        let path = cache_root.join(CACHE_FILE);
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(entries) => {
                        let cache = Self { path, entries };
                        log::info!("Loaded card cache with {} entries", cache.entries.len());
                        return cache;
                    }
                    Err(e) => {
                        log::warn!("Failed to parse cache file, starting fresh: {}", e);
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read cache file, starting fresh: {}", e);
                }
            }
        }
        log::info!("Starting with empty card cache");
        Self {
            path,
            entries: HashMap::new(),
        }
    }

    /// Save the cache to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)?;

        log::debug!("Saved card cache with {} entries", self.entries.len());
        Ok(())
    }

    /// Get a cache entry as stored, legacy or current
    pub fn get(&self, name: &str) -> Option<&CacheEntry> {
        self.entries.get(name)
    }

    /// Insert (or replace) the entry for a card
    pub fn insert(&mut self, name: &str, meta: CardMetadata) {
        self.entries
            .insert(name.to_string(), CacheEntry::Current(meta));
    }

    /// Get entry count
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get metadata for a card, fetching on a miss.
    ///
    /// A current-format entry is returned without calling `fetch`. A legacy
    /// string entry counts as a miss: the card is re-fetched and the entry
    /// replaced with the structured record. Any newly fetched record is
    /// persisted before this returns; a failed save is logged, not fatal,
    /// since the record is already in memory.
    pub async fn get_or_fetch<F, Fut>(&mut self, name: &str, fetch: F) -> Result<CardMetadata>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<CardMetadata>>,
    {
        match self.entries.get(name) {
            Some(CacheEntry::Current(meta)) => return Ok(meta.clone()),
            Some(CacheEntry::Legacy(_)) => {
                log::info!("Upgrading legacy cache entry for {:?}", name);
            }
            None => {
                log::debug!("Card cache miss for {:?}", name);
            }
        }

        let meta = fetch(name.to_string()).await?;
        self.insert(name, meta.clone());
        if let Err(e) = self.save() {
            log::warn!("Failed to save card cache: {}", e);
        }
        Ok(meta)
    }
}

#[cfg(test)]
#[path = "card_cache_tests.rs"]
mod tests;
