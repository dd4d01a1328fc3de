//! Error types for deck_harvest

use std::fmt;

/// Unified error type for harvest operations
#[derive(Debug)]
pub enum HarvestError {
    /// HTTP request failed (network error, timeout, etc.)
    Network(reqwest::Error),
    /// Failed to parse JSON response
    Parse(serde_json::Error),
    /// HTTP error status code
    HttpStatus(reqwest::StatusCode),
    /// File I/O failed
    Io(std::io::Error),
    /// Homepage HTML is missing a marker needed for build id discovery
    BuildIdNotFound(&'static str),
    /// Extracted build id is too short to be real
    BuildIdMalformed(String),
    /// Deck index entry carries a savedate that does not parse
    InvalidIndexEntry { urlhash: String, savedate: String },
    /// Deck detail JSON does not contain a deck where expected
    DeckShape(String),
}

impl fmt::Display for HarvestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarvestError::Network(e) => write!(f, "Network error: {}", e),
            HarvestError::Parse(e) => write!(f, "Parse error: {}", e),
            HarvestError::HttpStatus(status) => write!(f, "HTTP error: {}", status),
            HarvestError::Io(e) => write!(f, "I/O error: {}", e),
            HarvestError::BuildIdNotFound(marker) => {
                write!(f, "Homepage HTML contains no {:?} marker", marker)
            }
            HarvestError::BuildIdMalformed(id) => {
                write!(f, "Extracted build id {:?} is too short", id)
            }
            HarvestError::InvalidIndexEntry { urlhash, savedate } => {
                write!(f, "Deck {} has invalid savedate {:?}", urlhash, savedate)
            }
            HarvestError::DeckShape(urlhash) => {
                write!(f, "Unexpected response shape for deck {}", urlhash)
            }
        }
    }
}

impl std::error::Error for HarvestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarvestError::Network(e) => Some(e),
            HarvestError::Parse(e) => Some(e),
            HarvestError::Io(e) => Some(e),
            HarvestError::HttpStatus(_) => None,
            HarvestError::BuildIdNotFound(_) => None,
            HarvestError::BuildIdMalformed(_) => None,
            HarvestError::InvalidIndexEntry { .. } => None,
            HarvestError::DeckShape(_) => None,
        }
    }
}

impl From<reqwest::Error> for HarvestError {
    fn from(err: reqwest::Error) -> Self {
        HarvestError::Network(err)
    }
}

impl From<serde_json::Error> for HarvestError {
    fn from(err: serde_json::Error) -> Self {
        HarvestError::Parse(err)
    }
}

impl From<std::io::Error> for HarvestError {
    fn from(err: std::io::Error) -> Self {
        HarvestError::Io(err)
    }
}

/// Result alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;
