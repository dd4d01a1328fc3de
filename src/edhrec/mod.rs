//! EDHREC client: build id discovery, deck index and deck documents

mod build_id;
mod deck;
mod deck_index;

pub use build_id::{extract_build_id, fetch_build_id};
pub use deck::{fetch_deck, normalize_commander_name, Deck};
pub use deck_index::{fetch_deck_index, filter_deck_hashes, DeckIndex, DeckSummary};
