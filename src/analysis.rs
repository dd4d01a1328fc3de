//! Aggregation over fetched decks
//!
//! Pure functions: counting card lines and grouping counts by card type.
//! All network work happens upstream; these operate on decks already in
//! memory and a prefetched name-to-metadata map.

use std::collections::HashMap;

use crate::edhrec::Deck;
use crate::scryfall::CardMetadata;

/// Parse a `"quantity cardName"` line into its parts
fn parse_card_line(line: &str) -> Option<(u32, &str)> {
    let mut parts = line.trim().splitn(2, ' ');
    let quantity = parts.next()?.parse().ok()?;
    let name = parts.next()?;
    Some((quantity, name))
}

/// Total quantity per card name across all decks.
///
/// Lines that do not start with a numeric quantity are skipped; deck data
/// contains the odd section header or blank line.
pub fn count_cards(decks: &[Deck]) -> HashMap<String, u32> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for deck in decks {
        for line in &deck.cards {
            if let Some((quantity, name)) = parse_card_line(line) {
                *counts.entry(name.to_string()).or_insert(0) += quantity;
            }
        }
    }
    counts
}

/// Card type buckets, in classification priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    Creature,
    Instant,
    Sorcery,
    Artifact,
    Enchantment,
    Planeswalker,
    Battle,
    Land,
    Unknown,
}

impl CardType {
    /// All buckets, in classification and report order
    pub fn all() -> &'static [CardType] {
        &[
            CardType::Creature,
            CardType::Instant,
            CardType::Sorcery,
            CardType::Artifact,
            CardType::Enchantment,
            CardType::Planeswalker,
            CardType::Battle,
            CardType::Land,
            CardType::Unknown,
        ]
    }

    /// Bucket name as it appears in type lines and report filenames
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Creature => "Creature",
            CardType::Instant => "Instant",
            CardType::Sorcery => "Sorcery",
            CardType::Artifact => "Artifact",
            CardType::Enchantment => "Enchantment",
            CardType::Planeswalker => "Planeswalker",
            CardType::Battle => "Battle",
            CardType::Land => "Land",
            CardType::Unknown => "Unknown",
        }
    }

    /// First bucket whose name appears in the type line, else Unknown.
    ///
    /// Priority order settles multi-typed cards: "Artifact Creature" lands
    /// in Creature, "Artifact Land" in Artifact.
    pub fn classify(type_line: &str) -> CardType {
        for card_type in Self::all() {
            if *card_type != CardType::Unknown && type_line.contains(card_type.as_str()) {
                return *card_type;
            }
        }
        CardType::Unknown
    }
}

/// Group counted cards into type buckets using prefetched metadata.
/// Names without a metadata record land in Unknown.
pub fn group_by_type(
    counts: &HashMap<String, u32>,
    metadata: &HashMap<String, CardMetadata>,
) -> HashMap<CardType, HashMap<String, u32>> {
    let mut groups: HashMap<CardType, HashMap<String, u32>> = HashMap::new();
    for (name, count) in counts {
        let card_type = metadata
            .get(name)
            .map(|meta| CardType::classify(&meta.type_line))
            .unwrap_or(CardType::Unknown);
        groups
            .entry(card_type)
            .or_default()
            .insert(name.clone(), *count);
    }
    groups
}
