//! Deck index retrieval and price/recency filtering

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{HarvestError, Result};

/// Date format of the index savedate field
const SAVEDATE_FORMAT: &str = "%Y-%m-%d";

/// One row of the deck index table
#[derive(Debug, Clone, Deserialize)]
pub struct DeckSummary {
    pub urlhash: String,
    pub savedate: String,
    pub price: f64,
}

/// Deck index document for one commander
#[derive(Debug, Deserialize)]
pub struct DeckIndex {
    pub table: Vec<DeckSummary>,
}

/// Fetch the deck index for a normalized commander name.
///
/// A non-success status is fatal for the run: without the index there is
/// nothing to harvest.
pub async fn fetch_deck_index(
    client: &reqwest::Client,
    json_base_url: &str,
    commander: &str,
) -> Result<DeckIndex> {
    let url = format!("{}/pages/decks/{}.json", json_base_url, commander);
    log::info!("Fetching deck index for {}", commander);

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(HarvestError::HttpStatus(response.status()));
    }
    Ok(response.json::<DeckIndex>().await?)
}

/// Select up to `limit` deck hashes, most recent first, keeping only decks
/// priced within `[min_price, max_price]` (both bounds inclusive).
///
/// Every savedate in the table is validated before any filtering happens,
/// so one malformed row fails the whole selection instead of silently
/// shifting which decks make the cut. The sort is stable: rows sharing a
/// savedate keep their table order.
pub fn filter_deck_hashes(
    index: &DeckIndex,
    limit: usize,
    min_price: f64,
    max_price: f64,
) -> Result<Vec<String>> {
    let mut dated: Vec<(NaiveDate, &DeckSummary)> = Vec::with_capacity(index.table.len());
    for entry in &index.table {
        let date = NaiveDate::parse_from_str(&entry.savedate, SAVEDATE_FORMAT).map_err(|_| {
            HarvestError::InvalidIndexEntry {
                urlhash: entry.urlhash.clone(),
                savedate: entry.savedate.clone(),
            }
        })?;
        dated.push((date, entry));
    }

    dated.sort_by(|a, b| b.0.cmp(&a.0));

    Ok(dated
        .into_iter()
        .filter(|(_, entry)| entry.price >= min_price && entry.price <= max_price)
        .take(limit)
        .map(|(_, entry)| entry.urlhash.clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(urlhash: &str, savedate: &str, price: f64) -> DeckSummary {
        DeckSummary {
            urlhash: urlhash.to_string(),
            savedate: savedate.to_string(),
            price,
        }
    }

    #[test]
    fn test_price_and_recency_selection() {
        let index = DeckIndex {
            table: vec![
                entry("h1", "2024-05-01", 10.0),
                entry("h2", "2024-06-01", 300.0),
                entry("h3", "2024-06-15", 50.0),
            ],
        };
        // Most recent first within the price range; h2 is too expensive
        let hashes = filter_deck_hashes(&index, 2, 0.0, 100.0).unwrap();
        assert_eq!(hashes, vec!["h3".to_string(), "h1".to_string()]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let index = DeckIndex {
            table: vec![
                entry("low", "2024-01-01", 50.0),
                entry("high", "2024-01-02", 300.0),
                entry("outside", "2024-01-03", 300.01),
            ],
        };
        let hashes = filter_deck_hashes(&index, 10, 50.0, 300.0).unwrap();
        assert_eq!(hashes, vec!["high".to_string(), "low".to_string()]);
    }

    #[test]
    fn test_limit_caps_result() {
        let index = DeckIndex {
            table: (0..10)
                .map(|i| entry(&format!("h{}", i), "2024-01-01", 10.0))
                .collect(),
        };
        assert_eq!(filter_deck_hashes(&index, 3, 0.0, 100.0).unwrap().len(), 3);
    }

    #[test]
    fn test_equal_dates_keep_table_order() {
        let index = DeckIndex {
            table: vec![
                entry("first", "2024-06-01", 10.0),
                entry("second", "2024-06-01", 10.0),
                entry("third", "2024-06-01", 10.0),
            ],
        };
        let hashes = filter_deck_hashes(&index, 10, 0.0, 100.0).unwrap();
        assert_eq!(
            hashes,
            vec!["first".to_string(), "second".to_string(), "third".to_string()]
        );
    }

    #[test]
    fn test_malformed_savedate_fails_selection() {
        let index = DeckIndex {
            table: vec![
                entry("good", "2024-01-01", 10.0),
                entry("bad", "01/02/2024", 10.0),
            ],
        };
        let err = filter_deck_hashes(&index, 10, 0.0, 100.0).unwrap_err();
        assert!(matches!(
            err,
            HarvestError::InvalidIndexEntry { urlhash, .. } if urlhash == "bad"
        ));
    }

    #[test]
    fn test_empty_table_selects_nothing() {
        let index = DeckIndex { table: Vec::new() };
        assert!(filter_deck_hashes(&index, 5, 0.0, 100.0).unwrap().is_empty());
    }

    #[test]
    fn test_index_deserializes_with_extra_fields() {
        let json = r#"{
            "header": "Decks for someone",
            "table": [
                {"urlhash": "aB3x", "savedate": "2024-04-01", "price": 150.5, "author": "x"}
            ]
        }"#;
        let index: DeckIndex = serde_json::from_str(json).unwrap();
        assert_eq!(index.table.len(), 1);
        assert_eq!(index.table[0].urlhash, "aB3x");
        assert_eq!(index.table[0].price, 150.5);
    }
}
