//! Unit tests for the Scryfall client

use super::*;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_deserialize_single_faced_card() {
    let json = r#"{
        "name": "Sol Ring",
        "type_line": "Artifact",
        "scryfall_uri": "https://scryfall.com/card/cmm/464/sol-ring",
        "image_uris": {
            "normal": "https://cards.scryfall.io/normal/front/sol-ring.jpg",
            "small": "https://cards.scryfall.io/small/front/sol-ring.jpg"
        }
    }"#;

    let card: ScryfallCard = serde_json::from_str(json).unwrap();
    assert_eq!(card.type_line.as_deref(), Some("Artifact"));
    assert_eq!(
        card.image_url(),
        Some("https://cards.scryfall.io/normal/front/sol-ring.jpg")
    );
}

#[test]
fn test_image_url_falls_back_to_front_face() {
    let json = r#"{
        "name": "Delver of Secrets // Insectile Aberration",
        "type_line": "Creature — Human Wizard // Creature — Human Insect",
        "card_faces": [
            {"image_uris": {"normal": "https://cards.scryfall.io/normal/front/delver.jpg"}},
            {"image_uris": {"normal": "https://cards.scryfall.io/normal/back/delver.jpg"}}
        ]
    }"#;

    let card: ScryfallCard = serde_json::from_str(json).unwrap();
    assert_eq!(
        card.image_url(),
        Some("https://cards.scryfall.io/normal/front/delver.jpg")
    );
}

#[test]
fn test_image_url_none_when_absent() {
    let card: ScryfallCard = serde_json::from_str(r#"{"type_line": "Artifact"}"#).unwrap();
    assert_eq!(card.image_url(), None);
}

#[test]
fn test_metadata_projection() {
    let json = r#"{
        "type_line": "Legendary Creature — Phyrexian Angel",
        "scryfall_uri": "https://scryfall.com/card/atraxa",
        "image_uris": {"normal": "https://cards.scryfall.io/normal/atraxa.jpg"}
    }"#;

    let meta = serde_json::from_str::<ScryfallCard>(json).unwrap().metadata();
    assert_eq!(meta.type_line, "Legendary Creature — Phyrexian Angel");
    assert_eq!(
        meta.image_url.as_deref(),
        Some("https://cards.scryfall.io/normal/atraxa.jpg")
    );
    assert_eq!(meta.scryfall_uri.as_deref(), Some("https://scryfall.com/card/atraxa"));
}

#[test]
fn test_metadata_without_type_line_is_unknown() {
    let meta = serde_json::from_str::<ScryfallCard>("{}").unwrap().metadata();
    assert_eq!(meta.type_line, UNKNOWN_TYPE_LINE);
    assert_eq!(meta.image_url, None);
}

#[tokio::test]
async fn test_fetch_card_metadata_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cards/named"))
        .and(query_param("exact", "Sol Ring"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Sol Ring",
            "type_line": "Artifact",
            "scryfall_uri": "https://scryfall.com/card/sol-ring",
            "image_uris": {"normal": "https://cards.scryfall.io/normal/sol-ring.jpg"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::new();
    let meta = fetch_card_metadata(&client, &mock_server.uri(), "Sol Ring")
        .await
        .unwrap();

    assert_eq!(meta.type_line, "Artifact");
    assert_eq!(
        meta.image_url.as_deref(),
        Some("https://cards.scryfall.io/normal/sol-ring.jpg")
    );
}

#[tokio::test]
async fn test_fetch_card_metadata_not_found_yields_placeholder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cards/named"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "object": "error",
            "code": "not_found"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::new();
    let meta = fetch_card_metadata(&client, &mock_server.uri(), "Not A Real Card")
        .await
        .unwrap();

    assert_eq!(meta, CardMetadata::unknown());
}

#[tokio::test]
#[ignore] // Requires network access
async fn test_fetch_real_card() {
    let client = reqwest::Client::new();
    let meta = fetch_card_metadata(&client, "https://api.scryfall.com", "Sol Ring")
        .await
        .unwrap();

    assert!(meta.type_line.contains("Artifact"));
    assert!(meta.image_url.is_some());
}
