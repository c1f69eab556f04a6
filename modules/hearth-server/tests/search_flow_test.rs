//! End-to-end search flow: criteria → per-location queries → merged listings
//! → markdown reply → session history.
//!
//! The listing source is stubbed. No I/O, no LLM, no PaTMa.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use hearth_common::{ChatMessage, Listing, PropertyCriteria, SearchResponse};
use hearth_server::markdown::format_response;
use hearth_server::search::{run_search, ListingSource, MAX_RESULTS};
use hearth_server::sessions::SessionStore;
use patma_client::ListingQuery;

struct FixtureSource {
    by_location: HashMap<String, Vec<Listing>>,
}

impl FixtureSource {
    fn new(fixtures: &[(&str, Vec<Listing>)]) -> Self {
        Self {
            by_location: fixtures
                .iter()
                .map(|(location, listings)| (location.to_string(), listings.clone()))
                .collect(),
        }
    }
}

#[async_trait]
impl ListingSource for FixtureSource {
    async fn search_listings(&self, query: &ListingQuery) -> patma_client::Result<Vec<Listing>> {
        Ok(self
            .by_location
            .get(&query.postcode)
            .cloned()
            .unwrap_or_default())
    }
}

fn fixture_listing(id: &str, address: &str, price: u64) -> Listing {
    Listing {
        id: id.to_string(),
        address: address.to_string(),
        price,
        bedrooms: Some(3),
        bathrooms: Some(1),
        property_type: Some("house".to_string()),
        description: Some("Well presented family home with a south facing garden.".to_string()),
        url: Some(format!("https://portal.example/p/{id}")),
        image_url: None,
        latitude: None,
        longitude: None,
    }
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_results_flow_into_a_chat_reply() {
    let criteria = PropertyCriteria {
        min_bedrooms: Some(3),
        max_price: Some(400_000),
        locations: vec!["Manchester".into(), "Salford".into()],
        property_types: vec!["house".into()],
        ..Default::default()
    };

    // "shared" is listed in both locations and must appear once
    let source = FixtureSource::new(&[
        (
            "Manchester",
            vec![
                fixture_listing("m1", "5 Deansgate", 385_000),
                fixture_listing("shared", "12 Border Lane", 299_000),
            ],
        ),
        (
            "Salford",
            vec![
                fixture_listing("shared", "12 Border Lane", 299_000),
                fixture_listing("s1", "3 Quay Street", 320_000),
            ],
        ),
    ]);

    let properties = run_search(&source, &criteria, MAX_RESULTS).await;

    assert_eq!(properties.len(), 3);
    assert_eq!(properties[0].id, "shared");
    assert_eq!(properties[1].id, "s1");
    assert_eq!(properties[2].id, "m1");

    let response = SearchResponse {
        total_count: properties.len(),
        criteria,
        properties,
        message: None,
    };

    let reply = format_response(&response);
    assert!(reply.contains("**Search Criteria Extracted:**"));
    assert!(reply.contains("**Locations:** Manchester, Salford"));
    assert!(reply.contains("**Properties Found (3):**"));
    assert!(reply.contains("**1. 12 Border Lane**"));
    assert!(reply.contains("£299,000"));
    assert!(reply.contains("[View listing](https://portal.example/p/shared)"));

    let store = SessionStore::new();
    let session_id = Uuid::new_v4();
    store
        .append(
            session_id,
            ChatMessage::user("3 bed house in Manchester or Salford under £400k"),
        )
        .await;
    store.append(session_id, ChatMessage::assistant(reply)).await;

    let history = store.history(session_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[1].content.contains("Properties Found"));
}

// ---------------------------------------------------------------------------
// Degenerate criteria
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_locations_produce_an_explanatory_reply() {
    let criteria = PropertyCriteria::default();
    let source = FixtureSource::new(&[]);

    let properties = run_search(&source, &criteria, MAX_RESULTS).await;
    assert!(properties.is_empty());

    let response = SearchResponse {
        total_count: 0,
        criteria,
        properties,
        message: Some(
            "I couldn't work out which area to search. Try mentioning a city, town or postcode."
                .to_string(),
        ),
    };

    let reply = format_response(&response);
    assert!(reply.starts_with("I couldn't work out which area to search."));
    assert!(reply.contains("No specific criteria extracted."));
    assert!(!reply.contains("Properties Found"));
}
