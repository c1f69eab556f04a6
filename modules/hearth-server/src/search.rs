use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{info, warn};

use hearth_common::{Listing, PropertyCriteria, PropertyType};
use patma_client::{ListingQuery, PatmaClient};

/// Hard cap on listings returned by one search, across all locations.
pub const MAX_RESULTS: usize = 50;

/// PaTMa caps page size at 100.
const MAX_PAGE_SIZE: u32 = 100;

/// Where listings come from. The one real implementation is [`PatmaClient`];
/// tests substitute their own.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn search_listings(&self, query: &ListingQuery) -> patma_client::Result<Vec<Listing>>;
}

#[async_trait]
impl ListingSource for PatmaClient {
    async fn search_listings(&self, query: &ListingQuery) -> patma_client::Result<Vec<Listing>> {
        PatmaClient::search_listings(self, query).await
    }
}

/// Translate extracted criteria into a listing query for one location.
///
/// Only the first recognised property type is forwarded; PaTMa accepts a
/// single type per query. Preference phrases that correspond to listing
/// filters become filter flags, the rest are ignored here.
pub fn build_listing_query(
    criteria: &PropertyCriteria,
    location: &str,
    max_results: usize,
) -> ListingQuery {
    let mut query = ListingQuery::new(location);
    query.page_size = (max_results as u32).min(MAX_PAGE_SIZE);
    query.bedrooms_gte = criteria.min_bedrooms;
    query.bedrooms_lte = criteria.max_bedrooms;
    query.price_gte = criteria.min_price;
    query.price_lte = criteria.max_price;

    if let Some(first) = criteria.property_types.first() {
        query.property_type = PropertyType::from_synonym(first).map(|t| t.to_string());
    }

    let preferences: Vec<String> = criteria.preferences.iter().map(|p| p.to_lowercase()).collect();
    if preferences.iter().any(|p| p.contains("no chain")) {
        query.no_chain = Some(true);
    }
    if preferences.iter().any(|p| p.contains("refurb") || p.contains("renovation")) {
        query.needs_refurb = Some(true);
    }
    if preferences.iter().any(|p| p.contains("reduced") || p.contains("discount")) {
        query.reduced_percent_gte = Some(5);
    }

    query
}

/// Search every location in the criteria and merge the results.
///
/// Listings are deduplicated by id in arrival order, capped at
/// `max_results`, then sorted by ascending price. A location whose lookup
/// fails is logged and skipped; the other locations still contribute.
pub async fn run_search(
    source: &impl ListingSource,
    criteria: &PropertyCriteria,
    max_results: usize,
) -> Vec<Listing> {
    if criteria.locations.is_empty() {
        warn!("No locations in criteria, skipping listing search");
        return Vec::new();
    }

    let mut results: Vec<Listing> = Vec::new();
    let mut seen_ids = HashSet::new();

    'locations: for location in &criteria.locations {
        let query = build_listing_query(criteria, location, max_results);
        let listings = match source.search_listings(&query).await {
            Ok(listings) => listings,
            Err(e) => {
                warn!(location = %location, error = %e, "Listing search failed for location");
                continue;
            }
        };

        for listing in listings {
            if seen_ids.insert(listing.id.clone()) {
                results.push(listing);
                if results.len() >= max_results {
                    break 'locations;
                }
            }
        }
    }

    results.sort_by_key(|listing| listing.price);
    results.truncate(max_results);
    info!(count = results.len(), "Property search complete");
    results
}
