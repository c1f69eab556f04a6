//! Markdown rendering for chat replies.
//!
//! Everything here is pure string building so the exact reply text can be
//! asserted in tests.

use hearth_common::{Listing, PropertyCriteria, SearchResponse};

/// How many listings a reply shows in full.
const LISTINGS_SHOWN: usize = 5;

/// Description snippets are cut to this many characters.
const SNIPPET_MAX_CHARS: usize = 150;

/// Format a GBP amount with thousands separators, e.g. `£1,250,000`.
pub fn format_price(price: u64) -> String {
    let digits = price.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('£');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render extracted criteria as a bold-labelled summary block.
pub fn format_criteria(criteria: &PropertyCriteria) -> String {
    let mut parts = Vec::new();

    if !criteria.locations.is_empty() {
        parts.push(format!("**Locations:** {}", criteria.locations.join(", ")));
    }

    let mut bedrooms = Vec::new();
    if let Some(min) = criteria.min_bedrooms {
        bedrooms.push(format!("min {min}"));
    }
    if let Some(max) = criteria.max_bedrooms {
        bedrooms.push(format!("max {max}"));
    }
    if !bedrooms.is_empty() {
        parts.push(format!("**Bedrooms:** {}", bedrooms.join(", ")));
    }

    let mut price = Vec::new();
    if let Some(min) = criteria.min_price {
        price.push(format!("min {}", format_price(min)));
    }
    if let Some(max) = criteria.max_price {
        price.push(format!("max {}", format_price(max)));
    }
    if !price.is_empty() {
        parts.push(format!("**Price:** {}", price.join(", ")));
    }

    if !criteria.property_types.is_empty() {
        parts.push(format!(
            "**Property Types:** {}",
            criteria.property_types.join(", ")
        ));
    }
    if !criteria.preferences.is_empty() {
        parts.push(format!(
            "**Preferences:** {}",
            criteria.preferences.join(", ")
        ));
    }
    if !criteria.deal_breakers.is_empty() {
        parts.push(format!("**Avoid:** {}", criteria.deal_breakers.join(", ")));
    }

    if parts.is_empty() {
        "No specific criteria extracted.".to_string()
    } else {
        parts.join("\n")
    }
}

/// Render one listing as a numbered markdown block.
pub fn format_listing(listing: &Listing, index: usize) -> String {
    let mut lines = vec![
        format!("**{index}. {}**", listing.address),
        format_price(listing.price),
    ];

    let mut details = Vec::new();
    if let Some(bedrooms) = listing.bedrooms.filter(|n| *n > 0) {
        details.push(format!("{bedrooms} bed"));
    }
    if let Some(bathrooms) = listing.bathrooms.filter(|n| *n > 0) {
        details.push(format!("{bathrooms} bath"));
    }
    if let Some(ref property_type) = listing.property_type {
        details.push(property_type.clone());
    }
    if !details.is_empty() {
        lines.push(details.join(" | "));
    }

    if let Some(ref description) = listing.description {
        lines.push(format!("\n_{}_", snippet(description, SNIPPET_MAX_CHARS)));
    }

    if let Some(ref url) = listing.url {
        lines.push(format!("\n[View listing]({url})"));
    }

    lines.join("\n")
}

/// Render a full search response as one chat reply.
pub fn format_response(response: &SearchResponse) -> String {
    let mut parts = Vec::new();

    if let Some(ref message) = response.message {
        parts.push(message.clone());
    }

    parts.push("\n---\n**Search Criteria Extracted:**\n".to_string());
    parts.push(format_criteria(&response.criteria));

    if !response.properties.is_empty() {
        parts.push(format!(
            "\n---\n**Properties Found ({}):**\n",
            response.properties.len()
        ));
        for (i, listing) in response.properties.iter().take(LISTINGS_SHOWN).enumerate() {
            parts.push(format_listing(listing, i + 1));
            parts.push(String::new());
        }
        if response.properties.len() > LISTINGS_SHOWN {
            parts.push(format!(
                "\n*...and {} more properties available*",
                response.properties.len() - LISTINGS_SHOWN
            ));
        }
    } else if !response.criteria.locations.is_empty() {
        parts.push("\n---\n**No properties found matching your criteria.**".to_string());
        parts.push("Try broadening your search or adjusting your requirements.".to_string());
    }

    parts.join("\n")
}

fn snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str, price: u64) -> Listing {
        Listing {
            id: id.to_string(),
            address: format!("{id} Example Road"),
            price,
            bedrooms: None,
            bathrooms: None,
            property_type: None,
            description: None,
            url: None,
            image_url: None,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn prices_get_thousands_separators() {
        assert_eq!(format_price(999), "£999");
        assert_eq!(format_price(1_000), "£1,000");
        assert_eq!(format_price(450_000), "£450,000");
        assert_eq!(format_price(1_250_000), "£1,250,000");
    }

    #[test]
    fn criteria_block_labels_every_field() {
        let criteria = PropertyCriteria {
            min_bedrooms: Some(3),
            max_bedrooms: Some(4),
            min_price: Some(300_000),
            max_price: Some(500_000),
            locations: vec!["Manchester".into(), "Salford".into()],
            property_types: vec!["house".into()],
            preferences: vec!["garden".into(), "parking".into()],
            deal_breakers: vec!["busy road".into()],
        };

        let block = format_criteria(&criteria);
        assert!(block.contains("**Locations:** Manchester, Salford"));
        assert!(block.contains("**Bedrooms:** min 3, max 4"));
        assert!(block.contains("**Price:** min £300,000, max £500,000"));
        assert!(block.contains("**Property Types:** house"));
        assert!(block.contains("**Preferences:** garden, parking"));
        assert!(block.contains("**Avoid:** busy road"));
    }

    #[test]
    fn empty_criteria_fall_back_to_a_stock_line() {
        assert_eq!(
            format_criteria(&PropertyCriteria::default()),
            "No specific criteria extracted."
        );
    }

    #[test]
    fn listing_block_includes_details_and_link() {
        let listing = Listing {
            bedrooms: Some(3),
            bathrooms: Some(2),
            property_type: Some("semi_detached".into()),
            description: Some("A bright family home close to the park.".into()),
            url: Some("https://example.com/p/42".into()),
            ..listing("42", 325_000)
        };

        let block = format_listing(&listing, 1);
        assert!(block.starts_with("**1. 42 Example Road**\n£325,000"));
        assert!(block.contains("3 bed | 2 bath | semi_detached"));
        assert!(block.contains("_A bright family home close to the park._"));
        assert!(block.contains("[View listing](https://example.com/p/42)"));
    }

    #[test]
    fn zero_counts_are_left_out_of_details() {
        let listing = Listing {
            bedrooms: Some(0),
            bathrooms: Some(0),
            property_type: Some("flat".into()),
            ..listing("9", 150_000)
        };

        let block = format_listing(&listing, 2);
        assert!(!block.contains("0 bed"));
        assert!(block.contains("flat"));
    }

    #[test]
    fn long_descriptions_are_snipped() {
        let listing = Listing {
            description: Some("x".repeat(400)),
            ..listing("1", 100_000)
        };

        let block = format_listing(&listing, 1);
        let rendered = block.split('_').nth(1).unwrap();
        assert_eq!(rendered.chars().count(), 153);
        assert!(rendered.ends_with("..."));
    }

    #[test]
    fn response_shows_at_most_five_listings() {
        let properties: Vec<Listing> = (0..8).map(|i| listing(&i.to_string(), 200_000)).collect();
        let response = SearchResponse {
            criteria: PropertyCriteria {
                locations: vec!["Leeds".into()],
                ..Default::default()
            },
            total_count: properties.len(),
            properties,
            message: None,
        };

        let reply = format_response(&response);
        assert!(reply.contains("**Properties Found (8):**"));
        assert!(reply.contains("**5. 4 Example Road**"));
        assert!(!reply.contains("**6. 5 Example Road**"));
        assert!(reply.contains("*...and 3 more properties available*"));
    }

    #[test]
    fn no_results_reply_suggests_broadening() {
        let response = SearchResponse {
            criteria: PropertyCriteria {
                locations: vec!["Truro".into()],
                ..Default::default()
            },
            properties: Vec::new(),
            total_count: 0,
            message: None,
        };

        let reply = format_response(&response);
        assert!(reply.contains("**No properties found matching your criteria.**"));
        assert!(reply.contains("Try broadening your search"));
    }

    #[test]
    fn missing_locations_skip_the_no_results_block() {
        let response = SearchResponse {
            criteria: PropertyCriteria::default(),
            properties: Vec::new(),
            total_count: 0,
            message: Some("I couldn't work out which area to search.".into()),
        };

        let reply = format_response(&response);
        assert!(reply.starts_with("I couldn't work out which area to search."));
        assert!(reply.contains("No specific criteria extracted."));
        assert!(!reply.contains("No properties found"));
    }
}
