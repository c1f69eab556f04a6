use hearth_common::Listing;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_RADIUS_MILES: u32 = 5;
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Query parameters for the property-listing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ListingQuery {
    pub postcode: String,
    /// Search radius in miles.
    pub radius: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms_gte: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms_lte: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_gte: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_lte: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_chain: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_refurb: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduced_percent_gte: Option<u32>,
}

impl ListingQuery {
    pub fn new(postcode: impl Into<String>) -> Self {
        Self {
            postcode: postcode.into(),
            radius: DEFAULT_RADIUS_MILES,
            page_size: DEFAULT_PAGE_SIZE,
            bedrooms_gte: None,
            bedrooms_lte: None,
            price_gte: None,
            price_lte: None,
            property_type: None,
            no_chain: None,
            needs_refurb: None,
            reduced_percent_gte: None,
        }
    }
}

/// The listing endpoint answers either a paginated envelope or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListingsPayload {
    Paged { results: Vec<RawListing> },
    Flat(Vec<RawListing>),
}

impl ListingsPayload {
    pub fn into_results(self) -> Vec<RawListing> {
        match self {
            ListingsPayload::Paged { results } => results,
            ListingsPayload::Flat(results) => results,
        }
    }
}

/// A single listing as the API returns it. Portals disagree on field names
/// and on whether numbers arrive as numbers or strings, so every field is
/// optional and the accessors pick the first usable value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawListing {
    #[serde(deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "de_opt_id")]
    pub portal_id: Option<String>,
    #[serde(deserialize_with = "de_opt_price")]
    pub price: Option<u64>,
    #[serde(deserialize_with = "de_opt_price")]
    pub asking_price: Option<u64>,
    #[serde(deserialize_with = "de_opt_price")]
    pub current_price: Option<u64>,
    pub address: Option<String>,
    pub full_address: Option<String>,
    #[serde(deserialize_with = "de_opt_count")]
    pub bedrooms: Option<u32>,
    #[serde(deserialize_with = "de_opt_count")]
    pub bathrooms: Option<u32>,
    pub property_type: Option<String>,
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub portal_url: Option<String>,
    pub url: Option<String>,
    pub link: Option<String>,
    pub image_url: Option<String>,
    pub main_image: Option<String>,
    pub latitude: Option<f64>,
    pub lat: Option<f64>,
    pub longitude: Option<f64>,
    pub lng: Option<f64>,
}

impl RawListing {
    /// Convert to a domain listing. Returns `None` when no usable id or
    /// price can be recovered; such entries are skipped by the caller.
    pub fn into_listing(self) -> Option<Listing> {
        let id = self.id.or(self.portal_id)?;
        let price = self
            .price
            .filter(|p| *p > 0)
            .or(self.asking_price.filter(|p| *p > 0))
            .or(self.current_price.filter(|p| *p > 0))?;

        Some(Listing {
            id,
            address: self
                .address
                .or(self.full_address)
                .unwrap_or_else(|| "Unknown".to_string()),
            price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            property_type: self.property_type.or(self.listing_type),
            description: self.description.or(self.summary),
            url: self.portal_url.or(self.url).or(self.link),
            image_url: self.image_url.or(self.main_image),
            latitude: self.latitude.or(self.lat),
            longitude: self.longitude.or(self.lng),
        })
    }
}

/// Combined area intelligence for a postcode. Sections that failed to fetch
/// are `None` rather than failing the whole aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct LocalInsights {
    pub postcode: String,
    pub schools: Option<serde_json::Value>,
    pub crime: Option<serde_json::Value>,
    pub demographics: Option<serde_json::Value>,
}

fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n.to_string()),
        Some(Raw::Text(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

fn de_opt_price<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(n)) => Some(n),
        Some(Raw::Float(f)) if f >= 0.0 => Some(f as u64),
        Some(Raw::Text(s)) => parse_price_text(&s),
        _ => None,
    })
}

/// Parse a price like "£450,000" or "450000" into pounds.
fn parse_price_text(s: &str) -> Option<u64> {
    let cleaned = s.replace('£', "").replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<u64>()
        .ok()
        .or_else(|| cleaned.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
}

fn de_opt_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u32),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(n)) => Some(n),
        Some(Raw::Float(f)) if f >= 0.0 => Some(f as u32),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
