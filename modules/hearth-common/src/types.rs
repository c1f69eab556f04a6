use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::HearthError;

// --- Search criteria ---

/// Structured search criteria extracted from a natural-language query.
///
/// This is the fixed schema the model fills in. Every field is optional so a
/// sparse query ("somewhere cheap in Leeds") still parses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PropertyCriteria {
    /// Minimum number of bedrooms required
    #[serde(default)]
    pub min_bedrooms: Option<u32>,
    /// Maximum number of bedrooms
    #[serde(default)]
    pub max_bedrooms: Option<u32>,
    /// Minimum price in GBP
    #[serde(default)]
    pub min_price: Option<u64>,
    /// Maximum price in GBP
    #[serde(default)]
    pub max_price: Option<u64>,
    /// Desired locations: cities, towns, areas, postcodes
    #[serde(default)]
    pub locations: Vec<String>,
    /// Property types, e.g. "house", "flat", "bungalow"
    #[serde(default)]
    pub property_types: Vec<String>,
    /// Desired features, e.g. "garden", "parking", "no chain"
    #[serde(default)]
    pub preferences: Vec<String>,
    /// Features or conditions to avoid
    #[serde(default)]
    pub deal_breakers: Vec<String>,
}

impl PropertyCriteria {
    /// True when the model extracted nothing at all.
    pub fn is_empty(&self) -> bool {
        self.min_bedrooms.is_none()
            && self.max_bedrooms.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.locations.is_empty()
            && self.property_types.is_empty()
            && self.preferences.is_empty()
            && self.deal_breakers.is_empty()
    }

    /// Swap inverted bedroom and price bounds in place. An inverted range
    /// would match nothing, which reads as a bug to the user.
    pub fn normalize(&mut self) {
        if let (Some(min), Some(max)) = (self.min_bedrooms, self.max_bedrooms) {
            if min > max {
                self.min_bedrooms = Some(max);
                self.max_bedrooms = Some(min);
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                self.min_price = Some(max);
                self.max_price = Some(min);
            }
        }
    }
}

// --- Property types ---

/// Property types in PaTMa's wire vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    House,
    Detached,
    SemiDetached,
    Terraced,
    Flat,
    Bungalow,
}

impl PropertyType {
    /// Map a natural-language synonym to a wire type. Unknown synonyms
    /// return `None` and the type filter is simply omitted.
    pub fn from_synonym(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "house" => Some(PropertyType::House),
            "detached" => Some(PropertyType::Detached),
            "semi-detached" | "semi detached" => Some(PropertyType::SemiDetached),
            "terraced" | "terrace" => Some(PropertyType::Terraced),
            "flat" | "apartment" | "maisonette" => Some(PropertyType::Flat),
            "bungalow" => Some(PropertyType::Bungalow),
            _ => None,
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyType::House => write!(f, "house"),
            PropertyType::Detached => write!(f, "detached"),
            PropertyType::SemiDetached => write!(f, "semi_detached"),
            PropertyType::Terraced => write!(f, "terraced"),
            PropertyType::Flat => write!(f, "flat"),
            PropertyType::Bungalow => write!(f, "bungalow"),
        }
    }
}

// --- Listings ---

/// A property listing normalized from the PaTMa API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub address: String,
    /// Asking price in GBP.
    pub price: u64,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub property_type: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// --- API request/response ---

/// Bounds on the free-text query length.
pub const QUERY_MIN_CHARS: usize = 10;
pub const QUERY_MAX_CHARS: usize = 2000;

/// Request body for search and criteria-extraction endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Natural-language description of the desired property.
    pub query: String,
}

impl SearchRequest {
    /// Validate the query length bounds and return the trimmed query.
    pub fn validated_query(&self) -> Result<&str, HearthError> {
        let query = self.query.trim();
        let chars = query.chars().count();
        if chars < QUERY_MIN_CHARS {
            return Err(HearthError::Validation(format!(
                "query must be at least {QUERY_MIN_CHARS} characters"
            )));
        }
        if chars > QUERY_MAX_CHARS {
            return Err(HearthError::Validation(format!(
                "query must be at most {QUERY_MAX_CHARS} characters"
            )));
        }
        Ok(query)
    }
}

/// Response body for the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Criteria extracted from the natural-language query.
    pub criteria: PropertyCriteria,
    /// Matching listings, deduplicated and sorted by ascending price.
    pub properties: Vec<Listing>,
    pub total_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// --- Chat ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of a chat conversation. Assistant content is Markdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_map_to_patma_vocabulary() {
        assert_eq!(PropertyType::from_synonym("house"), Some(PropertyType::House));
        assert_eq!(
            PropertyType::from_synonym("Semi-Detached"),
            Some(PropertyType::SemiDetached)
        );
        assert_eq!(
            PropertyType::from_synonym("semi detached"),
            Some(PropertyType::SemiDetached)
        );
        assert_eq!(PropertyType::from_synonym("terrace"), Some(PropertyType::Terraced));
        assert_eq!(PropertyType::from_synonym("apartment"), Some(PropertyType::Flat));
        assert_eq!(PropertyType::from_synonym("maisonette"), Some(PropertyType::Flat));
        assert_eq!(PropertyType::from_synonym("castle"), None);
    }

    #[test]
    fn property_type_renders_wire_names() {
        assert_eq!(PropertyType::SemiDetached.to_string(), "semi_detached");
        assert_eq!(PropertyType::Flat.to_string(), "flat");
    }

    #[test]
    fn sparse_criteria_parse_with_defaults() {
        let criteria: PropertyCriteria =
            serde_json::from_str(r#"{"locations": ["Leeds"]}"#).unwrap();
        assert_eq!(criteria.locations, vec!["Leeds"]);
        assert_eq!(criteria.min_bedrooms, None);
        assert!(criteria.property_types.is_empty());
        assert!(!criteria.is_empty());
    }

    #[test]
    fn empty_criteria_detected() {
        assert!(PropertyCriteria::default().is_empty());
    }

    #[test]
    fn normalize_swaps_inverted_bounds() {
        let mut criteria = PropertyCriteria {
            min_bedrooms: Some(4),
            max_bedrooms: Some(2),
            min_price: Some(500_000),
            max_price: Some(300_000),
            ..Default::default()
        };
        criteria.normalize();
        assert_eq!(criteria.min_bedrooms, Some(2));
        assert_eq!(criteria.max_bedrooms, Some(4));
        assert_eq!(criteria.min_price, Some(300_000));
        assert_eq!(criteria.max_price, Some(500_000));
    }

    #[test]
    fn normalize_leaves_ordered_bounds_alone() {
        let mut criteria = PropertyCriteria {
            min_price: Some(200_000),
            max_price: Some(400_000),
            ..Default::default()
        };
        criteria.normalize();
        assert_eq!(criteria.min_price, Some(200_000));
        assert_eq!(criteria.max_price, Some(400_000));
    }

    #[test]
    fn query_bounds_enforced() {
        let short = SearchRequest { query: "too short".to_string() };
        assert!(short.validated_query().is_err());

        let ok = SearchRequest {
            query: "  3 bed house in Manchester under £400k  ".to_string(),
        };
        assert_eq!(ok.validated_query().unwrap(), "3 bed house in Manchester under £400k");

        let long = SearchRequest { query: "x".repeat(QUERY_MAX_CHARS + 1) };
        assert!(long.validated_query().is_err());
    }
}
