pub mod error;
pub mod types;

pub use error::{PatmaError, Result};
pub use types::{ListingQuery, ListingsPayload, LocalInsights, RawListing};

use std::time::Duration;

use hearth_common::{Listing, PropertyType};
use reqwest::header;
use tracing::{debug, info, warn};

pub struct PatmaClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl PatmaClient {
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.api_key)
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "PaTMa GET");

        let resp = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, self.auth_header())
            .header(header::ACCEPT, "application/json")
            .query(params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(PatmaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Search property listings around a postcode.
    pub async fn search_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>> {
        let url = format!("{}/prospector/v1/property-listing/", self.base_url);
        info!(postcode = %query.postcode, "Fetching property listings");

        let resp = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, self.auth_header())
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(PatmaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        let payload: ListingsPayload = serde_json::from_str(&body)?;

        let mut listings = Vec::new();
        for raw in payload.into_results() {
            match raw.into_listing() {
                Some(listing) => listings.push(listing),
                None => warn!("Skipping listing without a usable id or price"),
            }
        }

        info!(count = listings.len(), "Fetched property listings");
        Ok(listings)
    }

    /// Asking price statistics for a postcode.
    pub async fn asking_prices(
        &self,
        postcode: &str,
        bedrooms: u32,
        property_type: &str,
    ) -> Result<serde_json::Value> {
        let params = [
            ("postcode", postcode.to_string()),
            ("bedrooms", bedrooms.to_string()),
            ("property_type", wire_property_type(property_type)),
        ];
        self.get_json("/prospector/v1/asking-prices/", &params).await
    }

    /// Sold price statistics for a postcode.
    pub async fn sold_prices(
        &self,
        postcode: &str,
        property_type: &str,
        max_age_months: u32,
        bedrooms: Option<u32>,
    ) -> Result<serde_json::Value> {
        let mut params = vec![
            ("postcode", postcode.to_string()),
            ("property_type", wire_property_type(property_type)),
            ("max_age_months", max_age_months.to_string()),
        ];
        if let Some(bedrooms) = bedrooms {
            params.push(("bedrooms", bedrooms.to_string()));
        }
        self.get_json("/prospector/v1/sold-prices/", &params).await
    }

    /// Historical price trends from UKHPI data.
    pub async fn price_history(
        &self,
        postcode: &str,
        property_type: Option<&str>,
    ) -> Result<serde_json::Value> {
        let mut params = vec![("postcode", postcode.to_string())];
        if let Some(property_type) = property_type {
            params.push(("property_type", wire_property_type(property_type)));
        }
        self.get_json("/prospector/v1/price-history/", &params).await
    }

    /// Nearby schools with Ofsted ratings.
    pub async fn schools(&self, postcode: &str, max_results: u32) -> Result<serde_json::Value> {
        let params = [
            ("postcode", postcode.to_string()),
            ("max_results", max_results.to_string()),
        ];
        self.get_json("/prospector/v1/schools/", &params).await
    }

    /// Crime statistics for a postcode.
    pub async fn crime(&self, postcode: &str) -> Result<serde_json::Value> {
        let params = [("postcode", postcode.to_string())];
        self.get_json("/prospector/v1/crime/", &params).await
    }

    /// Demographic statistics for a postcode.
    pub async fn demographics(&self, postcode: &str) -> Result<serde_json::Value> {
        let params = [("postcode", postcode.to_string())];
        self.get_json("/prospector/v2/demographics/", &params).await
    }

    /// Stamp duty owed on a purchase at `value`. Country is one of
    /// england, wales, scotland.
    pub async fn stamp_duty(&self, value: u64, country: &str) -> Result<serde_json::Value> {
        let params = [
            ("value", value.to_string()),
            ("country", country.to_string()),
        ];
        self.get_json("/prospector/v1/stamp-duty/", &params).await
    }

    /// Combined schools, crime and demographics for a postcode. A failing
    /// section is logged and omitted rather than failing the aggregate.
    pub async fn local_insights(&self, postcode: &str) -> LocalInsights {
        let schools = match self.schools(postcode, 10).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "Failed to fetch schools");
                None
            }
        };

        let crime = match self.crime(postcode).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "Failed to fetch crime data");
                None
            }
        };

        let demographics = match self.demographics(postcode).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "Failed to fetch demographics");
                None
            }
        };

        LocalInsights {
            postcode: postcode.to_string(),
            schools,
            crime,
            demographics,
        }
    }
}

/// Map a natural-language property type to PaTMa's vocabulary, passing
/// unknown values through unchanged.
fn wire_property_type(raw: &str) -> String {
    PropertyType::from_synonym(raw)
        .map(|t| t.to_string())
        .unwrap_or_else(|| raw.to_string())
}
