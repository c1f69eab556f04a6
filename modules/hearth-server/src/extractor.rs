use anthropic_client::util::truncate_to_char_boundary;
use anthropic_client::Claude;
use tracing::info;

use hearth_common::{HearthError, PropertyCriteria};

/// Instructs Claude how to turn a free-text property query into criteria.
const CRITERIA_SYSTEM_PROMPT: &str = r#"You are a property search assistant that extracts structured search criteria from natural language descriptions.

Your task is to parse the user's property requirements and return a JSON object with the following structure:

{
    "min_bedrooms": <integer or null>,
    "max_bedrooms": <integer or null>,
    "min_price": <integer in GBP or null>,
    "max_price": <integer in GBP or null>,
    "locations": [<list of location strings: cities, towns, areas, postcodes>],
    "property_types": [<list of property types: "house", "flat", "apartment", "bungalow", "terraced", "semi-detached", "detached", "cottage", "maisonette">],
    "preferences": [<list of desired features: "garden", "parking", "garage", "modern kitchen", "ensuite", "good schools", "quiet area", etc.>],
    "deal_breakers": [<list of things to avoid: "no garden", "busy road", "ex-council", etc.>]
}

Guidelines:
- Extract explicit requirements from the text
- Convert price mentions to integers (e.g., "£400k" = 400000, "half a million" = 500000)
- Normalize location names (e.g., "Greater Manchester" is fine, but also extract specific areas if mentioned)
- Be liberal with preferences - include anything that sounds like a desired feature
- Only include deal_breakers for things explicitly mentioned as unwanted
- If something isn't mentioned, use null for numbers or empty list for arrays
- Return ONLY the JSON object, no additional text or explanation"#;

/// Anything beyond this is cut before the query reaches the model.
const MAX_QUERY_BYTES: usize = 8_000;

/// Turns natural language queries into [`PropertyCriteria`] via Claude.
pub struct CriteriaExtractor {
    claude: Claude,
}

impl CriteriaExtractor {
    pub fn new(claude: Claude) -> Self {
        Self { claude }
    }

    /// Extract structured search criteria from a free-text query.
    ///
    /// Inverted bounds coming back from the model (min above max) are
    /// swapped rather than rejected.
    pub async fn extract(&self, query: &str) -> Result<PropertyCriteria, HearthError> {
        let query = truncate_to_char_boundary(query, MAX_QUERY_BYTES);
        info!(query = %truncate_to_char_boundary(query, 100), "Extracting search criteria");

        let user_prompt =
            format!("Extract property search criteria from this description:\n\n{query}");

        let mut criteria: PropertyCriteria = self
            .claude
            .extract(CRITERIA_SYSTEM_PROMPT, &user_prompt)
            .await
            .map_err(|e| HearthError::Extraction(e.to_string()))?;

        criteria.normalize();
        info!(?criteria, "Extracted search criteria");
        Ok(criteria)
    }
}
