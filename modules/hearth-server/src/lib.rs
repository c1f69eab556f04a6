pub mod extractor;
pub mod markdown;
pub mod rest;
pub mod search;
pub mod sessions;
pub mod templates;

use extractor::CriteriaExtractor;
use patma_client::PatmaClient;
use sessions::SessionStore;

/// State shared across request handlers.
pub struct AppState {
    pub extractor: CriteriaExtractor,
    pub patma: PatmaClient,
    pub sessions: SessionStore,
}
