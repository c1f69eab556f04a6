use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use anthropic_client::Claude;
use hearth_common::{Config, APP_NAME};
use patma_client::PatmaClient;

use hearth_server::extractor::CriteriaExtractor;
use hearth_server::rest;
use hearth_server::sessions::SessionStore;
use hearth_server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hearth=info".parse()?))
        .init();

    let config = Config::from_env()?;

    let claude = Claude::new(&config.anthropic_api_key, &config.claude_model)
        .with_max_tokens(config.claude_max_tokens);

    let state = Arc::new(AppState {
        extractor: CriteriaExtractor::new(claude),
        patma: PatmaClient::new(&config.patma_api_key, &config.patma_base_url),
        sessions: SessionStore::new(),
    });

    let app = Router::new()
        // Chat UI
        .route("/", get(rest::chat_page))
        // Health check
        .route("/health", get(rest::health))
        // REST API
        .route("/api", get(rest::api_info))
        .route("/api/search", post(rest::api_search))
        .route("/api/extract-criteria", post(rest::api_extract_criteria))
        .route("/api/chat", post(rest::api_chat))
        .route(
            "/api/chat/{session_id}",
            get(rest::api_chat_history).delete(rest::api_chat_clear),
        )
        .route("/api/insights/{postcode}", get(rest::api_insights))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // No caching: listings change under us
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        // Logging layer: method + path + status + latency
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                }),
        );

    let addr = config.bind_addr();
    info!("{APP_NAME} starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
