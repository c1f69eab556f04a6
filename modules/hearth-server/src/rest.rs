use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use hearth_common::{
    ChatMessage, HearthError, SearchRequest, SearchResponse, APP_NAME, APP_VERSION,
};

use crate::markdown::format_response;
use crate::search::{run_search, MAX_RESULTS};
use crate::templates::render_chat;
use crate::AppState;

/// GET / — the chat UI.
pub async fn chat_page() -> Html<String> {
    Html(render_chat())
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "app": APP_NAME,
        "version": APP_VERSION,
    }))
}

/// GET /api — service info for API consumers.
pub async fn api_info() -> impl IntoResponse {
    Json(json!({
        "name": APP_NAME,
        "version": APP_VERSION,
        "health": "/health",
        "endpoints": {
            "search": "POST /api/search",
            "extract_criteria": "POST /api/extract-criteria",
            "chat": "POST /api/chat",
            "chat_history": "GET /api/chat/{session_id}",
            "insights": "GET /api/insights/{postcode}",
        },
    }))
}

/// POST /api/search — one-shot search without a conversation.
pub async fn api_search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> impl IntoResponse {
    match handle_search(&state, &request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            warn!(error = %e, "Search request failed");
            error_response(e)
        }
    }
}

/// POST /api/extract-criteria — criteria only, no listing lookup.
pub async fn api_extract_criteria(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> impl IntoResponse {
    let query = match request.validated_query() {
        Ok(query) => query,
        Err(e) => return error_response(e),
    };
    match state.extractor.extract(query).await {
        Ok(criteria) => Json(criteria).into_response(),
        Err(e) => {
            warn!(error = %e, "Criteria extraction failed");
            error_response(e)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatSendRequest {
    pub session_id: Option<Uuid>,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ChatSendResponse {
    pub session_id: Uuid,
    pub reply: String,
    pub response: SearchResponse,
}

/// POST /api/chat — run a search and record both turns in the session.
///
/// Failed searches are reported to the caller but not recorded, so a retry
/// starts from a clean slate.
pub async fn api_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatSendRequest>,
) -> impl IntoResponse {
    let search_request = SearchRequest {
        query: request.query.clone(),
    };
    match handle_search(&state, &search_request).await {
        Ok(response) => {
            let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);
            let reply = format_response(&response);
            state
                .sessions
                .append(session_id, ChatMessage::user(request.query))
                .await;
            state
                .sessions
                .append(session_id, ChatMessage::assistant(reply.clone()))
                .await;
            Json(ChatSendResponse {
                session_id,
                reply,
                response,
            })
            .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Chat request failed");
            error_response(e)
        }
    }
}

/// GET /api/chat/{session_id}
pub async fn api_chat_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let session_id = match Uuid::parse_str(&session_id) {
        Ok(id) => id,
        Err(_) => return invalid_session_id(),
    };
    match state.sessions.history(session_id).await {
        Some(messages) => Json(json!({
            "session_id": session_id,
            "messages": messages,
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Session not found" })),
        )
            .into_response(),
    }
}

/// DELETE /api/chat/{session_id} — idempotent.
pub async fn api_chat_clear(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let session_id = match Uuid::parse_str(&session_id) {
        Ok(id) => id,
        Err(_) => return invalid_session_id(),
    };
    state.sessions.clear(session_id).await;
    StatusCode::NO_CONTENT.into_response()
}

/// GET /api/insights/{postcode} — area data from PaTMa, best effort.
pub async fn api_insights(
    State(state): State<Arc<AppState>>,
    Path(postcode): Path<String>,
) -> impl IntoResponse {
    Json(state.patma.local_insights(&postcode).await)
}

async fn handle_search(
    state: &AppState,
    request: &SearchRequest,
) -> Result<SearchResponse, HearthError> {
    let query = request.validated_query()?;
    let criteria = state.extractor.extract(query).await?;
    let properties = run_search(&state.patma, &criteria, MAX_RESULTS).await;

    let message = if criteria.locations.is_empty() {
        Some(
            "I couldn't work out which area to search. Try mentioning a city, town or postcode."
                .to_string(),
        )
    } else {
        None
    };

    Ok(SearchResponse {
        total_count: properties.len(),
        criteria,
        properties,
        message,
    })
}

fn error_response(err: HearthError) -> Response {
    match err {
        HearthError::Validation(message) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": message })),
        )
            .into_response(),
        HearthError::Extraction(message) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "detail": format!("Could not understand the property requirements: {message}")
            })),
        )
            .into_response(),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "detail": "An unexpected error occurred while processing your search."
            })),
        )
            .into_response(),
    }
}

fn invalid_session_id() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "detail": "Invalid session id" })),
    )
        .into_response()
}
