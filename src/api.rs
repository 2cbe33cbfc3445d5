use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::SearchError;
use crate::library::{Entry, EntryList, NewEntry, Shelf};
use crate::types::*;
use crate::{mcp, AppState};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

/// Malformed or absent JSON bodies are handled like an empty object.
fn body_or_default<T: Default>(body: Result<Json<T>, JsonRejection>) -> T {
    body.map(|Json(inner)| inner).unwrap_or_default()
}

pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.body_limit;
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/search", get(search_handler))
        .route("/ai", post(ai_handler))
        .route("/chat", post(chat_handler))
        .route("/bookmarks", get(list_bookmarks).post(add_bookmark))
        .route("/bookmarks/:id", delete(remove_bookmark))
        .route("/history", get(list_history).post(add_history))
        .route("/history/:id", delete(remove_history))
        .route("/mcp/tools", get(mcp::list_tools))
        .route("/mcp/call", post(mcp::call_tool))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, SearchError> {
    let Query(params) =
        params.map_err(|rejection| SearchError::BadRequest(rejection.body_text()))?;
    let response = state.search.search_params(&params).await?;
    Ok(Json(response))
}

async fn ai_handler(
    body: Result<Json<AiRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let prompt = body_or_default(body)
        .prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| bad_request("Missing prompt"))?;
    Ok(Json(ReplyResponse {
        reply: format!("Echo: {}", prompt),
    }))
}

async fn chat_handler(
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let message = body_or_default(body)
        .message
        .filter(|m| !m.is_empty())
        .ok_or_else(|| bad_request("Missing message"))?;
    info!("Processing chat message ({} chars)", message.chars().count());
    let at = chrono::Local::now().format("%-I:%M:%S %p");
    Ok(Json(ReplyResponse {
        reply: format!("Server received \"{}\" at {}", message, at),
    }))
}

async fn list_shelf(state: &AppState, shelf: Shelf) -> Json<EntryList> {
    Json(EntryList {
        items: state.library.list(shelf).await,
    })
}

async fn add_to_shelf(
    state: &AppState,
    shelf: Shelf,
    body: Result<Json<NewEntry>, JsonRejection>,
) -> Result<Json<Entry>, ApiError> {
    state
        .library
        .add(shelf, body_or_default(body))
        .await
        .map(Json)
        .map_err(|e| bad_request(e.to_string()))
}

async fn remove_from_shelf(state: &AppState, shelf: Shelf, id: &str) -> Json<serde_json::Value> {
    state.library.remove(shelf, id).await;
    Json(json!({ "ok": true }))
}

async fn list_bookmarks(State(state): State<Arc<AppState>>) -> Json<EntryList> {
    list_shelf(&state, Shelf::Bookmarks).await
}

async fn add_bookmark(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewEntry>, JsonRejection>,
) -> Result<Json<Entry>, ApiError> {
    add_to_shelf(&state, Shelf::Bookmarks, body).await
}

async fn remove_bookmark(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<serde_json::Value> {
    remove_from_shelf(&state, Shelf::Bookmarks, &id).await
}

async fn list_history(State(state): State<Arc<AppState>>) -> Json<EntryList> {
    list_shelf(&state, Shelf::History).await
}

async fn add_history(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewEntry>, JsonRejection>,
) -> Result<Json<Entry>, ApiError> {
    add_to_shelf(&state, Shelf::History, body).await
}

async fn remove_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<serde_json::Value> {
    remove_from_shelf(&state, Shelf::History, &id).await
}
