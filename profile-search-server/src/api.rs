//! HTTP surface: `POST /search` (typed criteria), `GET /search?query=` (free text), `GET /health`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use profile_search_common::SearchConfig;
use profile_search_core::{evaluate, search_any, Criteria, ProfileSearchError, Row, Snapshot};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared, read-only request context. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub snapshot: Arc<Snapshot>,
    pub search: SearchConfig,
}

impl AppState {
    pub fn new(snapshot: Snapshot, search: SearchConfig) -> Self {
        Self { snapshot: Arc::new(snapshot), search }
    }
}

/// Error surfaced to the client as `{"error": msg}`.
pub struct ApiError(ProfileSearchError);

impl From<ProfileSearchError> for ApiError {
    fn from(e: ProfileSearchError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            tracing::warn!(error = %self.0, "rejected search request");
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self.0, "search request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Serialize)]
struct SearchResponse<'a> {
    results: Vec<&'a Row>,
}

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn router(state: AppState, permissive_cors: bool) -> Router {
    let app = Router::new()
        .route("/search", get(search_text).post(search_criteria))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    if permissive_cors {
        app.layer(cors_layer())
    } else {
        app
    }
}

/// Typed criteria search. The body is parsed by hand so malformed JSON gets the same error shape.
pub async fn search_criteria(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let dataset = state.snapshot.dataset()?;
    let criteria = Criteria::from_json(&body, state.search.term_separator)?;
    let mode = criteria.mode.unwrap_or(state.search.default_mode);
    let results = evaluate(dataset, &criteria, mode)?;
    tracing::debug!(%mode, matches = results.len(), "criteria search");
    Ok(Json(SearchResponse { results }).into_response())
}

/// Value of the first `query` pair when the parameter repeats. Empty counts as missing.
pub fn first_query(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .find(|(k, _)| k == "query")
        .map(|(_, v)| v.as_str())
        .filter(|q| !q.is_empty())
}

/// Free-text search over every column.
pub async fn search_text(
    State(state): State<AppState>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, ApiError> {
    let dataset = state.snapshot.dataset()?;
    let Query(pairs) = params.map_err(|e| ProfileSearchError::BadRequest(e.body_text()))?;
    let query = first_query(&pairs)
        .ok_or_else(|| ProfileSearchError::BadRequest("No query parameter provided".into()))?;
    let results = search_any(dataset, query)?;
    tracing::debug!(query = %query, matches = results.len(), "text search");
    if results.is_empty() {
        return Ok(Json(json!({ "message": "No matching records found." })).into_response());
    }
    Ok(Json(results).into_response())
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.snapshot.dataset() {
        Ok(ds) => Json(json!({ "status": "ok", "rows": ds.len() })),
        Err(e) => Json(json!({
            "status": "degraded",
            "error": e.to_string(),
            "reason": state.snapshot.reason(),
        })),
    }
}
