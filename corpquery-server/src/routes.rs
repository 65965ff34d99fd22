//! HTTP routes.
//!
//! - `POST /api/query`: scrape a batch of company names in order
//! - `GET /api/history`: most recent stored records
//! - `OPTIONS` anywhere: CORS preflight, answered by the CORS layer
//! - anything else: plain-text `404 Not Found`

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use corpquery_core::{CompanyRecord, ScrapeOutcome};
use corpquery_store::recent_history;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `POST /api/query`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// Company names, scraped in this order.
    pub companies: Vec<String>,
    /// Answer to a previous captcha challenge.
    #[serde(default)]
    pub captcha: Option<String>,
}

/// Successful response of `POST /api/query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// One record per found company, in input order.
    pub results: Vec<CompanyRecord>,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/query", post(handle_query).fallback(not_found))
        .route("/api/history", get(handle_history).fallback(not_found))
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

// --- POST /api/query ---

async fn handle_query(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let request: QueryRequest = serde_json::from_slice(&body)?;
    info!(companies = request.companies.len(), "Query batch received");

    let mut results = Vec::with_capacity(request.companies.len());
    for name in &request.companies {
        match state
            .scraper
            .fetch_company_info(name, request.captcha.as_deref())
            .await
        {
            ScrapeOutcome::Found(record) => results.push(record),
            ScrapeOutcome::NotFound => debug!(company = %name, "No match, skipping"),
            ScrapeOutcome::Blocked(result) => {
                info!(
                    company = %name,
                    captcha_required = result.captcha_required,
                    "Batch stopped"
                );
                return Ok(Json(result).into_response());
            }
        }
    }

    Ok(Json(QueryResponse { results }).into_response())
}

// --- GET /api/history ---

async fn handle_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompanyRecord>>, ApiError> {
    let records = recent_history(state.store.as_ref(), state.history_limit).await?;
    debug!(count = records.len(), "History listed");
    Ok(Json(records))
}
