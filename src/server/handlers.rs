use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::location::LocationRecord;

use super::state::AppState;

// ─── GET /api ────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub cache: bool,
    #[serde(rename = "Data")]
    pub data: Vec<LocationRecord>,
}

/// Geocode `city` through the cache. Failures become a bare 500.
///
/// The query string is taken as raw pairs so a repeated `city` never turns
/// into a rejection; the first one wins and an absent one is `""`.
pub async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let start = Instant::now();
    let city = first_city(params);
    tracing::info!(city = %city, "GET /api");

    match state.lookup.lookup(&city).await {
        Ok(result) => {
            tracing::info!(
                city = %city,
                cache = result.from_cache,
                matches = result.records.len(),
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "lookup complete"
            );
            Ok(Json(ApiResponse {
                cache: result.from_cache,
                data: result.records,
            }))
        }
        Err(e) => {
            tracing::error!(city = %city, error = %e, "lookup failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn first_city(params: Vec<(String, String)>) -> String {
    params
        .into_iter()
        .find(|(key, _)| key == "city")
        .map(|(_, value)| value)
        .unwrap_or_default()
}
