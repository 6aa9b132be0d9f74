//! HTTP surface for the digit service.
//!
//! One real route: `GET /v1/pi?start=&numberOfDigits=&radix=`, answering
//! with `{"content": "<digits>"}`. Everything else 404s. Validation
//! happens here so the storage core can stay permissive about ranges.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use piserve_core::ResultSet;
use piserve_storage::Service;

pub mod config;

/// Shared state: the long-lived service handle, the per-radix manifests,
/// and the per-request digit cap.
pub struct AppState {
    pub service: Service,
    pub decimal: ResultSet,
    pub hexadecimal: ResultSet,
    pub max_digits: u64,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/pi", get(get_pi))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GetPiParams {
    start: i64,
    number_of_digits: i64,
    radix: u32,
}

impl Default for GetPiParams {
    fn default() -> Self {
        Self {
            start: 0,
            number_of_digits: 100,
            radix: 10,
        }
    }
}

#[derive(Debug, Serialize)]
struct GetPiResponse {
    /// Digits of π as a string, e.g. `"31415926535..."`.
    content: String,
}

async fn get_pi(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GetPiParams>,
) -> Response {
    let set = match params.radix {
        10 => &state.decimal,
        16 => &state.hexadecimal,
        _ => return bad_request("radix must be either 10 or 16"),
    };
    if params.start < 0 {
        return bad_request("start is negative");
    }
    let start = params.start as u64;
    if start > set.total_digits() {
        return bad_request("start out of range");
    }
    if params.number_of_digits < 0 {
        return bad_request("numberOfDigits is negative");
    }
    let n = params.number_of_digits as u64;
    if n > state.max_digits {
        return bad_request("numberOfDigits is too big");
    }

    match state.service.get(set, start, n as usize).await {
        Ok(digits) => {
            let content = String::from_utf8_lossy(&digits).into_owned();
            Json(GetPiResponse { content }).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, start, n, radix = params.radix, "get failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

fn bad_request(message: &'static str) -> Response {
    tracing::error!(code = 400, message);
    (StatusCode::BAD_REQUEST, message).into_response()
}

async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        format!("The requested url {} was not found.\n", uri.path()),
    )
        .into_response()
}
