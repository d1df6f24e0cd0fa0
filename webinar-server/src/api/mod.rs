//! Public API handlers, mounted under [`API_PREFIX`].
//!
//! None of these endpoints require authentication.
//!
//! # Endpoints
//!
//! - `GET  /`                      – liveness greeting
//! - `POST /status`                – record a status check
//! - `GET  /status`                – list status checks
//! - `POST /webinar-register`      – register for the webinar
//! - `GET  /webinar-registrations` – list registrations, newest first
//! - `GET  /webinar-stats`         – totals, seats left, referral breakdown

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use webinar_core::store::StorageError;
use webinar_sdk::objects::ErrorResponse;

use crate::state::AppState;

mod status;
mod webinar;

#[cfg(test)]
mod tests;

pub const API_PREFIX: &str = "/api";

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/status",
            post(status::create_status_check).get(status::list_status_checks),
        )
        .route("/webinar-register", post(webinar::register))
        .route("/webinar-registrations", get(webinar::list_registrations))
        .route("/webinar-stats", get(webinar::stats))
}

#[derive(Serialize)]
pub(crate) struct HelloResponse {
    message: &'static str,
}

/// `GET /`: liveness greeting.
pub(crate) async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello World",
    })
}

// ---------------------------------------------------------------------------
// Shared error type
// ---------------------------------------------------------------------------

/// Errors that can occur in API handlers.
#[derive(Debug)]
pub(crate) enum ApiError {
    /// The request body was malformed or failed validation.
    Validation(String),
    /// The store failed; `detail` is what the caller sees.
    Storage {
        error: StorageError,
        detail: &'static str,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, detail) = match self {
            ApiError::Validation(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
            ApiError::Storage { error, detail } => {
                tracing::error!(error = %error, "API storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, detail.to_string())
            }
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}
