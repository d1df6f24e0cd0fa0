use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use webinar_core::service::RegistrationError;
use webinar_sdk::objects::{
    RegisterResponse, RegistrationResponse, ResponseStatus, WebinarRegistrationCreate, WebinarStats,
};

use super::ApiError;
use crate::state::AppState;

/// `POST /webinar-register`: register for the webinar.
///
/// Answers as soon as the registration is stored. The confirmation and
/// organiser emails are sent in the background and cannot turn a stored
/// registration into a failure.
pub(super) async fn register(
    State(state): State<AppState>,
    payload: Result<Json<WebinarRegistrationCreate>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    let outcome = state
        .registrations
        .register(payload)
        .await
        .map_err(|e| match e {
            RegistrationError::Validation(e) => ApiError::Validation(e.to_string()),
            RegistrationError::Storage(error) => ApiError::Storage {
                error,
                detail: "Registration failed. Please try again or contact support.",
            },
        })?;

    Ok(Json(RegisterResponse {
        status: ResponseStatus::Success,
        message: outcome.message().to_string(),
    }))
}

/// `GET /webinar-registrations`: every registration, newest first.
pub(super) async fn list_registrations(
    State(state): State<AppState>,
) -> Result<Json<Vec<RegistrationResponse>>, ApiError> {
    let registrations = state
        .registrations
        .list_registrations()
        .await
        .map_err(|error| ApiError::Storage {
            error,
            detail: "Failed to fetch registrations",
        })?;

    Ok(Json(registrations.iter().map(Into::into).collect()))
}

/// `GET /webinar-stats`: totals, seats left and referral breakdown.
pub(super) async fn stats(State(state): State<AppState>) -> Result<Json<WebinarStats>, ApiError> {
    let stats = state
        .registrations
        .stats()
        .await
        .map_err(|error| ApiError::Storage {
            error,
            detail: "Failed to fetch statistics",
        })?;
    Ok(Json(stats))
}
