use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use webinar_core::entities::status_check::StatusCheck;
use webinar_core::store::LIST_LIMIT;
use webinar_sdk::objects::{StatusCheckCreate, StatusCheckResponse};

use super::ApiError;
use crate::state::AppState;

/// `POST /status`: record a status check from `client_name`.
pub(super) async fn create_status_check(
    State(state): State<AppState>,
    payload: Result<Json<StatusCheckCreate>, JsonRejection>,
) -> Result<Json<StatusCheckResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    let check = StatusCheck::new(payload.client_name);
    state
        .status_checks
        .insert_status_check(&check)
        .await
        .map_err(|error| ApiError::Storage {
            error,
            detail: "Failed to record status check",
        })?;

    Ok(Json((&check).into()))
}

/// `GET /status`: stored status checks.
pub(super) async fn list_status_checks(
    State(state): State<AppState>,
) -> Result<Json<Vec<StatusCheckResponse>>, ApiError> {
    let checks = state
        .status_checks
        .list_status_checks(LIST_LIMIT)
        .await
        .map_err(|error| ApiError::Storage {
            error,
            detail: "Failed to fetch status checks",
        })?;

    Ok(Json(checks.iter().map(Into::into).collect()))
}
