//! Registration request and response types.
//!
//! Field names follow the camelCase convention of the landing page form.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Body of `POST /webinar-register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebinarRegistrationCreate {
    pub full_name: String,
    pub email: String,
    pub whatsapp: String,
    #[serde(default)]
    pub referral_source: Option<String>,
}

/// A persisted registration as returned by `GET /webinar-registrations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub whatsapp: String,
    pub referral_source: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
}

/// Result of a registration attempt.
///
/// `status` is always `success` once the record is stored; the message
/// tells the registrant whether the confirmation email is on its way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub status: ResponseStatus,
    pub message: String,
}
