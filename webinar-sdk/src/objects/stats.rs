//! Aggregate statistics returned by `GET /webinar-stats`.

use serde::{Deserialize, Serialize};

/// Label shown wherever a registration has no referral source.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Presentation label for a raw referral source.
pub fn referral_label(source: Option<&str>) -> &str {
    source.unwrap_or(NOT_SPECIFIED)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebinarStats {
    pub total_registrations: i64,
    pub available_seats: i64,
    pub referral_breakdown: Vec<ReferralCount>,
}

/// One group of the referral breakdown.
///
/// The source is serialized under `_id` and kept raw (`null` when the
/// registrant left it blank); the admin dashboard applies the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralCount {
    #[serde(rename = "_id")]
    pub source: Option<String>,
    pub count: i64,
}
