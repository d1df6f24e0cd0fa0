pub mod registration;
pub mod stats;
pub mod status;

pub use registration::{
    RegisterResponse, RegistrationResponse, ResponseStatus, WebinarRegistrationCreate,
};
pub use stats::{NOT_SPECIFIED, ReferralCount, WebinarStats, referral_label};
pub use status::{StatusCheckCreate, StatusCheckResponse};

use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
