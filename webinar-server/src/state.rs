//! Application state shared across all request handlers.

use std::sync::Arc;
use webinar_core::service::RegistrationService;
use webinar_core::store::StatusCheckStore;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub registrations: Arc<RegistrationService>,
    pub status_checks: Arc<dyn StatusCheckStore>,
}

impl AppState {
    pub fn new(
        registrations: RegistrationService,
        status_checks: Arc<dyn StatusCheckStore>,
    ) -> Self {
        Self {
            registrations: Arc::new(registrations),
            status_checks,
        }
    }
}
