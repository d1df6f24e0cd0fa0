//! Registration orchestration.
//!
//! A registration is validated, stored, and then two notification emails
//! are handed to detached tasks. The caller gets its answer as soon as the
//! record is stored; email outcomes are only logged.

use crate::entities::registration::{NewRegistration, Registration};
use crate::notifications::templates::{admin_notification, user_confirmation};
use crate::notifications::{DeliveryError, NotificationSender, OutgoingEmail};
use crate::store::{LIST_LIMIT, RegistrationStore, StorageError};
use crate::validation::{EmailAddress, ValidationError};
use std::sync::Arc;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::runtime::Handle;
use tracing::{error, info, warn};
use webinar_sdk::objects::{ReferralCount, WebinarRegistrationCreate, WebinarStats};

/// Seats available for the webinar.
pub const SEAT_CAPACITY: i64 = 100;

/// Seats left after `total` registrations, never negative.
pub fn available_seats(total: i64) -> i64 {
    SEAT_CAPACITY.saturating_sub(total).max(0)
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("invalid registration: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to store registration: {0}")]
    Storage(#[from] StorageError),
}

/// What a stored registration reports back to the registrant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Both notifications were scheduled.
    Confirmed(Registration),
    /// Stored, but the notifications could not be scheduled.
    NotificationsDelayed(Registration),
}

impl RegistrationOutcome {
    pub fn registration(&self) -> &Registration {
        match self {
            Self::Confirmed(r) | Self::NotificationsDelayed(r) => r,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Confirmed(_) => {
                "Registration successful! Check your email for confirmation and webinar details."
            }
            Self::NotificationsDelayed(_) => {
                "Registration saved! You may not receive confirmation email immediately, but you're registered."
            }
        }
    }
}

pub struct RegistrationService {
    store: Arc<dyn RegistrationStore>,
    notifier: Arc<dyn NotificationSender>,
    admin_email: EmailAddress,
}

impl RegistrationService {
    pub fn new(
        store: Arc<dyn RegistrationStore>,
        notifier: Arc<dyn NotificationSender>,
        admin_email: EmailAddress,
    ) -> Self {
        Self {
            store,
            notifier,
            admin_email,
        }
    }

    /// Validate, store, and schedule the two notifications.
    ///
    /// Only validation and storage failures are errors. Once the record is
    /// stored the outcome is always a success.
    pub async fn register(
        &self,
        input: WebinarRegistrationCreate,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let registration = NewRegistration::parse(input)?.materialize(OffsetDateTime::now_utc());

        self.store.insert(&registration).await.inspect_err(|e| {
            error!(error = %e, "Webinar registration could not be stored");
        })?;
        info!(id = %registration.id, email = %registration.email, "Saved webinar registration");

        match self.schedule_notifications(&registration) {
            Ok(()) => {
                info!(email = %registration.email, "Email tasks queued");
                Ok(RegistrationOutcome::Confirmed(registration))
            }
            Err(e) => {
                error!(email = %registration.email, error = %e, "Email delivery error");
                Ok(RegistrationOutcome::NotificationsDelayed(registration))
            }
        }
    }

    /// Up to [`LIST_LIMIT`] registrations, newest first.
    pub async fn list_registrations(&self) -> Result<Vec<Registration>, StorageError> {
        self.store.list_all(LIST_LIMIT).await
    }

    pub async fn stats(&self) -> Result<WebinarStats, StorageError> {
        let total_registrations = self.store.count().await?;
        let referral_breakdown = self
            .store
            .group_by_referral_source()
            .await?
            .into_iter()
            .map(|group| ReferralCount {
                source: group.referral_source,
                count: group.count,
            })
            .collect();

        Ok(WebinarStats {
            total_registrations,
            available_seats: available_seats(total_registrations),
            referral_breakdown,
        })
    }

    fn schedule_notifications(&self, registration: &Registration) -> Result<(), DeliveryError> {
        self.notifier.ready()?;
        let runtime = Handle::try_current().map_err(|e| DeliveryError::Scheduling(e.to_string()))?;

        for email in [
            admin_notification(&self.admin_email, registration),
            user_confirmation(registration),
        ] {
            let notifier = self.notifier.clone();
            runtime.spawn(deliver(notifier, email));
        }
        Ok(())
    }
}

async fn deliver(notifier: Arc<dyn NotificationSender>, email: OutgoingEmail) {
    if let Err(e) = notifier.send(&email).await {
        warn!(to = %email.to, subject = %email.subject, error = %e, "Notification not delivered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Forwards every attempted email to a channel, then fails or succeeds.
    struct RecordingSender {
        tx: mpsc::UnboundedSender<OutgoingEmail>,
        fail_send: bool,
        ready: bool,
    }

    #[async_trait]
    impl NotificationSender for RecordingSender {
        fn ready(&self) -> Result<(), DeliveryError> {
            if self.ready {
                Ok(())
            } else {
                Err(DeliveryError::MissingCredential)
            }
        }

        async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
            let _ = self.tx.send(email.clone());
            if self.fail_send {
                Err(DeliveryError::Rejected {
                    status: 500,
                    body: "boom".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    struct Harness {
        service: RegistrationService,
        store: Arc<InMemoryStore>,
        sent: mpsc::UnboundedReceiver<OutgoingEmail>,
    }

    fn harness(fail_send: bool, ready: bool) -> Harness {
        let store = Arc::new(InMemoryStore::new());
        let (tx, sent) = mpsc::unbounded_channel();
        let sender = Arc::new(RecordingSender {
            tx,
            fail_send,
            ready,
        });
        let service = RegistrationService::new(
            store.clone(),
            sender,
            EmailAddress::parse("support@example.com").unwrap(),
        );
        Harness {
            service,
            store,
            sent,
        }
    }

    fn input(email: &str, source: Option<&str>) -> WebinarRegistrationCreate {
        WebinarRegistrationCreate {
            full_name: "Asha Rao".to_string(),
            email: email.to_string(),
            whatsapp: "+91 98765 43210".to_string(),
            referral_source: source.map(str::to_string),
        }
    }

    async fn next_email(rx: &mut mpsc::UnboundedReceiver<OutgoingEmail>) -> OutgoingEmail {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_stores_and_notifies() {
        let mut h = harness(false, true);

        let outcome = h
            .service
            .register(input("asha@example.com", Some("LinkedIn")))
            .await
            .unwrap();
        assert!(matches!(outcome, RegistrationOutcome::Confirmed(_)));

        let stored = h.service.list_registrations().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(&stored[0], outcome.registration());
        assert_eq!(stored[0].full_name, "Asha Rao");
        assert_eq!(stored[0].referral_source.as_deref(), Some("LinkedIn"));

        let mut recipients = vec![
            next_email(&mut h.sent).await.to,
            next_email(&mut h.sent).await.to,
        ];
        recipients.sort();
        assert_eq!(recipients, vec!["asha@example.com", "support@example.com"]);
    }

    #[tokio::test]
    async fn test_invalid_email_writes_nothing() {
        let mut h = harness(false, true);

        let err = h.service.register(input("invalid-email", None)).await.unwrap_err();
        assert!(matches!(err, RegistrationError::Validation(_)));
        assert_eq!(h.store.count().await.unwrap(), 0);
        assert!(h.sent.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_storage_failure_fails_registration_without_emails() {
        let mut h = harness(false, true);
        h.store.fail_writes(true);

        let err = h
            .service
            .register(input("asha@example.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Storage(_)));
        assert_eq!(h.store.count().await.unwrap(), 0);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(h.sent.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failed_delivery_is_still_confirmed() {
        let mut h = harness(true, true);

        let outcome = h
            .service
            .register(input("asha@example.com", None))
            .await
            .unwrap();
        assert!(matches!(outcome, RegistrationOutcome::Confirmed(_)));

        next_email(&mut h.sent).await;
        next_email(&mut h.sent).await;
        assert_eq!(h.store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_scheduling_failure_softens_message() {
        let mut h = harness(false, false);

        let outcome = h
            .service
            .register(input("asha@example.com", None))
            .await
            .unwrap();
        assert!(matches!(outcome, RegistrationOutcome::NotificationsDelayed(_)));
        assert!(outcome.message().starts_with("Registration saved!"));
        assert_eq!(h.store.count().await.unwrap(), 1);
        assert!(h.sent.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_listing_is_newest_first() {
        let h = harness(false, true);

        let first = h.service.register(input("first@example.com", None)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = h.service.register(input("second@example.com", None)).await.unwrap();

        let listed = h.service.list_registrations().await.unwrap();
        assert_eq!(listed[0].id, second.registration().id);
        assert_eq!(listed[1].id, first.registration().id);
    }

    #[tokio::test]
    async fn test_stats_breakdown() {
        let h = harness(false, true);
        for source in ["LinkedIn", "Facebook", "LinkedIn"] {
            h.service
                .register(input("asha@example.com", Some(source)))
                .await
                .unwrap();
        }

        let stats = h.service.stats().await.unwrap();
        assert_eq!(stats.total_registrations, 3);
        assert_eq!(stats.available_seats, 97);
        assert_eq!(
            stats.referral_breakdown,
            vec![
                ReferralCount {
                    source: Some("LinkedIn".to_string()),
                    count: 2,
                },
                ReferralCount {
                    source: Some("Facebook".to_string()),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn test_available_seats_never_negative() {
        for (total, expected) in [(0, 100), (1, 99), (99, 1), (100, 0), (150, 0)] {
            assert_eq!(available_seats(total), expected, "total = {total}");
        }
    }
}
