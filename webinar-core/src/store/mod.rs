//! Persistence seams used by the registration service and the HTTP layer.
//!
//! `DatabaseProcessor` implements both traits against PostgreSQL. The
//! in-memory store (feature `test-support`) implements them for tests and
//! can be told to fail writes.

mod postgres;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

use crate::entities::registration::{ReferralGroup, Registration};
use crate::entities::status_check::StatusCheck;
use async_trait::async_trait;
use thiserror::Error;

/// Upper bound on every list endpoint.
pub const LIST_LIMIT: i64 = 1000;

/// Upper bound on the number of referral groups returned by the aggregation.
pub const REFERRAL_GROUP_LIMIT: i64 = 100;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Persist a fully-formed registration.
    async fn insert(&self, registration: &Registration) -> Result<(), StorageError>;

    /// Up to `limit` registrations, newest first. Equal timestamps come
    /// back in an unspecified order.
    async fn list_all(&self, limit: i64) -> Result<Vec<Registration>, StorageError>;

    async fn count(&self) -> Result<i64, StorageError>;

    /// Registrations per raw referral source, largest group first.
    async fn group_by_referral_source(&self) -> Result<Vec<ReferralGroup>, StorageError>;
}

#[async_trait]
pub trait StatusCheckStore: Send + Sync {
    async fn insert_status_check(&self, check: &StatusCheck) -> Result<(), StorageError>;

    async fn list_status_checks(&self, limit: i64) -> Result<Vec<StatusCheck>, StorageError>;
}
