//! In-memory store for tests.

use super::{REFERRAL_GROUP_LIMIT, RegistrationStore, StatusCheckStore, StorageError};
use crate::entities::registration::{ReferralGroup, Registration};
use crate::entities::status_check::StatusCheck;
use async_trait::async_trait;
use itertools::Itertools;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Vector-backed store. Writes can be made to fail with
/// [`fail_writes`](InMemoryStore::fail_writes) to simulate an outage.
#[derive(Default)]
pub struct InMemoryStore {
    registrations: RwLock<Vec<Registration>>,
    status_checks: RwLock<Vec<StatusCheck>>,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RegistrationStore for InMemoryStore {
    async fn insert(&self, registration: &Registration) -> Result<(), StorageError> {
        self.check_writable()?;
        self.registrations.write().await.push(registration.clone());
        Ok(())
    }

    async fn list_all(&self, limit: i64) -> Result<Vec<Registration>, StorageError> {
        let registrations = self.registrations.read().await;
        Ok(registrations
            .iter()
            .sorted_by(|a, b| b.created_at.cmp(&a.created_at))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, StorageError> {
        let len = self.registrations.read().await.len();
        Ok(i64::try_from(len).unwrap_or(i64::MAX))
    }

    async fn group_by_referral_source(&self) -> Result<Vec<ReferralGroup>, StorageError> {
        let registrations = self.registrations.read().await;
        let groups = registrations
            .iter()
            .map(|r| r.referral_source.clone())
            .counts()
            .into_iter()
            .map(|(referral_source, count)| ReferralGroup {
                referral_source,
                count: i64::try_from(count).unwrap_or(i64::MAX),
            })
            .sorted_by(|a, b| b.count.cmp(&a.count))
            .take(usize::try_from(REFERRAL_GROUP_LIMIT).unwrap_or(0))
            .collect();
        Ok(groups)
    }
}

#[async_trait]
impl StatusCheckStore for InMemoryStore {
    async fn insert_status_check(&self, check: &StatusCheck) -> Result<(), StorageError> {
        self.check_writable()?;
        self.status_checks.write().await.push(check.clone());
        Ok(())
    }

    async fn list_status_checks(&self, limit: i64) -> Result<Vec<StatusCheck>, StorageError> {
        let checks = self.status_checks.read().await;
        Ok(checks
            .iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }
}
