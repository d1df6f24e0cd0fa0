use super::{REFERRAL_GROUP_LIMIT, RegistrationStore, StatusCheckStore, StorageError};
use crate::entities::registration::{
    CountRegistrations, GroupRegistrationsByReferral, InsertRegistration, ListRegistrations,
    ReferralGroup, Registration,
};
use crate::entities::status_check::{InsertStatusCheck, ListStatusChecks, StatusCheck};
use crate::framework::DatabaseProcessor;
use async_trait::async_trait;
use kanau::processor::Processor;

#[async_trait]
impl RegistrationStore for DatabaseProcessor {
    async fn insert(&self, registration: &Registration) -> Result<(), StorageError> {
        self.process(InsertRegistration {
            registration: registration.clone(),
        })
        .await?;
        Ok(())
    }

    async fn list_all(&self, limit: i64) -> Result<Vec<Registration>, StorageError> {
        Ok(self.process(ListRegistrations { limit }).await?)
    }

    async fn count(&self) -> Result<i64, StorageError> {
        Ok(self.process(CountRegistrations).await?)
    }

    async fn group_by_referral_source(&self) -> Result<Vec<ReferralGroup>, StorageError> {
        Ok(self
            .process(GroupRegistrationsByReferral {
                limit: REFERRAL_GROUP_LIMIT,
            })
            .await?)
    }
}

#[async_trait]
impl StatusCheckStore for DatabaseProcessor {
    async fn insert_status_check(&self, check: &StatusCheck) -> Result<(), StorageError> {
        self.process(InsertStatusCheck {
            check: check.clone(),
        })
        .await?;
        Ok(())
    }

    async fn list_status_checks(&self, limit: i64) -> Result<Vec<StatusCheck>, StorageError> {
        Ok(self.process(ListStatusChecks { limit }).await?)
    }
}
