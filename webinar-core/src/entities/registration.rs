use crate::framework::DatabaseProcessor;
use crate::validation::{EmailAddress, ValidationError, require_non_blank};
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;
use webinar_sdk::objects::{RegistrationResponse, WebinarRegistrationCreate};

/// A stored webinar sign-up. Rows are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub whatsapp: String,
    /// Stored exactly as submitted; `None` is labelled only when presented.
    pub referral_source: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<&Registration> for RegistrationResponse {
    fn from(r: &Registration) -> Self {
        RegistrationResponse {
            id: r.id,
            full_name: r.full_name.clone(),
            email: r.email.clone(),
            whatsapp: r.whatsapp.clone(),
            referral_source: r.referral_source.clone(),
            timestamp: r.created_at,
        }
    }
}

/// A validated registration request that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub full_name: String,
    pub email: EmailAddress,
    pub whatsapp: String,
    pub referral_source: Option<String>,
}

impl NewRegistration {
    /// Validate a raw request. Required fields must be non-blank and the
    /// email must parse.
    pub fn parse(input: WebinarRegistrationCreate) -> Result<Self, ValidationError> {
        Ok(Self {
            full_name: require_non_blank("fullName", &input.full_name)?,
            email: EmailAddress::parse(&input.email)?,
            whatsapp: require_non_blank("whatsapp", &input.whatsapp)?,
            referral_source: input.referral_source,
        })
    }

    /// Assign the server-side id and creation time.
    pub fn materialize(self, created_at: OffsetDateTime) -> Registration {
        Registration {
            id: Uuid::new_v4(),
            full_name: self.full_name,
            email: self.email.to_string(),
            whatsapp: self.whatsapp,
            referral_source: self.referral_source,
            created_at,
        }
    }
}

/// Row of the referral-source aggregation.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ReferralGroup {
    pub referral_source: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone)]
/// Insert one registration.
pub struct InsertRegistration {
    pub registration: Registration,
}

impl Processor<InsertRegistration> for DatabaseProcessor {
    type Output = ();
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertRegistration")]
    async fn process(&self, insert: InsertRegistration) -> Result<(), sqlx::Error> {
        let r = insert.registration;
        sqlx::query(
            r#"
            INSERT INTO webinar_registrations
                (id, full_name, email, whatsapp, referral_source, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(r.id)
        .bind(r.full_name)
        .bind(r.email)
        .bind(r.whatsapp)
        .bind(r.referral_source)
        .bind(r.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// List registrations, newest first.
pub struct ListRegistrations {
    pub limit: i64,
}

impl Processor<ListRegistrations> for DatabaseProcessor {
    type Output = Vec<Registration>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListRegistrations")]
    async fn process(&self, query: ListRegistrations) -> Result<Vec<Registration>, sqlx::Error> {
        sqlx::query_as::<_, Registration>(
            r#"
            SELECT id, full_name, email, whatsapp, referral_source, created_at
            FROM webinar_registrations
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CountRegistrations;

impl Processor<CountRegistrations> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountRegistrations")]
    async fn process(&self, _query: CountRegistrations) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM webinar_registrations")
            .fetch_one(&self.pool)
            .await
    }
}

#[derive(Debug, Clone)]
/// Count registrations per raw referral source, largest groups first.
///
/// `NULL` sources form their own group.
pub struct GroupRegistrationsByReferral {
    pub limit: i64,
}

impl Processor<GroupRegistrationsByReferral> for DatabaseProcessor {
    type Output = Vec<ReferralGroup>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GroupRegistrationsByReferral")]
    async fn process(
        &self,
        query: GroupRegistrationsByReferral,
    ) -> Result<Vec<ReferralGroup>, sqlx::Error> {
        sqlx::query_as::<_, ReferralGroup>(
            r#"
            SELECT referral_source, COUNT(*) AS count
            FROM webinar_registrations
            GROUP BY referral_source
            ORDER BY count DESC
            LIMIT $1
            "#,
        )
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, whatsapp: &str) -> WebinarRegistrationCreate {
        WebinarRegistrationCreate {
            full_name: "  Asha Rao ".to_string(),
            email: email.to_string(),
            whatsapp: whatsapp.to_string(),
            referral_source: None,
        }
    }

    #[test]
    fn test_parse_trims_required_fields() {
        let parsed = NewRegistration::parse(request("asha@example.com", " +91 98765 ")).unwrap();
        assert_eq!(parsed.full_name, "Asha Rao");
        assert_eq!(parsed.whatsapp, "+91 98765");
        assert_eq!(parsed.email.as_str(), "asha@example.com");
    }

    #[test]
    fn test_parse_rejects_invalid_email() {
        let err = NewRegistration::parse(request("invalid-email", "+91 98765")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEmail { .. }));
    }

    #[test]
    fn test_parse_rejects_blank_whatsapp() {
        let err = NewRegistration::parse(request("asha@example.com", "   ")).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "whatsapp" });
    }

    #[test]
    fn test_materialize_keeps_raw_referral_source() {
        let mut input = request("asha@example.com", "+91 98765");
        input.referral_source = Some(String::new());
        let now = OffsetDateTime::now_utc();
        let first = NewRegistration::parse(input.clone()).unwrap().materialize(now);
        let second = NewRegistration::parse(input).unwrap().materialize(now);

        assert_eq!(first.referral_source.as_deref(), Some(""));
        assert_eq!(first.created_at, now);
        assert_ne!(first.id, second.id);
    }
}
