use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;
use webinar_sdk::objects::StatusCheckResponse;

/// Liveness probe record written by `POST /status`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StatusCheck {
    pub id: Uuid,
    pub client_name: String,
    pub created_at: OffsetDateTime,
}

impl StatusCheck {
    pub fn new(client_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_name,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

impl From<&StatusCheck> for StatusCheckResponse {
    fn from(s: &StatusCheck) -> Self {
        StatusCheckResponse {
            id: s.id,
            client_name: s.client_name.clone(),
            timestamp: s.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InsertStatusCheck {
    pub check: StatusCheck,
}

impl Processor<InsertStatusCheck> for DatabaseProcessor {
    type Output = ();
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertStatusCheck")]
    async fn process(&self, insert: InsertStatusCheck) -> Result<(), sqlx::Error> {
        let check = insert.check;
        sqlx::query("INSERT INTO status_checks (id, client_name, created_at) VALUES ($1, $2, $3)")
            .bind(check.id)
            .bind(check.client_name)
            .bind(check.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// List status checks in insertion order.
pub struct ListStatusChecks {
    pub limit: i64,
}

impl Processor<ListStatusChecks> for DatabaseProcessor {
    type Output = Vec<StatusCheck>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListStatusChecks")]
    async fn process(&self, query: ListStatusChecks) -> Result<Vec<StatusCheck>, sqlx::Error> {
        sqlx::query_as::<_, StatusCheck>(
            r#"
            SELECT id, client_name, created_at
            FROM status_checks
            ORDER BY created_at ASC
            LIMIT $1
            "#,
        )
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await
    }
}
