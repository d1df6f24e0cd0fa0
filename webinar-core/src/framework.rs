use sqlx::PgPool;

/// Runs entity queries against the connection pool.
///
/// Each query is a plain struct with a `kanau::processor::Processor`
/// implementation on this type.
#[derive(Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}

impl DatabaseProcessor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Close every pooled connection. Pending queries finish first.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
