//! Row types and their queries.
//!
//! Queries go through the runtime `sqlx::query*` functions, so building the
//! crate needs neither a live database nor an offline `.sqlx` cache. SQL is
//! checked against the schema in `migrations/` only when it runs.

pub mod registration;
pub mod status_check;
