#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod entities;
pub mod framework;
pub mod notifications;
pub mod report;
pub mod service;
pub mod store;
pub mod validation;
