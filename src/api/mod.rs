//! HTTP client for the portal API.
//!
//! One method per backend operation. Each call either resolves with the
//! decoded payload or fails with an [`AppError`](crate::types::AppError);
//! nothing is retried.

pub mod client;

pub use client::ApiClient;
