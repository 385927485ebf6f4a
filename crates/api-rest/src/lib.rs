//! # API REST
//!
//! REST API implementation for the confession relay.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - Per-client rate limiting of submissions
//! - Static mini-app assets and the app manifest
//! - OpenAPI/Swagger documentation
//!
//! Uses `api-shared` for wire types and `confess-core` for the submission pipeline.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod server;

pub use config::ServerConfig;
pub use error::ApiError;
pub use rate_limit::{ClientRateLimiter, RateLimitConfig};
pub use routes::{router, ApiDoc, AppState};
pub use server::serve;
