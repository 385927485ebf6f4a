//! # API Shared
//!
//! Shared wire types for the confession relay APIs.
//!
//! Contains:
//! - JSON request/response bodies (`dto` module), annotated for OpenAPI
//! - Shared services like `HealthService`
//!
//! Used by `api-rest`; kept separate so that any future API surface serialises the same shapes.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
