//! # Confess Core
//!
//! Core business logic for the confession relay.
//!
//! This crate contains the pure submission pipeline:
//! - Validation of raw submissions (non-empty, length bound)
//! - Pluggable moderation with a keyword blocklist stub
//! - The service that chains the two and reports typed outcomes
//!
//! **No API concerns**: HTTP routing, rate limiting and static file serving belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod moderation;
pub mod service;
pub mod submission;

pub use config::{blocklist_from_env_value, CoreConfig};
pub use constants::{DEFAULT_BLOCKLIST, LOG_PREVIEW_CHARS, MAX_CONTENT_CHARS};
pub use error::{ConfessionError, ConfessionResult};
pub use moderation::{
    Blocklist, KeywordModerator, ModerationError, ModerationPolicy, ModerationResult,
};
pub use service::{AcceptedSubmission, SubmissionService};
pub use submission::{validate_submission, Submission, ValidationError};
