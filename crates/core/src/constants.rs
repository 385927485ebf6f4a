//! Constants used throughout the confession core crate.
//!
//! Limits, default policy terms and the fixed strings that the HTTP boundary
//! surfaces to clients live here so they stay consistent between modules.

/// Maximum number of characters accepted in a submission's content.
pub const MAX_CONTENT_CHARS: usize = 1000;

/// Terms rejected by the keyword moderator when no override is configured.
pub const DEFAULT_BLOCKLIST: &[&str] = &["doxtag", "illegal-term"];

/// Reason attached to every keyword moderation rejection.
pub const DISALLOWED_CONTENT_REASON: &str = "disallowed content";

/// Placeholder confidence reported for accepted content.
pub const ACCEPT_SCORE: f64 = 0.05;

/// Number of characters of content included in log previews.
pub const LOG_PREVIEW_CHARS: usize = 120;
