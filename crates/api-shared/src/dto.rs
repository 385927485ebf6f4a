//! JSON bodies exchanged over HTTP.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /api/confessions`.
///
/// Both fields are optional at the wire level so that a missing `content` can be reported as
/// "Content required" rather than as a parse failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ConfessionReq {
    #[serde(default)]
    #[schema(example = "Just a normal confession")]
    pub content: Option<String>,
    #[serde(default)]
    #[schema(example = "https://example.com/picture.png")]
    pub image: Option<String>,
}

/// Moderation outcome as returned to clients.
///
/// Successful submissions only ever carry `Accept`; rejections are reported through
/// [`ErrorRes`]. `Reject` is kept so the schema describes every outcome a moderation backend can
/// produce.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ModerationRes {
    Accept { score: f64 },
    Reject { reason: String },
}

/// Body of a successful (201) submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConfessionRes {
    pub ok: bool,
    pub moderation: ModerationRes,
}

/// Body of every non-2xx API response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}
