use crate::moderation::ModerationError;
use crate::submission::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ConfessionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{reason}")]
    Rejected { reason: String },
    #[error("moderation failed: {0}")]
    Moderation(#[from] ModerationError),
}

impl ConfessionError {
    /// True when the failure was caused by what the client sent rather than by the server.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            ConfessionError::Validation(_) | ConfessionError::Rejected { .. }
        )
    }
}

pub type ConfessionResult<T> = std::result::Result<T, ConfessionError>;
