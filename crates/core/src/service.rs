//! The submission pipeline: validate, then moderate.
//!
//! Each step is terminal on failure. Validation failures never reach the moderation backend.

use crate::config::CoreConfig;
use crate::moderation::{KeywordModerator, ModerationPolicy, ModerationResult};
use crate::submission::{validate_submission, Submission};
use crate::{ConfessionError, ConfessionResult};
use std::sync::Arc;

/// A submission that passed validation and moderation.
#[derive(Clone, Debug, PartialEq)]
pub struct AcceptedSubmission {
    pub submission: Submission,
    pub moderation: ModerationResult,
}

/// Runs raw submissions through validation and moderation.
///
/// Holds no per-request state; cloning shares the moderation backend.
#[derive(Clone)]
pub struct SubmissionService {
    moderator: Arc<dyn ModerationPolicy>,
}

impl SubmissionService {
    /// Creates a service backed by the keyword moderator configured in `cfg`.
    pub fn new(cfg: &CoreConfig) -> Self {
        Self::with_moderator(Arc::new(KeywordModerator::new(cfg.blocklist().clone())))
    }

    /// Creates a service backed by an arbitrary moderation policy.
    pub fn with_moderator(moderator: Arc<dyn ModerationPolicy>) -> Self {
        Self { moderator }
    }

    /// Validates and moderates one submission.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `ConfessionError::Validation` if the content is empty or too long,
    /// - `ConfessionError::Rejected` if moderation refuses the content,
    /// - `ConfessionError::Moderation` if the moderation backend fails.
    pub async fn submit(
        &self,
        content: &str,
        image: Option<&str>,
    ) -> ConfessionResult<AcceptedSubmission> {
        let submission = validate_submission(content, image)?;

        let moderation = self.moderator.moderate(submission.content()).await?;
        match moderation {
            ModerationResult::Reject { reason } => Err(ConfessionError::Rejected { reason }),
            accept @ ModerationResult::Accept { .. } => Ok(AcceptedSubmission {
                submission,
                moderation: accept,
            }),
        }
    }
}

impl std::fmt::Debug for SubmissionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_CONTENT_CHARS;
    use crate::moderation::{Blocklist, ModerationError};
    use crate::submission::ValidationError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingModerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ModerationPolicy for CountingModerator {
        async fn moderate(&self, _content: &str) -> Result<ModerationResult, ModerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ModerationResult::Accept { score: 0.5 })
        }
    }

    struct FailingModerator;

    #[async_trait]
    impl ModerationPolicy for FailingModerator {
        async fn moderate(&self, _content: &str) -> Result<ModerationResult, ModerationError> {
            Err(ModerationError::Unavailable("classifier offline".into()))
        }
    }

    fn default_service() -> SubmissionService {
        SubmissionService::new(&CoreConfig::default())
    }

    #[tokio::test]
    async fn empty_content_fails_validation() {
        let err = default_service().submit("", None).await.unwrap_err();
        assert!(matches!(
            err,
            ConfessionError::Validation(ValidationError::Empty)
        ));
        assert_eq!(err.to_string(), "Content required");
    }

    #[tokio::test]
    async fn overlong_content_fails_validation() {
        let content = "a".repeat(MAX_CONTENT_CHARS + 1);
        let err = default_service().submit(&content, None).await.unwrap_err();
        assert!(matches!(
            err,
            ConfessionError::Validation(ValidationError::TooLong)
        ));
        assert_eq!(err.to_string(), "Too long");
    }

    #[tokio::test]
    async fn blocked_content_is_rejected_with_reason() {
        let err = default_service()
            .submit("I have a doxtag to share", None)
            .await
            .unwrap_err();
        assert!(err.is_client_fault());
        assert_eq!(err.to_string(), "disallowed content");
    }

    #[tokio::test]
    async fn clean_content_is_accepted() {
        let accepted = default_service()
            .submit("Just a normal confession", None)
            .await
            .expect("should be accepted");
        assert_eq!(accepted.submission.content(), "Just a normal confession");
        assert_eq!(accepted.submission.image(), None);
        assert_eq!(accepted.moderation, ModerationResult::Accept { score: 0.05 });
    }

    #[tokio::test]
    async fn invalid_submissions_never_reach_moderation() {
        let moderator = Arc::new(CountingModerator::default());
        let service = SubmissionService::with_moderator(moderator.clone());

        let _ = service.submit("   ", None).await;
        let _ = service.submit(&"b".repeat(MAX_CONTENT_CHARS + 1), None).await;
        assert_eq!(moderator.calls.load(Ordering::SeqCst), 0);

        service
            .submit("fine", Some("https://example.com/cat.png"))
            .await
            .expect("should be accepted");
        assert_eq!(moderator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn backend_failure_is_not_a_client_fault() {
        let service = SubmissionService::with_moderator(Arc::new(FailingModerator));
        let err = service.submit("hello", None).await.unwrap_err();
        assert!(matches!(err, ConfessionError::Moderation(_)));
        assert!(!err.is_client_fault());
    }

    #[tokio::test]
    async fn repeated_submissions_give_identical_results() {
        let service = default_service();

        let first = service.submit("same text", Some("img")).await.unwrap();
        let second = service.submit("same text", Some("img")).await.unwrap();
        assert_eq!(first, second);

        let first = service.submit("doxtag", None).await.unwrap_err().to_string();
        let second = service.submit("doxtag", None).await.unwrap_err().to_string();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn configured_blocklist_is_used() {
        let service = SubmissionService::new(&CoreConfig::new(Blocklist::new(["secret"])));
        assert!(service.submit("a SECRET thing", None).await.is_err());
        assert!(service.submit("I have a doxtag to share", None).await.is_ok());
    }
}
