//! Content moderation.
//!
//! Moderation is expressed as the [`ModerationPolicy`] trait so that the keyword stub shipped
//! here can be replaced by a remote classifier without touching callers. The trait is async even
//! though [`KeywordModerator`] completes immediately.

use crate::constants::{ACCEPT_SCORE, DEFAULT_BLOCKLIST, DISALLOWED_CONTENT_REASON};
use async_trait::async_trait;
use serde::Serialize;

/// Outcome of moderating one piece of content.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ModerationResult {
    Accept { score: f64 },
    Reject { reason: String },
}

impl ModerationResult {
    pub fn is_accept(&self) -> bool {
        matches!(self, ModerationResult::Accept { .. })
    }
}

/// Failure of the moderation backend itself, as opposed to a rejection of the content.
#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("moderation backend unavailable: {0}")]
    Unavailable(String),
}

/// A pluggable moderation backend.
#[async_trait]
pub trait ModerationPolicy: Send + Sync {
    /// Decides whether `content` may be published.
    ///
    /// # Errors
    ///
    /// Returns a [`ModerationError`] when the backend cannot reach a decision.
    async fn moderate(&self, content: &str) -> Result<ModerationResult, ModerationError>;
}

/// Disallowed substrings, stored lowercased.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blocklist {
    terms: Vec<String>,
}

impl Blocklist {
    /// Builds a blocklist from arbitrary terms. Blank terms are discarded.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|term| term.as_ref().trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the first term found anywhere in `text`, ignoring case.
    pub fn find_match(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.terms
            .iter()
            .find(|term| lower.contains(term.as_str()))
            .map(String::as_str)
    }
}

impl Default for Blocklist {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCKLIST)
    }
}

/// Keyword-matching moderation stub.
#[derive(Clone, Debug, Default)]
pub struct KeywordModerator {
    blocklist: Blocklist,
}

impl KeywordModerator {
    pub fn new(blocklist: Blocklist) -> Self {
        Self { blocklist }
    }

    pub fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }

    /// Synchronous form of [`ModerationPolicy::moderate`].
    pub fn check(&self, content: &str) -> ModerationResult {
        match self.blocklist.find_match(content) {
            Some(term) => {
                tracing::debug!(term, "content matched blocklist");
                ModerationResult::Reject {
                    reason: DISALLOWED_CONTENT_REASON.into(),
                }
            }
            None => ModerationResult::Accept {
                score: ACCEPT_SCORE,
            },
        }
    }
}

#[async_trait]
impl ModerationPolicy for KeywordModerator {
    async fn moderate(&self, content: &str) -> Result<ModerationResult, ModerationError> {
        Ok(self.check(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_blocklist_contains_builtin_terms() {
        let blocklist = Blocklist::default();
        assert_eq!(blocklist.terms(), &["doxtag", "illegal-term"]);
    }

    #[test]
    fn blocklist_normalises_terms() {
        let blocklist = Blocklist::new(["  SpAm ", "", "   ", "Scam"]);
        assert_eq!(blocklist.terms(), &["spam", "scam"]);
    }

    #[test]
    fn blocked_term_is_rejected() {
        let moderator = KeywordModerator::default();
        assert_eq!(
            moderator.check("I have a doxtag to share"),
            ModerationResult::Reject {
                reason: "disallowed content".into()
            }
        );
    }

    #[test]
    fn matching_ignores_case() {
        let moderator = KeywordModerator::default();
        assert!(!moderator.check("some DOXTAG here").is_accept());
        assert!(!moderator.check("an Illegal-Term inside").is_accept());
    }

    #[test]
    fn matching_finds_terms_inside_words() {
        let moderator = KeywordModerator::default();
        assert!(!moderator.check("predoxtagged").is_accept());
    }

    #[test]
    fn clean_content_is_accepted_with_placeholder_score() {
        let moderator = KeywordModerator::default();
        assert_eq!(
            moderator.check("Just a normal confession"),
            ModerationResult::Accept { score: 0.05 }
        );
    }

    #[test]
    fn injected_blocklist_replaces_default() {
        let moderator = KeywordModerator::new(Blocklist::new(["pineapple"]));
        assert!(moderator.check("I have a doxtag to share").is_accept());
        assert!(!moderator.check("Pineapple on pizza").is_accept());
    }

    #[test]
    fn empty_blocklist_accepts_everything() {
        let moderator = KeywordModerator::new(Blocklist::new(Vec::<String>::new()));
        assert!(moderator.blocklist().is_empty());
        assert!(moderator.check("doxtag").is_accept());
    }

    #[tokio::test]
    async fn async_contract_matches_sync_check() {
        let moderator = KeywordModerator::default();
        let result = moderator
            .moderate("Just a normal confession")
            .await
            .expect("keyword moderation cannot fail");
        assert_eq!(result, moderator.check("Just a normal confession"));
    }

    #[test]
    fn results_serialise_with_action_tag() {
        let accept = serde_json::to_value(ModerationResult::Accept { score: 0.05 }).unwrap();
        assert_eq!(accept, serde_json::json!({"action": "accept", "score": 0.05}));

        let reject = serde_json::to_value(ModerationResult::Reject {
            reason: "disallowed content".into(),
        })
        .unwrap();
        assert_eq!(
            reject,
            serde_json::json!({"action": "reject", "reason": "disallowed content"})
        );
    }
}
