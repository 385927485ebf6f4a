//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the submission service.
//! Request handling never reads environment variables.

use crate::moderation::Blocklist;
use crate::{ConfessionError, ConfessionResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct CoreConfig {
    blocklist: Blocklist,
}

impl CoreConfig {
    pub fn new(blocklist: Blocklist) -> Self {
        Self { blocklist }
    }

    pub fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }
}

/// Parse the moderation blocklist from an optional comma-separated value.
///
/// If `value` is `None` or empty/whitespace, returns the built-in blocklist.
///
/// # Errors
///
/// Returns `ConfessionError::InvalidInput` if the value is non-blank but contains no terms
/// (for example `",,"`), since that almost certainly indicates a typo rather than an intent to
/// disable moderation.
pub fn blocklist_from_env_value(value: Option<String>) -> ConfessionResult<Blocklist> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(Blocklist::default());
    };

    let blocklist = Blocklist::new(value.split(','));
    if blocklist.is_empty() {
        return Err(ConfessionError::InvalidInput(
            "blocklist override contains no terms".into(),
        ));
    }

    Ok(blocklist)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_value_uses_default_blocklist() {
        let blocklist = blocklist_from_env_value(None).expect("default should parse");
        assert_eq!(blocklist, Blocklist::default());
    }

    #[test]
    fn blank_value_uses_default_blocklist() {
        let blocklist = blocklist_from_env_value(Some("   ".into())).expect("default should parse");
        assert_eq!(blocklist, Blocklist::default());
    }

    #[test]
    fn comma_separated_value_overrides_default() {
        let blocklist =
            blocklist_from_env_value(Some("Foo, bar ,,baz".into())).expect("override should parse");
        assert_eq!(blocklist.terms(), &["foo", "bar", "baz"]);
    }

    #[test]
    fn value_without_terms_is_rejected() {
        let err = blocklist_from_env_value(Some(", ,".into())).unwrap_err();
        assert!(matches!(err, ConfessionError::InvalidInput(_)));
    }
}
