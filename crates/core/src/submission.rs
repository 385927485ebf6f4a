//! Submission validation.
//!
//! A raw submission arrives as free text plus an optional image reference. This module turns it
//! into a [`Submission`] that is known to be non-empty and within the length bound, or explains
//! why it cannot be accepted. Nothing here performs I/O.

use crate::constants::MAX_CONTENT_CHARS;
use serde::Serialize;

/// Reasons a raw submission is rejected before moderation.
///
/// The display text is what clients see in the `error` field of a 400 response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Content required")]
    Empty,
    #[error("Too long")]
    TooLong,
}

/// A well-formed submission.
///
/// Only exists for the duration of a single request; it is never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Submission {
    content: String,
    image: Option<String>,
}

impl Submission {
    /// The trimmed submission text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The image reference, if the client supplied a non-blank one.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// First `max_chars` characters of the content, for log lines.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.content.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.content[..idx],
            None => &self.content,
        }
    }
}

/// Strips leading and trailing whitespace, counting U+FEFF (byte order mark) as whitespace.
fn trim_blank(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Validates raw submission fields.
///
/// Emptiness is judged after trimming and is checked first. The length bound counts characters
/// of the content as received. A blank image is treated the same as no image; any other image
/// string is passed through untouched.
///
/// # Errors
///
/// Returns [`ValidationError::Empty`] or [`ValidationError::TooLong`].
pub fn validate_submission(
    content: &str,
    image: Option<&str>,
) -> Result<Submission, ValidationError> {
    let trimmed = trim_blank(content);
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(ValidationError::TooLong);
    }

    let image = image
        .filter(|value| !trim_blank(value).is_empty())
        .map(str::to_owned);

    Ok(Submission {
        content: trimmed.to_owned(),
        image,
    })
}
