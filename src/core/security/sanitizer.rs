//! Markup stripping and chat content checks

use super::patterns::{
    DANGLING_EMBED_PATTERN, EMBED_BLOCK_PATTERN, EMBED_CLOSE_PATTERN, IMAGE_TAG_PATTERN,
    INJECTION_PATTERNS,
};
use thiserror::Error;

/// Longest user message forwarded upstream, in characters
pub const MAX_CONTENT_LENGTH: usize = 4000;

/// Placeholder that replaces image tags
pub const IMAGE_PLACEHOLDER: &str = "[image]";

/// Why a user message was dropped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentRejection {
    #[error("content is empty")]
    Empty,
    #[error("content is {0} characters, limit is {MAX_CONTENT_LENGTH}")]
    TooLong(usize),
    #[error("content matches a prompt-injection pattern")]
    Injection,
}

/// Strip script and iframe markup and replace image tags.
///
/// Text without such markup is returned unchanged, including surrounding
/// whitespace.
pub fn sanitize_markup(text: &str) -> String {
    let text = EMBED_BLOCK_PATTERN.replace_all(text, "");
    let text = DANGLING_EMBED_PATTERN.replace_all(&text, "");
    let text = EMBED_CLOSE_PATTERN.replace_all(&text, "");
    IMAGE_TAG_PATTERN
        .replace_all(&text, IMAGE_PLACEHOLDER)
        .into_owned()
}

/// Whether `text` contains a known injection phrase
pub fn is_injection_attempt(text: &str) -> bool {
    INJECTION_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Sanitize a user-authored message and decide whether it may be forwarded
pub fn sanitize_user_content(text: &str) -> Result<String, ContentRejection> {
    let cleaned = sanitize_markup(text);

    if cleaned.trim().is_empty() {
        return Err(ContentRejection::Empty);
    }

    let length = cleaned.chars().count();
    if length > MAX_CONTENT_LENGTH {
        return Err(ContentRejection::TooLong(length));
    }

    if is_injection_attempt(&cleaned) {
        return Err(ContentRejection::Injection);
    }

    Ok(cleaned)
}
