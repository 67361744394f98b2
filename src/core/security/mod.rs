//! Input sanitization for untrusted content
//!
//! Chat messages are normalized, stripped of active markup and screened for
//! prompt-injection phrases before they are forwarded upstream. The same
//! markup stripping and patterns back the contact form and project routes.

mod messages;
mod patterns;
mod sanitizer;

pub use messages::{ChatMessage, IncomingMessage, MessageRole, process_messages};
pub use patterns::{EMAIL_PATTERN, INJECTION_PATTERNS, SLUG_PATTERN};
pub use sanitizer::{
    ContentRejection, IMAGE_PLACEHOLDER, MAX_CONTENT_LENGTH, is_injection_attempt,
    sanitize_markup, sanitize_user_content,
};
