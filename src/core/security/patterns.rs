//! Content patterns
//!
//! Pre-compiled regexes shared by the chat sanitizer and the form validators.

use once_cell::sync::Lazy;
use regex::Regex;

// Static patterns are known-good; a compile failure is a code error caught by
// the tests below. At runtime it degrades to a pattern that never matches.
fn compile(name: &str, pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        tracing::error!("Failed to compile {} regex: {}", name, e);
        // [^\s\S] matches nothing
        Regex::new(r"[^\s\S]").unwrap()
    })
}

/// `<script>…</script>` and `<iframe>…</iframe>` blocks, across lines
pub static EMBED_BLOCK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    compile(
        "embed block",
        r"(?is)<(script|iframe)\b[^>]*>.*?</(script|iframe)\s*>",
    )
});

/// An opening script/iframe tag that is never closed swallows the rest
pub static DANGLING_EMBED_PATTERN: Lazy<Regex> =
    Lazy::new(|| compile("dangling embed", r"(?is)<(script|iframe)\b.*$"));

/// Stray closing tags left over from nested or broken markup
pub static EMBED_CLOSE_PATTERN: Lazy<Regex> =
    Lazy::new(|| compile("embed close", r"(?i)</(script|iframe)\s*>"));

/// `<img …>` tags, replaced by a placeholder
pub static IMAGE_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| compile("image tag", r"(?i)<img\b[^>]*>?"));

/// Known prompt-injection phrases
pub static INJECTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bignore\s+(all\s+)?(the\s+)?(previous|prior|above|earlier)\s+(instructions|prompts?|rules)",
        r"(?i)\bdisregard\s+(all\s+)?(the\s+)?(previous|prior|above|earlier)\s+(instructions|prompts?|rules)",
        r"(?i)\bforget\s+(all\s+)?(your|the|previous|prior)\s+(instructions|rules)",
        r"(?i)\b(reveal|show|print|repeat)\s+(me\s+)?(your|the)\s+(system\s+prompt|instructions)",
        r"(?i)\byou\s+are\s+now\s+(in\s+)?(developer|dan|jailbreak)\s+mode",
        r"(?i)\bact\s+as\s+(an?\s+)?unrestricted\b",
    ]
    .iter()
    .filter_map(|pattern| match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!("Failed to compile injection regex: {}", e);
            None
        }
    })
    .collect()
});

/// Email pattern: local@domain.tld
pub static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| compile("email", r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$"));

/// Project slug: letters, digits, `-` and `_`
pub static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| compile("slug", r"^[A-Za-z0-9_-]{1,100}$"));
