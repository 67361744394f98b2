use once_cell::sync::Lazy;
use regex::Regex;

static SECRET_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)api[_-]?key[=:\s]*['\x22]?([a-zA-Z0-9\-_]+)['\x22]?",
        r"(?i)bearer\s+[a-zA-Z0-9\-_.]+",
        r"(?i)\bsk-[a-zA-Z0-9\-_]{8,}",
        r"(?i)password[=:\s]*['\x22]?([^\s'\x22]+)['\x22]?",
        r"(?i)secret[=:\s]*['\x22]?([^\s'\x22]+)['\x22]?",
    ]
    .iter()
    .filter_map(|pattern| match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!("Failed to compile redaction regex: {}", e);
            None
        }
    })
    .collect()
});

pub struct Sanitization;

impl Sanitization {
    /// Redact credentials from free-form text before it is logged
    pub fn sanitize_log_data(data: &str) -> String {
        let mut sanitized = data.to_string();
        for re in SECRET_PATTERNS.iter() {
            sanitized = re.replace_all(&sanitized, "***REDACTED***").to_string();
        }
        sanitized
    }

    /// Mask the password of a connection URL, e.g. `redis://:***@host:6379`
    pub fn sanitize_url(url: &str) -> String {
        match url::Url::parse(url) {
            Ok(mut parsed) => {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("***"));
                }
                parsed.to_string()
            }
            Err(_) => "invalid_url".to_string(),
        }
    }

    /// Keep the first character and the domain of an email address
    pub fn mask_email(email: &str) -> String {
        match email.split_once('@') {
            Some((local, domain)) => {
                let first = local.chars().next().map(String::from).unwrap_or_default();
                format!("{}***@{}", first, domain)
            }
            None => "***".to_string(),
        }
    }
}
