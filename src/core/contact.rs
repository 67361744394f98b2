//! Contact form validation

use crate::core::security::{EMAIL_PATTERN, sanitize_markup};
use crate::utils::logging::Sanitization;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_SUBJECT_LENGTH: usize = 200;
pub const MIN_MESSAGE_LENGTH: usize = 10;
pub const MAX_MESSAGE_LENGTH: usize = 5000;

/// Validation failures keyed by field name
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Contact form body as received
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

/// A validated, cleaned contact submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub received_at: DateTime<Utc>,
}

fn clean(value: Option<&str>) -> String {
    value.map(|v| sanitize_markup(v).trim().to_string()).unwrap_or_default()
}

fn check_length(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let length = value.chars().count();
    if length == 0 && min > 0 {
        errors.insert(field, format!("{} is required", capitalize(field)));
    } else if length < min {
        errors.insert(
            field,
            format!("{} must be at least {} characters", capitalize(field), min),
        );
    } else if length > max {
        errors.insert(
            field,
            format!("{} must be at most {} characters", capitalize(field), max),
        );
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl ContactRequest {
    /// Validate every field, collecting all failures
    pub fn validate(&self) -> Result<ContactSubmission, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = clean(self.name.as_deref());
        check_length(&mut errors, "name", &name, 1, MAX_NAME_LENGTH);

        let email = clean(self.email.as_deref());
        check_length(&mut errors, "email", &email, 1, MAX_EMAIL_LENGTH);
        if !errors.contains_key("email") && !EMAIL_PATTERN.is_match(&email) {
            errors.insert("email", "Please provide a valid email address".to_string());
        }

        let message = clean(self.message.as_deref());
        check_length(
            &mut errors,
            "message",
            &message,
            MIN_MESSAGE_LENGTH,
            MAX_MESSAGE_LENGTH,
        );

        let subject = clean(self.subject.as_deref());
        check_length(&mut errors, "subject", &subject, 0, MAX_SUBJECT_LENGTH);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ContactSubmission {
            id: new_submission_id(),
            name,
            email,
            message,
            subject: Some(subject).filter(|s| !s.is_empty()),
            received_at: Utc::now(),
        })
    }
}

/// `contact_<32 hex>` identifier
pub fn new_submission_id() -> String {
    format!("contact_{}", Uuid::new_v4().simple())
}

impl ContactSubmission {
    /// Record the submission; the address is masked in the log line
    pub fn record(&self) {
        info!(
            submission_id = %self.id,
            name = %self.name,
            email = %Sanitization::mask_email(&self.email),
            subject = self.subject.as_deref().unwrap_or(""),
            message_length = self.message.chars().count(),
            received_at = %self.received_at.to_rfc3339(),
            "Contact form submission received"
        );
    }
}
