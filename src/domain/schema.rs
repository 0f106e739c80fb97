//! Contact form validation.
//!
//! Works on an untyped JSON value so that every broken field is reported in a
//! single response instead of failing on the first bad one.

use crate::domain::catalog;
use crate::domain::model::LeadSubmission;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

pub const MIN_MESSAGE_CHARS: usize = 10;

pub const HONEYPOT_FIELD: &str = "contact_me_by_fax";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// One rejected field, as reported in the `details` array of a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_PATTERN.is_match(email)
}

impl LeadSubmission {
    /// Parses a raw request body and validates it.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, Vec<FieldViolation>> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            vec![FieldViolation::new(
                "body",
                format!("Request body is not valid JSON: {}", e),
            )]
        })?;
        Self::from_value(&value)
    }

    /// Validates an arbitrary JSON value against the contact form rules.
    ///
    /// The honeypot value is carried through untouched; deciding what a filled
    /// honeypot means is left to the caller.
    pub fn from_value(value: &Value) -> Result<Self, Vec<FieldViolation>> {
        let Some(fields) = value.as_object() else {
            return Err(vec![FieldViolation::new("body", "Expected a JSON object")]);
        };

        let mut violations = Vec::new();

        let name = required_string(fields, "name", "Name is required", &mut violations);
        if name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            violations.push(FieldViolation::new("name", "Name is required"));
        }

        let email = required_string(fields, "email", "Valid email is required", &mut violations);
        if email.as_deref().is_some_and(|email| !is_valid_email(email)) {
            violations.push(FieldViolation::new("email", "Valid email is required"));
        }

        let message_error = format!("Message must be at least {} characters", MIN_MESSAGE_CHARS);
        let message = required_string(fields, "message", &message_error, &mut violations);
        if message
            .as_deref()
            .is_some_and(|message| message.chars().count() < MIN_MESSAGE_CHARS)
        {
            violations.push(FieldViolation::new("message", message_error));
        }

        let services = validate_services(fields.get("services"), &mut violations);
        let honeypot = validate_honeypot(fields.get(HONEYPOT_FIELD), &mut violations);

        match (name, email, message, services, honeypot) {
            (Some(name), Some(email), Some(message), Some(services), Some(contact_me_by_fax))
                if violations.is_empty() =>
            {
                Ok(LeadSubmission {
                    name,
                    email,
                    message,
                    services,
                    contact_me_by_fax,
                })
            }
            _ => Err(violations),
        }
    }
}

fn required_string(
    fields: &Map<String, Value>,
    field: &str,
    message: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match fields.get(field) {
        Some(Value::String(value)) => Some(value.clone()),
        _ => {
            violations.push(FieldViolation::new(field, message));
            None
        }
    }
}

fn validate_services(
    value: Option<&Value>,
    violations: &mut Vec<FieldViolation>,
) -> Option<Vec<String>> {
    let Some(Value::Array(items)) = value else {
        violations.push(FieldViolation::new(
            "services",
            "Please select at least one service",
        ));
        return None;
    };

    if items.is_empty() {
        violations.push(FieldViolation::new(
            "services",
            "Please select at least one service",
        ));
        return None;
    }

    let mut selected: Vec<String> = Vec::with_capacity(items.len());
    let mut valid = true;
    for item in items {
        match item.as_str() {
            Some(id) if catalog::is_selectable(id) => {
                // 重複的勾選只保留第一次
                if !selected.iter().any(|existing| existing == id) {
                    selected.push(id.to_string());
                }
            }
            Some(id) => {
                violations.push(FieldViolation::new(
                    "services",
                    format!("Unknown service: {}", id),
                ));
                valid = false;
            }
            None => {
                violations.push(FieldViolation::new(
                    "services",
                    "Services must be a list of strings",
                ));
                valid = false;
            }
        }
    }

    valid.then_some(selected)
}

fn validate_honeypot(value: Option<&Value>, violations: &mut Vec<FieldViolation>) -> Option<String> {
    // 欄位必須存在且為字串，是否為空交給呼叫端判斷
    match value {
        Some(Value::String(value)) => Some(value.clone()),
        _ => {
            violations.push(FieldViolation::new(HONEYPOT_FIELD, "Invalid submission"));
            None
        }
    }
}
