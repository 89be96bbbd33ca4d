//! Request validation primitives shared by the route handlers.
//!
//! Handlers collect every failed check before answering, so a request with a
//! blank title and a bogus priority reports both problems in one response.

use std::str::FromStr;

use serde::Serialize;

/// One failed check on a request field, in the shape the API returns.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Body of a 400 validation response.
#[derive(Debug, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

/// Parse an optional wire value, keeping "absent" distinct from "present but
/// not a known value". Unknown values record a [`FieldError`] and come back
/// as `None`.
pub fn parse_optional<T: FromStr>(
    value: Option<&str>,
    errors: &mut Vec<FieldError>,
    field: &'static str,
    message: &'static str,
) -> Option<T> {
    let raw = value?;
    match raw.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}

/// Structural email check, close to what common form validators accept:
/// exactly one `@`, a non-empty local part, a dotted domain, no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use db::models::task::TaskStatus;

    use super::*;

    #[test]
    fn plausible_emails_pass() {
        for email in ["a@b.co", "user+tag@mail.example.com", "UPPER@CASE.IO"] {
            assert!(is_valid_email(email), "rejected {email}");
        }
    }

    #[test]
    fn implausible_emails_fail() {
        for email in [
            "",
            "plain",
            "@no-local.io",
            "user@",
            "user@nodot",
            "user@.start",
            "user@end.",
            "two@@ats.io",
            "sp ace@mail.io",
            "user@dou..ble.io",
        ] {
            assert!(!is_valid_email(email), "accepted {email}");
        }
    }

    #[test]
    fn parse_optional_records_an_error_only_for_unknown_values() {
        let mut errors = Vec::new();

        let parsed: Option<TaskStatus> =
            parse_optional(Some("in-progress"), &mut errors, "status", "Invalid status");
        assert_eq!(parsed, Some(TaskStatus::InProgress));

        let parsed: Option<TaskStatus> =
            parse_optional(None, &mut errors, "status", "Invalid status");
        assert_eq!(parsed, None);
        assert!(errors.is_empty());

        let parsed: Option<TaskStatus> =
            parse_optional(Some("archived"), &mut errors, "status", "Invalid status");
        assert_eq!(parsed, None);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "status");
        assert_eq!(errors[0].message, "Invalid status");
    }

    #[test]
    fn field_errors_serialize_in_the_wire_shape() {
        let body = ValidationErrors {
            errors: vec![FieldError::new("title", "Title is required")],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"errors": [{"field": "title", "message": "Title is required"}]})
        );
    }
}
