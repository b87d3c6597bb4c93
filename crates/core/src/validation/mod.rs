//! Field validator.
//!
//! Two modes, both pure (they inspect and decide, never mutate):
//! - [`patch`]: authorizes a single-field patch against the current entity
//! - [`entity`]: turns a raw create/replace document into a typed entity

pub mod entity;
pub mod patch;

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CoreError, CoreResult};

/// Accepted email address shape.
pub const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,4}$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate that `email` has the shape of an email address.
pub fn validate_email(email: &str) -> CoreResult<()> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(CoreError::bad_request(format!("Invalid email '{email}'")))
    }
}

/// Ids are assigned by the store; a client-supplied one is rejected.
pub(crate) fn require_absent_id(entity: &str, id: &Option<String>) -> CoreResult<()> {
    match id {
        Some(id) => Err(CoreError::bad_request(format!(
            "{entity} id must not be supplied on create (got '{id}')"
        ))),
        None => Ok(()),
    }
}

pub(crate) fn require_non_blank(field: &str, value: Option<String>) -> CoreResult<String> {
    match value {
        Some(v) if !is_blank(&v) => Ok(v),
        _ => Err(CoreError::bad_request(format!(
            "Field '{field}' must not be blank"
        ))),
    }
}

pub(crate) fn require_present<T>(field: &str, value: Option<T>) -> CoreResult<T> {
    value.ok_or_else(|| CoreError::bad_request(format!("Field '{field}' is required")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("jane.doe+work@example.com").is_ok());
        assert!(validate_email("a_b@mail.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in ["", "jane", "jane@", "@example.com", "jane@example", "jane@example.abcde"] {
            assert!(validate_email(email).is_err(), "{email:?} should be rejected");
        }
    }

    #[test]
    fn blank_means_whitespace_only() {
        assert!(is_blank(""));
        assert!(is_blank("  \t"));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn supplied_id_is_rejected() {
        let err = require_absent_id("Task", &Some("abc".into())).unwrap_err();
        assert!(err.to_string().contains("abc"));
        assert!(require_absent_id("Task", &None).is_ok());
    }
}
