//! Input validation helpers.

use crate::event::NewEvent;
use crate::{Error, Result};

/// Validate email address format.
///
/// This performs basic RFC 5322 validation:
/// - Must contain exactly one `@`
/// - Must have non-empty local and domain parts
/// - Length must be between 3 and 255 characters
///
/// For full RFC 5322 compliance, consider the `email_address` crate.
///
/// # Errors
///
/// Returns `Error::Validation` if the email is malformed.
pub fn validate_email(email: &str) -> Result<()> {
    if email.len() < 3 || email.len() > 255 {
        return Err(Error::validation("email length out of range"));
    }

    let mut parts = email.split('@');
    let (local, domain) = (parts.next(), parts.next());
    if parts.next().is_some() {
        return Err(Error::validation("email contains multiple '@'"));
    }
    match (local, domain) {
        (Some(local), Some(domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(Error::validation("email missing local or domain part")),
    }
}

/// Normalize an email for uniqueness comparison (case-insensitive).
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trim teammate names and drop empty entries.
///
/// An empty input list is a valid solo registration and stays empty.
#[must_use]
pub fn clean_teammates(teammates: Vec<String>) -> Vec<String> {
    teammates
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Validate the caller-supplied fields of a new event.
///
/// The fee is non-negative by construction (`u32`) and the category is a
/// closed enum, so only the free-text fields need checking here.
///
/// # Errors
///
/// Returns `Error::Validation` if title or location is empty.
pub fn validate_new_event(input: &NewEvent) -> Result<()> {
    if input.title.trim().is_empty() {
        return Err(Error::validation("title must not be empty"));
    }
    if input.location.trim().is_empty() {
        return Err(Error::validation("location must not be empty"));
    }
    Ok(())
}
