//! Field validation for submitted leads.
//!
//! Rules are checked in a fixed order and the first failure wins; the
//! rejection messages are returned to clients verbatim.

use std::fmt;

pub const MAX_NAME_CHARS: usize = 200;
pub const MAX_EMAIL_CHARS: usize = 200;
pub const MAX_CONTACT_CHARS: usize = 200;
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Reason a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NameRequired,
    NameTooLong,
    EmailTooLong,
    ContactTooLong,
    MessageTooLong,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::NameRequired => "Name is required",
            Rejection::NameTooLong => "Name too long (max 200 chars)",
            Rejection::EmailTooLong => "Email too long (max 200 chars)",
            Rejection::ContactTooLong => "Contact too long (max 200 chars)",
            Rejection::MessageTooLong => "Message too long (max 2000 chars)",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for Rejection {}

fn too_long(value: Option<&str>, max: usize) -> bool {
    value.is_some_and(|v| v.chars().count() > max)
}

/// Validate the constrained lead fields. `None` means accepted.
///
/// `name` is measured as given; callers that trim before validating get the
/// trimmed length checked.
pub fn validate(
    name: Option<&str>,
    email: Option<&str>,
    contact: Option<&str>,
    message: Option<&str>,
) -> Option<Rejection> {
    let Some(name) = name.filter(|n| !n.trim().is_empty()) else {
        return Some(Rejection::NameRequired);
    };
    if name.chars().count() > MAX_NAME_CHARS {
        return Some(Rejection::NameTooLong);
    }
    if too_long(email, MAX_EMAIL_CHARS) {
        return Some(Rejection::EmailTooLong);
    }
    if too_long(contact, MAX_CONTACT_CHARS) {
        return Some(Rejection::ContactTooLong);
    }
    if too_long(message, MAX_MESSAGE_CHARS) {
        return Some(Rejection::MessageTooLong);
    }
    None
}
