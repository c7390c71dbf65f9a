//! Email address validation.

use std::sync::LazyLock;

use super::error::ValidationError;

/// Pragmatic email pattern: printable local part, dotted domain, TLD of
/// at least two letters. Deliverability is the mail transport's problem.
static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("EMAIL_REGEX is a valid regex pattern")
});

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new(
            "mail",
            "required",
            "mail address is required",
        ));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::new(
            "mail",
            "invalid_format",
            format!("mail address has an invalid format: {email}"),
        ));
    }
    Ok(())
}
