//! Member username validation.
//!
//! Member accounts are named by a 10-digit enrollment number whose
//! leading four digits are the enrollment year. System accounts are
//! exempt from this rule and are not validated here.

use std::sync::LazyLock;

use chrono::{Datelike, Utc};

use super::error::ValidationError;

static MEMBER_USERNAME_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[0-9]{10}$").expect("MEMBER_USERNAME_REGEX is a valid regex pattern")
});

const MEMBER_USERNAME_LENGTH: usize = 10;
const MIN_ENROLLMENT_YEAR: i32 = 2000;
const ENROLLMENT_YEAR_HEADROOM: i32 = 5;

/// Validate a member username.
pub fn validate_member_username(username: &str) -> Result<(), ValidationError> {
    if username.len() != MEMBER_USERNAME_LENGTH {
        return Err(ValidationError::new(
            "username",
            "wrong_length",
            format!(
                "member username must be {MEMBER_USERNAME_LENGTH} characters, got {}",
                username.len()
            ),
        ));
    }
    if !MEMBER_USERNAME_REGEX.is_match(username) {
        return Err(ValidationError::new(
            "username",
            "not_numeric",
            "member username must consist of digits only",
        ));
    }

    let year: i32 = username[..4].parse().map_err(|_| {
        ValidationError::new(
            "username",
            "invalid_year",
            "the first four digits must be a year",
        )
    })?;
    let max_year = Utc::now().year() + ENROLLMENT_YEAR_HEADROOM;
    if year < MIN_ENROLLMENT_YEAR || year > max_year {
        return Err(ValidationError::new(
            "username",
            "year_out_of_range",
            format!(
                "enrollment year must be between {MIN_ENROLLMENT_YEAR} and {max_year}, got {year}"
            ),
        ));
    }
    Ok(())
}
