//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Common validation functions
pub mod validators {
    use super::EMAIL_REGEX;

    /// Check if a string is not empty
    pub fn not_empty(value: &str) -> bool {
        !value.trim().is_empty()
    }

    /// Check if a length is within bounds (inclusive)
    pub fn length_between(len: usize, min: usize, max: usize) -> bool {
        len >= min && len <= max
    }

    /// Check if an email address is valid (basic `local@domain.tld` check)
    pub fn is_valid_email(email: &str) -> bool {
        EMAIL_REGEX.is_match(email.trim())
    }
}
