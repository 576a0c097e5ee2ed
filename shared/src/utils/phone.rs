//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// International phone number regex (E.164 format)
static E164_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{6,14}$").expect("E.164 pattern is valid")
});

/// Keep only ASCII digits
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Convert a phone number to E.164 using a dial prefix when none is present
///
/// A leading '+' is kept as-is. A single trunk '0' is dropped before the
/// dial prefix is applied (e.g. `0412 345 678` with `+61`).
pub fn to_e164(phone: &str, dial_code: &str) -> Option<String> {
    let trimmed = phone.trim();
    let candidate = if trimmed.starts_with('+') {
        format!("+{}", digits_only(trimmed))
    } else {
        let digits = digits_only(trimmed);
        let local = digits.strip_prefix('0').unwrap_or(&digits);
        format!("{}{}", dial_code, local)
    };

    if E164_REGEX.is_match(&candidate) {
        Some(candidate)
    } else {
        None
    }
}
