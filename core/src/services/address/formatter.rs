//! Country-aware phone formatting and delivery address masking
//!
//! The rule set is partial: North American numbers are grouped
//! 3-3-4, everything else passes through as digits. It is meant for display
//! while typing, not as a full E.164 formatter.

use vf_shared::phone::{digits_only, to_e164};
use vf_shared::validation::validators;
use vf_shared::{default_countries, find_country, Channel, Country, NumberLayout, VerificationConfig};

use crate::errors::{VerificationError, VerificationResult};

/// Number of trailing characters left visible by `mask`
const VISIBLE_SUFFIX: usize = 4;

/// Digits in a national NANP number (3-3-4)
const NANP_DIGITS: usize = 10;

/// Phone formatting and masking against a country table
#[derive(Debug, Clone)]
pub struct AddressFormatter {
    countries: Vec<Country>,
}

impl Default for AddressFormatter {
    fn default() -> Self {
        Self::new(default_countries())
    }
}

impl AddressFormatter {
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }

    pub fn from_config(config: &VerificationConfig) -> Self {
        Self::new(config.countries.clone())
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn country(&self, country_code: &str) -> Option<&Country> {
        find_country(&self.countries, country_code)
    }

    /// Dial prefix for display next to the phone input
    pub fn dial_code(&self, country_code: &str) -> Option<&str> {
        self.country(country_code).map(|c| c.dial_code.as_str())
    }

    /// Format a (possibly partial) phone number for display
    ///
    /// Strips every non-digit, then re-inserts punctuation for the country's
    /// layout. NANP numbers may carry the leading `1` country code. Unknown
    /// countries and numbers too long for NANP come back as plain digits.
    ///
    /// ```
    /// use vf_core::services::address::AddressFormatter;
    ///
    /// let formatter = AddressFormatter::default();
    /// assert_eq!(formatter.format("(555) 1234567", "US"), "555-123-4567");
    /// assert_eq!(formatter.format("+1 5551234567", "US"), "555-123-4567");
    /// assert_eq!(formatter.format("0412 345 678", "AU"), "0412345678");
    /// ```
    pub fn format(&self, raw: &str, country_code: &str) -> String {
        let digits = digits_only(raw);
        match self.country(country_code).map(|c| c.layout) {
            Some(NumberLayout::NorthAmerican) => {
                let national = match digits.strip_prefix('1') {
                    Some(rest) if digits.len() == NANP_DIGITS + 1 => rest,
                    _ => digits.as_str(),
                };
                if national.len() <= NANP_DIGITS {
                    group_north_american(national)
                } else {
                    digits
                }
            }
            _ => digits,
        }
    }

    /// Mask a delivery address for display
    ///
    /// Email addresses are returned unchanged. Phone-like channels keep the
    /// last four characters and replace the rest with `*`; addresses of four
    /// characters or fewer are returned verbatim.
    pub fn mask(address: &str, channel: Channel) -> String {
        if !channel.is_phone() {
            return address.to_string();
        }

        let len = address.chars().count();
        if len <= VISIBLE_SUFFIX {
            return address.to_string();
        }

        let hidden = len - VISIBLE_SUFFIX;
        let mut masked = "*".repeat(hidden);
        masked.extend(address.chars().skip(hidden));
        masked
    }

    /// Validate and normalize an address before it is submitted
    ///
    /// Phone channels return E.164 (the country's dial code is applied when
    /// the input has no leading `+`); email is trimmed and lower-cased.
    pub fn validate(
        &self,
        raw: &str,
        channel: Channel,
        country_code: &str,
    ) -> VerificationResult<String> {
        let trimmed = raw.trim();

        if channel.is_phone() {
            if !validators::not_empty(trimmed) {
                return Err(address_invalid("Enter a phone number"));
            }

            let dial_code = match self.dial_code(country_code) {
                Some(dial_code) => dial_code,
                None if trimmed.starts_with('+') => "",
                None => {
                    return Err(address_invalid(format!(
                        "Unknown country '{}'. Include the country code (e.g. +1 555 123 4567)",
                        country_code
                    )))
                }
            };

            to_e164(trimmed, dial_code).ok_or_else(|| {
                address_invalid("Invalid phone number. Check the number and country code")
            })
        } else {
            if !validators::not_empty(trimmed) {
                return Err(address_invalid("Enter an email address"));
            }
            if !validators::is_valid_email(trimmed) {
                return Err(address_invalid("Invalid email address"));
            }
            Ok(trimmed.to_lowercase())
        }
    }
}

fn address_invalid(message: impl Into<String>) -> VerificationError {
    VerificationError::AddressInvalid {
        message: message.into(),
    }
}

/// Progressive 3-3-4 grouping; input is at most 10 ASCII digits
fn group_north_american(digits: &str) -> String {
    match digits.len() {
        0..=3 => digits.to_string(),
        4..=6 => format!("{}-{}", &digits[..3], &digits[3..]),
        _ => format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}
