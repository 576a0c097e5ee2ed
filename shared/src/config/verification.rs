//! Verification flow configuration module

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::errors::{ConfigError, ConfigResult};
use crate::types::{default_countries, find_country, Channel, Country};
use crate::utils::validators;

/// Default number of digits in a one-time code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Longest code the entry surface supports
pub const MAX_CODE_LENGTH: usize = 12;

/// Default seconds between resend requests
pub const DEFAULT_RESEND_COOLDOWN_SECONDS: u32 = 60;

/// Options recognized by the verification flow
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Number of digits in a code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Seconds the resend action stays disabled after a successful dispatch
    #[serde(default = "default_resend_cooldown")]
    pub resend_cooldown_seconds: u32,

    /// Verify as soon as the code buffer is full
    #[serde(default = "default_auto_submit")]
    pub auto_submit: bool,

    /// Channels the user may choose from
    #[serde(default = "default_channels")]
    pub available_channels: Vec<Channel>,

    /// Countries used for phone formatting and dial prefix display
    #[serde(default = "default_countries")]
    pub countries: Vec<Country>,

    /// Country preselected in the address form
    #[serde(default = "default_country")]
    pub default_country: String,

    /// Rejected codes allowed per dispatched code; unlimited unless set
    #[serde(default)]
    pub max_verify_attempts: Option<u32>,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            resend_cooldown_seconds: default_resend_cooldown(),
            auto_submit: default_auto_submit(),
            available_channels: default_channels(),
            countries: default_countries(),
            default_country: default_country(),
            max_verify_attempts: None,
        }
    }
}

impl VerificationConfig {
    /// Channel preselected when a flow starts
    pub fn default_channel(&self) -> Channel {
        self.available_channels
            .first()
            .copied()
            .unwrap_or_default()
    }

    /// Whether the channel is offered by this configuration
    pub fn is_channel_available(&self, channel: Channel) -> bool {
        self.available_channels.contains(&channel)
    }

    /// Look up a configured country
    pub fn country(&self, code: &str) -> Option<&Country> {
        find_country(&self.countries, code)
    }

    /// Check the configuration for values the flow cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if !validators::length_between(self.code_length, 1, MAX_CODE_LENGTH) {
            return Err(ConfigError::OutOfRange {
                field: "code_length".to_string(),
                min: 1,
                max: MAX_CODE_LENGTH,
                actual: self.code_length,
            });
        }

        if self.available_channels.is_empty() {
            return Err(ConfigError::RequiredField {
                field: "available_channels".to_string(),
            });
        }

        if self.available_channels.iter().any(Channel::is_phone)
            && self.country(&self.default_country).is_none()
        {
            return Err(ConfigError::UnknownCountry {
                code: self.default_country.clone(),
            });
        }

        if self.max_verify_attempts == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "max_verify_attempts".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }

    /// Load configuration from `VERIFY_*` environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through a key lookup, starting from defaults
    ///
    /// Recognized keys: `VERIFY_CODE_LENGTH`, `VERIFY_RESEND_COOLDOWN_SECONDS`,
    /// `VERIFY_AUTO_SUBMIT`, `VERIFY_CHANNELS` (comma separated),
    /// `VERIFY_DEFAULT_COUNTRY`, `VERIFY_MAX_ATTEMPTS` (`0` or `unlimited`
    /// disables the limit).
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("VERIFY_CODE_LENGTH") {
            config.code_length = parse_value("VERIFY_CODE_LENGTH", &value)?;
        }
        if let Some(value) = lookup("VERIFY_RESEND_COOLDOWN_SECONDS") {
            config.resend_cooldown_seconds = parse_value("VERIFY_RESEND_COOLDOWN_SECONDS", &value)?;
        }
        if let Some(value) = lookup("VERIFY_AUTO_SUBMIT") {
            config.auto_submit = parse_value("VERIFY_AUTO_SUBMIT", &value)?;
        }
        if let Some(value) = lookup("VERIFY_CHANNELS") {
            config.available_channels = value
                .split(',')
                .filter(|part| validators::not_empty(part))
                .map(|part| parse_value("VERIFY_CHANNELS", part))
                .collect::<ConfigResult<Vec<Channel>>>()?;
        }
        if let Some(value) = lookup("VERIFY_DEFAULT_COUNTRY") {
            config.default_country = value.trim().to_uppercase();
        }
        if let Some(value) = lookup("VERIFY_MAX_ATTEMPTS") {
            config.max_verify_attempts = match value.trim() {
                "0" | "unlimited" => None,
                other => Some(parse_value("VERIFY_MAX_ATTEMPTS", other)?),
            };
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn default_code_length() -> usize {
    DEFAULT_CODE_LENGTH
}

fn default_resend_cooldown() -> u32 {
    DEFAULT_RESEND_COOLDOWN_SECONDS
}

fn default_auto_submit() -> bool {
    true
}

fn default_channels() -> Vec<Channel> {
    vec![Channel::Email, Channel::Sms]
}

fn default_country() -> String {
    String::from("US")
}
