//! Configuration module
//!
//! - `environment` - Environment detection and logging configuration
//! - `verification` - Options recognized by the verification flow

pub mod environment;
pub mod verification;

use serde::{Deserialize, Serialize};
use std::env;

use crate::errors::ConfigResult;

// Re-export commonly used types
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use verification::VerificationConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Verification flow configuration
    #[serde(default)]
    pub verification: VerificationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            logging: LoggingConfig::for_environment(env),
            verification: VerificationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create configuration for an environment with default flow options
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            logging: LoggingConfig::for_environment(environment),
            verification: VerificationConfig::default(),
        }
    }

    /// Load configuration from environment
    ///
    /// Reads the environment-specific `.env` file (if present) before looking
    /// at `LOG_LEVEL`, `LOG_FORMAT` and the `VERIFY_*` variables.
    pub fn from_env() -> ConfigResult<Self> {
        let environment = Environment::detect();
        dotenvy::from_filename(environment.env_file()).ok();

        let mut config = Self::for_environment(environment);
        if let Ok(level) = env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(format) = env::var("LOG_FORMAT").ok().and_then(|f| f.parse().ok()) {
            config.logging.format = format;
        }
        config.verification = VerificationConfig::from_env()?;

        tracing::debug!(
            environment = %environment,
            code_length = config.verification.code_length,
            resend_cooldown_seconds = config.verification.resend_cooldown_seconds,
            "Loaded application configuration"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_environment() {
        let config = AppConfig::for_environment(Environment::Production);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.verification, VerificationConfig::default());
    }

    #[test]
    fn test_deserialize_minimal() {
        let json = r#"{"environment": "production", "verification": {"auto_submit": false}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.logging, LoggingConfig::default());
        assert!(!config.verification.auto_submit);
        assert_eq!(config.verification.code_length, 6);
    }
}
