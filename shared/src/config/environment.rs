//! Runtime environment and the log settings that go with it

use serde::{Deserialize, Serialize};
use std::env;

/// Where the process runs; picks the dotenv file and the log preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Read `ENVIRONMENT`; unset or unrecognized values mean development
    pub fn detect() -> Self {
        env::var("ENVIRONMENT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    /// Dotenv file loaded before `VERIFY_*` variables are read
    pub fn env_file(&self) -> String {
        format!(".env.{}", self.as_str())
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// Output layout of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Settings consumed by `init_tracing`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `vf_core=debug`
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Colored terminal output
    #[serde(default)]
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Development)
    }
}

impl LoggingConfig {
    /// Verbose colored output in development, JSON warnings in production
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self {
                level: String::from("debug"),
                format: LogFormat::Pretty,
                ansi: true,
            },
            Environment::Production => Self {
                level: String::from("warn"),
                format: LogFormat::Json,
                ansi: false,
            },
        }
    }
}
