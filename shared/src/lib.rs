//! Shared utilities and common types for VerifyFlow
//!
//! This crate provides common functionality used across the workspace:
//! - Configuration types and environment loading
//! - Channel and country definitions
//! - Logging bootstrap
//! - Utility functions (phone normalization, email validation)

pub mod config;
pub mod errors;
pub mod logging;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AppConfig, Environment, LogFormat, LoggingConfig, VerificationConfig};
pub use errors::{ConfigError, ConfigResult};
pub use logging::init_tracing;
pub use types::{default_countries, find_country, Channel, Country, NumberLayout};
pub use utils::{phone, validation};
