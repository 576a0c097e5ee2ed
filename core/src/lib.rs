//! # VerifyFlow Core
//!
//! State and behaviour core for one-time-code identity verification.
//! This crate contains the session entity, the verification state machine and
//! its async driver, and the supporting components: address formatting,
//! resend cooldown, code entry and view selection. It performs no delivery
//! itself; hosts plug in a `VerificationGateway`.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
