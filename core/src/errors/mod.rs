//! Domain-specific error types and error handling.

use thiserror::Error;
use vf_shared::ConfigError;

/// Verification workflow errors
///
/// The `Display` text doubles as the inline message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// Local pre-dispatch check failed; never reaches the state machine
    #[error("{message}")]
    AddressInvalid { message: String },

    #[error("Could not send the code: {message}")]
    DispatchFailed { message: String },

    #[error("{message}")]
    VerifyInvalid { message: String },

    #[error("Verification code expired. Request a new code")]
    VerifyExpired,

    #[error("Too many incorrect codes. Request a new code")]
    MaxAttemptsExceeded,

    #[error("Verification session cancelled")]
    Cancelled,
}

impl VerificationError {
    /// Error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::AddressInvalid { .. } => "ADDRESS_INVALID",
            VerificationError::DispatchFailed { .. } => "DISPATCH_FAILED",
            VerificationError::VerifyInvalid { .. } => "VERIFICATION_CODE_INVALID",
            VerificationError::VerifyExpired => "VERIFICATION_CODE_EXPIRED",
            VerificationError::MaxAttemptsExceeded => "MAX_ATTEMPTS_EXCEEDED",
            VerificationError::Cancelled => "CANCELLED",
        }
    }

    /// Whether the flow can continue after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, VerificationError::Cancelled)
    }
}

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Verification(#[from] VerificationError),
}

pub type DomainResult<T> = Result<T, DomainError>;

pub type VerificationResult<T> = Result<T, VerificationError>;
