//! Domain entities representing core workflow objects.

pub mod session;

// Re-export commonly used types
pub use session::{FlowState, VerificationSession};
