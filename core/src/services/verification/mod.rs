//! Verification workflow
//!
//! - `state_machine` - pure transition logic over `FlowEvent`s
//! - `flow` - tokio driver executing gateway operations and the cooldown ticker
//! - `traits` - gateway and observer seams supplied by the host
//! - `types` - events, commands and transition results

mod flow;
mod state_machine;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use flow::{VerificationFlow, DEFAULT_INVALID_CODE_MESSAGE};
pub use state_machine::VerificationStateMachine;
pub use traits::{FlowObserver, NoopObserver, VerificationGateway};
pub use types::{AttemptId, FlowCommand, FlowEvent, Guard, IgnoreReason, Transition, VerifyOutcome};
