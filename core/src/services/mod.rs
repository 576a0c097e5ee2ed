//! Verification flow components.

pub mod address;
pub mod code_entry;
pub mod cooldown;
pub mod presentation;
pub mod verification;

// Re-export commonly used types
pub use address::AddressFormatter;
pub use code_entry::{CodeEntryController, EntryOutcome, SubmitMode};
pub use cooldown::{CooldownTimer, TickOutcome, TimerGeneration};
pub use presentation::{present, select_view};
pub use verification::{
    AttemptId, FlowCommand, FlowEvent, FlowObserver, Guard, IgnoreReason, NoopObserver,
    Transition, VerificationFlow, VerificationGateway, VerificationStateMachine, VerifyOutcome,
};
