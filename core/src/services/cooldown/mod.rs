//! Resend cooldown timer

mod timer;

pub use timer::{CooldownTimer, TickOutcome, TimerGeneration};
