//! Code entry surface

mod controller;

pub use controller::{CodeEntryController, EntryOutcome, SubmitMode};
