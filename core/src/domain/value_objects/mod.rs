//! Value objects handed to hosts for rendering.

mod presentation;
mod snapshot;

pub use presentation::{Presentation, ViewKind, ViewModel};
pub use snapshot::SessionSnapshot;
