//! Maps workflow state to the view a host should render

mod selector;

pub use selector::{present, select_view};
