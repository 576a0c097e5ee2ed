//! Address formatting, masking and local validation

mod formatter;

pub use formatter::AddressFormatter;
