//! Tests for the verification workflow

#[cfg(test)]
mod mocks;
