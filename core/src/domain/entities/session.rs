//! Verification session entity and workflow states.

use serde::{Deserialize, Serialize};
use vf_shared::Channel;

/// Workflow state of a verification session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowState {
    /// Waiting for the user to enter a delivery address
    CollectingAddress,
    /// A dispatch (or resend) request is in flight
    Dispatching,
    /// Code was delivered; waiting for the user to type it
    AwaitingCode,
    /// A verify request is in flight
    Verifying,
    /// Code accepted (terminal)
    Verified,
    /// Code expired; resend or change address
    Expired,
    /// Too many rejected codes; resend or change address
    Error,
}

impl FlowState {
    /// All states, in workflow order
    pub const ALL: [FlowState; 7] = [
        FlowState::CollectingAddress,
        FlowState::Dispatching,
        FlowState::AwaitingCode,
        FlowState::Verifying,
        FlowState::Verified,
        FlowState::Expired,
        FlowState::Error,
    ];

    /// Whether no further events are processed
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Verified)
    }

    /// Terminal with recovery: only resend and change-address apply
    pub fn is_recovery(&self) -> bool {
        matches!(self, FlowState::Expired | FlowState::Error)
    }

    /// Whether an external operation is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self, FlowState::Dispatching | FlowState::Verifying)
    }

    /// States from which a resend may be requested
    pub fn allows_resend(&self) -> bool {
        matches!(
            self,
            FlowState::AwaitingCode | FlowState::Expired | FlowState::Error
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowState::CollectingAddress => "collecting-address",
            FlowState::Dispatching => "dispatching",
            FlowState::AwaitingCode => "awaiting-code",
            FlowState::Verifying => "verifying",
            FlowState::Verified => "verified",
            FlowState::Expired => "expired",
            FlowState::Error => "error",
        }
    }
}

impl Default for FlowState {
    fn default() -> Self {
        FlowState::CollectingAddress
    }
}

impl std::fmt::Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The central entity of a verification flow
///
/// Holds the destination and workflow bookkeeping. The typed code and the
/// resend countdown live in their own components and are combined with this
/// entity in a `SessionSnapshot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationSession {
    channel: Channel,
    address: String,
    country_code: String,
    state: FlowState,
    attempt_error: Option<String>,
    general_error: Option<String>,
    failed_attempts: u32,
}

impl VerificationSession {
    /// Creates a fresh session in `collecting-address`
    pub fn new(channel: Channel, country_code: impl Into<String>) -> Self {
        Self {
            channel,
            address: String::new(),
            country_code: country_code.into(),
            state: FlowState::CollectingAddress,
            attempt_error: None,
            general_error: None,
            failed_attempts: 0,
        }
    }

    /// Creates a session whose code was already dispatched by the caller
    pub fn already_dispatched(
        channel: Channel,
        address: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            state: FlowState::AwaitingCode,
            ..Self::new(channel, country_code)
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn attempt_error(&self) -> Option<&str> {
        self.attempt_error.as_deref()
    }

    pub fn general_error(&self) -> Option<&str> {
        self.general_error.as_deref()
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub(crate) fn set_state(&mut self, state: FlowState) {
        self.state = state;
    }

    /// Switch the delivery channel; only meaningful before an address is submitted
    pub(crate) fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    /// Store a submitted address. The only path that mutates `address`.
    pub(crate) fn store_address(&mut self, address: String, country_code: String) {
        debug_assert_eq!(self.state, FlowState::CollectingAddress);
        self.address = address;
        self.country_code = country_code;
    }

    /// A new dispatch or verify attempt begins
    pub(crate) fn clear_errors(&mut self) {
        self.attempt_error = None;
        self.general_error = None;
    }

    pub(crate) fn set_attempt_error(&mut self, message: String) {
        self.attempt_error = Some(message);
    }

    pub(crate) fn set_general_error(&mut self, message: String) {
        self.general_error = Some(message);
    }

    /// Record a rejected code and return the new count
    pub(crate) fn record_failed_attempt(&mut self) -> u32 {
        self.failed_attempts += 1;
        self.failed_attempts
    }

    pub(crate) fn reset_failed_attempts(&mut self) {
        self.failed_attempts = 0;
    }

    /// Back to a fresh session, keeping channel and country unless overridden
    pub(crate) fn reset(&mut self, channel: Option<Channel>, country_code: Option<String>) {
        let channel = channel.unwrap_or(self.channel);
        let country_code = country_code.unwrap_or_else(|| std::mem::take(&mut self.country_code));
        *self = Self::new(channel, country_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_collecting() {
        let session = VerificationSession::new(Channel::Sms, "US");
        assert_eq!(session.state(), FlowState::CollectingAddress);
        assert_eq!(session.address(), "");
        assert_eq!(session.country_code(), "US");
        assert!(session.attempt_error().is_none());
        assert!(session.general_error().is_none());
    }

    #[test]
    fn test_already_dispatched() {
        let session = VerificationSession::already_dispatched(Channel::Email, "a@b.co", "US");
        assert_eq!(session.state(), FlowState::AwaitingCode);
        assert_eq!(session.address(), "a@b.co");
    }

    #[test]
    fn test_reset_keeps_channel_and_country() {
        let mut session = VerificationSession::new(Channel::Sms, "AU");
        session.store_address("+61412345678".to_string(), "AU".to_string());
        session.set_state(FlowState::Expired);
        session.set_general_error("expired".to_string());
        session.record_failed_attempt();

        session.reset(None, None);
        assert_eq!(session, VerificationSession::new(Channel::Sms, "AU"));

        session.reset(Some(Channel::Email), Some("GB".to_string()));
        assert_eq!(session, VerificationSession::new(Channel::Email, "GB"));
    }

    #[test]
    fn test_state_classification() {
        assert!(FlowState::Verified.is_terminal());
        assert!(!FlowState::Expired.is_terminal());
        assert!(FlowState::Expired.is_recovery());
        assert!(FlowState::Error.is_recovery());
        assert!(FlowState::Dispatching.is_busy());
        assert!(FlowState::Verifying.is_busy());
        assert!(!FlowState::Verifying.allows_resend());
        assert!(FlowState::AwaitingCode.allows_resend());
        assert_eq!(FlowState::AwaitingCode.to_string(), "awaiting-code");
    }
}
