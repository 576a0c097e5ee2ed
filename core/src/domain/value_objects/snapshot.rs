//! Point-in-time copy of a verification session

use serde::Serialize;
use vf_shared::Channel;

use crate::domain::entities::FlowState;

/// Everything a host needs to render the flow
///
/// Internal bookkeeping (attempt identifiers, timer generations) is not part
/// of the snapshot, so two snapshots compare equal whenever the user-visible
/// session is the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Current workflow state
    pub state: FlowState,
    /// Delivery channel
    pub channel: Channel,
    /// Submitted destination (empty before submission)
    pub address: String,
    /// Two-letter country identifier used for phone formatting
    pub country_code: String,
    /// Digits typed so far
    pub code: String,
    /// Number of digits a complete code has
    pub code_length: usize,
    /// Seconds until resend becomes available
    pub cooldown_remaining: u32,
    /// Last verify failure, shown on the code form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_error: Option<String>,
    /// Last dispatch failure or recovery reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_error: Option<String>,
    /// Rejected codes since the last dispatch
    pub failed_attempts: u32,
}

impl SessionSnapshot {
    /// Whether the code buffer is full
    pub fn is_code_complete(&self) -> bool {
        self.code.len() == self.code_length
    }

    /// Whether resend is currently permitted
    pub fn can_resend(&self) -> bool {
        self.state.allows_resend() && self.cooldown_remaining == 0
    }

    /// The message to show inline for the active form
    pub fn inline_error(&self) -> Option<&str> {
        match self.state {
            FlowState::AwaitingCode | FlowState::Verifying => self.attempt_error.as_deref(),
            _ => self.general_error.as_deref(),
        }
    }
}
