//! Traits at the boundary between the flow and its host

use async_trait::async_trait;
use vf_shared::Channel;

use crate::domain::entities::FlowState;
use crate::domain::value_objects::SessionSnapshot;

use super::types::VerifyOutcome;

/// Externally supplied delivery and verification operations
///
/// Implementations perform the actual network I/O. Errors are plain messages;
/// the flow converts them into state plus an inline message.
#[async_trait]
pub trait VerificationGateway: Send + Sync {
    /// Send a code to the address over the channel
    async fn dispatch_code(&self, address: &str, channel: Channel) -> Result<(), String>;
    /// Check a code entered by the user
    async fn verify_code(&self, code: &str) -> Result<VerifyOutcome, String>;
    /// Send a fresh code to the already submitted address
    async fn resend_code(&self, channel: Channel) -> Result<(), String>;
}

/// Callbacks into the host environment
pub trait FlowObserver: Send + Sync {
    /// Called after every applied transition
    fn on_state_change(&self, _state: FlowState, _snapshot: &SessionSnapshot) {}

    /// Called exactly once, on entry to `verified`
    fn on_verified(&self) {}
}

/// Observer that ignores all callbacks
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FlowObserver for NoopObserver {}
