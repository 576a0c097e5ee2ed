//! Presentation value objects

use serde::Serialize;
use vf_shared::Channel;

/// Which view the host should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Address collection form
    AddressForm,
    /// Code entry form
    CodeForm,
    /// Success panel
    VerifiedPanel,
    /// Expired/error panel offering resend or change address
    RecoveryPanel,
}

/// A view plus whether it should render in a busy (in-flight) style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub view: ViewKind,
    pub busy: bool,
}

/// Render-ready description of the current session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub view: ViewKind,
    pub busy: bool,
    /// Delivery channel
    pub channel: Channel,
    /// Channels the user can switch between on the address form
    pub available_channels: Vec<Channel>,
    /// Address as shown to the user (masked once submitted)
    pub display_address: String,
    /// Dial prefix for phone channels, e.g. "+1"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dial_code: Option<String>,
    /// Digits typed so far
    pub code: String,
    pub code_length: usize,
    /// Inline message for the active form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Resend available now
    pub can_resend: bool,
    /// Seconds until resend becomes available
    pub resend_countdown: u32,
    /// Manual submit button enabled (only shown when auto-submit is off)
    pub show_submit: bool,
    pub can_submit: bool,
}
