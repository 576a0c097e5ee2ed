//! Events, commands and transition results of the verification state machine

use vf_shared::Channel;

use crate::domain::entities::FlowState;
use crate::services::cooldown::TimerGeneration;

/// Identifies one in-flight external operation (dispatch, resend or verify)
///
/// Monotonically increasing per flow. A completion is accepted only when it
/// carries the identifier of the operation currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(pub(crate) u64);

impl AttemptId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Verdict of the external verify operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Code accepted
    Valid,
    /// Code rejected, with an optional provider message
    Invalid { message: Option<String> },
    /// Code no longer valid
    Expired,
}

/// Input to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// Pick a delivery channel on the address form
    SelectChannel(Channel),
    /// Submit a (locally validated) address
    SubmitAddress { address: String, country_code: String },
    DispatchSucceeded { attempt: AttemptId },
    DispatchFailed { attempt: AttemptId, message: String },
    TypeDigit(char),
    DeleteDigit,
    PasteCode(String),
    /// Manual submission of a complete code
    SubmitCode,
    VerifySucceeded { attempt: AttemptId },
    VerifyFailed { attempt: AttemptId, message: String },
    VerifyExpired { attempt: AttemptId },
    Resend,
    /// Back to address collection, optionally switching channel/country
    ChangeAddress {
        channel: Option<Channel>,
        country_code: Option<String>,
    },
    /// One second elapsed for the given cooldown arming
    Tick { generation: TimerGeneration },
}

impl FlowEvent {
    /// Short event name for logs
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::SelectChannel(_) => "select_channel",
            FlowEvent::SubmitAddress { .. } => "submit_address",
            FlowEvent::DispatchSucceeded { .. } => "dispatch_succeeded",
            FlowEvent::DispatchFailed { .. } => "dispatch_failed",
            FlowEvent::TypeDigit(_) => "type_digit",
            FlowEvent::DeleteDigit => "delete_digit",
            FlowEvent::PasteCode(_) => "paste_code",
            FlowEvent::SubmitCode => "submit_code",
            FlowEvent::VerifySucceeded { .. } => "verify_succeeded",
            FlowEvent::VerifyFailed { .. } => "verify_failed",
            FlowEvent::VerifyExpired { .. } => "verify_expired",
            FlowEvent::Resend => "resend",
            FlowEvent::ChangeAddress { .. } => "change_address",
            FlowEvent::Tick { .. } => "tick",
        }
    }
}

/// Side effect requested from the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowCommand {
    /// Invoke `dispatch_code(address, channel)`
    Dispatch {
        attempt: AttemptId,
        address: String,
        channel: Channel,
    },
    /// Invoke `resend_code(channel)`
    Resend { attempt: AttemptId, channel: Channel },
    /// Invoke `verify_code(code)`
    Verify { attempt: AttemptId, code: String },
    /// Schedule one `Tick` per second for this arming
    StartCooldown {
        generation: TimerGeneration,
        seconds: u32,
    },
    /// Cancel the scheduled ticks
    StopCooldown,
}

/// Why a guard rejected an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    EmptyAddress,
    ChannelUnavailable,
    CooldownActive { remaining: u32 },
    CodeIncomplete,
    CodeFull,
    NotADigit,
    NothingToDelete,
}

/// Why an event did not change the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Completion for an operation that is no longer in flight
    Stale,
    /// The flow was closed
    Closed,
    /// The event has no meaning in this state
    NotApplicable { state: FlowState },
    /// The event applies but its guard failed
    Guard(Guard),
}

/// Outcome of handling one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Applied {
        from: FlowState,
        to: FlowState,
        commands: Vec<FlowCommand>,
    },
    Ignored(IgnoreReason),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied { .. })
    }

    /// Target state, if the event was applied
    pub fn target(&self) -> Option<FlowState> {
        match self {
            Transition::Applied { to, .. } => Some(*to),
            Transition::Ignored(_) => None,
        }
    }

    pub fn commands(&self) -> &[FlowCommand] {
        match self {
            Transition::Applied { commands, .. } => commands,
            Transition::Ignored(_) => &[],
        }
    }

    pub fn ignore_reason(&self) -> Option<IgnoreReason> {
        match self {
            Transition::Applied { .. } => None,
            Transition::Ignored(reason) => Some(*reason),
        }
    }
}
