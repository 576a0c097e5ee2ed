use vf_shared::VerificationConfig;

use crate::domain::entities::FlowState;
use crate::domain::value_objects::{Presentation, SessionSnapshot, ViewKind, ViewModel};
use crate::services::address::AddressFormatter;

/// Exactly one view per state
pub fn select_view(state: FlowState) -> Presentation {
    let view = match state {
        FlowState::CollectingAddress | FlowState::Dispatching => ViewKind::AddressForm,
        FlowState::AwaitingCode | FlowState::Verifying => ViewKind::CodeForm,
        FlowState::Verified => ViewKind::VerifiedPanel,
        FlowState::Expired | FlowState::Error => ViewKind::RecoveryPanel,
    };
    Presentation {
        view,
        busy: state.is_busy(),
    }
}

/// Build the render-ready model for a snapshot
///
/// The address stays editable (unmasked) on the address form and is masked
/// everywhere else.
pub fn present(
    snapshot: &SessionSnapshot,
    formatter: &AddressFormatter,
    config: &VerificationConfig,
) -> ViewModel {
    let Presentation { view, busy } = select_view(snapshot.state);

    let display_address = match view {
        ViewKind::AddressForm => snapshot.address.clone(),
        _ => AddressFormatter::mask(&snapshot.address, snapshot.channel),
    };

    let dial_code = if snapshot.channel.is_phone() {
        formatter
            .dial_code(&snapshot.country_code)
            .map(str::to_string)
    } else {
        None
    };

    let show_submit = view == ViewKind::CodeForm && !config.auto_submit;

    ViewModel {
        view,
        busy,
        channel: snapshot.channel,
        available_channels: config.available_channels.clone(),
        display_address,
        dial_code,
        code: snapshot.code.clone(),
        code_length: snapshot.code_length,
        message: snapshot.inline_error().map(str::to_string),
        can_resend: snapshot.can_resend(),
        resend_countdown: snapshot.cooldown_remaining,
        show_submit,
        can_submit: show_submit && !busy && snapshot.is_code_complete(),
    }
}
