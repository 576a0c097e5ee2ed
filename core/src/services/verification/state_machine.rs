//! Verification workflow state machine
//!
//! A synchronous, I/O-free core. Every call to [`VerificationStateMachine::handle`]
//! processes one event to completion and returns either the applied
//! transition (with the commands the driver must execute) or the reason the
//! event was ignored. Completions of external operations carry the
//! [`AttemptId`] they were issued with and are accepted only while that
//! attempt is still in flight.

use uuid::Uuid;
use vf_shared::{Channel, VerificationConfig};

use crate::domain::entities::{FlowState, VerificationSession};
use crate::domain::value_objects::SessionSnapshot;
use crate::errors::{DomainResult, VerificationError};
use crate::services::address::AddressFormatter;
use crate::services::code_entry::{CodeEntryController, EntryOutcome, SubmitMode};
use crate::services::cooldown::{CooldownTimer, TickOutcome, TimerGeneration};

use super::types::{AttemptId, FlowCommand, FlowEvent, Guard, IgnoreReason, Transition};

type Step = Result<Vec<FlowCommand>, IgnoreReason>;

/// Orchestrates address collection, dispatch, cooldown, code entry and verification
#[derive(Debug, Clone)]
pub struct VerificationStateMachine {
    config: VerificationConfig,
    session: VerificationSession,
    code_entry: CodeEntryController,
    cooldown: CooldownTimer,
    last_attempt: u64,
    in_flight: Option<AttemptId>,
    closed: bool,
    session_id: Uuid,
}

impl VerificationStateMachine {
    /// Create a machine in `collecting-address` with the configured default channel and country
    pub fn new(config: VerificationConfig) -> DomainResult<Self> {
        config.validate()?;
        let session = VerificationSession::new(config.default_channel(), config.default_country.clone());
        Ok(Self::with_session(config, session))
    }

    /// Create a machine for a code the caller already dispatched
    ///
    /// Starts in `awaiting-code` with the resend cooldown armed.
    pub fn resume(
        config: VerificationConfig,
        channel: Channel,
        address: impl Into<String>,
        country_code: impl Into<String>,
    ) -> DomainResult<Self> {
        config.validate()?;
        let session = VerificationSession::already_dispatched(channel, address, country_code);
        let mut machine = Self::with_session(config, session);
        machine.cooldown.start(machine.config.resend_cooldown_seconds);
        Ok(machine)
    }

    fn with_session(config: VerificationConfig, session: VerificationSession) -> Self {
        let code_entry = CodeEntryController::new(
            config.code_length,
            SubmitMode::from_auto_submit(config.auto_submit),
        );
        Self {
            config,
            session,
            code_entry,
            cooldown: CooldownTimer::new(),
            last_attempt: 0,
            in_flight: None,
            closed: false,
            session_id: Uuid::new_v4(),
        }
    }

    pub fn state(&self) -> FlowState {
        self.session.state()
    }

    pub fn session(&self) -> &VerificationSession {
        &self.session
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    pub fn code(&self) -> &str {
        self.code_entry.code()
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown.remaining()
    }

    /// Generation of the current cooldown arming
    pub fn cooldown_generation(&self) -> TimerGeneration {
        self.cooldown.generation()
    }

    /// Operation currently awaited, if any
    pub fn in_flight(&self) -> Option<AttemptId> {
        self.in_flight
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.session.state(),
            channel: self.session.channel(),
            address: self.session.address().to_string(),
            country_code: self.session.country_code().to_string(),
            code: self.code_entry.code().to_string(),
            code_length: self.code_entry.code_length(),
            cooldown_remaining: self.cooldown.remaining(),
            attempt_error: self.session.attempt_error().map(str::to_string),
            general_error: self.session.general_error().map(str::to_string),
            failed_attempts: self.session.failed_attempts(),
        }
    }

    /// Process one event to completion
    pub fn handle(&mut self, event: FlowEvent) -> Transition {
        let from = self.state();
        let name = event.name();

        let step = if self.closed {
            Err(IgnoreReason::Closed)
        } else {
            self.apply(event)
        };

        match step {
            Ok(commands) => {
                let to = self.state();
                if from != to {
                    tracing::info!(
                        session_id = %self.session_id,
                        event = name,
                        from = %from,
                        to = %to,
                        "Verification flow transition"
                    );
                } else {
                    tracing::trace!(
                        session_id = %self.session_id,
                        event = name,
                        state = %to,
                        "Verification flow event applied"
                    );
                }
                Transition::Applied { from, to, commands }
            }
            Err(reason) => {
                tracing::debug!(
                    session_id = %self.session_id,
                    event = name,
                    state = %from,
                    reason = ?reason,
                    "Verification flow event ignored"
                );
                Transition::Ignored(reason)
            }
        }
    }

    /// Tear the session down; pending completions and ticks become no-ops
    pub fn close(&mut self) -> Vec<FlowCommand> {
        if self.closed {
            return Vec::new();
        }

        self.closed = true;
        self.in_flight = None;
        self.cooldown.stop();

        tracing::info!(
            session_id = %self.session_id,
            event = "flow_closed",
            state = %self.state(),
            "Verification flow closed"
        );

        vec![FlowCommand::StopCooldown]
    }

    fn apply(&mut self, event: FlowEvent) -> Step {
        match event {
            FlowEvent::SelectChannel(channel) => self.select_channel(channel),
            FlowEvent::SubmitAddress {
                address,
                country_code,
            } => self.submit_address(address, country_code),
            FlowEvent::DispatchSucceeded { attempt } => self.dispatch_succeeded(attempt),
            FlowEvent::DispatchFailed { attempt, message } => self.dispatch_failed(attempt, message),
            FlowEvent::TypeDigit(c) => self.type_digit(c),
            FlowEvent::DeleteDigit => self.delete_digit(),
            FlowEvent::PasteCode(text) => self.paste_code(&text),
            FlowEvent::SubmitCode => self.submit_code(),
            FlowEvent::VerifySucceeded { attempt } => self.verify_succeeded(attempt),
            FlowEvent::VerifyFailed { attempt, message } => self.verify_failed(attempt, message),
            FlowEvent::VerifyExpired { attempt } => self.verify_expired(attempt),
            FlowEvent::Resend => self.resend(),
            FlowEvent::ChangeAddress {
                channel,
                country_code,
            } => self.change_address(channel, country_code),
            FlowEvent::Tick { generation } => self.tick(generation),
        }
    }

    fn select_channel(&mut self, channel: Channel) -> Step {
        self.expect_state(FlowState::CollectingAddress)?;
        if !self.config.is_channel_available(channel) {
            return Err(IgnoreReason::Guard(Guard::ChannelUnavailable));
        }
        self.session.set_channel(channel);
        Ok(Vec::new())
    }

    fn submit_address(&mut self, address: String, country_code: String) -> Step {
        self.expect_state(FlowState::CollectingAddress)?;

        let address = address.trim().to_string();
        if address.is_empty() {
            return Err(IgnoreReason::Guard(Guard::EmptyAddress));
        }

        let channel = self.session.channel();
        self.session.store_address(address.clone(), country_code);
        self.session.clear_errors();
        let attempt = self.begin_attempt();
        self.session.set_state(FlowState::Dispatching);

        tracing::info!(
            session_id = %self.session_id,
            event = "dispatch_requested",
            address = %AddressFormatter::mask(&address, channel),
            channel = %channel,
            attempt = %attempt,
            "Requesting verification code dispatch"
        );

        Ok(vec![FlowCommand::Dispatch {
            attempt,
            address,
            channel,
        }])
    }

    fn dispatch_succeeded(&mut self, attempt: AttemptId) -> Step {
        self.complete_attempt(attempt, FlowState::Dispatching)?;

        self.code_entry.reset();
        self.session.reset_failed_attempts();
        let seconds = self.config.resend_cooldown_seconds;
        let generation = self.cooldown.start(seconds);
        self.session.set_state(FlowState::AwaitingCode);

        if seconds > 0 {
            Ok(vec![FlowCommand::StartCooldown {
                generation,
                seconds,
            }])
        } else {
            Ok(vec![FlowCommand::StopCooldown])
        }
    }

    fn dispatch_failed(&mut self, attempt: AttemptId, message: String) -> Step {
        self.complete_attempt(attempt, FlowState::Dispatching)?;

        tracing::warn!(
            session_id = %self.session_id,
            event = "dispatch_failed",
            attempt = %attempt,
            error = %message,
            "Verification code dispatch failed"
        );

        self.session
            .set_general_error(VerificationError::DispatchFailed { message }.to_string());
        self.session.set_state(FlowState::CollectingAddress);
        Ok(Vec::new())
    }

    fn type_digit(&mut self, c: char) -> Step {
        self.expect_state(FlowState::AwaitingCode)?;
        if !c.is_ascii_digit() {
            return Err(IgnoreReason::Guard(Guard::NotADigit));
        }
        match self.code_entry.append(c) {
            EntryOutcome::Unchanged => Err(IgnoreReason::Guard(Guard::CodeFull)),
            EntryOutcome::Edited => Ok(Vec::new()),
            EntryOutcome::Completed(code) => Ok(self.code_completed(code)),
        }
    }

    fn delete_digit(&mut self) -> Step {
        self.expect_state(FlowState::AwaitingCode)?;
        match self.code_entry.remove_last() {
            EntryOutcome::Unchanged => Err(IgnoreReason::Guard(Guard::NothingToDelete)),
            _ => Ok(Vec::new()),
        }
    }

    fn paste_code(&mut self, text: &str) -> Step {
        self.expect_state(FlowState::AwaitingCode)?;
        if !text.chars().any(|c| c.is_ascii_digit()) {
            return Err(IgnoreReason::Guard(Guard::NotADigit));
        }
        match self.code_entry.fill(text) {
            EntryOutcome::Completed(code) => Ok(self.code_completed(code)),
            _ => Ok(Vec::new()),
        }
    }

    fn submit_code(&mut self) -> Step {
        self.expect_state(FlowState::AwaitingCode)?;
        if !self.code_entry.can_submit() {
            return Err(IgnoreReason::Guard(Guard::CodeIncomplete));
        }
        let code = self.code_entry.code().to_string();
        Ok(self.begin_verify(code))
    }

    /// Rising edge of buffer completion
    fn code_completed(&mut self, code: String) -> Vec<FlowCommand> {
        match self.code_entry.mode() {
            SubmitMode::Auto => self.begin_verify(code),
            SubmitMode::Manual => Vec::new(),
        }
    }

    fn begin_verify(&mut self, code: String) -> Vec<FlowCommand> {
        self.session.clear_errors();
        let attempt = self.begin_attempt();
        self.session.set_state(FlowState::Verifying);

        tracing::debug!(
            session_id = %self.session_id,
            event = "verify_requested",
            attempt = %attempt,
            "Submitting verification code"
        );

        vec![FlowCommand::Verify { attempt, code }]
    }

    fn verify_succeeded(&mut self, attempt: AttemptId) -> Step {
        self.complete_attempt(attempt, FlowState::Verifying)?;

        self.cooldown.stop();
        self.session.set_state(FlowState::Verified);

        tracing::info!(
            session_id = %self.session_id,
            event = "verified",
            address = %AddressFormatter::mask(self.session.address(), self.session.channel()),
            "Verification code accepted"
        );

        Ok(vec![FlowCommand::StopCooldown])
    }

    fn verify_failed(&mut self, attempt: AttemptId, message: String) -> Step {
        self.complete_attempt(attempt, FlowState::Verifying)?;

        self.code_entry.reset();
        let failures = self.session.record_failed_attempt();
        let exhausted = self
            .config
            .max_verify_attempts
            .map_or(false, |max| failures >= max);

        tracing::warn!(
            session_id = %self.session_id,
            event = "verify_failed",
            attempt = %attempt,
            failed_attempts = failures,
            exhausted = exhausted,
            "Verification code rejected"
        );

        if exhausted {
            self.session
                .set_general_error(VerificationError::MaxAttemptsExceeded.to_string());
            self.session.set_state(FlowState::Error);
        } else {
            self.session
                .set_attempt_error(VerificationError::VerifyInvalid { message }.to_string());
            self.session.set_state(FlowState::AwaitingCode);
        }
        Ok(Vec::new())
    }

    fn verify_expired(&mut self, attempt: AttemptId) -> Step {
        self.complete_attempt(attempt, FlowState::Verifying)?;

        self.code_entry.reset();
        self.session
            .set_general_error(VerificationError::VerifyExpired.to_string());
        self.session.set_state(FlowState::Expired);
        Ok(Vec::new())
    }

    fn resend(&mut self) -> Step {
        let state = self.state();
        if !state.allows_resend() {
            return Err(IgnoreReason::NotApplicable { state });
        }
        if self.cooldown.is_active() {
            return Err(IgnoreReason::Guard(Guard::CooldownActive {
                remaining: self.cooldown.remaining(),
            }));
        }

        self.code_entry.reset();
        self.session.clear_errors();
        let attempt = self.begin_attempt();
        let channel = self.session.channel();
        self.session.set_state(FlowState::Dispatching);

        tracing::info!(
            session_id = %self.session_id,
            event = "resend_requested",
            address = %AddressFormatter::mask(self.session.address(), channel),
            channel = %channel,
            attempt = %attempt,
            "Requesting verification code resend"
        );

        Ok(vec![FlowCommand::Resend { attempt, channel }])
    }

    fn change_address(&mut self, channel: Option<Channel>, country_code: Option<String>) -> Step {
        let state = self.state();
        if state.is_terminal() {
            return Err(IgnoreReason::NotApplicable { state });
        }
        if let Some(channel) = channel {
            if !self.config.is_channel_available(channel) {
                return Err(IgnoreReason::Guard(Guard::ChannelUnavailable));
            }
        }

        if let Some(attempt) = self.in_flight.take() {
            tracing::debug!(
                session_id = %self.session_id,
                attempt = %attempt,
                "Abandoning in-flight operation"
            );
        }
        self.cooldown.stop();
        self.code_entry.reset();
        self.session.reset(channel, country_code);
        Ok(vec![FlowCommand::StopCooldown])
    }

    fn tick(&mut self, generation: TimerGeneration) -> Step {
        match self.cooldown.tick(generation) {
            TickOutcome::Stale => Err(IgnoreReason::Stale),
            TickOutcome::Counted { .. } => Ok(Vec::new()),
            TickOutcome::Finished => Ok(vec![FlowCommand::StopCooldown]),
        }
    }

    fn expect_state(&self, expected: FlowState) -> Result<(), IgnoreReason> {
        let state = self.state();
        if state == expected {
            Ok(())
        } else {
            Err(IgnoreReason::NotApplicable { state })
        }
    }

    fn begin_attempt(&mut self) -> AttemptId {
        self.last_attempt += 1;
        let attempt = AttemptId(self.last_attempt);
        self.in_flight = Some(attempt);
        attempt
    }

    /// Accept a completion only for the operation currently in flight
    fn complete_attempt(&mut self, attempt: AttemptId, expected: FlowState) -> Result<(), IgnoreReason> {
        if self.state() != expected || self.in_flight != Some(attempt) {
            return Err(IgnoreReason::Stale);
        }
        self.in_flight = None;
        Ok(())
    }
}
