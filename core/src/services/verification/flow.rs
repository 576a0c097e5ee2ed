//! Async driver around the verification state machine
//!
//! `VerificationFlow` owns the machine plus the resources it needs at runtime:
//! an event queue, the one-second cooldown ticker and the tasks running
//! gateway operations. Host input is applied immediately; completions and
//! ticks are queued and applied one at a time by [`VerificationFlow::step`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use uuid::Uuid;
use vf_shared::{Channel, VerificationConfig};

use crate::domain::entities::FlowState;
use crate::domain::value_objects::{SessionSnapshot, ViewModel};
use crate::errors::{DomainResult, VerificationError, VerificationResult};
use crate::services::address::AddressFormatter;
use crate::services::cooldown::TimerGeneration;
use crate::services::presentation;

use super::state_machine::VerificationStateMachine;
use super::traits::{FlowObserver, NoopObserver, VerificationGateway};
use super::types::{FlowCommand, FlowEvent, Transition, VerifyOutcome};

/// Message used when the gateway rejects a code without explanation
pub const DEFAULT_INVALID_CODE_MESSAGE: &str = "Invalid verification code";

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A running verification flow
///
/// Must be created and used inside a Tokio runtime. Dropping the flow has the
/// same effect as [`close`](Self::close).
pub struct VerificationFlow<G, O = NoopObserver>
where
    G: VerificationGateway + 'static,
    O: FlowObserver + 'static,
{
    machine: VerificationStateMachine,
    formatter: AddressFormatter,
    gateway: Arc<G>,
    observer: Arc<O>,
    events_tx: mpsc::UnboundedSender<FlowEvent>,
    events_rx: mpsc::UnboundedReceiver<FlowEvent>,
    ticker: Option<JoinHandle<()>>,
    operations: Vec<JoinHandle<()>>,
}

impl<G, O> VerificationFlow<G, O>
where
    G: VerificationGateway + 'static,
    O: FlowObserver + 'static,
{
    /// Start a flow in `collecting-address`
    pub fn new(config: VerificationConfig, gateway: Arc<G>, observer: Arc<O>) -> DomainResult<Self> {
        let formatter = AddressFormatter::from_config(&config);
        let machine = VerificationStateMachine::new(config)?;
        Ok(Self::with_machine(machine, formatter, gateway, observer))
    }

    /// Start a flow for a code the caller already dispatched
    pub fn resume(
        config: VerificationConfig,
        gateway: Arc<G>,
        observer: Arc<O>,
        channel: Channel,
        address: impl Into<String>,
        country_code: impl Into<String>,
    ) -> DomainResult<Self> {
        let formatter = AddressFormatter::from_config(&config);
        let machine = VerificationStateMachine::resume(config, channel, address, country_code)?;
        let mut flow = Self::with_machine(machine, formatter, gateway, observer);

        let remaining = flow.machine.cooldown_remaining();
        if remaining > 0 {
            let generation = flow.machine.cooldown_generation();
            flow.start_ticker(generation, remaining);
        }
        Ok(flow)
    }

    fn with_machine(
        machine: VerificationStateMachine,
        formatter: AddressFormatter,
        gateway: Arc<G>,
        observer: Arc<O>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        tracing::info!(
            session_id = %machine.session_id(),
            event = "flow_started",
            state = %machine.state(),
            "Verification flow started"
        );
        Self {
            machine,
            formatter,
            gateway,
            observer,
            events_tx,
            events_rx,
            ticker: None,
            operations: Vec::new(),
        }
    }

    pub fn state(&self) -> FlowState {
        self.machine.state()
    }

    pub fn session_id(&self) -> Uuid {
        self.machine.session_id()
    }

    pub fn machine(&self) -> &VerificationStateMachine {
        &self.machine
    }

    pub fn formatter(&self) -> &AddressFormatter {
        &self.formatter
    }

    pub fn is_closed(&self) -> bool {
        self.machine.is_closed()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.machine.snapshot()
    }

    /// Render-ready view of the current session
    pub fn view_model(&self) -> ViewModel {
        presentation::present(&self.machine.snapshot(), &self.formatter, self.machine.config())
    }

    pub fn select_channel(&mut self, channel: Channel) -> Transition {
        self.apply(FlowEvent::SelectChannel(channel))
    }

    /// Validate and submit the delivery address
    ///
    /// An invalid address is reported to the caller and leaves the session
    /// untouched.
    pub fn submit_address(&mut self, raw: &str, country_code: &str) -> VerificationResult<Transition> {
        self.ensure_open()?;

        let address = if self.machine.state() == FlowState::CollectingAddress {
            let channel = self.machine.session().channel();
            self.formatter
                .validate(raw, channel, country_code)
                .map_err(|e| {
                    tracing::debug!(
                        session_id = %self.machine.session_id(),
                        event = "address_rejected",
                        channel = %channel,
                        error = %e,
                        "Address failed local validation"
                    );
                    e
                })?
        } else {
            raw.to_string()
        };

        Ok(self.apply(FlowEvent::SubmitAddress {
            address,
            country_code: country_code.to_string(),
        }))
    }

    pub fn type_digit(&mut self, c: char) -> Transition {
        self.apply(FlowEvent::TypeDigit(c))
    }

    pub fn delete_digit(&mut self) -> Transition {
        self.apply(FlowEvent::DeleteDigit)
    }

    pub fn paste_code(&mut self, text: &str) -> Transition {
        self.apply(FlowEvent::PasteCode(text.to_string()))
    }

    pub fn submit_code(&mut self) -> Transition {
        self.apply(FlowEvent::SubmitCode)
    }

    pub fn resend(&mut self) -> Transition {
        self.apply(FlowEvent::Resend)
    }

    /// Return to address collection, optionally switching channel or country
    pub fn change_address(&mut self, channel: Option<Channel>, country_code: Option<String>) -> Transition {
        self.apply(FlowEvent::ChangeAddress {
            channel,
            country_code,
        })
    }

    /// Feed one event through the machine and execute its commands
    pub fn apply(&mut self, event: FlowEvent) -> Transition {
        let transition = self.machine.handle(event);

        if let Transition::Applied { from, to, commands } = &transition {
            for command in commands {
                self.execute(command.clone());
            }
            self.notify(*from, *to);
        }

        transition
    }

    /// Wait for the next queued completion or tick and apply it
    ///
    /// Returns `None` once the flow is closed and the queue is drained.
    pub async fn step(&mut self) -> Option<Transition> {
        if self.machine.is_closed() {
            return self.try_step();
        }
        let event = self.events_rx.recv().await?;
        Some(self.apply(event))
    }

    /// Apply the next queued event if one is ready
    pub fn try_step(&mut self) -> Option<Transition> {
        let event = self.events_rx.try_recv().ok()?;
        Some(self.apply(event))
    }

    /// Step until no dispatch or verify is in flight
    pub async fn run_until_idle(&mut self) -> FlowState {
        while self.machine.state().is_busy() {
            if self.step().await.is_none() {
                break;
            }
        }
        self.machine.state()
    }

    /// Tear the flow down
    ///
    /// Stops the ticker and abandons in-flight operations; their completions
    /// are ignored. Idempotent.
    pub fn close(&mut self) {
        if self.machine.is_closed() {
            return;
        }
        for command in self.machine.close() {
            self.execute(command);
        }
        for operation in self.operations.drain(..) {
            operation.abort();
        }
    }

    fn ensure_open(&self) -> VerificationResult<()> {
        if self.machine.is_closed() {
            Err(VerificationError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn notify(&self, from: FlowState, to: FlowState) {
        let snapshot = self.machine.snapshot();
        self.observer.on_state_change(to, &snapshot);
        if to == FlowState::Verified && from != FlowState::Verified {
            self.observer.on_verified();
        }
    }

    fn execute(&mut self, command: FlowCommand) {
        match command {
            FlowCommand::Dispatch {
                attempt,
                address,
                channel,
            } => {
                let gateway = Arc::clone(&self.gateway);
                self.spawn_operation(async move {
                    match gateway.dispatch_code(&address, channel).await {
                        Ok(()) => FlowEvent::DispatchSucceeded { attempt },
                        Err(message) => FlowEvent::DispatchFailed { attempt, message },
                    }
                });
            }
            FlowCommand::Resend { attempt, channel } => {
                let gateway = Arc::clone(&self.gateway);
                self.spawn_operation(async move {
                    match gateway.resend_code(channel).await {
                        Ok(()) => FlowEvent::DispatchSucceeded { attempt },
                        Err(message) => FlowEvent::DispatchFailed { attempt, message },
                    }
                });
            }
            FlowCommand::Verify { attempt, code } => {
                let gateway = Arc::clone(&self.gateway);
                self.spawn_operation(async move {
                    match gateway.verify_code(&code).await {
                        Ok(VerifyOutcome::Valid) => FlowEvent::VerifySucceeded { attempt },
                        Ok(VerifyOutcome::Invalid { message }) => FlowEvent::VerifyFailed {
                            attempt,
                            message: message
                                .unwrap_or_else(|| DEFAULT_INVALID_CODE_MESSAGE.to_string()),
                        },
                        Ok(VerifyOutcome::Expired) => FlowEvent::VerifyExpired { attempt },
                        Err(message) => {
                            tracing::warn!(
                                attempt = %attempt,
                                error = %message,
                                "Verify operation failed, treating as invalid code"
                            );
                            FlowEvent::VerifyFailed { attempt, message }
                        }
                    }
                });
            }
            FlowCommand::StartCooldown {
                generation,
                seconds,
            } => self.start_ticker(generation, seconds),
            FlowCommand::StopCooldown => self.stop_ticker(),
        }
    }

    fn spawn_operation<F>(&mut self, operation: F)
    where
        F: Future<Output = FlowEvent> + Send + 'static,
    {
        self.operations.retain(|handle| !handle.is_finished());

        let events_tx = self.events_tx.clone();
        self.operations.push(tokio::spawn(async move {
            let event = operation.await;
            // Receiver is gone only when the flow was dropped
            let _ = events_tx.send(event);
        }));
    }

    /// Post one tick per second for `seconds` seconds, first tick one second from now
    fn start_ticker(&mut self, generation: TimerGeneration, seconds: u32) {
        self.stop_ticker();

        let events_tx = self.events_tx.clone();
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            for _ in 0..seconds {
                interval.tick().await;
                if events_tx.send(FlowEvent::Tick { generation }).is_err() {
                    break;
                }
            }
        }));

        tracing::debug!(
            session_id = %self.machine.session_id(),
            generation = %generation,
            seconds = seconds,
            "Cooldown ticker started"
        );
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl<G, O> Drop for VerificationFlow<G, O>
where
    G: VerificationGateway + 'static,
    O: FlowObserver + 'static,
{
    fn drop(&mut self) {
        self.close();
    }
}
