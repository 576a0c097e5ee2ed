//! Mock implementations for testing the verification flow

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vf_shared::Channel;

use crate::domain::entities::FlowState;
use crate::domain::value_objects::SessionSnapshot;
use crate::services::verification::{FlowObserver, VerificationGateway, VerifyOutcome};

/// A gateway operation as the flow invoked it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Dispatch { address: String, channel: Channel },
    Verify { code: String },
    Resend { channel: Channel },
}

/// Gateway answering from scripted queues
///
/// Empty queues answer success (`Ok(())` / `Valid`).
pub struct MockGateway {
    pub calls: Arc<Mutex<Vec<GatewayCall>>>,
    dispatch_results: Mutex<VecDeque<Result<(), String>>>,
    resend_results: Mutex<VecDeque<Result<(), String>>>,
    verify_results: Mutex<VecDeque<Result<VerifyOutcome, String>>>,
    delay: Option<Duration>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            dispatch_results: Mutex::new(VecDeque::new()),
            resend_results: Mutex::new(VecDeque::new()),
            verify_results: Mutex::new(VecDeque::new()),
            delay: None,
        }
    }

    /// Every operation sleeps this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_dispatch(&self, result: Result<(), String>) {
        self.dispatch_results.lock().unwrap().push_back(result);
    }

    pub fn push_resend(&self, result: Result<(), String>) {
        self.resend_results.lock().unwrap().push_back(result);
    }

    pub fn push_verify(&self, result: Result<VerifyOutcome, String>) {
        self.verify_results.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn verify_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::Verify { code } => Some(code),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&GatewayCall) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl VerificationGateway for MockGateway {
    async fn dispatch_code(&self, address: &str, channel: Channel) -> Result<(), String> {
        self.calls.lock().unwrap().push(GatewayCall::Dispatch {
            address: address.to_string(),
            channel,
        });
        self.pause().await;
        self.dispatch_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn verify_code(&self, code: &str) -> Result<VerifyOutcome, String> {
        self.calls.lock().unwrap().push(GatewayCall::Verify {
            code: code.to_string(),
        });
        self.pause().await;
        self.verify_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(VerifyOutcome::Valid))
    }

    async fn resend_code(&self, channel: Channel) -> Result<(), String> {
        self.calls.lock().unwrap().push(GatewayCall::Resend { channel });
        self.pause().await;
        self.resend_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// Observer recording every callback
#[derive(Default)]
pub struct RecordingObserver {
    pub states: Mutex<Vec<FlowState>>,
    pub snapshots: Mutex<Vec<SessionSnapshot>>,
    pub verified: AtomicUsize,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> Vec<FlowState> {
        self.states.lock().unwrap().clone()
    }

    pub fn last_snapshot(&self) -> Option<SessionSnapshot> {
        self.snapshots.lock().unwrap().last().cloned()
    }

    pub fn verified_count(&self) -> usize {
        self.verified.load(Ordering::SeqCst)
    }
}

impl FlowObserver for RecordingObserver {
    fn on_state_change(&self, state: FlowState, snapshot: &SessionSnapshot) {
        self.states.lock().unwrap().push(state);
        self.snapshots.lock().unwrap().push(snapshot.clone());
    }

    fn on_verified(&self) {
        self.verified.fetch_add(1, Ordering::SeqCst);
    }
}
