//! Example walking one verification flow end to end
//!
//! Uses an in-memory gateway that "delivers" a fixed code, so no provider
//! account is needed.
//!
//! Run with: cargo run --example verification_flow_demo

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use vf_core::{FlowObserver, FlowState, SessionSnapshot, VerificationFlow, VerificationGateway, VerifyOutcome};
use vf_shared::{init_tracing, AppConfig, Channel};

const DEMO_CODE: &str = "314159";

/// Gateway standing in for an SMS/email provider
struct InMemoryGateway;

#[async_trait]
impl VerificationGateway for InMemoryGateway {
    async fn dispatch_code(&self, address: &str, channel: Channel) -> Result<(), String> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        println!("  [{}] code {} sent to {}", channel, DEMO_CODE, address);
        Ok(())
    }

    async fn verify_code(&self, code: &str) -> Result<VerifyOutcome, String> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if code == DEMO_CODE {
            Ok(VerifyOutcome::Valid)
        } else {
            Ok(VerifyOutcome::Invalid { message: None })
        }
    }

    async fn resend_code(&self, channel: Channel) -> Result<(), String> {
        println!("  [{}] code {} re-sent", channel, DEMO_CODE);
        Ok(())
    }
}

/// Observer printing each state the host would render
struct ConsoleObserver;

impl FlowObserver for ConsoleObserver {
    fn on_state_change(&self, state: FlowState, snapshot: &SessionSnapshot) {
        println!(
            "  state={} code={:?} cooldown={}s",
            state, snapshot.code, snapshot.cooldown_remaining
        );
    }

    fn on_verified(&self) {
        println!("  verified!");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(&config.logging)?;

    println!("=== Verification flow demo ({}) ===\n", config.environment);

    let mut flow = VerificationFlow::new(
        config.verification,
        Arc::new(InMemoryGateway),
        Arc::new(ConsoleObserver),
    )?;

    println!("1. Submitting a phone number");
    flow.select_channel(Channel::Sms);
    println!("   formatted: {}", flow.formatter().format("5551234567", "US"));
    flow.submit_address("(555) 123-4567", "US")?;
    flow.run_until_idle().await;

    println!("\n2. Typing a wrong code");
    flow.paste_code("000000");
    flow.run_until_idle().await;
    println!("   message: {:?}", flow.view_model().message);

    println!("\n3. Letting the cooldown run for a few seconds");
    tokio::time::sleep(Duration::from_millis(3100)).await;
    while flow.try_step().is_some() {}
    println!("   resend available in {}s", flow.view_model().resend_countdown);

    println!("\n4. Typing the right code");
    for digit in DEMO_CODE.chars() {
        flow.type_digit(digit);
    }
    let state = flow.run_until_idle().await;
    println!("\n=== Finished in state {} ===", state);

    flow.close();
    Ok(())
}
