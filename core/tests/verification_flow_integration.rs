//! Integration tests for the verification flow through the public API

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use vf_core::{
        FlowObserver, FlowState, SessionSnapshot, VerificationFlow, VerificationGateway,
        VerifyOutcome, ViewKind,
    };
    use vf_shared::{Channel, VerificationConfig};

    /// Gateway that accepts a single known code
    struct FixedCodeGateway {
        code: String,
        sent_to: Mutex<Vec<String>>,
    }

    impl FixedCodeGateway {
        fn new(code: &str) -> Self {
            Self {
                code: code.to_string(),
                sent_to: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VerificationGateway for FixedCodeGateway {
        async fn dispatch_code(&self, address: &str, _channel: Channel) -> Result<(), String> {
            self.sent_to.lock().unwrap().push(address.to_string());
            Ok(())
        }

        async fn verify_code(&self, code: &str) -> Result<VerifyOutcome, String> {
            if code == self.code {
                Ok(VerifyOutcome::Valid)
            } else {
                Ok(VerifyOutcome::Invalid {
                    message: Some("That code is not right".to_string()),
                })
            }
        }

        async fn resend_code(&self, _channel: Channel) -> Result<(), String> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingObserver {
        changes: AtomicUsize,
        verified: AtomicUsize,
    }

    impl FlowObserver for CountingObserver {
        fn on_state_change(&self, _state: FlowState, _snapshot: &SessionSnapshot) {
            self.changes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_verified(&self) {
            self.verified.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_email_flow_with_one_wrong_code() {
        let gateway = Arc::new(FixedCodeGateway::new("424242"));
        let observer = Arc::new(CountingObserver::default());
        let mut flow =
            VerificationFlow::new(VerificationConfig::default(), gateway.clone(), observer.clone())
                .unwrap();

        assert_eq!(flow.view_model().view, ViewKind::AddressForm);
        flow.submit_address("  Someone@Example.com ", "US").unwrap();
        assert!(flow.view_model().busy);
        assert_eq!(flow.run_until_idle().await, FlowState::AwaitingCode);
        assert_eq!(
            gateway.sent_to.lock().unwrap().as_slice(),
            &["someone@example.com".to_string()]
        );

        flow.paste_code("111111");
        assert_eq!(flow.run_until_idle().await, FlowState::AwaitingCode);
        assert_eq!(
            flow.view_model().message.as_deref(),
            Some("That code is not right")
        );

        flow.paste_code("424242");
        assert_eq!(flow.run_until_idle().await, FlowState::Verified);
        assert_eq!(observer.verified.load(Ordering::SeqCst), 1);
        assert!(observer.changes.load(Ordering::SeqCst) >= 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_follows_wall_clock() {
        let config = VerificationConfig {
            resend_cooldown_seconds: 5,
            ..VerificationConfig::default()
        };
        let gateway = Arc::new(FixedCodeGateway::new("000000"));
        let mut flow =
            VerificationFlow::new(config, gateway, Arc::new(CountingObserver::default())).unwrap();

        flow.select_channel(Channel::Sms);
        flow.submit_address("(555) 123-4567", "US").unwrap();
        flow.run_until_idle().await;
        assert_eq!(flow.view_model().resend_countdown, 5);
        assert!(!flow.view_model().can_resend);

        tokio::time::sleep(Duration::from_millis(5500)).await;
        while flow.try_step().is_some() {}

        let model = flow.view_model();
        assert_eq!(model.resend_countdown, 0);
        assert!(model.can_resend);
        assert_eq!(model.display_address, "********4567");
    }
}
