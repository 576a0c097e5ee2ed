//! Resend cooldown countdown

use serde::Serialize;

/// Identifies one arming of a `CooldownTimer`
///
/// Every `start` and `stop` produces a new generation; ticks carrying an older
/// generation are ignored, so a ticker left over from a previous arming can
/// never decrement the current countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimerGeneration(u64);

impl TimerGeneration {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a single one-second tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown decremented and is still running
    Counted { remaining: u32 },
    /// Countdown reached zero on this tick
    Finished,
    /// Tick belongs to an old generation or the timer is idle
    Stale,
}

/// A single countdown value gating the resend action
///
/// The timer owns no clock. Its owner feeds it one `tick` per elapsed second
/// (see the flow driver) and cancels by calling `stop`.
#[derive(Debug, Clone, Default)]
pub struct CooldownTimer {
    remaining: u32,
    generation: u64,
}

impl CooldownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer, replacing any running countdown
    pub fn start(&mut self, seconds: u32) -> TimerGeneration {
        self.generation += 1;
        self.remaining = seconds;
        TimerGeneration(self.generation)
    }

    /// Halt the countdown and invalidate outstanding ticks
    pub fn stop(&mut self) {
        self.generation += 1;
        self.remaining = 0;
    }

    /// Advance by one second if `generation` is the live arming
    pub fn tick(&mut self, generation: TimerGeneration) -> TickOutcome {
        if generation.0 != self.generation || self.remaining == 0 {
            return TickOutcome::Stale;
        }

        self.remaining -= 1;
        if self.remaining == 0 {
            TickOutcome::Finished
        } else {
            TickOutcome::Counted {
                remaining: self.remaining,
            }
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Generation of the current arming
    pub fn generation(&self) -> TimerGeneration {
        TimerGeneration(self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_to_zero() {
        let mut timer = CooldownTimer::new();
        let generation = timer.start(3);
        assert!(timer.is_active());

        assert_eq!(timer.tick(generation), TickOutcome::Counted { remaining: 2 });
        assert_eq!(timer.tick(generation), TickOutcome::Counted { remaining: 1 });
        assert_eq!(timer.tick(generation), TickOutcome::Finished);
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_active());

        // Never goes below zero
        assert_eq!(timer.tick(generation), TickOutcome::Stale);
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn test_start_then_s_ticks_reaches_zero() {
        for seconds in [1u32, 2, 5, 60] {
            let mut timer = CooldownTimer::new();
            let generation = timer.start(seconds);
            for _ in 0..seconds {
                timer.tick(generation);
            }
            assert_eq!(timer.remaining(), 0, "start({seconds}) + {seconds} ticks");
        }
    }

    #[test]
    fn test_rearm_resets_instead_of_stacking() {
        let mut timer = CooldownTimer::new();
        let first = timer.start(60);
        timer.tick(first);
        timer.tick(first);
        assert_eq!(timer.remaining(), 58);

        let second = timer.start(30);
        assert_eq!(timer.remaining(), 30);
        assert_ne!(first, second);

        // Ticks from the previous arming are ignored
        assert_eq!(timer.tick(first), TickOutcome::Stale);
        assert_eq!(timer.remaining(), 30);
        assert_eq!(timer.tick(second), TickOutcome::Counted { remaining: 29 });
    }

    #[test]
    fn test_stop_cancels_outstanding_ticks() {
        let mut timer = CooldownTimer::new();
        let generation = timer.start(10);
        timer.stop();
        assert_eq!(timer.remaining(), 0);
        assert_eq!(timer.tick(generation), TickOutcome::Stale);
        assert_ne!(timer.generation(), generation);
    }

    #[test]
    fn test_start_zero_is_inactive() {
        let mut timer = CooldownTimer::new();
        let generation = timer.start(0);
        assert!(!timer.is_active());
        assert_eq!(timer.tick(generation), TickOutcome::Stale);
    }
}
