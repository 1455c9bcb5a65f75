//! Circuit breaker guarding calls to the AI service

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    /// Calls flow normally
    Closed,
    /// Calls are rejected until the reset timeout elapses
    Open,
    /// One trial call is allowed through; others are rejected until it reports
    HalfOpen,
}

#[derive(Debug, Clone)]
struct Circuit {
    state: BreakerState,
    consecutive_failures: usize,
    opened_at: Option<Instant>,
    trial_started: Option<Instant>,
}

impl Default for Circuit {
    fn default() -> Self {
        Self {
            state: BreakerState::Closed,
            consecutive_failures: 0,
            opened_at: None,
            trial_started: None,
        }
    }
}

/// Per-operation breaker; failures on one operation do not trip another
#[derive(Debug)]
pub struct CircuitBreaker {
    circuits: Mutex<HashMap<String, Circuit>>,
    failure_threshold: usize,
    reset_timeout: Duration,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: usize, reset_timeout: Duration) -> Self {
        Self {
            circuits: Mutex::new(HashMap::new()),
            failure_threshold: failure_threshold.max(1),
            reset_timeout,
        }
    }

    // A poisoned lock only means another thread panicked mid-update; the
    // counters are still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Circuit>> {
        self.circuits.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether calls for `operation` should be rejected right now.
    ///
    /// An open circuit past its reset timeout moves to half-open and lets the
    /// caller through as the single trial. A trial that never reports back
    /// is abandoned after another reset timeout.
    pub fn is_open(&self, operation: &str) -> bool {
        let mut circuits = self.lock();
        let circuit = circuits.entry(operation.to_string()).or_default();

        match circuit.state {
            BreakerState::Closed => false,
            BreakerState::Open => match circuit.opened_at {
                Some(opened) if opened.elapsed() >= self.reset_timeout => {
                    circuit.state = BreakerState::HalfOpen;
                    circuit.trial_started = Some(Instant::now());
                    false
                }
                _ => true,
            },
            BreakerState::HalfOpen => match circuit.trial_started {
                Some(started) if started.elapsed() < self.reset_timeout => true,
                _ => {
                    circuit.trial_started = Some(Instant::now());
                    false
                }
            },
        }
    }

    pub fn mark_success(&self, operation: &str) {
        let mut circuits = self.lock();
        circuits.insert(operation.to_string(), Circuit::default());
    }

    pub fn mark_failure(&self, operation: &str) {
        let mut circuits = self.lock();
        let circuit = circuits.entry(operation.to_string()).or_default();

        circuit.consecutive_failures += 1;

        // A failed trial call reopens immediately
        if circuit.state == BreakerState::HalfOpen
            || circuit.consecutive_failures >= self.failure_threshold
        {
            circuit.state = BreakerState::Open;
            circuit.opened_at = Some(Instant::now());
            circuit.trial_started = None;
        }
    }

    pub fn state(&self, operation: &str) -> BreakerState {
        self.lock()
            .get(operation)
            .map(|c| c.state)
            .unwrap_or(BreakerState::Closed)
    }

    pub fn failure_count(&self, operation: &str) -> usize {
        self.lock()
            .get(operation)
            .map(|c| c.consecutive_failures)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_by_default() {
        let breaker = CircuitBreaker::new(3, Duration::from_secs(30));
        assert!(!breaker.is_open("analyze"));
        assert_eq!(breaker.state("analyze"), BreakerState::Closed);
    }

    #[test]
    fn test_opens_after_threshold() {
        let breaker = CircuitBreaker::new(3, Duration::from_secs(30));

        breaker.mark_failure("analyze");
        breaker.mark_failure("analyze");
        assert!(!breaker.is_open("analyze"));

        breaker.mark_failure("analyze");
        assert!(breaker.is_open("analyze"));
        assert_eq!(breaker.state("analyze"), BreakerState::Open);

        // Other operations are unaffected
        assert!(!breaker.is_open("other"));
    }

    #[test]
    fn test_success_resets_failures() {
        let breaker = CircuitBreaker::new(3, Duration::from_secs(30));
        breaker.mark_failure("analyze");
        breaker.mark_failure("analyze");
        breaker.mark_success("analyze");

        assert_eq!(breaker.failure_count("analyze"), 0);
        assert_eq!(breaker.state("analyze"), BreakerState::Closed);
    }

    #[test]
    fn test_half_open_after_timeout() {
        let breaker = CircuitBreaker::new(2, Duration::from_millis(50));
        breaker.mark_failure("analyze");
        breaker.mark_failure("analyze");
        assert!(breaker.is_open("analyze"));

        std::thread::sleep(Duration::from_millis(80));

        assert!(!breaker.is_open("analyze"));
        assert_eq!(breaker.state("analyze"), BreakerState::HalfOpen);

        // Failed trial reopens
        breaker.mark_failure("analyze");
        assert!(breaker.is_open("analyze"));
    }

    #[test]
    fn test_half_open_admits_single_trial() {
        let breaker = CircuitBreaker::new(1, Duration::from_millis(50));
        breaker.mark_failure("analyze");
        std::thread::sleep(Duration::from_millis(80));

        assert!(!breaker.is_open("analyze"));
        // A second caller waits for the trial's outcome
        assert!(breaker.is_open("analyze"));
        assert_eq!(breaker.state("analyze"), BreakerState::HalfOpen);

        breaker.mark_success("analyze");
        assert!(!breaker.is_open("analyze"));
        assert!(!breaker.is_open("analyze"));
    }

    #[test]
    fn test_abandoned_trial_is_replaced() {
        let breaker = CircuitBreaker::new(1, Duration::from_millis(50));
        breaker.mark_failure("analyze");
        std::thread::sleep(Duration::from_millis(80));

        assert!(!breaker.is_open("analyze"));
        assert!(breaker.is_open("analyze"));

        std::thread::sleep(Duration::from_millis(80));
        assert!(!breaker.is_open("analyze"));
    }
}
