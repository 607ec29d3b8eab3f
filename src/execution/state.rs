use log::error;
use serde::Serialize;
use std::fmt;

use crate::logging::log_transition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExecutionState {
    Validating,
    DepositPending,
    Submitting,
    Submitted,
    Confirming,
    Confirmed,
    /// Order placed, status could not be read back.
    Unknown,
    Failed,
}

impl ExecutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionState::Confirmed | ExecutionState::Unknown | ExecutionState::Failed
        )
    }

    pub fn can_transition_to(&self, next: ExecutionState) -> bool {
        use ExecutionState::*;

        matches!(
            (self, next),
            (Validating, DepositPending)
                | (Validating, Failed)
                | (DepositPending, Submitting)
                | (DepositPending, Failed)
                | (Submitting, Submitted)
                | (Submitting, Failed)
                | (Submitted, Confirming)
                | (Confirming, Confirmed)
                | (Confirming, Unknown)
        )
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Every state one execution passed through, in order.
#[derive(Debug, Clone)]
pub struct StateTrail {
    states: Vec<ExecutionState>,
}

impl StateTrail {
    pub fn new() -> Self {
        Self {
            states: vec![ExecutionState::Validating],
        }
    }

    pub fn current(&self) -> ExecutionState {
        // never empty: starts at Validating
        self.states[self.states.len() - 1]
    }

    pub fn advance(&mut self, next: ExecutionState) {
        let current = self.current();
        if !current.can_transition_to(next) {
            error!("illegal execution transition {} -> {}", current, next);
            debug_assert!(false, "illegal execution transition {current} -> {next}");
        }
        log_transition(current, next);
        self.states.push(next);
    }

    pub fn into_states(self) -> Vec<ExecutionState> {
        self.states
    }
}

impl Default for StateTrail {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::ExecutionState::*;
    use super::*;

    #[test]
    fn happy_path_is_legal() {
        let mut trail = StateTrail::new();
        for next in [DepositPending, Submitting, Submitted, Confirming, Confirmed] {
            trail.advance(next);
        }
        assert!(trail.current().is_terminal());
        assert_eq!(trail.into_states().len(), 6);
    }

    #[test]
    fn failures_only_before_submission() {
        assert!(Validating.can_transition_to(Failed));
        assert!(DepositPending.can_transition_to(Failed));
        assert!(Submitting.can_transition_to(Failed));
        assert!(!Submitted.can_transition_to(Failed));
        assert!(!Confirming.can_transition_to(Failed));
    }

    #[test]
    fn terminal_states_are_final() {
        for terminal in [Confirmed, Unknown, Failed] {
            for next in [
                Validating,
                DepositPending,
                Submitting,
                Submitted,
                Confirming,
                Confirmed,
                Unknown,
                Failed,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn deposits_cannot_be_skipped() {
        assert!(!Validating.can_transition_to(Submitting));
        assert!(!DepositPending.can_transition_to(Submitted));
    }
}
