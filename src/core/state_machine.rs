//! Submission state machine
//!
//! Allowed edges:
//!
//! ```text
//! Idle -> Validating -> Submitting -> Succeeded | Failed
//! any  -> Idle
//! ```
//!
//! The state lives behind a shared handle so that notification expiry timers
//! can settle a terminal state back to `Idle`.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::core::models::{AppError, AppResult, SubmissionState};

#[derive(Debug, Clone)]
pub struct SubmissionStateMachine {
    state: Arc<Mutex<SubmissionState>>,
}

impl Default for SubmissionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionStateMachine {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubmissionState::Idle)),
        }
    }

    pub fn current(&self) -> SubmissionState {
        *self.state.lock()
    }

    pub fn can_transition(from: SubmissionState, to: SubmissionState) -> bool {
        use SubmissionState::*;

        matches!(
            (from, to),
            (_, Idle)
                | (Idle, Validating)
                | (Validating, Submitting)
                | (Submitting, Succeeded)
                | (Submitting, Failed(_))
        )
    }

    pub fn transition(&self, to: SubmissionState) -> AppResult<()> {
        let mut state = self.state.lock();
        let from = *state;
        if !Self::can_transition(from, to) {
            return Err(AppError::InvalidTransition { from, to });
        }
        if from != to {
            debug!("Submission state {} -> {}", from, to);
        }
        *state = to;
        Ok(())
    }

    /// Unconditional return to `Idle`, returning the previous state
    pub fn reset(&self) -> SubmissionState {
        let mut state = self.state.lock();
        let previous = *state;
        if previous != SubmissionState::Idle {
            debug!("Submission state {} -> idle", previous);
        }
        *state = SubmissionState::Idle;
        previous
    }

    /// Return to `Idle` only if the current state is terminal. Used by
    /// notification expiry, which must not clobber a newer submission.
    pub fn settle(&self) -> bool {
        let mut state = self.state.lock();
        if state.is_terminal() {
            debug!("Submission state {} -> idle (settled)", *state);
            *state = SubmissionState::Idle;
            true
        } else {
            false
        }
    }
}
