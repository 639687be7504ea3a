//! Submission state machine

use crate::error::ModalError;
use serde::{Deserialize, Serialize};

/// Lifecycle of one submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    /// Nothing in flight
    #[default]
    Idle,
    /// Values captured, validator running
    Validating,
    /// Validation produced errors
    Rejected,
    /// Gateway call in flight
    Submitting,
    /// Gateway accepted the registration
    Succeeded,
    /// Gateway call failed
    Failed,
    /// The modal closed while the call was in flight
    Cancelled,
}

impl SubmissionState {
    /// No transition leaves this state
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        allowed_transitions(self).is_empty()
    }
}

/// Check a transition against the table
pub fn validate_transition(from: SubmissionState, to: SubmissionState) -> Result<(), ModalError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(ModalError::IllegalTransition { from, to })
    }
}

/// States reachable in one step from `from`
#[must_use]
pub fn allowed_transitions(from: SubmissionState) -> Vec<SubmissionState> {
    use SubmissionState::*;
    match from {
        Idle => vec![Validating],
        Validating => vec![Rejected, Submitting],
        Rejected => vec![Validating],
        Submitting => vec![Succeeded, Failed, Cancelled],
        Failed => vec![Idle],
        Succeeded | Cancelled => vec![],
    }
}

/// Current state plus the path that led to it
#[derive(Debug, Clone)]
pub struct SubmissionTracker {
    state: SubmissionState,
    history: Vec<SubmissionState>,
}

impl SubmissionTracker {
    /// Tracker in `Idle`
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SubmissionState::Idle,
            history: vec![SubmissionState::Idle],
        }
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Every state visited, oldest first
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[SubmissionState] {
        &self.history
    }

    /// Move to `to` if the table allows it
    pub fn transition(&mut self, to: SubmissionState) -> Result<(), ModalError> {
        validate_transition(self.state, to)?;
        tracing::debug!(from = ?self.state, to = ?to, "Submission transition");
        self.state = to;
        self.history.push(to);
        Ok(())
    }
}

impl Default for SubmissionTracker {
    fn default() -> Self {
        Self::new()
    }
}
