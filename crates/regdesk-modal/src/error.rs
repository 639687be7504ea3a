//! Error types for the modal controller

use crate::config::ConfigError;
use crate::gateway::GatewayError;
use crate::state_machine::SubmissionState;
use regdesk_rules::RuleError;
use thiserror::Error;

/// Controller errors
///
/// None of these escape the public entry points of `RegistrationModal`; they
/// are logged and reported through the generic error toast.
#[derive(Debug, Error)]
pub enum ModalError {
    /// A required element is missing from the surface
    #[error("required element missing: #{0}")]
    MissingElement(&'static str),

    /// An operation needed an open session
    #[error("no registration session is open")]
    NoActiveSession,

    /// Competition id rejected
    #[error(transparent)]
    InvalidCompetition(#[from] RuleError),

    /// Submission state machine refused a transition
    #[error("illegal submission transition {from:?} -> {to:?}")]
    IllegalTransition {
        /// State before
        from: SubmissionState,
        /// Requested state
        to: SubmissionState,
    },

    /// Registration backend failure
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Bad configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ModalError>;
