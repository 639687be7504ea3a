//! Registration Desk modal
//!
//! Controller for the competition registration modal.
//!
//! # Overview
//!
//! - **FormSurface** / **ModalSurface**: the document seam (`MemoryView` in-process)
//! - **ErrorPresenter**: projects an `ErrorMap` onto the form
//! - **SubmissionOrchestrator**: state machine, gateway call, success and
//!   failure paths
//! - **RegistrationGateway**: simulated or HTTP backend with retries
//! - **RegistrationModal**: open, close, member fields, live validation, submit
//! - **RegdeskConfig**: TOML configuration
//!
//! # Example
//!
//! ```rust
//! use regdesk_modal::{MemoryView, ModalServices, RegistrationModal, SubmissionOutcome};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let modal = RegistrationModal::with_defaults(
//!     MemoryView::registration_form(),
//!     ModalServices::in_memory(),
//! );
//!
//! modal.open("hackathon");
//! let outcome = modal.submit().await;
//! assert!(matches!(outcome, Some(SubmissionOutcome::Rejected(_))));
//! # }
//! ```

#![warn(missing_docs)]

pub mod analytics;
pub mod config;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod modal;
pub mod notify;
pub mod orchestrator;
pub mod presenter;
pub mod session;
pub mod state_machine;
pub mod surface;

// Re-exports
pub use analytics::{AnalyticsEvent, AnalyticsSink, EventLog, TracingAnalytics, FORM_SUBMISSION};
pub use config::{ConfigError, RegdeskConfig};
pub use error::{ModalError, Result};
pub use gateway::{
    classify_status, submit_with_retry, GatewayError, HttpGateway, RegistrationGateway,
    RetryPolicy, SimulatedGateway, SubmissionId, SubmissionReceipt, SubmissionRequest,
};
pub use memory::MemoryView;
pub use modal::{ModalServices, RegistrationModal};
pub use notify::{
    report_error, Notifier, Toast, ToastKind, ToastLog, ToastTimings, TracingNotifier,
    GENERIC_ERROR_MESSAGE, SUCCESS_MESSAGE,
};
pub use orchestrator::{SubmissionOrchestrator, SubmissionOutcome};
pub use presenter::ErrorPresenter;
pub use session::{Cancellation, ModalSession};
pub use state_machine::{
    allowed_transitions, validate_transition, SubmissionState, SubmissionTracker,
};
pub use surface::{ControlKind, FormSurface, ModalSurface, SubmitControl};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the modal
    pub use crate::{
        FormSurface, MemoryView, ModalServices, ModalSurface, Notifier, RegdeskConfig,
        RegistrationGateway, RegistrationModal, SubmissionOutcome, SubmissionState,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
