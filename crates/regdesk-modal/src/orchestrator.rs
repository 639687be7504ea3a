//! Submission orchestration
//!
//! Drives one submission through the state machine: capture, validate,
//! show errors or call the gateway, then apply exactly one of the success,
//! failure or cancellation paths. The surface lock is never held across an
//! await point.

use crate::analytics::{AnalyticsEvent, AnalyticsSink, FORM_SUBMISSION};
use crate::error::ModalError;
use crate::gateway::{
    submit_with_retry, RegistrationGateway, RetryPolicy, SubmissionReceipt, SubmissionRequest,
};
use crate::modal::dismiss;
use crate::notify::{report_error, Notifier, Toast, ToastKind, ToastTimings, SUCCESS_MESSAGE};
use crate::presenter::ErrorPresenter;
use crate::session::ModalSession;
use crate::state_machine::SubmissionState;
use crate::surface::{FormSurface, ModalSurface, SubmitControl, LOADING_LABEL};
use parking_lot::Mutex;
use regdesk_draft::DraftStore;
use regdesk_rules::{fields, ErrorMap, FormValidator};
use std::sync::Arc;

/// How a submission attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Validation failed; the errors are on the form
    Rejected(ErrorMap),
    /// The gateway accepted the registration
    Succeeded(SubmissionReceipt),
    /// The gateway call failed; the form keeps its values
    Failed {
        /// Error description
        reason: String,
    },
    /// The modal closed while the call was in flight
    Cancelled,
    /// Another submission was already in flight, or the session is finished
    Ignored,
}

impl SubmissionOutcome {
    /// Label used for the outcome metric
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "rejected",
            Self::Succeeded(_) => "succeeded",
            Self::Failed { .. } => "failed",
            Self::Cancelled => "cancelled",
            Self::Ignored => "ignored",
        }
    }
}

/// Runs submissions for a modal
#[derive(Debug, Clone)]
pub struct SubmissionOrchestrator {
    validator: FormValidator,
    gateway: Arc<dyn RegistrationGateway>,
    retry: RetryPolicy,
    drafts: DraftStore,
    notifier: Arc<dyn Notifier>,
    analytics: Arc<dyn AnalyticsSink>,
    timings: ToastTimings,
}

impl SubmissionOrchestrator {
    /// Orchestrator with the strict validator, default retries and timings
    #[must_use]
    pub fn new(
        gateway: Arc<dyn RegistrationGateway>,
        drafts: DraftStore,
        notifier: Arc<dyn Notifier>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            validator: FormValidator::default(),
            gateway,
            retry: RetryPolicy::default(),
            drafts,
            notifier,
            analytics,
            timings: ToastTimings::default(),
        }
    }

    /// With a different validator
    #[inline]
    #[must_use]
    pub fn with_validator(mut self, validator: FormValidator) -> Self {
        self.validator = validator;
        self
    }

    /// With a different retry policy
    #[inline]
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// With different toast durations
    #[inline]
    #[must_use]
    pub fn with_timings(mut self, timings: ToastTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Validator in use
    #[inline]
    #[must_use]
    pub fn validator(&self) -> &FormValidator {
        &self.validator
    }

    /// Submit the form on `surface` for `session`
    pub async fn run<S: ModalSurface + ?Sized>(
        &self,
        session: &ModalSession,
        surface: &Mutex<S>,
    ) -> Result<SubmissionOutcome, ModalError> {
        if let Err(e) = session.transition(SubmissionState::Validating) {
            tracing::debug!(
                competition = %session.competition(),
                error = %e,
                "Ignoring submit"
            );
            return Ok(SubmissionOutcome::Ignored);
        }

        let values = surface.lock().values();
        let report = self.validator.validate(&values);
        if !report.is_valid() {
            session.transition(SubmissionState::Rejected)?;
            ErrorPresenter::display(report.errors(), &mut *surface.lock());
            return Ok(self.finish(SubmissionOutcome::Rejected(report.into_errors())));
        }

        session.transition(SubmissionState::Submitting)?;
        {
            let mut surface = surface.lock();
            ErrorPresenter::clear(&mut *surface);
            begin_loading(&mut *surface);
        }

        let request = SubmissionRequest::new(session.competition().clone(), values);
        let mut cancellation = session.cancellation();
        let result = tokio::select! {
            biased;
            () = cancellation.cancelled() => None,
            result = submit_with_retry(&*self.gateway, &request, &self.retry) => Some(result),
        };

        // A cancelled session no longer owns the form; whoever closed or
        // reopened the modal has already reset it.
        match result.filter(|_| !session.is_cancelled()) {
            None => {
                session.transition(SubmissionState::Cancelled)?;
                tracing::info!(
                    competition = %session.competition(),
                    submission = %request.id,
                    "Submission cancelled"
                );
                Ok(self.finish(SubmissionOutcome::Cancelled))
            }
            Some(Ok(receipt)) => {
                session.transition(SubmissionState::Succeeded)?;
                self.on_success(session, surface, &request);
                Ok(self.finish(SubmissionOutcome::Succeeded(receipt)))
            }
            Some(Err(e)) => {
                session.transition(SubmissionState::Failed)?;
                end_loading(&mut *surface.lock());
                report_error(&*self.notifier, &self.timings, "Form submission", &e);
                session.transition(SubmissionState::Idle)?;
                Ok(self.finish(SubmissionOutcome::Failed {
                    reason: e.to_string(),
                }))
            }
        }
    }

    fn on_success<S: ModalSurface + ?Sized>(
        &self,
        session: &ModalSession,
        surface: &Mutex<S>,
        request: &SubmissionRequest,
    ) {
        end_loading(&mut *surface.lock());
        self.notifier.notify(
            Toast::new(SUCCESS_MESSAGE, ToastKind::Success).with_duration(self.timings.success),
        );
        self.drafts.save(session.competition(), &request.values);
        dismiss(&mut *surface.lock());
        self.analytics.track(
            AnalyticsEvent::new(FORM_SUBMISSION)
                .with("competition", session.competition().as_str())
                .with(
                    "team_size",
                    request.values.get(fields::TEAM_SIZE).unwrap_or_default(),
                ),
        );
        tracing::info!(
            competition = %session.competition(),
            submission = %request.id,
            fields = request.values.len(),
            "Registration submitted"
        );
    }

    fn finish(&self, outcome: SubmissionOutcome) -> SubmissionOutcome {
        if !matches!(outcome, SubmissionOutcome::Ignored) {
            metrics::counter!("regdesk_submissions_total", "outcome" => outcome.label())
                .increment(1);
        }
        outcome
    }
}

/// Put the submit control into its loading state
fn begin_loading<S: FormSurface + ?Sized>(surface: &mut S) {
    surface.set_submit_control(SubmitControl {
        label: LOADING_LABEL.to_string(),
        disabled: true,
        loading: true,
    });
}

fn end_loading<S: FormSurface + ?Sized>(surface: &mut S) {
    surface.reset_submit_control();
}
