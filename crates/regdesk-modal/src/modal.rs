//! Registration modal controller
//!
//! Public entry points never return errors: anything unexpected is logged
//! with its context and reported through the generic error toast. The
//! `try_*` variants expose the underlying `Result` for callers that want it.

use crate::analytics::{AnalyticsSink, TracingAnalytics};
use crate::config::RegdeskConfig;
use crate::error::{ModalError, Result};
use crate::gateway::{HttpGateway, RegistrationGateway, SimulatedGateway};
use crate::notify::{report_error, Notifier, ToastTimings, TracingNotifier};
use crate::orchestrator::{SubmissionOrchestrator, SubmissionOutcome};
use crate::presenter::ErrorPresenter;
use crate::session::ModalSession;
use crate::surface::{ids, ControlKind, FormSurface, ModalSurface};
use parking_lot::Mutex;
use regdesk_draft::{Clock, DraftStore, FileStore, KeyValueStore, MemoryStore, SystemClock};
use regdesk_rules::{
    fields, validate_field, CompetitionId, FormValidator, FormValues, MemberField, TeamSize,
    TeamSizePolicy,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Collaborators a modal needs
#[derive(Debug, Clone)]
pub struct ModalServices {
    /// Registration backend
    pub gateway: Arc<dyn RegistrationGateway>,
    /// Draft storage
    pub storage: Arc<dyn KeyValueStore>,
    /// Time source for sessions and drafts
    pub clock: Arc<dyn Clock>,
    /// Toast sink
    pub notifier: Arc<dyn Notifier>,
    /// Analytics sink
    pub analytics: Arc<dyn AnalyticsSink>,
}

impl ModalServices {
    /// Services described by `config`: the HTTP gateway when an endpoint is
    /// set, otherwise the simulated one; file-backed drafts; system time;
    /// log-backed toasts and analytics
    pub fn from_config(config: &RegdeskConfig) -> Result<Self> {
        let gateway: Arc<dyn RegistrationGateway> = match &config.submission.endpoint {
            Some(endpoint) => Arc::new(HttpGateway::new(
                endpoint.clone(),
                config.request_timeout(),
            )?),
            None => Arc::new(SimulatedGateway::new(config.submission_delay())),
        };
        Ok(Self {
            gateway,
            storage: Arc::new(FileStore::new(config.drafts.directory.clone())),
            clock: Arc::new(SystemClock),
            notifier: Arc::new(TracingNotifier),
            analytics: Arc::new(TracingAnalytics),
        })
    }

    /// Simulated gateway, in-memory drafts, system time, log sinks
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            gateway: Arc::new(SimulatedGateway::default()),
            storage: Arc::new(MemoryStore::new()),
            clock: Arc::new(SystemClock),
            notifier: Arc::new(TracingNotifier),
            analytics: Arc::new(TracingAnalytics),
        }
    }

    /// With a gateway
    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn RegistrationGateway>) -> Self {
        self.gateway = gateway;
        self
    }

    /// With draft storage
    #[must_use]
    pub fn with_storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.storage = storage;
        self
    }

    /// With a clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// With a toast sink
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// With an analytics sink
    #[must_use]
    pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = analytics;
        self
    }
}

/// The registration modal: one surface, at most one open session
#[derive(Debug)]
pub struct RegistrationModal<S: ModalSurface> {
    surface: Arc<Mutex<S>>,
    session: Mutex<Option<Arc<ModalSession>>>,
    orchestrator: SubmissionOrchestrator,
    drafts: DraftStore,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    timings: ToastTimings,
    debounce: Duration,
    pending_inputs: Mutex<PendingInputs>,
}

/// Latest debounced input per field
#[derive(Debug, Default)]
struct PendingInputs {
    next: u64,
    latest: HashMap<String, u64>,
}

impl<S: ModalSurface> RegistrationModal<S> {
    /// Controller for `surface`
    #[must_use]
    pub fn new(surface: S, services: ModalServices, config: &RegdeskConfig) -> Self {
        let drafts = DraftStore::new(services.storage, services.clock.clone())
            .with_freshness(config.freshness());
        let timings = config.toast_timings();
        let orchestrator = SubmissionOrchestrator::new(
            services.gateway,
            drafts.clone(),
            services.notifier.clone(),
            services.analytics,
        )
        .with_validator(FormValidator::new(config.validation.team_size_policy))
        .with_retry(config.retry_policy())
        .with_timings(timings);

        Self {
            surface: Arc::new(Mutex::new(surface)),
            session: Mutex::new(None),
            orchestrator,
            drafts,
            notifier: services.notifier,
            clock: services.clock,
            timings,
            debounce: config.input_debounce(),
            pending_inputs: Mutex::new(PendingInputs::default()),
        }
    }

    /// Controller with the default configuration
    #[must_use]
    pub fn with_defaults(surface: S, services: ModalServices) -> Self {
        Self::new(surface, services, &RegdeskConfig::default())
    }

    /// Open the modal for a competition
    pub fn open(&self, competition: &str) {
        if let Err(e) = self.try_open(competition) {
            self.report("Opening registration form", &e);
        }
    }

    /// Open the modal, reporting failures to the caller
    ///
    /// Any previous session is cancelled and replaced. A fresh draft for the
    /// competition is copied into the form.
    pub fn try_open(&self, competition: &str) -> Result<Arc<ModalSession>> {
        let competition = CompetitionId::new(competition)?;
        let session = Arc::new(ModalSession::new(competition, self.clock.now()));
        let draft = self.drafts.load(session.competition());

        {
            let mut surface = self.surface.lock();
            if !surface.has_modal() {
                return Err(ModalError::MissingElement(ids::REGISTRATION_MODAL));
            }
            if !surface.set_title(session.title()) {
                return Err(ModalError::MissingElement(ids::MODAL_TITLE));
            }
            surface.set_open(true);
            surface.reset_submit_control();
            if let Some(draft) = &draft {
                prefill(&mut *surface, draft, self.policy());
            }
            if let Some(first) = surface.first_enabled_input() {
                surface.focus(&first);
            }
        }

        if let Some(previous) = self.session.lock().replace(session.clone()) {
            previous.cancel();
        }
        tracing::info!(
            competition = %session.competition(),
            title = session.title(),
            prefilled = draft.is_some(),
            "Registration modal opened"
        );
        Ok(session)
    }

    /// Close the modal, cancelling any submission in flight
    ///
    /// Closing a closed modal does nothing.
    pub fn close(&self) {
        let Some(session) = self.session.lock().take() else {
            return;
        };
        session.cancel();
        dismiss(&mut *self.surface.lock());
        tracing::info!(competition = %session.competition(), "Registration modal closed");
    }

    /// Regenerate the team-member controls for the selected team size
    pub fn update_member_fields(&self) {
        if let Err(e) = self.try_update_member_fields() {
            self.report("Updating member fields", &e);
        }
    }

    /// Regenerate member controls, returning how many members were laid out
    pub fn try_update_member_fields(&self) -> Result<u32> {
        let mut surface = self.surface.lock();
        if !surface.has_control(fields::TEAM_SIZE) {
            return Err(ModalError::MissingElement(ids::TEAM_SIZE));
        }
        let members = render_members(&mut *surface, self.policy());
        tracing::debug!(members, "Member fields updated");
        Ok(members)
    }

    /// Live validation of one field as it changes
    ///
    /// Fields without rules are ignored.
    pub fn handle_input(&self, field: &str) {
        let Some(rules) = self.orchestrator.validator().table().rules_for(field) else {
            return;
        };
        let mut surface = self.surface.lock();
        let value = surface.value(field);
        let error = validate_field(value.as_deref(), &rules);
        ErrorPresenter::apply_field(field, error.as_ref(), &mut *surface);
    }

    /// Live validation once a field stops changing
    ///
    /// Waits out the debounce period. A later call for the same field
    /// supersedes this one, and so does closing or reopening the modal.
    /// Returns whether this call ran the validation.
    pub async fn handle_input_debounced(&self, field: &str) -> bool {
        let session = self.session();
        let token = {
            let mut pending = self.pending_inputs.lock();
            pending.next += 1;
            let token = pending.next;
            pending.latest.insert(field.to_string(), token);
            token
        };

        tokio::time::sleep(self.debounce).await;

        {
            let mut pending = self.pending_inputs.lock();
            if pending.latest.get(field) != Some(&token) {
                return false;
            }
            pending.latest.remove(field);
        }
        let same_session = match (&session, self.session()) {
            (Some(then), Some(now)) => Arc::ptr_eq(then, &now),
            (None, None) => true,
            _ => false,
        };
        if !same_session {
            return false;
        }
        self.handle_input(field);
        true
    }

    /// Live validation of one field when it loses focus
    pub fn handle_blur(&self, field: &str) {
        self.handle_input(field);
    }

    /// Submit the form for the open session
    ///
    /// Returns `None` when the submission could not run at all.
    pub async fn submit(&self) -> Option<SubmissionOutcome> {
        match self.try_submit().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                self.report("Form submission", &e);
                None
            }
        }
    }

    /// Submit, reporting failures to the caller
    pub async fn try_submit(&self) -> Result<SubmissionOutcome> {
        let session = self
            .session
            .lock()
            .clone()
            .ok_or(ModalError::NoActiveSession)?;

        let outcome = self.orchestrator.run(&session, &*self.surface).await?;

        if session.state().is_terminal() {
            let mut current = self.session.lock();
            if current
                .as_ref()
                .is_some_and(|open| Arc::ptr_eq(open, &session))
            {
                *current = None;
            }
        }
        Ok(outcome)
    }

    /// The open session, if any
    #[must_use]
    pub fn session(&self) -> Option<Arc<ModalSession>> {
        self.session.lock().clone()
    }

    /// Whether the modal is showing
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.surface.lock().is_open()
    }

    /// Run `f` against the surface
    pub fn with_view<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut *self.surface.lock())
    }

    /// Draft store backing this modal
    #[inline]
    #[must_use]
    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    fn policy(&self) -> TeamSizePolicy {
        self.orchestrator.validator().policy()
    }

    fn report(&self, context: &str, error: &ModalError) {
        report_error(&*self.notifier, &self.timings, context, error);
    }
}

/// Hide the modal and return the form to its pristine state
pub(crate) fn dismiss<S: ModalSurface + ?Sized>(surface: &mut S) {
    surface.set_open(false);
    surface.reset();
    ErrorPresenter::clear(surface);
    surface.clear_member_section();
    surface.blur();
}

/// Replace the member controls with those implied by the team size control
fn render_members<S: FormSurface + ?Sized>(surface: &mut S, policy: TeamSizePolicy) -> u32 {
    let size = TeamSize::parse(surface.value(fields::TEAM_SIZE).as_deref(), policy);
    surface.clear_member_section();
    let mut members = 0;
    for index in size.member_indexes() {
        for field in MemberField::all_for(index) {
            surface.append_member_control(
                &field.to_string(),
                ControlKind::Input,
                field.attribute.has_error_slot(),
            );
        }
        members += 1;
    }
    members
}

/// Copy a draft into the form, laying out member controls first
fn prefill<S: FormSurface + ?Sized>(surface: &mut S, draft: &FormValues, policy: TeamSizePolicy) {
    if let Some(size) = draft.get(fields::TEAM_SIZE) {
        surface.set_value(fields::TEAM_SIZE, size);
    }
    render_members(surface, policy);
    for (name, value) in draft.iter() {
        surface.set_value(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryView;
    use crate::notify::{ToastKind, ToastLog, GENERIC_ERROR_MESSAGE};
    use regdesk_draft::ManualClock;

    fn modal_with(view: MemoryView) -> (RegistrationModal<MemoryView>, Arc<ToastLog>) {
        let toasts = Arc::new(ToastLog::new());
        let services = ModalServices::in_memory()
            .with_clock(Arc::new(ManualClock::default()))
            .with_notifier(toasts.clone());
        (RegistrationModal::with_defaults(view, services), toasts)
    }

    #[test]
    fn open_sets_title_and_focus() {
        let (modal, toasts) = modal_with(MemoryView::registration_form());
        modal.open("climate-action");

        assert!(modal.is_open());
        modal.with_view(|view| {
            assert_eq!(view.title(), Some("Register for Climate Action Challenge"));
            assert_eq!(view.focused(), Some("leaderName"));
        });
        assert!(toasts.is_empty());
    }

    #[test]
    fn unknown_competition_gets_default_title() {
        let (modal, _) = modal_with(MemoryView::registration_form());
        modal.open("robotics");
        modal.with_view(|view| assert_eq!(view.title(), Some("Register for Competition")));
    }

    #[test]
    fn malformed_competition_is_contained() {
        let (modal, toasts) = modal_with(MemoryView::registration_form());
        modal.open("../etc");

        assert!(!modal.is_open());
        assert!(modal.session().is_none());
        let toast = toasts.last().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn missing_team_size_control_is_contained() {
        let view = MemoryView::new().with_control("leaderName", ControlKind::Input);
        let (modal, toasts) = modal_with(view);
        assert!(matches!(
            modal.try_update_member_fields(),
            Err(ModalError::MissingElement(ids::TEAM_SIZE))
        ));
        modal.update_member_fields();
        assert_eq!(toasts.len(), 1);
    }

    #[test]
    fn member_fields_follow_team_size() {
        let (modal, _) = modal_with(MemoryView::registration_form());
        modal.with_view(|view| view.set_value("teamSize", "3"));
        assert_eq!(modal.try_update_member_fields().unwrap(), 2);

        modal.with_view(|view| {
            assert_eq!(
                view.member_control_names(),
                vec![
                    "member2Name",
                    "member2Email",
                    "member2University",
                    "member2Faculty",
                    "member3Name",
                    "member3Email",
                    "member3University",
                    "member3Faculty",
                ]
            );
            assert!(view.error_slot_ids().contains(&"member3Email-error".to_string()));
            assert!(!view.error_slot_ids().contains(&"member3Faculty-error".to_string()));
        });

        modal.with_view(|view| view.set_value("teamSize", "1"));
        assert_eq!(modal.try_update_member_fields().unwrap(), 0);
        modal.with_view(|view| assert!(view.member_control_names().is_empty()));
    }

    #[test]
    fn oversized_team_lays_out_no_members() {
        let (modal, _) = modal_with(MemoryView::registration_form());
        modal.with_view(|view| view.set_value("teamSize", "100000000"));
        assert_eq!(modal.try_update_member_fields().unwrap(), 0);
        modal.with_view(|view| assert!(view.member_control_names().is_empty()));
    }

    #[test]
    fn close_resets_and_is_idempotent() {
        let (modal, _) = modal_with(MemoryView::registration_form());
        modal.open("hackathon");
        modal.with_view(|view| {
            view.set_value("teamName", "Otters");
            view.set_value("teamSize", "2");
        });
        modal.update_member_fields();

        modal.close();
        modal.close();

        assert!(!modal.is_open());
        assert!(modal.session().is_none());
        modal.with_view(|view| {
            assert_eq!(view.value("teamName").as_deref(), Some(""));
            assert!(view.member_control_names().is_empty());
            assert_eq!(view.focused(), None);
        });
    }

    #[test]
    fn reopening_cancels_the_previous_session() {
        let (modal, _) = modal_with(MemoryView::registration_form());
        let first = modal.try_open("hackathon").unwrap();
        let second = modal.try_open("oncampus").unwrap();

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(modal.session().unwrap().competition().as_str(), "oncampus");
    }

    #[test]
    fn live_validation_uses_field_rules() {
        let (modal, _) = modal_with(MemoryView::registration_form());
        modal.with_view(|view| view.set_value("leaderPhone", "12345"));
        modal.handle_input("leaderPhone");
        modal.with_view(|view| {
            assert_eq!(
                view.error_text("leaderPhone"),
                Some("Please enter a valid phone number")
            );
        });

        modal.with_view(|view| view.set_value("leaderPhone", "+1 (555) 010-9999"));
        modal.handle_blur("leaderPhone");
        modal.with_view(|view| assert!(!view.is_error_shown("leaderPhone")));

        modal.handle_input("notAField");
    }
}
