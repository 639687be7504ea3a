//! Testing utilities for the Registration Desk workspace
//!
//! Shared fixtures, scripted collaborators and a ready-wired modal harness.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use regdesk_draft::{KeyValueStore, ManualClock, MemoryStore, StorageError};
use regdesk_modal::{
    EventLog, GatewayError, MemoryView, ModalServices, RegdeskConfig, RegistrationGateway,
    RegistrationModal, SubmissionReceipt, SubmissionRequest, ToastLog,
};
use regdesk_rules::FormValues;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A complete, valid single-person registration
pub fn valid_leader_values() -> FormValues {
    FormValues::new()
        .with("leaderName", "Ada Lovelace")
        .with("leaderEmail", "ada@example.org")
        .with("leaderPhone", "+44 20 7946 0958")
        .with("university", "University of London")
        .with("faculty", "Mathematics")
        .with("teamName", "Analytical Engines")
        .with("teamSize", "1")
}

/// Valid leader values plus `size - 1` fully filled members
pub fn team_values(size: u32) -> FormValues {
    let mut values = valid_leader_values().with("teamSize", size.to_string());
    for i in 2..=size {
        values.insert(format!("member{i}Name"), format!("Member {i}"));
        values.insert(format!("member{i}Email"), format!("member{i}@example.org"));
        values.insert(format!("member{i}University"), "University of London");
        values.insert(format!("member{i}Faculty"), "Engineering");
    }
    values
}

/// Memory store that counts writes
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: MemoryStore,
    writes: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }
}

/// Gateway that replays scripted results, then accepts everything
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    delay: Duration,
    script: Mutex<VecDeque<Result<(), GatewayError>>>,
    requests: Mutex<Vec<SubmissionRequest>>,
}

impl ScriptedGateway {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Queue results for the next calls
    pub fn queue(self, result: Result<(), GatewayError>) -> Self {
        self.script.lock().push_back(result);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<SubmissionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl RegistrationGateway for ScriptedGateway {
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionReceipt, GatewayError> {
        self.requests.lock().push(request.clone());
        tokio::time::sleep(self.delay).await;
        let next = self.script.lock().pop_front().unwrap_or(Ok(()));
        next.map(|()| SubmissionReceipt {
            id: request.id,
            accepted_at: Utc::now(),
        })
    }
}

/// A modal on the standard form with every collaborator observable
pub struct Harness {
    pub modal: Arc<RegistrationModal<MemoryView>>,
    pub gateway: Arc<ScriptedGateway>,
    pub storage: Arc<CountingStore>,
    pub clock: Arc<ManualClock>,
    pub toasts: Arc<ToastLog>,
    pub events: Arc<EventLog>,
}

impl Harness {
    /// Default configuration and a gateway answering after two seconds
    pub fn new() -> Self {
        Self::with(
            ScriptedGateway::new(Duration::from_millis(2000)),
            &RegdeskConfig::default(),
        )
    }

    pub fn with(gateway: ScriptedGateway, config: &RegdeskConfig) -> Self {
        Self::with_storage(gateway, config, Arc::new(CountingStore::new()))
    }

    pub fn with_storage(
        gateway: ScriptedGateway,
        config: &RegdeskConfig,
        storage: Arc<CountingStore>,
    ) -> Self {
        let gateway = Arc::new(gateway);
        let clock = Arc::new(ManualClock::default());
        let toasts = Arc::new(ToastLog::new());
        let events = Arc::new(EventLog::new());
        let services = ModalServices::in_memory()
            .with_gateway(gateway.clone())
            .with_storage(storage.clone())
            .with_clock(clock.clone())
            .with_notifier(toasts.clone())
            .with_analytics(events.clone());
        let modal = Arc::new(RegistrationModal::new(
            MemoryView::registration_form(),
            services,
            config,
        ));
        Self {
            modal,
            gateway,
            storage,
            clock,
            toasts,
            events,
        }
    }

    /// Type values into the form, laying out member fields first
    pub fn fill(&self, values: &FormValues) {
        if let Some(size) = values.get("teamSize") {
            self.modal.with_view(|view| {
                regdesk_modal::FormSurface::set_value(view, "teamSize", size);
            });
            self.modal.update_member_fields();
        }
        self.modal.with_view(|view| view.fill(values));
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
