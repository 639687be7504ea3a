//! Per-open modal session
//!
//! Everything that used to be page-global about "the competition being
//! registered for" lives here, together with the submission state and the
//! cancellation handle that closing the modal trips.

use crate::error::ModalError;
use crate::state_machine::{SubmissionState, SubmissionTracker};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use regdesk_rules::CompetitionId;
use tokio::sync::watch;

/// One open registration modal
#[derive(Debug)]
pub struct ModalSession {
    competition: CompetitionId,
    opened_at: DateTime<Utc>,
    cancel: watch::Sender<bool>,
    tracker: Mutex<SubmissionTracker>,
}

impl ModalSession {
    /// Session for `competition`, starting in `Idle`
    #[must_use]
    pub fn new(competition: CompetitionId, opened_at: DateTime<Utc>) -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            competition,
            opened_at,
            cancel,
            tracker: Mutex::new(SubmissionTracker::new()),
        }
    }

    /// Competition being registered for
    #[inline]
    #[must_use]
    pub fn competition(&self) -> &CompetitionId {
        &self.competition
    }

    /// Heading shown for this competition
    #[inline]
    #[must_use]
    pub fn title(&self) -> &'static str {
        self.competition.title()
    }

    /// When the modal opened
    #[inline]
    #[must_use]
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Cancel whatever submission is in flight
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Whether the session was cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Handle that resolves once the session is cancelled
    #[must_use]
    pub fn cancellation(&self) -> Cancellation {
        Cancellation {
            rx: self.cancel.subscribe(),
        }
    }

    /// Current submission state
    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.tracker.lock().state()
    }

    /// Submission states visited so far
    #[must_use]
    pub fn history(&self) -> Vec<SubmissionState> {
        self.tracker.lock().history().to_vec()
    }

    /// Advance the submission state
    pub fn transition(&self, to: SubmissionState) -> Result<(), ModalError> {
        self.tracker.lock().transition(to)
    }
}

/// Awaitable view of a session's cancel flag
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

impl Cancellation {
    /// Resolves when the session is cancelled or dropped
    pub async fn cancelled(&mut self) {
        // An Err means the session is gone, which counts as cancelled
        let _ = self.rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Whether cancellation already happened
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn session() -> ModalSession {
        ModalSession::new(CompetitionId::new("oncampus").unwrap(), Utc::now())
    }

    #[test]
    fn title_follows_competition() {
        assert_eq!(session().title(), "Apply for OnCampus Program");
    }

    #[tokio::test]
    async fn cancellation_wakes_waiters() {
        let session = session();
        let mut cancellation = session.cancellation();
        assert!(!cancellation.is_cancelled());

        session.cancel();
        tokio::time::timeout(Duration::from_secs(1), cancellation.cancelled())
            .await
            .unwrap();
        assert!(session.is_cancelled());
    }

    #[test]
    fn waiter_stays_pending_until_cancel() {
        let session = session();
        let mut cancellation = session.cancellation();
        let mut waiter = tokio_test::task::spawn(cancellation.cancelled());

        tokio_test::assert_pending!(waiter.poll());
        session.cancel();
        assert!(waiter.is_woken());
        tokio_test::assert_ready!(waiter.poll());
    }

    #[tokio::test]
    async fn dropping_the_session_counts_as_cancel() {
        let session = session();
        let mut cancellation = session.cancellation();
        drop(session);
        tokio::time::timeout(Duration::from_secs(1), cancellation.cancelled())
            .await
            .unwrap();
    }

    #[test]
    fn tracks_transitions() {
        let session = session();
        session.transition(SubmissionState::Validating).unwrap();
        assert_eq!(session.state(), SubmissionState::Validating);
        assert!(session.transition(SubmissionState::Succeeded).is_err());
        assert_eq!(
            session.history(),
            vec![SubmissionState::Idle, SubmissionState::Validating]
        );
    }
}
