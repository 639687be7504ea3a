//! Draft store
//!
//! Snapshots are written after a successful submission and read back when
//! the registration form opens. A record older than the freshness window is
//! ignored but left in storage; drafts are only ever superseded.

use crate::clock::Clock;
use crate::error::DraftError;
use crate::storage::KeyValueStore;
use regdesk_rules::{CompetitionId, FormValues};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Drafts older than this are treated as absent
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(60 * 60);

const KEY_PREFIX: &str = "registration_backup_";

/// Storage key for a competition's draft
#[must_use]
pub fn storage_key(competition: &CompetitionId) -> String {
    format!("{KEY_PREFIX}{competition}")
}

/// Persisted draft: `{"data": {...}, "timestamp": <epoch millis>}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
    /// Field values at save time
    pub data: FormValues,
    /// Save time, milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// A stored draft together with its age
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftSnapshot {
    /// The stored record
    pub record: DraftRecord,
    /// Milliseconds between the save and now
    pub age_ms: i64,
    /// Whether the record is inside the freshness window
    pub fresh: bool,
}

/// Time-boxed draft cache keyed by competition
#[derive(Debug, Clone)]
pub struct DraftStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    freshness: Duration,
}

impl DraftStore {
    /// Store with the default one-hour freshness window
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            freshness: DEFAULT_FRESHNESS,
        }
    }

    /// With a different freshness window
    #[inline]
    #[must_use]
    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    /// Freshness window in force
    #[inline]
    #[must_use]
    pub fn freshness(&self) -> Duration {
        self.freshness
    }

    /// Save a snapshot of `values`
    ///
    /// Failures are logged and counted, never returned.
    pub fn save(&self, competition: &CompetitionId, values: &FormValues) {
        if let Err(e) = self.try_save(competition, values) {
            metrics::counter!("regdesk_draft_save_failures_total").increment(1);
            tracing::warn!(
                competition = %competition,
                error = %e,
                "Failed to save form data"
            );
        }
    }

    /// Fresh draft data for a competition, if any
    ///
    /// Stale, missing and unreadable records all yield `None`.
    #[must_use]
    pub fn load(&self, competition: &CompetitionId) -> Option<FormValues> {
        match self.inspect(competition) {
            Ok(Some(snapshot)) if snapshot.fresh => Some(snapshot.record.data),
            Ok(Some(snapshot)) => {
                tracing::debug!(
                    competition = %competition,
                    age_ms = snapshot.age_ms,
                    "Ignoring stale draft"
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                metrics::counter!("regdesk_draft_load_failures_total").increment(1);
                tracing::warn!(
                    competition = %competition,
                    error = %e,
                    "Failed to load form data"
                );
                None
            }
        }
    }

    /// Write a snapshot, reporting failures
    pub fn try_save(
        &self,
        competition: &CompetitionId,
        values: &FormValues,
    ) -> Result<(), DraftError> {
        let record = DraftRecord {
            data: values.clone(),
            timestamp: self.clock.now_millis(),
        };
        let encoded = serde_json::to_string(&record)?;
        self.storage.set(&storage_key(competition), &encoded)?;
        tracing::debug!(competition = %competition, fields = values.len(), "Draft saved");
        Ok(())
    }

    /// Stored record and its age, fresh or not
    pub fn inspect(&self, competition: &CompetitionId) -> Result<Option<DraftSnapshot>, DraftError> {
        let Some(raw) = self.storage.get(&storage_key(competition))? else {
            return Ok(None);
        };
        let record: DraftRecord = serde_json::from_str(&raw)?;
        let age_ms = self.clock.now_millis().saturating_sub(record.timestamp);
        let window_ms = i64::try_from(self.freshness.as_millis()).unwrap_or(i64::MAX);
        Ok(Some(DraftSnapshot {
            fresh: age_ms < window_ms,
            age_ms,
            record,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn hackathon() -> CompetitionId {
        CompetitionId::new("hackathon").unwrap()
    }

    fn store_with_clock() -> (DraftStore, Arc<ManualClock>, Arc<MemoryStore>) {
        let clock = Arc::new(ManualClock::default());
        let storage = Arc::new(MemoryStore::new());
        (
            DraftStore::new(storage.clone(), clock.clone()),
            clock,
            storage,
        )
    }

    #[test]
    fn round_trip_then_expiry() {
        let (drafts, clock, _) = store_with_clock();
        let values = FormValues::new().with("teamName", "X");

        drafts.save(&hackathon(), &values);
        assert_eq!(drafts.load(&hackathon()), Some(values));

        clock.advance(Duration::from_secs(2 * 60 * 60));
        assert_eq!(drafts.load(&hackathon()), None);
    }

    #[test]
    fn freshness_boundary_is_exclusive() {
        let (drafts, clock, _) = store_with_clock();
        drafts.save(&hackathon(), &FormValues::new().with("teamName", "X"));

        clock.advance(DEFAULT_FRESHNESS - Duration::from_millis(1));
        assert!(drafts.load(&hackathon()).is_some());

        clock.advance(Duration::from_millis(1));
        assert!(drafts.load(&hackathon()).is_none());
    }

    #[test]
    fn stale_record_is_left_in_storage() {
        let (drafts, clock, storage) = store_with_clock();
        drafts.save(&hackathon(), &FormValues::new().with("teamName", "X"));
        clock.advance(Duration::from_secs(3 * 60 * 60));

        assert!(drafts.load(&hackathon()).is_none());
        assert!(storage.get("registration_backup_hackathon").unwrap().is_some());

        let snapshot = drafts.inspect(&hackathon()).unwrap().unwrap();
        assert!(!snapshot.fresh);
        assert_eq!(snapshot.age_ms, 3 * 60 * 60 * 1000);
    }

    #[test]
    fn record_wire_format() {
        let (drafts, clock, storage) = store_with_clock();
        drafts.save(&hackathon(), &FormValues::new().with("teamName", "X"));

        let raw = storage.get("registration_backup_hackathon").unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["data"]["teamName"], "X");
        assert_eq!(json["timestamp"], clock.now_millis());
    }

    #[test]
    fn drafts_are_keyed_by_competition() {
        let (drafts, _, _) = store_with_clock();
        let other = CompetitionId::new("oncampus").unwrap();
        drafts.save(&hackathon(), &FormValues::new().with("teamName", "X"));
        assert!(drafts.load(&other).is_none());
    }

    #[test]
    fn quota_failure_is_swallowed() {
        let clock = Arc::new(ManualClock::default());
        let drafts = DraftStore::new(Arc::new(MemoryStore::with_quota(8)), clock);

        drafts.save(&hackathon(), &FormValues::new().with("teamName", "X"));
        assert!(drafts.load(&hackathon()).is_none());

        let err = drafts
            .try_save(&hackathon(), &FormValues::new())
            .unwrap_err();
        assert!(matches!(
            err,
            DraftError::Storage(StorageError::QuotaExceeded { .. })
        ));
    }

    #[test]
    fn corrupt_record_loads_as_absent() {
        let (drafts, _, storage) = store_with_clock();
        storage
            .set("registration_backup_hackathon", "not json")
            .unwrap();
        assert!(drafts.load(&hackathon()).is_none());
        assert!(matches!(
            drafts.inspect(&hackathon()),
            Err(DraftError::Serialization(_))
        ));
    }
}
