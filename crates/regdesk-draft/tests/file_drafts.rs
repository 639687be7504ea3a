use regdesk_draft::{storage_key, DraftStore, FileStore, KeyValueStore, ManualClock};
use regdesk_rules::{CompetitionId, FormValues};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn file_backed_drafts_survive_a_new_store_instance() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::default());
    let competition = CompetitionId::new("climate-action").unwrap();
    let values = FormValues::new()
        .with("teamName", "Kelp Farmers")
        .with("teamSize", "2")
        .with("member2Name", "Rachel");

    DraftStore::new(Arc::new(FileStore::new(dir.path())), clock.clone())
        .save(&competition, &values);

    let reopened = DraftStore::new(Arc::new(FileStore::new(dir.path())), clock.clone());
    assert_eq!(reopened.load(&competition), Some(values));

    clock.advance(Duration::from_secs(61 * 60));
    assert_eq!(reopened.load(&competition), None);
}

#[test]
fn later_save_supersedes_earlier_one() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::default());
    let storage = Arc::new(FileStore::new(dir.path()));
    let drafts = DraftStore::new(storage.clone(), clock.clone());
    let competition = CompetitionId::new("hackathon").unwrap();

    drafts.save(&competition, &FormValues::new().with("teamName", "First"));
    clock.advance(Duration::from_secs(50 * 60));
    drafts.save(&competition, &FormValues::new().with("teamName", "Second"));
    clock.advance(Duration::from_secs(50 * 60));

    let loaded = drafts.load(&competition).unwrap();
    assert_eq!(loaded.get("teamName"), Some("Second"));
    assert!(storage.get(&storage_key(&competition)).unwrap().is_some());
}

#[test]
fn custom_freshness_window() {
    let clock = Arc::new(ManualClock::default());
    let drafts = DraftStore::new(Arc::new(regdesk_draft::MemoryStore::new()), clock.clone())
        .with_freshness(Duration::from_secs(60));
    let competition = CompetitionId::new("oncampus").unwrap();

    drafts.save(&competition, &FormValues::new().with("teamName", "Quick"));
    clock.advance(Duration::from_secs(61));
    assert!(drafts.load(&competition).is_none());
}
