//! Registration Desk drafts
//!
//! Best-effort local cache of in-progress registration forms.
//!
//! # Overview
//!
//! - **KeyValueStore**: string storage seam (`MemoryStore`, `FileStore`)
//! - **Clock**: injectable time source (`SystemClock`, `ManualClock`)
//! - **DraftStore**: time-stamped snapshots keyed by competition, readable
//!   only inside the freshness window
//!
//! Draft persistence never fails loudly: save and load errors are logged,
//! counted, and otherwise ignored.
//!
//! # Example
//!
//! ```rust
//! use regdesk_draft::{DraftStore, ManualClock, MemoryStore};
//! use regdesk_rules::{CompetitionId, FormValues};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = Arc::new(ManualClock::default());
//! let drafts = DraftStore::new(Arc::new(MemoryStore::new()), clock.clone());
//! let hackathon = CompetitionId::new("hackathon").unwrap();
//!
//! drafts.save(&hackathon, &FormValues::new().with("teamName", "X"));
//! assert!(drafts.load(&hackathon).is_some());
//!
//! clock.advance(Duration::from_secs(2 * 60 * 60));
//! assert!(drafts.load(&hackathon).is_none());
//! ```

#![warn(missing_docs)]

pub mod clock;
pub mod draft;
pub mod error;
pub mod storage;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use draft::{storage_key, DraftRecord, DraftSnapshot, DraftStore, DEFAULT_FRESHNESS};
pub use error::{DraftError, StorageError};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
