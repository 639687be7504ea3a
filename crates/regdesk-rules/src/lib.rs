//! Registration Desk rules
//!
//! Declarative validation for the competition registration form.
//!
//! # Overview
//!
//! The rules crate provides:
//! - **RuleSet** / **RuleTable**: static constraints per form field
//! - **validate_field**: single value against a single rule set
//! - **TeamRoster**: typed team-member records sized by the team size
//! - **FormValidator**: all fields of a submission, aggregated into an `ErrorMap`
//!
//! # Example
//!
//! ```rust
//! use regdesk_rules::{FormValidator, FormValues, TeamSizePolicy};
//!
//! let values: FormValues = [
//!     ("leaderName", "Ada Lovelace"),
//!     ("leaderEmail", "ada@example.org"),
//!     ("leaderPhone", "+44 20 7946 0958"),
//!     ("university", "UCL"),
//!     ("faculty", "Mathematics"),
//!     ("teamName", "Engines"),
//!     ("teamSize", "1"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let report = FormValidator::new(TeamSizePolicy::Strict).validate(&values);
//! assert!(report.is_valid());
//! ```

#![warn(missing_docs)]

pub mod competition;
pub mod error;
pub mod field;
pub mod form;
pub mod rules;
pub mod team;
pub mod values;

// Re-exports
pub use competition::CompetitionId;
pub use error::{Result, RuleError};
pub use field::{is_email, is_phone, is_required, validate_field, FieldError};
pub use form::{FormValidator, ValidationReport};
pub use rules::{fields, MemberAttribute, MemberField, RuleSet, RuleTable};
pub use team::{TeamMember, TeamRoster, TeamSize, TeamSizePolicy, MAX_TEAM_SIZE};
pub use values::{ErrorMap, FormValues};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for validation
    pub use crate::{
        CompetitionId, ErrorMap, FieldError, FormValidator, FormValues, RuleSet, RuleTable,
        TeamRoster, TeamSize, TeamSizePolicy, ValidationReport,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
