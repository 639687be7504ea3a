//! Competition identifiers and their registration titles

use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Title used for competitions without a dedicated one
pub const DEFAULT_TITLE: &str = "Register for Competition";

const CATALOG: [(&str, &str); 3] = [
    ("climate-action", "Register for Climate Action Challenge"),
    ("oncampus", "Apply for OnCampus Program"),
    ("hackathon", "Register for Social Impact Hackathon"),
];

/// Identifier of the competition a registration belongs to
///
/// Restricted to ASCII letters, digits, `-` and `_` so it can be embedded in
/// storage keys and file names unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompetitionId(String);

impl CompetitionId {
    /// Parse and validate an identifier
    pub fn new(id: impl Into<String>) -> Result<Self, RuleError> {
        let id = id.into();
        if id.is_empty() {
            return Err(RuleError::InvalidCompetitionId {
                id,
                reason: "empty".to_string(),
            });
        }
        if let Some(bad) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(RuleError::InvalidCompetitionId {
                reason: format!("unsupported character {bad:?}"),
                id,
            });
        }
        Ok(Self(id))
    }

    /// Identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Modal title for this competition
    #[must_use]
    pub fn title(&self) -> &'static str {
        CATALOG
            .iter()
            .find(|(id, _)| *id == self.0)
            .map_or(DEFAULT_TITLE, |(_, title)| title)
    }

    /// Whether the catalog has a dedicated entry
    #[must_use]
    pub fn is_known(&self) -> bool {
        CATALOG.iter().any(|(id, _)| *id == self.0)
    }
}

impl fmt::Display for CompetitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CompetitionId {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CompetitionId {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CompetitionId> for String {
    fn from(id: CompetitionId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_titles() {
        let hackathon: CompetitionId = "hackathon".parse().unwrap();
        assert_eq!(hackathon.title(), "Register for Social Impact Hackathon");
        assert!(hackathon.is_known());

        let oncampus = CompetitionId::new("oncampus").unwrap();
        assert_eq!(oncampus.title(), "Apply for OnCampus Program");

        let other = CompetitionId::new("robotics_2026").unwrap();
        assert_eq!(other.title(), DEFAULT_TITLE);
        assert!(!other.is_known());
    }

    #[test]
    fn rejects_unsafe_ids() {
        assert!(CompetitionId::new("").is_err());
        assert!(CompetitionId::new("../etc").is_err());
        assert!(CompetitionId::new("two words").is_err());
    }
}
