//! Field rule table
//!
//! One `RuleSet` per static field of the registration form, plus the fixed
//! rules shared by every team-member record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Field names of the registration payload
pub mod fields {
    //! Static field names, as submitted by the form
    /// Team leader full name
    pub const LEADER_NAME: &str = "leaderName";
    /// Team leader email
    pub const LEADER_EMAIL: &str = "leaderEmail";
    /// Team leader phone
    pub const LEADER_PHONE: &str = "leaderPhone";
    /// University
    pub const UNIVERSITY: &str = "university";
    /// Faculty or department
    pub const FACULTY: &str = "faculty";
    /// Team name
    pub const TEAM_NAME: &str = "teamName";
    /// Declared team size, leader included
    pub const TEAM_SIZE: &str = "teamSize";
}

/// Constraints for one field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Value must be present and not blank
    pub required: bool,
    /// Minimum number of characters
    pub min_length: Option<usize>,
    /// Value must look like an email address
    pub email: bool,
    /// Value must carry a plausible number of phone digits
    pub phone: bool,
}

impl RuleSet {
    /// No constraints
    #[inline]
    #[must_use]
    pub const fn optional() -> Self {
        Self {
            required: false,
            min_length: None,
            email: false,
            phone: false,
        }
    }

    /// Value must be provided
    #[inline]
    #[must_use]
    pub const fn required() -> Self {
        Self {
            required: true,
            ..Self::optional()
        }
    }

    /// With a minimum length
    #[inline]
    #[must_use]
    pub const fn with_min_length(self, min: usize) -> Self {
        Self {
            min_length: Some(min),
            ..self
        }
    }

    /// With the email shape check
    #[inline]
    #[must_use]
    pub const fn with_email(self) -> Self {
        Self { email: true, ..self }
    }

    /// With the phone shape check
    #[inline]
    #[must_use]
    pub const fn with_phone(self) -> Self {
        Self { phone: true, ..self }
    }
}

static STANDARD_RULES: [(&str, RuleSet); 7] = [
    (fields::LEADER_NAME, RuleSet::required().with_min_length(2)),
    (fields::LEADER_EMAIL, RuleSet::required().with_email()),
    (fields::LEADER_PHONE, RuleSet::required().with_phone()),
    (fields::UNIVERSITY, RuleSet::required()),
    (fields::FACULTY, RuleSet::required()),
    (fields::TEAM_NAME, RuleSet::required().with_min_length(3)),
    (fields::TEAM_SIZE, RuleSet::required()),
];

/// Ordered mapping from static field name to its rules
#[derive(Debug, Clone, Copy)]
pub struct RuleTable {
    entries: &'static [(&'static str, RuleSet)],
}

impl RuleTable {
    /// The registration form's table
    #[inline]
    #[must_use]
    pub fn standard() -> Self {
        Self {
            entries: &STANDARD_RULES,
        }
    }

    /// Rules of a static field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<RuleSet> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, rules)| *rules)
    }

    /// Rules for any field the form can show, member fields included
    ///
    /// Returns `None` for fields without validation.
    #[must_use]
    pub fn rules_for(&self, field: &str) -> Option<RuleSet> {
        if let Some(rules) = self.get(field) {
            return Some(rules);
        }
        field
            .parse::<MemberField>()
            .ok()
            .map(|member| member.attribute.rules())
    }

    /// Iterate static fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, RuleSet)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of static fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Attribute of a team-member record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemberAttribute {
    /// Full name
    Name,
    /// Email address
    Email,
    /// University
    University,
    /// Faculty or department
    Faculty,
}

impl MemberAttribute {
    /// All attributes in form order
    pub const ALL: [MemberAttribute; 4] = [
        MemberAttribute::Name,
        MemberAttribute::Email,
        MemberAttribute::University,
        MemberAttribute::Faculty,
    ];

    /// Suffix used in the field name
    #[inline]
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            MemberAttribute::Name => "Name",
            MemberAttribute::Email => "Email",
            MemberAttribute::University => "University",
            MemberAttribute::Faculty => "Faculty",
        }
    }

    /// Fixed rules for this attribute
    #[inline]
    #[must_use]
    pub const fn rules(self) -> RuleSet {
        match self {
            MemberAttribute::Name => RuleSet::required().with_min_length(2),
            MemberAttribute::Email => RuleSet::required().with_email(),
            MemberAttribute::University | MemberAttribute::Faculty => RuleSet::optional(),
        }
    }

    /// Whether the form shows an error slot for this attribute
    #[inline]
    #[must_use]
    pub const fn has_error_slot(self) -> bool {
        matches!(self, MemberAttribute::Name | MemberAttribute::Email)
    }
}

/// One field of a team-member record, e.g. `member3Email`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberField {
    /// Member position; the leader is member 1, so this starts at 2
    pub index: u32,
    /// Which attribute
    pub attribute: MemberAttribute,
}

impl MemberField {
    /// First index a member record can have
    pub const FIRST_INDEX: u32 = 2;

    /// Create a member field
    #[inline]
    #[must_use]
    pub const fn new(index: u32, attribute: MemberAttribute) -> Self {
        Self { index, attribute }
    }

    /// All four fields of one member, in form order
    #[must_use]
    pub fn all_for(index: u32) -> [MemberField; 4] {
        MemberAttribute::ALL.map(|attribute| MemberField::new(index, attribute))
    }
}

impl fmt::Display for MemberField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "member{}{}", self.index, self.attribute.suffix())
    }
}

impl FromStr for MemberField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("member").ok_or(())?;
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .ok_or(())?;
        let (digits, suffix) = rest.split_at(digits_end);
        if digits.is_empty() || digits.starts_with('0') {
            return Err(());
        }
        let index: u32 = digits.parse().map_err(|_| ())?;
        if index < Self::FIRST_INDEX {
            return Err(());
        }
        let attribute = MemberAttribute::ALL
            .into_iter()
            .find(|a| a.suffix() == suffix)
            .ok_or(())?;
        Ok(Self { index, attribute })
    }
}
