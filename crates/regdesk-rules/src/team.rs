//! Team size and team-member records
//!
//! The leader is member 1 and is described by the static fields; members
//! `2..=team_size` are explicit records built from the submitted values.

use crate::rules::{MemberAttribute, MemberField};
use crate::values::FormValues;
use serde::{Deserialize, Serialize};

/// Largest team size the workflow will lay out or validate
///
/// Far above anything the team selector offers. Larger numbers are handled
/// like values that overflow `u32`, so a hand-written payload cannot make the
/// roster, the error map or the member controls grow without limit.
pub const MAX_TEAM_SIZE: u32 = 1000;

/// How a malformed team size is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSizePolicy {
    /// A non-empty team size that is not a positive integer is a field error
    #[default]
    Strict,
    /// Leading digits are parsed; anything unparseable means "no team"
    Lenient,
}

/// Interpreted team size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSize {
    /// Missing or blank
    Absent,
    /// Present but rejected under the strict policy
    Invalid,
    /// Number of people, leader included
    Count(u32),
}

impl TeamSize {
    /// Interpret a raw team size under a policy
    #[must_use]
    pub fn parse(raw: Option<&str>, policy: TeamSizePolicy) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
            return Self::Absent;
        };

        match policy {
            TeamSizePolicy::Strict => match raw.parse::<u32>() {
                Ok(n) if (1..=MAX_TEAM_SIZE).contains(&n) => Self::Count(n),
                _ => Self::Invalid,
            },
            TeamSizePolicy::Lenient => Self::parse_leading(raw),
        }
    }

    /// `parseInt`-style: optional sign, then as many digits as are there
    fn parse_leading(raw: &str) -> Self {
        let (negative, rest) = match raw.as_bytes().first() {
            Some(b'-') => (true, &raw[1..]),
            Some(b'+') => (false, &raw[1..]),
            _ => (false, raw),
        };
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Self::Absent;
        }
        if negative {
            return Self::Count(0);
        }
        // Overflowing sizes cannot come from the bounded selector
        digits
            .parse::<u32>()
            .ok()
            .filter(|n| *n <= MAX_TEAM_SIZE)
            .map_or(Self::Absent, Self::Count)
    }

    /// Number of additional member records, zero for solo or unknown sizes
    #[inline]
    #[must_use]
    pub fn additional_members(self) -> u32 {
        match self {
            Self::Count(n) if n > 1 => n - 1,
            _ => 0,
        }
    }

    /// Member indexes that need a record
    pub fn member_indexes(self) -> impl Iterator<Item = u32> {
        let last = match self {
            Self::Count(n) => n,
            _ => 0,
        };
        MemberField::FIRST_INDEX..=last
    }
}

/// One non-leader team member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Position in the team, starting at 2
    pub index: u32,
    /// Full name
    pub name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// University
    pub university: Option<String>,
    /// Faculty or department
    pub faculty: Option<String>,
}

impl TeamMember {
    /// Read member `index` out of the submitted values
    #[must_use]
    pub fn from_values(values: &FormValues, index: u32) -> Self {
        let read = |attribute| {
            values
                .get(&MemberField::new(index, attribute).to_string())
                .map(str::to_string)
        };
        Self {
            index,
            name: read(MemberAttribute::Name),
            email: read(MemberAttribute::Email),
            university: read(MemberAttribute::University),
            faculty: read(MemberAttribute::Faculty),
        }
    }

    /// Value of one attribute
    #[must_use]
    pub fn value(&self, attribute: MemberAttribute) -> Option<&str> {
        match attribute {
            MemberAttribute::Name => self.name.as_deref(),
            MemberAttribute::Email => self.email.as_deref(),
            MemberAttribute::University => self.university.as_deref(),
            MemberAttribute::Faculty => self.faculty.as_deref(),
        }
    }

    /// Field handle for one attribute
    #[inline]
    #[must_use]
    pub fn field(&self, attribute: MemberAttribute) -> MemberField {
        MemberField::new(self.index, attribute)
    }
}

/// Ordered member records, sized by the team size
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRoster {
    members: Vec<TeamMember>,
}

impl TeamRoster {
    /// Build records for members `2..=team_size`
    #[must_use]
    pub fn from_values(values: &FormValues, size: TeamSize) -> Self {
        Self {
            members: size
                .member_indexes()
                .map(|index| TeamMember::from_values(values, index))
                .collect(),
        }
    }

    /// Members in index order
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    /// Iterate members in index order
    pub fn iter(&self) -> impl Iterator<Item = &TeamMember> {
        self.members.iter()
    }

    /// Number of non-leader members
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the leader registers alone
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
