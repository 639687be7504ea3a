//! Whole-form validation
//!
//! Static fields are checked against the rule table in declaration order,
//! then every team-member record implied by the team size is checked with the
//! fixed member rules.

use crate::field::{validate_field, FieldError};
use crate::rules::{fields, MemberAttribute, RuleTable};
use crate::team::{TeamMember, TeamRoster, TeamSize, TeamSizePolicy};
use crate::values::{ErrorMap, FormValues};

/// Outcome of one validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    errors: ErrorMap,
    team_size: TeamSize,
    roster: TeamRoster,
}

impl ValidationReport {
    /// Whether the submission may proceed
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors by field, in recording order
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Consume the report, keeping the errors
    #[inline]
    #[must_use]
    pub fn into_errors(self) -> ErrorMap {
        self.errors
    }

    /// Team size as interpreted during validation
    #[inline]
    #[must_use]
    pub fn team_size(&self) -> TeamSize {
        self.team_size
    }

    /// Member records that were validated
    #[inline]
    #[must_use]
    pub fn roster(&self) -> &TeamRoster {
        &self.roster
    }
}

/// Validates a complete set of form values
#[derive(Debug, Clone, Copy, Default)]
pub struct FormValidator {
    table: RuleTable,
    policy: TeamSizePolicy,
}

impl FormValidator {
    /// Validator over the standard rule table
    #[inline]
    #[must_use]
    pub fn new(policy: TeamSizePolicy) -> Self {
        Self {
            table: RuleTable::standard(),
            policy,
        }
    }

    /// Team size policy in force
    #[inline]
    #[must_use]
    pub fn policy(&self) -> TeamSizePolicy {
        self.policy
    }

    /// Rule table in force
    #[inline]
    #[must_use]
    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Validate every static field and every implied team member
    #[must_use]
    pub fn validate(&self, values: &FormValues) -> ValidationReport {
        let mut errors = ErrorMap::new();

        for (field, rules) in self.table.iter() {
            if let Some(error) = validate_field(values.get(field), &rules) {
                errors.insert(field, error);
            }
        }

        let team_size = TeamSize::parse(values.get(fields::TEAM_SIZE), self.policy);
        if team_size == TeamSize::Invalid && !errors.contains(fields::TEAM_SIZE) {
            errors.insert(fields::TEAM_SIZE, FieldError::InvalidTeamSize);
        }

        let roster = TeamRoster::from_values(values, team_size);
        for member in roster.iter() {
            Self::validate_member(member, &mut errors);
        }

        ValidationReport {
            errors,
            team_size,
            roster,
        }
    }

    /// Validate one member record, name before email
    pub fn validate_member(member: &TeamMember, errors: &mut ErrorMap) {
        for attribute in [MemberAttribute::Name, MemberAttribute::Email] {
            let Some(error) = validate_field(member.value(attribute), &attribute.rules()) else {
                continue;
            };
            let error = match (attribute, error) {
                (MemberAttribute::Name, FieldError::Required) => FieldError::MemberNameRequired,
                (MemberAttribute::Email, FieldError::Required) => FieldError::MemberEmailRequired,
                (_, other) => other,
            };
            errors.insert(member.field(attribute).to_string(), error);
        }
    }
}
