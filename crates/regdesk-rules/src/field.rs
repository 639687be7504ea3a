//! Single-field validation
//!
//! Rules are evaluated in a fixed order (required, minimum length, email
//! shape, phone shape) and only the first failure is reported.

use crate::rules::RuleSet;
use once_cell::sync::Lazy;
use regex::Regex;

/// Local part, `@`, and a domain containing a dot. Not RFC 5322.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Accepted digit counts for phone numbers once separators are stripped
pub const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 10..=15;

/// Why a field value was rejected
///
/// The `Display` text is the message shown next to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum FieldError {
    /// Value missing, empty or whitespace-only
    #[error("This field is required")]
    Required,

    /// Value shorter than the rule's minimum length
    #[error("Must be at least {min} characters")]
    TooShort {
        /// Minimum number of characters
        min: usize,
    },

    /// Value is not shaped like an email address
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// Value does not carry 10 to 15 digits
    #[error("Please enter a valid phone number")]
    InvalidPhone,

    /// Team member name missing
    #[error("Team member name is required")]
    MemberNameRequired,

    /// Team member email missing
    #[error("Team member email is required")]
    MemberEmailRequired,

    /// Team size present but not a positive whole number
    #[error("Please select a valid team size")]
    InvalidTeamSize,
}

impl FieldError {
    /// Whether this is a missing-value failure
    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Self::Required | Self::MemberNameRequired | Self::MemberEmailRequired
        )
    }
}

/// Whether a value counts as provided
#[inline]
#[must_use]
pub fn is_required(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Email shape check; the pattern has no letters, so case never matters
#[must_use]
pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Phone shape check: every non-digit is ignored, then the digits are counted
#[must_use]
pub fn is_phone(value: &str) -> bool {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    PHONE_DIGITS.contains(&digits)
}

/// Validate one raw value against one rule set
///
/// Returns `None` when the value passes. Optional rules only apply to
/// non-empty values, so an empty optional field always passes.
#[must_use]
pub fn validate_field(value: Option<&str>, rules: &RuleSet) -> Option<FieldError> {
    if rules.required && !is_required(value) {
        return Some(FieldError::Required);
    }

    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => return None,
    };

    if let Some(min) = rules.min_length {
        if value.chars().count() < min {
            return Some(FieldError::TooShort { min });
        }
    }

    if rules.email && !is_email(value) {
        return Some(FieldError::InvalidEmail);
    }

    if rules.phone && !is_phone(value) {
        return Some(FieldError::InvalidPhone);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NAME: RuleSet = RuleSet::required().with_min_length(2);
    const EMAIL: RuleSet = RuleSet::required().with_email();
    const PHONE: RuleSet = RuleSet::required().with_phone();

    #[test]
    fn required_rejects_absent_empty_and_blank() {
        assert_eq!(validate_field(None, &NAME), Some(FieldError::Required));
        assert_eq!(validate_field(Some(""), &NAME), Some(FieldError::Required));
        assert_eq!(validate_field(Some(" \t\n"), &NAME), Some(FieldError::Required));
    }

    #[test]
    fn required_short_circuits_other_rules() {
        // Blank input would also fail the email rule; only "required" is reported
        assert_eq!(validate_field(Some("   "), &EMAIL), Some(FieldError::Required));
    }

    #[test]
    fn min_length_counts_characters() {
        assert_eq!(
            validate_field(Some("A"), &NAME),
            Some(FieldError::TooShort { min: 2 })
        );
        assert_eq!(validate_field(Some("Zo"), &NAME), None);
        assert_eq!(validate_field(Some("Éa"), &NAME), None);
    }

    #[test]
    fn optional_empty_value_passes() {
        let rules = RuleSet::optional().with_min_length(5).with_email();
        assert_eq!(validate_field(Some(""), &rules), None);
        assert_eq!(validate_field(None, &rules), None);
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("a@b.co"));
        assert!(is_email("First.Last@Example.ORG"));
        assert!(is_email("ÅSA@EXAMPLE.SE"));
        assert!(!is_email("plainaddress"));
        assert!(!is_email("a@bco"));
        assert!(!is_email("a@.b c"));
        assert!(!is_email("a b@c.d"));
        assert!(!is_email("@b.co"));
    }

    #[test]
    fn email_rule_message() {
        assert_eq!(
            validate_field(Some("nobody"), &EMAIL),
            Some(FieldError::InvalidEmail)
        );
        assert_eq!(
            FieldError::InvalidEmail.to_string(),
            "Please enter a valid email address"
        );
    }

    #[test]
    fn phone_digit_bounds() {
        assert!(is_phone("0123456789"));
        assert!(is_phone("+1 (234) 567-8901-234"));
        assert!(!is_phone("012345678"));
        assert!(!is_phone("0123456789012345"));
        assert_eq!(
            validate_field(Some("12-34"), &PHONE),
            Some(FieldError::InvalidPhone)
        );
    }

    #[test]
    fn precedence_reports_min_length_before_email() {
        let rules = RuleSet::required().with_min_length(10).with_email();
        assert_eq!(
            validate_field(Some("x@y"), &rules),
            Some(FieldError::TooShort { min: 10 })
        );
    }

    proptest! {
        #[test]
        fn prop_whitespace_only_is_required_error(ws in "[ \t\r\n]{0,12}") {
            prop_assert_eq!(validate_field(Some(&ws), &EMAIL), Some(FieldError::Required));
            prop_assert_eq!(validate_field(Some(&ws), &PHONE), Some(FieldError::Required));
        }

        #[test]
        fn prop_phone_accepts_only_10_to_15_digits(
            digits in proptest::collection::vec(0u8..10, 0..20),
            sep in "[ ()+.-]{0,3}",
        ) {
            let text: String = digits
                .iter()
                .map(|d| format!("{d}{sep}"))
                .collect();
            prop_assert_eq!(is_phone(&text), (10..=15).contains(&digits.len()));
        }

        #[test]
        fn prop_email_without_at_fails(s in "[^@]{0,24}") {
            prop_assert!(!is_email(&s));
        }

        #[test]
        fn prop_email_without_dot_after_at_fails(local in "[a-z]{1,8}", domain in "[a-z]{1,8}") {
            let address = format!("{local}@{domain}");
            prop_assert!(!is_email(&address));
        }

        #[test]
        fn prop_email_check_ignores_case(address in "\\PC{0,24}") {
            prop_assert_eq!(is_email(&address), is_email(&address.to_lowercase()));
        }
    }
}
