//! Error types for the rules crate

/// Errors raised while interpreting registration input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// Competition identifier is unusable as a lookup or storage key
    #[error("invalid competition id '{id}': {reason}")]
    InvalidCompetitionId {
        /// The rejected identifier
        id: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Result alias for rule operations
pub type Result<T> = std::result::Result<T, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_competition_display() {
        let err = RuleError::InvalidCompetitionId {
            id: "a b".to_string(),
            reason: "contains whitespace".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid competition id 'a b': contains whitespace"
        );
    }
}
