//! Configuration
//!
//! Loaded from TOML; every key is optional and falls back to the defaults
//! the registration page has always used.

use crate::gateway::RetryPolicy;
use crate::notify::ToastTimings;
use regdesk_rules::TeamSizePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML did not parse
    #[error("failed to parse config {origin}: {reason}")]
    Parse {
        /// File path, or `<inline>` for strings
        origin: String,
        /// Parser message
        reason: String,
    },

    /// Values parsed but are unusable
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegdeskConfig {
    /// Gateway and retry settings
    pub submission: SubmissionConfig,
    /// Draft persistence
    pub drafts: DraftConfig,
    /// Validator behaviour
    pub validation: ValidationConfig,
    /// Toast timings
    pub notifications: NotificationConfig,
}

/// `[submission]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Simulated gateway delay
    pub delay_ms: u64,
    /// HTTP endpoint; when set the HTTP gateway replaces the simulated one
    pub endpoint: Option<String>,
    /// Per-request timeout for the HTTP gateway
    pub request_timeout_ms: u64,
    /// Attempts including the first
    pub max_attempts: u32,
    /// First retry wait
    pub initial_backoff_ms: u64,
    /// Cap on any retry wait
    pub max_backoff_ms: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            delay_ms: 2000,
            endpoint: None,
            request_timeout_ms: 10_000,
            max_attempts: 3,
            initial_backoff_ms: 250,
            max_backoff_ms: 4000,
        }
    }
}

/// `[drafts]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Age past which a draft is ignored
    pub freshness_secs: u64,
    /// Directory for file-backed drafts
    pub directory: PathBuf,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            freshness_secs: 3600,
            directory: PathBuf::from(".regdesk/drafts"),
        }
    }
}

/// `[validation]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// How a malformed team size is treated
    pub team_size_policy: TeamSizePolicy,
    /// Quiet period before live validation of a changed field runs
    pub debounce_ms: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            team_size_policy: TeamSizePolicy::default(),
            debounce_ms: 300,
        }
    }
}

/// `[notifications]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Duration of ordinary toasts
    pub default_toast_ms: u64,
    /// Duration of the submission success toast
    pub success_toast_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_toast_ms: 5000,
            success_toast_ms: 6000,
        }
    }
}

impl RegdeskConfig {
    /// Default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, "<inline>")
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    fn parse(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no component can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let submission = &self.submission;
        if submission.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "submission.max_attempts must be at least 1".into(),
            ));
        }
        if submission.initial_backoff_ms > submission.max_backoff_ms {
            return Err(ConfigError::Invalid(
                "submission.initial_backoff_ms exceeds submission.max_backoff_ms".into(),
            ));
        }
        if let Some(endpoint) = &submission.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "submission.endpoint must be an http(s) URL, got {endpoint:?}"
                )));
            }
        }
        if self.drafts.freshness_secs == 0 {
            return Err(ConfigError::Invalid(
                "drafts.freshness_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    /// With an HTTP endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.submission.endpoint = Some(endpoint.into());
        self
    }

    /// With a simulated gateway delay
    #[inline]
    #[must_use]
    pub fn with_submission_delay(mut self, delay: Duration) -> Self {
        self.submission.delay_ms = millis(delay);
        self
    }

    /// With a draft directory
    #[inline]
    #[must_use]
    pub fn with_draft_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.drafts.directory = directory.into();
        self
    }

    /// With a team size policy
    #[inline]
    #[must_use]
    pub fn with_team_size_policy(mut self, policy: TeamSizePolicy) -> Self {
        self.validation.team_size_policy = policy;
        self
    }

    /// With a live-validation debounce
    #[inline]
    #[must_use]
    pub fn with_input_debounce(mut self, debounce: Duration) -> Self {
        self.validation.debounce_ms = millis(debounce);
        self
    }

    /// Quiet period for live validation
    #[must_use]
    pub fn input_debounce(&self) -> Duration {
        Duration::from_millis(self.validation.debounce_ms)
    }

    /// Simulated gateway delay
    #[must_use]
    pub fn submission_delay(&self) -> Duration {
        Duration::from_millis(self.submission.delay_ms)
    }

    /// HTTP request timeout
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.submission.request_timeout_ms)
    }

    /// Retry policy for gateway calls
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.submission.max_attempts,
            initial_backoff: Duration::from_millis(self.submission.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.submission.max_backoff_ms),
        }
    }

    /// Draft freshness window
    #[must_use]
    pub fn freshness(&self) -> Duration {
        Duration::from_secs(self.drafts.freshness_secs)
    }

    /// Toast durations
    #[must_use]
    pub fn toast_timings(&self) -> ToastTimings {
        ToastTimings {
            standard: Duration::from_millis(self.notifications.default_toast_ms),
            success: Duration::from_millis(self.notifications.success_toast_ms),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_gives_defaults() {
        let config = RegdeskConfig::from_toml_str("").unwrap();
        assert_eq!(config, RegdeskConfig::default());
        assert_eq!(config.submission_delay(), Duration::from_secs(2));
        assert_eq!(config.freshness(), Duration::from_secs(3600));
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.toast_timings(), ToastTimings::default());
        assert_eq!(config.validation.team_size_policy, TeamSizePolicy::Strict);
        assert_eq!(config.input_debounce(), Duration::from_millis(300));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = RegdeskConfig::from_toml_str(
            r#"
            [submission]
            delay_ms = 10
            endpoint = "https://example.org/api/registrations"

            [validation]
            team_size_policy = "lenient"
            "#,
        )
        .unwrap();

        assert_eq!(config.submission.delay_ms, 10);
        assert_eq!(config.submission.max_attempts, 3);
        assert_eq!(
            config.submission.endpoint.as_deref(),
            Some("https://example.org/api/registrations")
        );
        assert_eq!(config.validation.team_size_policy, TeamSizePolicy::Lenient);
        assert_eq!(config.drafts, DraftConfig::default());
    }

    #[test]
    fn parse_errors_name_their_origin() {
        let err = RegdeskConfig::from_toml_str("[submission\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref origin, .. } if origin == "<inline>"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            RegdeskConfig::from_toml_str("[submission]\nmax_attempts = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RegdeskConfig::from_toml_str("[submission]\nendpoint = \"ftp://x\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RegdeskConfig::from_toml_str("[drafts]\nfreshness_secs = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn load_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regdesk.toml");
        std::fs::write(&path, "[drafts]\nfreshness_secs = 60\n").unwrap();

        let config = RegdeskConfig::load(&path).unwrap();
        assert_eq!(config.freshness(), Duration::from_secs(60));

        let missing = RegdeskConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }

    #[test]
    fn builders() {
        let config = RegdeskConfig::new()
            .with_submission_delay(Duration::from_millis(5))
            .with_team_size_policy(TeamSizePolicy::Lenient)
            .with_draft_directory("/tmp/drafts")
            .with_input_debounce(Duration::from_millis(150));
        assert_eq!(config.submission.delay_ms, 5);
        assert_eq!(config.validation.debounce_ms, 150);
        assert_eq!(config.drafts.directory, PathBuf::from("/tmp/drafts"));
        assert!(config.validate().is_ok());
    }
}
