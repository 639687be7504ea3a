//! Registration backend
//!
//! A submission is a typed request answered by a receipt or a classified
//! error. Transient failures are retried with capped exponential backoff;
//! rejections are final.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regdesk_rules::{CompetitionId, FormValues};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::time::Duration;
use thiserror::Error;
use ulid::Ulid;

/// Idempotency key for one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(Ulid);

impl SubmissionId {
    /// Fresh id
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Payload sent to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    /// Idempotency key, stable across retries
    pub id: SubmissionId,
    /// Competition being registered for
    pub competition: CompetitionId,
    /// Every form field by name
    pub values: FormValues,
}

impl SubmissionRequest {
    /// Request with a fresh id
    #[must_use]
    pub fn new(competition: CompetitionId, values: FormValues) -> Self {
        Self {
            id: SubmissionId::new(),
            competition,
            values,
        }
    }
}

/// Backend acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// Id of the accepted request
    pub id: SubmissionId,
    /// When the backend accepted it
    pub accepted_at: DateTime<Utc>,
}

/// Gateway failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Worth retrying: network trouble, timeouts, overload
    #[error("transient gateway failure: {0}")]
    Transient(String),

    /// The backend refused the registration
    #[error("registration rejected ({status}): {reason}")]
    Rejected {
        /// HTTP status
        status: u16,
        /// Response body or status text
        reason: String,
    },

    /// The request could not be built
    #[error("gateway client error: {0}")]
    Client(String),
}

impl GatewayError {
    /// Whether another attempt may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Map a non-success HTTP status to an error
///
/// 5xx, 408 and 429 are transient; every other status is a rejection.
#[must_use]
pub fn classify_status(status: u16, reason: impl Into<String>) -> GatewayError {
    let reason = reason.into();
    match status {
        408 | 429 | 500..=599 => GatewayError::Transient(format!("HTTP {status}: {reason}")),
        _ => GatewayError::Rejected { status, reason },
    }
}

/// Accepts or refuses registrations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationGateway: Send + Sync + Debug {
    /// Submit one registration
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionReceipt, GatewayError>;
}

/// Accepts every request after a fixed delay
#[derive(Debug, Clone, Copy)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    /// Standard two-second delay
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

    /// Gateway answering after `delay`
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Configured delay
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl RegistrationGateway for SimulatedGateway {
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionReceipt, GatewayError> {
        tokio::time::sleep(self.delay).await;
        Ok(SubmissionReceipt {
            id: request.id,
            accepted_at: Utc::now(),
        })
    }
}

/// Posts registrations as JSON to an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGateway {
    /// Client with a per-request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Target URL
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RegistrationGateway for HttpGateway {
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionReceipt, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Idempotency-Key", request.id.to_string())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    GatewayError::Client(e.to_string())
                } else {
                    GatewayError::Transient(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(SubmissionReceipt {
                id: request.id,
                accepted_at: Utc::now(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        let reason = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("unknown").to_string()
        } else {
            body
        };
        Err(classify_status(status.as_u16(), reason))
    }
}

/// Bounded exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts including the first; zero behaves as one
    pub max_attempts: u32,
    /// Wait before the second attempt
    pub initial_backoff: Duration,
    /// Upper bound on any single wait
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Single attempt, no retries
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Wait after failed attempt number `attempt` (1-based)
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_millis(4000),
        }
    }
}

/// Submit, retrying transient failures per `policy`
pub async fn submit_with_retry(
    gateway: &dyn RegistrationGateway,
    request: &SubmissionRequest,
    policy: &RetryPolicy,
) -> Result<SubmissionReceipt, GatewayError> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match gateway.submit(request).await {
            Ok(receipt) => return Ok(receipt),
            Err(e) if e.is_retryable() && attempt < attempts => {
                let wait = policy.backoff_for(attempt);
                tracing::warn!(
                    submission = %request.id,
                    attempt,
                    wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "Retrying submission"
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
