//! Movie metadata provider abstraction
//!
//! Each upstream directory (Popcorn Time, YTS) has its own query grammar and
//! response shape. A provider executes one `ProviderQuery` and adapts the raw
//! payload into normalized `MovieRecord`s, so nothing past this module ever
//! sees provider JSON.

use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::timeout;
use tracing::instrument;

use crate::{
    config::{Config, MAX_PROVIDER_RETRIES},
    models::{MovieRecord, ProviderKind},
    services::query_builder::ProviderQuery,
};

pub mod popcorn;
pub mod yts;

pub use popcorn::PopcornProvider;
pub use yts::YtsProvider;

/// Why a single provider call did not produce records
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Transport failures and timeouts may succeed on a second attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Transport(_) | ProviderError::Timeout(_))
    }
}

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Execute one query and adapt the response into normalized records
    async fn fetch_movies(&self, query: &ProviderQuery) -> Result<Vec<MovieRecord>, ProviderError>;

    /// Which upstream this provider talks to
    fn kind(&self) -> ProviderKind;
}

/// Failure of one provider within an aggregation call
#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: ProviderKind,
    pub error: ProviderError,
}

/// Result of invoking one provider
#[derive(Debug)]
pub enum ProviderOutcome {
    Records(Vec<MovieRecord>),
    Failed(ProviderFailure),
}

impl ProviderOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ProviderOutcome::Failed(_))
    }
}

/// Timeout and retry bounds for provider calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvokePolicy {
    timeout: Duration,
    max_retries: u32,
}

impl InvokePolicy {
    pub fn new(timeout: Duration, max_retries: u32) -> Self {
        Self {
            timeout,
            max_retries: max_retries.min(MAX_PROVIDER_RETRIES),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.provider_timeout(), config.provider_retries())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

impl Default for InvokePolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(10), MAX_PROVIDER_RETRIES)
    }
}

/// Runs one provider query to completion.
///
/// Every attempt is bounded by the policy timeout. Only transport failures
/// and timeouts are retried. No error escapes: failures come back as
/// `ProviderOutcome::Failed`, tagged with the provider's own kind.
#[instrument(skip_all, fields(provider = %provider.kind(), mode = %query.mode()))]
pub async fn invoke(
    provider: &dyn MovieProvider,
    query: &ProviderQuery,
    policy: &InvokePolicy,
) -> ProviderOutcome {
    let kind = provider.kind();
    debug_assert_eq!(kind, query.provider(), "query built for another provider");

    let mut attempt = 0;

    loop {
        let result = match timeout(policy.timeout, provider.fetch_movies(query)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(policy.timeout)),
        };

        match result {
            Ok(records) => return ProviderOutcome::Records(records),
            Err(error) if error.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                tracing::debug!(attempt = attempt, error = %error, "Retrying provider call");
            }
            Err(error) => {
                tracing::debug!(url = %query.url(), error = %error, "Provider call failed");
                return ProviderOutcome::Failed(ProviderFailure {
                    provider: kind,
                    error,
                });
            }
        }
    }
}

/// GETs a provider query and decodes the JSON body
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    http_client: &reqwest::Client,
    query: &ProviderQuery,
) -> Result<T, ProviderError> {
    let response = http_client
        .get(query.url())
        .query(query.params())
        .send()
        .await
        .map_err(|e| ProviderError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::Transport(e.to_string()))?;

    serde_json::from_str(&body).map_err(|e| ProviderError::Malformed(e.to_string()))
}
