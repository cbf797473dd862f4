//! Explanation provider boundary.
//!
//! Generating explanation text is an external concern; this module only
//! defines the async request/response contract, an HTTP-backed provider,
//! and a mock for deterministic tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::trace::step::{AlgorithmFamily, StepState};

/// Outbound explanation request payload
#[derive(Debug, Clone, Serialize)]
pub struct ExplainRequest {
    pub family: AlgorithmFamily,
    pub step_index: usize,
    pub state: StepState,
    pub source_code_lines: Vec<String>,
}

/// Error during an explanation call
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("explanation call failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ExplanationProvider: Send + Sync {
    async fn explain(&self, request: ExplainRequest) -> Result<String, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct ExplainResponse {
    explanation: String,
}

/// Provider posting requests to an external HTTP endpoint.
/// Timeout policy belongs to the endpoint, not this client.
pub struct HttpExplanationProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpExplanationProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ExplanationProvider for HttpExplanationProvider {
    async fn explain(&self, request: ExplainRequest) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        let parsed: ExplainResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        Ok(parsed.explanation)
    }
}

/// Configuration for mock provider behavior
#[derive(Clone, Default)]
pub struct MockProviderConfig {
    /// Simulated provider latency
    pub delay: Duration,
    /// Whether every call should fail
    pub fail: bool,
}

/// Deterministic provider for tests and offline CLI use.
/// Records every request it receives.
#[derive(Default)]
pub struct MockProvider {
    config: MockProviderConfig,
    calls: Arc<Mutex<Vec<(AlgorithmFamily, usize)>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.config.delay = delay;
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.config.fail = true;
        self
    }

    /// Request keys received so far, in call order
    pub fn calls(&self) -> Vec<(AlgorithmFamily, usize)> {
        self.calls.lock().clone()
    }

    /// Shared handle to the call log, usable after the provider moves
    /// into a trigger
    pub fn call_log(&self) -> Arc<Mutex<Vec<(AlgorithmFamily, usize)>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl ExplanationProvider for MockProvider {
    async fn explain(&self, request: ExplainRequest) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .push((request.family, request.step_index));
        if !self.config.delay.is_zero() {
            tokio::time::sleep(self.config.delay).await;
        }
        if self.config.fail {
            return Err(ProviderError::Unavailable("mock failure".to_string()));
        }
        Ok(format!(
            "Step {} of a {} run",
            request.step_index,
            request.family.label()
        ))
    }
}
