//! Single bounded retry for transient provider failures

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use repoglance_utils::error::LlmError;

use crate::types::{LlmBackend, LlmInvocation, LlmResult};

/// A wrapper around an `LlmBackend` that retries transient failures once.
///
/// Outages and timeouts get one wait-and-retry. Auth, quota and configuration
/// errors pass straight through on the first attempt.
pub struct RetryingBackend {
    inner: Box<dyn LlmBackend>,
    delay: Duration,
}

impl RetryingBackend {
    #[must_use]
    pub fn new(inner: Box<dyn LlmBackend>, delay: Duration) -> Self {
        debug!(provider = inner.name(), delay_ms = delay.as_millis(), "Creating RetryingBackend");
        Self { inner, delay }
    }
}

#[async_trait]
impl LlmBackend for RetryingBackend {
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError> {
        let request_id = inv.request_id.clone();

        match self.inner.invoke(inv.clone()).await {
            Ok(result) => Ok(result),
            Err(e) if e.is_retryable() => {
                warn!(
                    request_id = %request_id,
                    error = %e,
                    delay_ms = self.delay.as_millis(),
                    "Transient provider failure, retrying once"
                );
                tokio::time::sleep(self.delay).await;

                let mut result = self.inner.invoke(inv).await.inspect_err(|retry_err| {
                    warn!(request_id = %request_id, error = %retry_err, "Retry failed");
                })?;
                result.attempts = 2;
                Ok(result)
            }
            Err(e) => {
                debug!(request_id = %request_id, kind = e.kind(), "Non-retryable failure");
                Err(e)
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn attempts_for(&self, error: &LlmError) -> u32 {
        if error.is_retryable() { 2 } else { 1 }
    }
}
