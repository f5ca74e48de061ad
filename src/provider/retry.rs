use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

use super::{DynProvider, Provider};
use crate::config::Config;
use crate::errors::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            max_retries: cfg.retries,
            base_delay: Duration::from_millis(cfg.retry_base_ms),
            max_delay: Duration::from_millis(cfg.retry_max_ms),
        }
    }

    /// Delay before retry number `attempt` (0-based), without jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

fn with_jitter(delay: Duration) -> Duration {
    let spread = (delay.as_millis() / 10) as u64;
    if spread == 0 {
        return delay;
    }
    delay + Duration::from_millis(rand::thread_rng().gen_range(0..=spread))
}

/// Retries transient failures of the wrapped provider with exponential backoff.
pub struct Retrying {
    inner: DynProvider,
    policy: RetryPolicy,
}

impl Retrying {
    pub fn new(inner: DynProvider, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl Provider for Retrying {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(&self, prompt: &str) -> Result<String, PipelineError> {
        let mut attempt = 0;
        loop {
            match self.inner.complete(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < self.policy.max_retries => {
                    let delay = with_jitter(self.policy.backoff(attempt));
                    log::warn!(
                        "{}: attempt {} failed ({}), retrying in {}ms",
                        self.inner.name(),
                        attempt + 1,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
