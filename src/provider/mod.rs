use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::ProviderKind;
use crate::config::Config;
use crate::errors::PipelineError;

pub mod gemini;
pub mod openai;
pub mod retry;

/// Opaque text-in/text-out completion service.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;
    async fn complete(&self, prompt: &str) -> Result<String, PipelineError>;
}

pub type DynProvider = Arc<dyn Provider>;

/// API key for the completion service. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Empty or whitespace-only values are treated as absent.
    pub fn from_optional(value: Option<String>) -> Option<Self> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Credential)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// `--api-key` first, then the selected provider's own variable
/// (`GEMINI_API_KEY` or `OPENAI_API_KEY`). One provider's key is never sent to the other.
pub fn resolve_credential(
    kind: ProviderKind,
    explicit: Option<String>,
    env: impl Fn(&str) -> Option<String>,
) -> Option<Credential> {
    Credential::from_optional(explicit).or_else(|| Credential::from_optional(env(kind.api_key_env())))
}

pub(crate) fn require_credential<'a>(
    key: &'a Option<Credential>,
    env_var: &str,
) -> Result<&'a Credential, PipelineError> {
    key.as_ref()
        .ok_or_else(|| PipelineError::Configuration(format!("API key not set ({env_var})")))
}

pub fn make_provider(cfg: &Config, credential: Option<Credential>) -> Result<DynProvider> {
    let timeout = Duration::from_secs(cfg.timeout_secs);
    let base: DynProvider = match cfg.provider {
        ProviderKind::Gemini => Arc::new(gemini::Gemini::new(
            cfg.model.clone(),
            credential,
            cfg.api_base.clone(),
            timeout,
        )?),
        ProviderKind::OpenAI => Arc::new(openai::OpenAIProvider::new(
            cfg.model.clone(),
            credential,
            cfg.api_base.clone(),
            timeout,
        )?),
    };

    if cfg.retries == 0 {
        return Ok(base);
    }
    Ok(Arc::new(retry::Retrying::new(base, retry::RetryPolicy::from_config(cfg))))
}
