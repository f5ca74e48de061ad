use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::errors::PipelineError;
use crate::parse::{fallback_answer, fallback_invocation, parse_answer, parse_invocation};
use crate::prompt::{answer_prompt, invocation_prompt, require_text, DIAGNOSTIC_PROMPT};
use crate::provider::DynProvider;
use crate::transcript::TranscriptSink;
use crate::wire::{Answer, Invocation};

/// What a call site does when the completion service fails or times out.
/// Validation and configuration errors are returned regardless.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    Fallback,
    Propagate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub deadline: Duration,
    pub generation_on_failure: FailurePolicy,
    pub answer_on_failure: FailurePolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(15),
            generation_on_failure: FailurePolicy::Fallback,
            answer_on_failure: FailurePolicy::Propagate,
        }
    }
}

pub struct Pipeline {
    provider: DynProvider,
    settings: PipelineSettings,
    catalog: Option<Arc<Catalog>>,
    transcripts: Option<TranscriptSink>,
}

impl Pipeline {
    pub fn new(provider: DynProvider, settings: PipelineSettings) -> Self {
        Self { provider, settings, catalog: None, transcripts: None }
    }

    /// Related invocations are looked up here for generated records.
    pub fn with_catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_transcripts(mut self, sink: TranscriptSink) -> Self {
        self.transcripts = Some(sink);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// One completion call under the wall-clock deadline. Retries, if any, happen inside it.
    async fn complete(&self, stage: &str, prompt: &str) -> Result<String, PipelineError> {
        log::info!(
            "{stage}: sending prompt to {} ({} chars)",
            self.provider.name(),
            prompt.chars().count()
        );
        let deadline = self.settings.deadline;
        let result = match tokio::time::timeout(deadline, self.provider.complete(prompt)).await {
            Ok(r) => r,
            Err(_) => Err(PipelineError::Timeout(deadline)),
        };

        if let Some(sink) = &self.transcripts {
            sink.record(stage, self.provider.name(), prompt, result.as_deref());
        }
        if let Ok(raw) = &result {
            log::debug!("{stage}: raw completion:\n{raw}");
        }
        result
    }

    fn recover<T>(
        stage: &str,
        policy: FailurePolicy,
        err: PipelineError,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, PipelineError> {
        if err.is_transient() && policy == FailurePolicy::Fallback {
            log::warn!("{stage}: {err}; returning fallback");
            return Ok(fallback());
        }
        log::error!("{stage}: {err}");
        Err(err)
    }

    pub async fn generate_invocation(&self, intention: &str) -> Result<Invocation, PipelineError> {
        let intention = require_text(intention, "intention")?;
        let prompt = invocation_prompt(intention);

        let mut dua = match self.complete("generate", &prompt).await {
            Ok(raw) => {
                let (dua, degraded) = parse_invocation(&raw, intention);
                for note in &degraded {
                    log::debug!("generate: {note}");
                }
                dua
            }
            Err(e) => Self::recover("generate", self.settings.generation_on_failure, e, || {
                fallback_invocation(intention)
            })?,
        };

        if let Some(catalog) = &self.catalog {
            let related = catalog.related(intention);
            if !related.is_empty() {
                dua.related_duas = Some(related);
            }
        }
        Ok(dua)
    }

    pub async fn answer(&self, question: &str) -> Result<Answer, PipelineError> {
        let question = require_text(question, "question")?;
        let prompt = answer_prompt(question);

        match self.complete("answer", &prompt).await {
            Ok(raw) => Ok(parse_answer(&raw)),
            Err(e) => Self::recover("answer", self.settings.answer_on_failure, e, fallback_answer),
        }
    }

    /// Round-trip a trivial prompt. Failures are always returned.
    pub async fn diagnose(&self) -> Result<String, PipelineError> {
        match self.complete("diagnose", DIAGNOSTIC_PROMPT).await {
            Ok(text) => Ok(text.trim().to_string()),
            Err(e) => {
                log::error!("diagnose: {e}");
                Err(e)
            }
        }
    }
}
