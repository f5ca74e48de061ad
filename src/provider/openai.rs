use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{require_credential, Credential, Provider};
use crate::errors::PipelineError;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI-compatible chat completions provider. The prompt is sent as a
/// single user message, with no extra system/developer messages.
pub struct OpenAIProvider {
    model: String,
    api_key: Option<Credential>,
    api_base: String,
    timeout: Duration,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(
        model: String,
        api_key: Option<Credential>,
        api_base: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build openai http client")?;
        Ok(Self {
            model,
            api_key,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout,
            client,
        })
    }
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

fn extract_content(text: &str) -> Result<String, PipelineError> {
    let parsed: ChatResponse = serde_json::from_str(text)
        .map_err(|e| PipelineError::Service(format!("failed to parse OpenAI response: {e}")))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| PipelineError::Service("openai: non-text response".into()))
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, prompt: &str) -> Result<String, PipelineError> {
        let key = require_credential(&self.api_key, API_KEY_ENV)?;

        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "temperature": 0.4
        });

        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));
        log::debug!("openai: POST {}", url);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PipelineError::Timeout(self.timeout)
                } else {
                    PipelineError::Service(format!("openai request failed: {e}"))
                }
            })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| PipelineError::Service(format!("openai read body failed: {e}")))?;

        if !status.is_success() {
            return Err(PipelineError::Service(format!("OpenAI API error ({status}): {text}")));
        }

        extract_content(&text)
    }
}
