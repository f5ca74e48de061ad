use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{require_credential, Credential, Provider};
use crate::errors::PipelineError;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub struct Gemini {
    pub model: String,
    api_key: Option<Credential>,
    pub api_base: String,
    pub timeout: Duration,
    client: Client,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Deserialize)]
struct PartOut {
    #[serde(default)]
    text: String,
}

impl Gemini {
    pub fn new(
        model: String,
        api_key: Option<Credential>,
        api_base: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build gemini http client")?;
        Ok(Self {
            model,
            api_key,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(body: &str) -> Result<String, PipelineError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| PipelineError::Service(format!("gemini response parse error: {e}")))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(PipelineError::Service("gemini: non-text response".into()));
    }
    Ok(text)
}

#[async_trait]
impl Provider for Gemini {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String, PipelineError> {
        let key = require_credential(&self.api_key, API_KEY_ENV)?;
        let url = self.endpoint();
        let body = GenerateContentRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
        };

        log::debug!("gemini: POST {}", url);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PipelineError::Timeout(self.timeout)
                } else {
                    PipelineError::Service(format!("gemini request failed: {e}"))
                }
            })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| PipelineError::Service(format!("gemini read body failed: {e}")))?;

        if !status.is_success() {
            return Err(PipelineError::Service(format!("gemini API error ({status}): {text}")));
        }

        extract_text(&text)
    }
}
