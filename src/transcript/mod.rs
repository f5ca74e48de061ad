use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::Serialize;
use serde_json::to_string_pretty;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::errors::PipelineError;

#[derive(Debug, Serialize)]
struct Transcript<'a> {
    id: Uuid,
    stage: &'a str,
    provider: &'a str,
    timestamp: DateTime<Utc>,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Writes one JSON file per completion call under `{dir}/{YYYY-MM-DD}/`.
#[derive(Debug, Clone)]
pub struct TranscriptSink {
    dir: PathBuf,
}

fn day_dir(root: &Path, at: DateTime<Utc>) -> PathBuf {
    root.join(at.format("%Y-%m-%d").to_string())
}

impl TranscriptSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save(
        &self,
        stage: &str,
        provider: &str,
        prompt: &str,
        outcome: Result<&str, &PipelineError>,
    ) -> anyhow::Result<PathBuf> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let (output, error) = match outcome {
            Ok(text) => (Some(text), None),
            Err(e) => (None, Some(e.to_string())),
        };
        let t = Transcript { id, stage, provider, timestamp: now, prompt, output, error };

        let dir = day_dir(&self.dir, now);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{id}-{stage}.json"));
        fs::write(&path, to_string_pretty(&t)?)?;
        Ok(path)
    }

    /// Like [`save`](Self::save) but only logs on failure.
    pub fn record(&self, stage: &str, provider: &str, prompt: &str, outcome: Result<&str, &PipelineError>) {
        match self.save(stage, provider, prompt, outcome) {
            Ok(path) => log::debug!("transcript[{stage}] saved at {}", path.display()),
            Err(e) => log::warn!("transcript[{stage}] not saved: {e:#}"),
        }
    }
}
