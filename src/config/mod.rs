use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::cli::{Args, Command, ProviderKind};
use crate::pipeline::{FailurePolicy, PipelineSettings};

/// Runtime settings. The API key is deliberately not part of this file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub provider: ProviderKind,
    pub model: String,
    pub api_base: Option<String>,
    pub timeout_secs: u64,
    pub retries: u32,
    pub retry_base_ms: u64,
    pub retry_max_ms: u64,
    pub generation_on_failure: FailurePolicy,
    pub answer_on_failure: FailurePolicy,
    pub cors_origins: Vec<String>,
    pub transcripts_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 3000,
            provider: ProviderKind::Gemini,
            model: "gemini-2.0-flash".into(),
            api_base: None,
            timeout_secs: 15,
            retries: 2,
            retry_base_ms: 500,
            retry_max_ms: 4000,
            generation_on_failure: FailurePolicy::Fallback,
            answer_on_failure: FailurePolicy::Propagate,
            cors_origins: vec![],
            transcripts_dir: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw).with_context(|| format!("while reading {}", path.display()))
    }

    /// Defaults, then the optional `--config` file, then command-line flags.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(p) => Self::load(Path::new(p))?,
            None => Self::default(),
        };
        cfg.apply_args(args);
        Ok(cfg)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(p) = args.provider {
            self.provider = p;
        }
        if let Some(m) = &args.model {
            self.model = m.clone();
        }
        if let Some(b) = &args.api_base {
            self.api_base = Some(b.clone());
        }
        if let Some(t) = args.timeout_secs {
            self.timeout_secs = t;
        }
        if let Some(r) = args.retries {
            self.retries = r;
        }
        if let Some(d) = &args.transcripts_dir {
            self.transcripts_dir = Some(d.clone());
        }
        if let Some(Command::Serve { port, bind, cors_origins }) = &args.command {
            if let Some(port) = port {
                self.port = *port;
            }
            if let Some(bind) = bind {
                self.bind = bind.clone();
            }
            if !cors_origins.is_empty() {
                self.cors_origins = cors_origins.clone();
            }
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            deadline: Duration::from_secs(self.timeout_secs),
            generation_on_failure: self.generation_on_failure,
            answer_on_failure: self.answer_on_failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml_str(
            r#"
port = 8080
answer_on_failure = "fallback"
"#,
        )
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.answer_on_failure, FailurePolicy::Fallback);
        assert_eq!(cfg.generation_on_failure, FailurePolicy::Fallback);
        assert_eq!(cfg.timeout_secs, 15);
        assert_eq!(cfg.model, "gemini-2.0-flash");
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(Config::from_toml_str(r#"provider = "mistral""#).is_err());
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 8080\nretries = 5\nprovider = \"openai\"").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let args = Args::try_parse_from([
            "nour-al-qalb",
            "--config",
            path.as_str(),
            "--retries",
            "0",
            "serve",
            "--port",
            "9090",
        ])
        .unwrap();
        let cfg = Config::resolve(&args).unwrap();
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.retries, 0);
        assert_eq!(cfg.provider, ProviderKind::OpenAI);
    }

    #[test]
    fn settings_carry_deadline_and_policies() {
        let s = Config::default().pipeline_settings();
        assert_eq!(s.deadline, Duration::from_secs(15));
        assert_eq!(s.generation_on_failure, FailurePolicy::Fallback);
        assert_eq!(s.answer_on_failure, FailurePolicy::Propagate);
    }
}
