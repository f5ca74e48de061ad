use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "google")]
    Gemini,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
}

impl ProviderKind {
    /// Environment variable the credential is read from when `--api-key` is absent.
    pub fn api_key_env(self) -> &'static str {
        match self {
            ProviderKind::Gemini => crate::provider::gemini::API_KEY_ENV,
            ProviderKind::OpenAI => crate::provider::openai::API_KEY_ENV,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "nour-al-qalb", version, about = "Dua generation, Q&A and curated invocations over HTTP")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, value_enum, global = true)]
    pub provider: Option<ProviderKind>,

    #[arg(long, global = true)]
    pub model: Option<String>,

    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Overrides the provider's key variable
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[arg(long, global = true)]
    pub retries: Option<u32>,

    #[arg(long, global = true)]
    pub transcripts_dir: Option<String>,

    #[arg(long, default_value_t = false, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve {
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        bind: Option<String>,
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,
    },
    /// Generate one dua for an intention and print it
    Generate { intention: String },
    /// Ask a question and print the answer
    Ask { question: String },
    /// Send a trivial prompt to check the completion service
    Diagnose,
}
