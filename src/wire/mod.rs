use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ========================================
/// Invocation / answer records
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Quran,
    Hadith,
    Scholars,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Source {
    pub fn new(kind: SourceKind, reference: impl Into<String>) -> Self {
        Self { kind, reference: reference.into(), details: None }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// One unit of a word-by-word gloss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordGloss {
    pub unit: String,
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transliteration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedInvocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub arabic_text: String,
    pub transliteration: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub arabic_text: String,
    pub transliteration: String,
    pub translation: String,
    pub source: Source,
    #[serde(default)]
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticity: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub occasions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_by_word: Option<Vec<WordGloss>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_duas: Option<Vec<RelatedInvocation>>,
}

/// Identifier for records created at runtime (generated or fallback).
pub fn new_invocation_id() -> String {
    format!("generated-{}", Uuid::new_v4().simple())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Citation>>,
}

/// ========================================
/// HTTP request/response bodies
/// ========================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub intention: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

impl GenerateRequest {
    /// `intention` wins over `query`; blank strings count as missing.
    pub fn intention(&self) -> Option<&str> {
        [self.intention.as_deref(), self.query.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationView {
    #[serde(flatten)]
    pub dua: Invocation,
    pub category: String,
    pub generated_context: String,
}

impl InvocationView {
    pub fn new(dua: Invocation, intention: &str) -> Self {
        Self {
            dua,
            category: intention.to_string(),
            generated_context: format!(
                "Cette dua est recommandée pour votre intention: \"{}\"",
                intention
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub dua: InvocationView,
}

#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub success: bool,
    pub data: Answer,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticResponse {
    pub success: bool,
    pub message: String,
    pub response: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuaList {
    pub total: usize,
    pub duas: Vec<Invocation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelatedList {
    pub theme: String,
    pub duas: Vec<RelatedInvocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    pub error: String,
}
