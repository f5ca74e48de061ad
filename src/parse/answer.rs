//! Free prose from the Q&A prompt -> `Answer`.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use super::text::{find_collections, hadith_number_after};
use crate::wire::{Answer, Citation, Confidence};

pub const FALLBACK_ANSWER: &str = "Je n'ai pas pu générer une réponse appropriée à cette question.";

const HIGH_MARKERS: &[&str] = &["authentique"];
const SCRIPTURE_MARKERS: &[&str] = &["coran", "quran"];
const LOW_MARKERS: &[&str] = &["incertitude", "pas suffisamment", "controversé", "différences d'opinions"];
const UNKNOWN_MARKERS: &[&str] = &["je ne sais pas", "impossible de déterminer"];

fn fragment_pattern() -> &'static Regex {
    static FRAGMENT: OnceLock<Regex> = OnceLock::new();
    FRAGMENT.get_or_init(|| Regex::new(r"\{[^{}]*:[^{}]*\}|\[[^\[\]]*:[^\[\]]*\]").unwrap())
}

fn filler_pattern() -> &'static Regex {
    static FILLER: OnceLock<Regex> = OnceLock::new();
    FILLER.get_or_init(|| {
        Regex::new(
            r"(?i)^(voici ma réponse|ma réponse est|en réponse à votre question|pour répondre à votre question|here is my answer|my answer is)[\s:,.]*",
        )
        .unwrap()
    })
}

fn verse_pattern() -> &'static Regex {
    static VERSE: OnceLock<Regex> = OnceLock::new();
    VERSE.get_or_init(|| Regex::new(r"\b(\d{1,3}):(\d{1,3})\b").unwrap())
}

fn whitespace_pattern() -> &'static Regex {
    static WS: OnceLock<Regex> = OnceLock::new();
    WS.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Extracts the first top-level JSON object substring from a string.
/// Handles nested braces; returns None if not found.
fn extract_first_json_object(s: &str) -> Option<&str> {
    let mut start = None;
    let mut depth = 0usize;

    for (i, b) in s.bytes().enumerate() {
        if b == b'{' {
            if start.is_none() {
                start = Some(i);
            }
            depth += 1;
        } else if b == b'}' && depth > 0 {
            depth -= 1;
            if depth == 0 {
                if let Some(st) = start {
                    return Some(&s[st..=i]);
                }
            }
        }
    }
    None
}

/// Remove `{..:..}` / `[..:..]` fragments, innermost first, until none are left.
/// Returns None when nothing had to be removed.
pub fn strip_structured_fragments(text: &str) -> Option<String> {
    let re = fragment_pattern();
    if !re.is_match(text) {
        return None;
    }
    let mut current = text.to_string();
    while re.is_match(&current) {
        current = re.replace_all(&current, "").into_owned();
    }
    Some(whitespace_pattern().replace_all(&current, " ").trim().to_string())
}

/// When the whole reply was structured, salvage the first long string value
/// in written order. A parsed object without one yields the fixed answer; only
/// text that does not parse as JSON is flattened.
fn salvage_from_json(raw: &str) -> String {
    let parsed = extract_first_json_object(raw).and_then(|obj| serde_json::from_str::<Value>(obj).ok());
    if let Some(v) = parsed {
        let long = match v {
            Value::Object(map) => map.into_iter().find_map(|(_, val)| match val {
                Value::String(s) if s.chars().count() > 10 => Some(s),
                _ => None,
            }),
            _ => None,
        };
        return long.unwrap_or_else(|| FALLBACK_ANSWER.to_string());
    }

    let stripped = raw
        .replace(['{', '}', '[', ']', '"'], "")
        .replace("answer:", "")
        .replace("confidence:", "")
        .replace("sources:", "");
    let stripped = whitespace_pattern().replace_all(&stripped, " ").trim().to_string();
    if stripped.is_empty() {
        FALLBACK_ANSWER.to_string()
    } else {
        stripped
    }
}

pub fn strip_filler(text: &str) -> String {
    filler_pattern().replace(text.trim(), "").trim().to_string()
}

pub fn classify_confidence(answer: &str) -> Confidence {
    let lower = answer.to_lowercase();
    let has = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));
    if has(SCRIPTURE_MARKERS) && has(HIGH_MARKERS) {
        Confidence::High
    } else if has(LOW_MARKERS) {
        Confidence::Low
    } else if has(UNKNOWN_MARKERS) {
        Confidence::Unknown
    } else {
        Confidence::Medium
    }
}

/// Verse references (`2:255`, surah 1-114) then hadith collections in order of appearance.
pub fn extract_citations(answer: &str) -> Vec<Citation> {
    let mut citations: Vec<Citation> = Vec::new();

    for caps in verse_pattern().captures_iter(answer) {
        let surah: u32 = caps[1].parse().unwrap_or(0);
        let verse: u32 = caps[2].parse().unwrap_or(0);
        if !(1..=114).contains(&surah) || verse == 0 {
            continue;
        }
        let c = Citation {
            title: "Coran".to_string(),
            reference: format!("Sourate {surah}, Verset {verse}"),
        };
        if !citations.contains(&c) {
            citations.push(c);
        }
    }

    for (collection, _, end) in find_collections(answer) {
        let reference = match hadith_number_after(answer, end) {
            Some(n) => format!("Hadith n°{n}"),
            None => "Référence générale".to_string(),
        };
        citations.push(Citation { title: collection.to_string(), reference });
    }

    citations
}

pub fn parse_answer(raw: &str) -> Answer {
    let raw = raw.trim();
    let body = match strip_structured_fragments(raw) {
        Some(rest) if rest.is_empty() => salvage_from_json(raw),
        Some(rest) => rest,
        None => raw.to_string(),
    };

    let mut answer = strip_filler(&body);
    if answer.is_empty() {
        answer = FALLBACK_ANSWER.to_string();
    }

    let confidence = classify_confidence(&answer);
    let citations = extract_citations(&answer);
    Answer {
        answer,
        confidence,
        sources: (!citations.is_empty()).then_some(citations),
    }
}

/// Answer used when the completion call failed and the caller asked for a fallback.
pub fn fallback_answer() -> Answer {
    Answer {
        answer: FALLBACK_ANSWER.to_string(),
        confidence: Confidence::Unknown,
        sources: None,
    }
}
