//! Text cleaning and classification helpers shared by both parser paths.

use regex::Regex;
use std::sync::OnceLock;

use crate::wire::{Source, SourceKind};

const QUOTE_CHARS: &[char] = &['"', '\'', '“', '”', '«', '»', '‘', '’', '`'];

/// Hadith collections, longest spellings first so short forms only match on their own.
pub const HADITH_COLLECTIONS: &[&str] = &[
    "Sahih al-Bukhari",
    "Sahih Muslim",
    "Sunan Abu Dawood",
    "Sunan Abu Dawud",
    "Jami at-Tirmidhi",
    "Sunan an-Nasa'i",
    "Sunan Ibn Majah",
    "Muwatta Malik",
    "Musnad Ahmad",
    "Al-Bukhari",
    "Bukhari",
    "Muslim",
    "Abu Dawood",
    "Abu Dawud",
    "Tirmidhi",
    "Nasa'i",
    "Ibn Majah",
];

const SCHOLAR_KEYWORDS: &[&str] = &["savant", "érudit", "erudit", "scholar", "consensus", "ijma"];

/// Strip surrounding whitespace and quote characters until nothing changes.
pub fn clean_text(text: &str) -> String {
    let mut s = text.trim();
    loop {
        let next = s.trim_matches(QUOTE_CHARS).trim();
        if next == s {
            return s.to_string();
        }
        s = next;
    }
}

/// Split a label value on list separators; blank items are dropped.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', ';', '،'])
        .map(clean_text)
        .filter(|s| !s.is_empty())
        .collect()
}

/// First `Label: value` line in `raw`, cleaned. Leading bullets and markdown
/// emphasis around the label are tolerated.
pub fn extract_label(raw: &str, label: &str) -> Option<String> {
    let pattern = format!(r"(?m)^[ \t]*[-*•]*[ \t]*\**{}\**[ \t]*:[ \t*]*(.+)$", regex::escape(label));
    let re = Regex::new(&pattern).ok()?;
    let value = clean_text(re.captures(raw)?.get(1)?.as_str());
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn collection_pattern(name: &str) -> Regex {
    // Word-bounded for citations; classification uses the looser mentions_collection.
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(name))).unwrap()
}

fn collection_patterns() -> &'static Vec<(&'static str, Regex)> {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        HADITH_COLLECTIONS
            .iter()
            .map(|name| (*name, collection_pattern(name)))
            .collect()
    })
}

/// Hadith collections mentioned in `text`, with the byte range of each mention.
/// A short form found only inside a longer, already-reported name is skipped.
pub fn find_collections(text: &str) -> Vec<(&'static str, usize, usize)> {
    let mut found: Vec<(&'static str, usize, usize)> = Vec::new();
    for (name, re) in collection_patterns() {
        let standalone = re.find_iter(text).find(|m| {
            !found
                .iter()
                .any(|(_, start, end)| m.start() >= *start && m.end() <= *end)
        });
        if let Some(m) = standalone {
            found.push((name, m.start(), m.end()));
        }
    }
    found.sort_by_key(|(_, start, _)| *start);
    found
}

/// Case-insensitive substring test, looser than [`find_collections`]:
/// `Bukhari6306` or `Muslims` in an attribution line still count.
pub fn mentions_collection(text: &str) -> bool {
    let lower = text.to_lowercase();
    HADITH_COLLECTIONS
        .iter()
        .any(|name| lower.contains(&name.to_lowercase()))
}

/// Tag an attribution string: hadith collections first, then scholarly
/// keywords; anything else is treated as a Quran reference.
pub fn classify_source(reference: &str) -> SourceKind {
    if mentions_collection(reference) {
        return SourceKind::Hadith;
    }
    let lower = reference.to_lowercase();
    if SCHOLAR_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return SourceKind::Scholars;
    }
    SourceKind::Quran
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HadithReference {
    pub collection: String,
    pub number: Option<String>,
    pub grade: Option<String>,
}

fn grade_pattern() -> &'static Regex {
    static GRADE: OnceLock<Regex> = OnceLock::new();
    GRADE.get_or_init(|| Regex::new(r"(?i)\b(sahih|hassan|hasan|daif|da'if|maudu|mawdu)\b").unwrap())
}

fn canonical_grade(word: &str) -> &'static str {
    match word.to_lowercase().as_str() {
        "sahih" => "Sahih",
        "hasan" | "hassan" => "Hasan",
        "daif" | "da'if" => "Daif",
        _ => "Mawdu",
    }
}

/// Grade word outside every collection name, so "Sahih al-Bukhari" alone carries no grade.
fn grade_outside(text: &str, spans: &[(&'static str, usize, usize)]) -> Option<&'static str> {
    grade_pattern()
        .find_iter(text)
        .find(|m| !spans.iter().any(|(_, start, end)| m.start() < *end && m.end() > *start))
        .map(|m| canonical_grade(m.as_str()))
}

/// Hadith number written right after a collection name (`n° 123`, `numéro 123`, `number 123`, `#123`).
pub fn hadith_number_after(text: &str, end: usize) -> Option<String> {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let re = NUMBER.get_or_init(|| {
        Regex::new(r"(?i)^[\s,:]*(?:(?:n[o°]?\.?|numéro|numero|number|hadith|#)\s*)?(\d+)").unwrap()
    });
    let rest = text.get(end..)?;
    re.captures(rest).map(|c| c[1].to_string())
}

pub fn extract_hadith_reference(text: &str) -> Option<HadithReference> {
    let spans = find_collections(text);
    let (collection, _, end) = *spans.first()?;
    Some(HadithReference {
        collection: collection.to_string(),
        number: hadith_number_after(text, end),
        grade: grade_outside(text, &spans).map(str::to_string),
    })
}

/// Build a typed source from a cleaned attribution string.
pub fn source_from_reference(reference: &str) -> Source {
    let kind = classify_source(reference);
    let mut source = Source::new(kind, reference);
    if kind == SourceKind::Hadith {
        if let Some(h) = extract_hadith_reference(reference) {
            let details: Vec<String> = h
                .number
                .map(|n| format!("{} n°{}", h.collection, n))
                .into_iter()
                .chain(h.grade)
                .collect();
            if !details.is_empty() {
                source = source.with_details(details.join(" · "));
            }
        }
    }
    source
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_quotes_and_whitespace() {
        assert_eq!(clean_text("  \"Rabbi zidni 'ilma\"  "), "Rabbi zidni 'ilma");
        assert_eq!(clean_text("« Seigneur »"), "Seigneur");
        assert_eq!(clean_text(" ' \"x\" ' "), "x");
        assert_eq!(clean_text("\"\""), "");
    }

    #[test]
    fn clean_is_idempotent() {
        for input in [" 'x' ", "\"a, b\"", "  plain  ", "' \"nested\" '", "l'âme"] {
            let once = clean_text(input);
            assert_eq!(clean_text(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn split_list_trims_and_drops_blanks() {
        assert_eq!(split_list("a, b ,, 'c'"), vec!["a", "b", "c"]);
        assert_eq!(split_list("protection; paix"), vec!["protection", "paix"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn extract_label_is_line_anchored() {
        let raw = "Texte arabe: X\nNote - Source: ignored\nSource: Coran 2:201\n";
        assert_eq!(extract_label(raw, "Source").as_deref(), Some("Coran 2:201"));
        assert_eq!(extract_label(raw, "Texte arabe").as_deref(), Some("X"));
        assert_eq!(extract_label(raw, "Traduction"), None);
    }

    #[test]
    fn extract_label_tolerates_markdown() {
        let raw = "**Traduction:** \"Seigneur, accrois-moi en science\"\n- Thèmes: études, savoir";
        assert_eq!(
            extract_label(raw, "Traduction").as_deref(),
            Some("Seigneur, accrois-moi en science")
        );
        assert_eq!(extract_label(raw, "Thèmes").as_deref(), Some("études, savoir"));
    }

    #[test]
    fn blank_label_value_counts_as_missing() {
        assert_eq!(extract_label("Source: \"\"\n", "Source"), None);
    }

    #[test]
    fn classifies_known_collections_case_insensitively() {
        assert_eq!(classify_source("Sahih al-Bukhari"), SourceKind::Hadith);
        assert_eq!(classify_source("rapporté par muslim"), SourceKind::Hadith);
        assert_eq!(classify_source("Abu Dawud et An-Nasa'i"), SourceKind::Hadith);
        assert_eq!(classify_source("Avis des savants"), SourceKind::Scholars);
        assert_eq!(classify_source("Sourate Taha 20:114"), SourceKind::Quran);
        assert_eq!(classify_source("Non spécifié"), SourceKind::Quran);
    }

    #[test]
    fn classification_is_a_plain_substring_match() {
        assert_eq!(classify_source("Bukhari6306"), SourceKind::Hadith);
        assert_eq!(classify_source("Rapporté par les Muslims"), SourceKind::Hadith);
        assert!(find_collections("Bukhari6306").is_empty());
    }

    #[test]
    fn grade_inside_collection_name_is_ignored() {
        let h = extract_hadith_reference("Sahih al-Bukhari et Sahih Muslim").unwrap();
        assert_eq!(h.grade, None);
        let h = extract_hadith_reference("Sahih Muslim, da'if selon certains").unwrap();
        assert_eq!(h.grade.as_deref(), Some("Daif"));
    }

    #[test]
    fn short_forms_inside_long_names_are_not_repeated() {
        let names: Vec<&str> = find_collections("Sahih al-Bukhari et Sahih Muslim")
            .into_iter()
            .map(|(n, _, _)| n)
            .collect();
        assert_eq!(names, vec!["Sahih al-Bukhari", "Sahih Muslim"]);
    }

    #[test]
    fn hadith_reference_with_number_and_grade() {
        let h = extract_hadith_reference("Sahih Muslim n° 2722, hadith sahih").unwrap();
        assert_eq!(h.collection, "Sahih Muslim");
        assert_eq!(h.number.as_deref(), Some("2722"));
        assert_eq!(h.grade.as_deref(), Some("Sahih"));

        assert!(extract_hadith_reference("Coran 2:255").is_none());
    }

    #[test]
    fn hadith_sources_get_details() {
        let s = source_from_reference("Sahih al-Bukhari numéro 6306");
        assert_eq!(s.kind, SourceKind::Hadith);
        assert_eq!(s.details.as_deref(), Some("Sahih al-Bukhari n°6306"));

        let s = source_from_reference("Sahih Muslim 2722 (hasan)");
        assert_eq!(s.details.as_deref(), Some("Sahih Muslim n°2722 · Hasan"));

        let s = source_from_reference("Coran 2:201");
        assert_eq!(s.kind, SourceKind::Quran);
        assert!(s.details.is_none());
    }
}
