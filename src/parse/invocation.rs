//! Labelled model output -> `Invocation`. Total: every missing field gets a fixed default.

use super::text::{extract_label, source_from_reference, split_list};
use crate::prompt::labels;
use crate::wire::{new_invocation_id, Invocation, Source, SourceKind};

pub const DEFAULT_ARABIC: &str = "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ";
pub const DEFAULT_TRANSLITERATION: &str = "Bismillahir Rahmanir Rahim";
pub const BISMILLAH_TRANSLATION: &str = "Au nom d'Allah, le Tout Miséricordieux, le Très Miséricordieux";
pub const DEFAULT_SOURCE_REFERENCE: &str = "Non spécifié";
pub const DEFAULT_BENEFITS: [&str; 2] = ["Renforcement spirituel", "Connexion avec Allah"];
pub const DEFAULT_OCCASION: &str = "Moment de besoin";

pub fn default_translation(intention: &str) -> String {
    let intention = intention.trim();
    if intention.is_empty() {
        BISMILLAH_TRANSLATION.to_string()
    } else {
        format!("Invocation liée à: {intention}")
    }
}

fn default_occasions(intention: &str) -> Vec<String> {
    non_blank(intention)
        .into_iter()
        .chain([DEFAULT_OCCASION.to_string()])
        .collect()
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Collects the degradation note for every label that had to be defaulted.
struct Fields<'a> {
    raw: &'a str,
    degraded: Vec<String>,
}

impl<'a> Fields<'a> {
    fn text(&mut self, label: &str) -> Option<String> {
        let value = extract_label(self.raw, label);
        if value.is_none() {
            self.degraded.push(format!("{label}: missing, using default"));
        }
        value
    }

    fn list(&mut self, label: &str) -> Option<Vec<String>> {
        let items = self.text(label).map(|v| split_list(&v))?;
        if items.is_empty() {
            self.degraded.push(format!("{label}: empty list, using default"));
            return None;
        }
        Some(items)
    }
}

/// Parse raw completion text into a fully-populated record.
///
/// Never fails: labels that are absent (or blank after cleaning) fall back to
/// their documented default, and a note is returned for each one so callers
/// can log the degradation.
pub fn parse_invocation(raw: &str, intention: &str) -> (Invocation, Vec<String>) {
    let mut f = Fields { raw, degraded: Vec::new() };

    let arabic_text = f.text(labels::ARABIC).unwrap_or_else(|| DEFAULT_ARABIC.to_string());
    let transliteration = f
        .text(labels::TRANSLITERATION)
        .unwrap_or_else(|| DEFAULT_TRANSLITERATION.to_string());
    let translation = f
        .text(labels::TRANSLATION)
        .unwrap_or_else(|| default_translation(intention));
    let source = f
        .text(labels::SOURCE)
        .map(|s| source_from_reference(&s))
        .unwrap_or_else(|| Source::new(SourceKind::Quran, DEFAULT_SOURCE_REFERENCE));
    let authenticity = extract_label(raw, labels::AUTHENTICITY);
    let tags = f
        .list(labels::THEMES)
        .unwrap_or_else(|| non_blank(intention).into_iter().collect());
    let context = f
        .text(labels::CONTEXT)
        .unwrap_or_else(|| intention.trim().to_string());
    let benefits = f
        .list(labels::BENEFITS)
        .unwrap_or_else(|| DEFAULT_BENEFITS.iter().map(|b| b.to_string()).collect());
    let occasions = f
        .list(labels::OCCASIONS)
        .unwrap_or_else(|| default_occasions(intention));

    let dua = Invocation {
        id: new_invocation_id(),
        title: None,
        arabic_text,
        transliteration,
        translation,
        source,
        context,
        authenticity,
        tags,
        benefits,
        occasions,
        word_by_word: None,
        related_duas: None,
    };
    (dua, f.degraded)
}

/// Record returned when the completion service could not be reached at all.
pub fn fallback_invocation(intention: &str) -> Invocation {
    let intention = intention.trim();
    Invocation {
        id: new_invocation_id(),
        title: None,
        arabic_text: DEFAULT_ARABIC.to_string(),
        transliteration: DEFAULT_TRANSLITERATION.to_string(),
        translation: format!("{BISMILLAH_TRANSLATION}."),
        source: Source::new(SourceKind::Quran, "Formule d'introduction coranique")
            .with_details("Présente au début de chaque sourate du Coran (sauf At-Tawbah)"),
        context: format!("Cette invocation est appropriée pour votre intention: \"{intention}\""),
        authenticity: Some("Sahih (authentique)".to_string()),
        tags: non_blank(intention).into_iter().collect(),
        benefits: vec![
            "Protection divine".to_string(),
            "Bénédiction de l'action entreprise".to_string(),
            "Rappel de la miséricorde d'Allah".to_string(),
        ],
        occasions: ["Début de toute action importante".to_string(), DEFAULT_OCCASION.to_string()]
            .into_iter()
            .chain(non_blank(intention))
            .collect(),
        word_by_word: None,
        related_duas: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "Texte arabe: رَبِّ زِدْنِي عِلْمًا\n\
Translitération: Rabbi zidni 'ilma\n\
Traduction: \"Seigneur, accrois-moi en science\"\n\
Source: Sourate Taha 20:114\n\
Authentication: Sahih\n\
Thèmes: études, science\n\
Contexte: Avant d'étudier\n\
Bienfaits: Connaissance, Compréhension\n\
Occasions: Avant un examen, En révisant\n";

    #[test]
    fn full_response_parses_without_degradation() {
        let (dua, degraded) = parse_invocation(FULL, "examens");
        assert!(degraded.is_empty(), "{degraded:?}");
        assert_eq!(dua.arabic_text, "رَبِّ زِدْنِي عِلْمًا");
        assert_eq!(dua.transliteration, "Rabbi zidni 'ilma");
        assert_eq!(dua.translation, "Seigneur, accrois-moi en science");
        assert_eq!(dua.source.kind, SourceKind::Quran);
        assert_eq!(dua.source.reference, "Sourate Taha 20:114");
        assert_eq!(dua.authenticity.as_deref(), Some("Sahih"));
        assert_eq!(dua.tags, vec!["études", "science"]);
        assert_eq!(dua.context, "Avant d'étudier");
        assert_eq!(dua.benefits, vec!["Connaissance", "Compréhension"]);
        assert_eq!(dua.occasions, vec!["Avant un examen", "En révisant"]);
    }

    #[test]
    fn unlabelled_text_yields_documented_defaults() {
        let (dua, degraded) = parse_invocation("Je ne peux pas répondre à cela.", "voyage");
        assert_eq!(degraded.len(), 8);
        assert_eq!(dua.arabic_text, DEFAULT_ARABIC);
        assert_eq!(dua.transliteration, DEFAULT_TRANSLITERATION);
        assert_eq!(dua.translation, "Invocation liée à: voyage");
        assert_eq!(dua.source.kind, SourceKind::Quran);
        assert_eq!(dua.source.reference, DEFAULT_SOURCE_REFERENCE);
        assert_eq!(dua.context, "voyage");
        assert_eq!(dua.tags, vec!["voyage"]);
        assert_eq!(dua.benefits, vec!["Renforcement spirituel", "Connexion avec Allah"]);
        assert_eq!(dua.occasions, vec!["voyage", "Moment de besoin"]);
        assert!(dua.authenticity.is_none());
    }

    #[test]
    fn empty_output_still_produces_a_record() {
        let (dua, _) = parse_invocation("", "");
        assert!(!dua.id.is_empty());
        assert_eq!(dua.translation, BISMILLAH_TRANSLATION);
        assert!(dua.tags.is_empty());
        assert_eq!(dua.occasions, vec!["Moment de besoin"]);
    }

    #[test]
    fn only_missing_fields_are_defaulted() {
        let raw = "Traduction: Ô Allah, protège-moi\nSource: Sahih Muslim\nBienfaits: , ,";
        let (dua, degraded) = parse_invocation(raw, "protection");
        assert_eq!(dua.translation, "Ô Allah, protège-moi");
        assert_eq!(dua.source.kind, SourceKind::Hadith);
        assert_eq!(dua.arabic_text, DEFAULT_ARABIC);
        assert_eq!(dua.benefits, vec!["Renforcement spirituel", "Connexion avec Allah"]);
        assert!(degraded.iter().any(|d| d.starts_with("Bienfaits: empty list")));
        assert!(!degraded.iter().any(|d| d.starts_with("Traduction")));
    }

    #[test]
    fn each_parse_gets_a_fresh_id() {
        let (a, _) = parse_invocation(FULL, "x");
        let (b, _) = parse_invocation(FULL, "x");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn fallback_record_mentions_intention() {
        let dua = fallback_invocation("  guérison ");
        assert_eq!(dua.source.reference, "Formule d'introduction coranique");
        assert_eq!(dua.occasions.last().map(String::as_str), Some("guérison"));
        assert!(dua.context.contains("\"guérison\""));
        assert_eq!(dua.benefits.len(), 3);
    }
}
