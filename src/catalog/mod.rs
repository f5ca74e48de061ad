//! Curated invocations shipped with the binary.

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::parse::text::source_from_reference;
use crate::wire::{Invocation, RelatedInvocation};

const EMBEDDED: &str = include_str!("duas.json");

/// Related invocations attached to one record, at most.
pub const MAX_RELATED: usize = 3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyEntry {
    id: String,
    arabic_text: String,
    transliteration: String,
    translation: String,
    source: String,
    #[serde(default)]
    context: String,
    #[serde(default)]
    benefits: Vec<String>,
}

impl From<DailyEntry> for Invocation {
    fn from(d: DailyEntry) -> Self {
        Invocation {
            id: d.id,
            title: None,
            arabic_text: d.arabic_text,
            transliteration: d.transliteration,
            translation: d.translation,
            source: source_from_reference(&d.source),
            context: d.context,
            authenticity: None,
            tags: vec![],
            benefits: d.benefits,
            occasions: vec![],
            word_by_word: None,
            related_duas: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ThemeEntry {
    theme: String,
    duas: Vec<RelatedInvocation>,
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    curated: Vec<Invocation>,
    daily: Vec<DailyEntry>,
    related: Vec<ThemeEntry>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    curated: Vec<Invocation>,
    daily: Vec<Invocation>,
    related: Vec<(String, Vec<RelatedInvocation>)>,
}

impl Catalog {
    /// The set compiled into the binary.
    pub fn load() -> Result<Self> {
        Self::from_json(EMBEDDED).context("embedded catalog is invalid")
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: RawCatalog = serde_json::from_str(raw)?;
        if parsed.daily.is_empty() {
            bail!("catalog has no daily invocations");
        }

        let related = parsed
            .related
            .into_iter()
            .map(|t| {
                let theme = t.theme.to_lowercase();
                let duas = t
                    .duas
                    .into_iter()
                    .enumerate()
                    .map(|(i, mut d)| {
                        if d.id.is_none() {
                            d.id = Some(format!("related-{}-{}", theme, i + 1));
                        }
                        d
                    })
                    .collect();
                (theme, duas)
            })
            .collect();

        Ok(Self {
            curated: parsed.curated,
            daily: parsed.daily.into_iter().map(Invocation::from).collect(),
            related,
        })
    }

    pub fn all(&self) -> &[Invocation] {
        &self.curated
    }

    /// Case-insensitive match on title, translation, transliteration, context and tags.
    /// A blank query returns everything.
    pub fn search(&self, query: &str) -> Vec<&Invocation> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return self.curated.iter().collect();
        }
        self.curated
            .iter()
            .filter(|d| {
                let fields = [
                    d.title.as_deref().unwrap_or_default(),
                    d.translation.as_str(),
                    d.transliteration.as_str(),
                    d.context.as_str(),
                ];
                fields.iter().any(|f| f.to_lowercase().contains(&q))
                    || d.tags.iter().any(|t| t.to_lowercase().contains(&q))
            })
            .collect()
    }

    /// Looks in the curated set first, then the daily set.
    pub fn get(&self, id: &str) -> Option<&Invocation> {
        self.curated
            .iter()
            .chain(self.daily.iter())
            .find(|d| d.id == id)
    }

    /// Same record for the whole calendar day, rotating through the daily set.
    pub fn daily_for(&self, date: NaiveDate) -> &Invocation {
        let idx = date.num_days_from_ce().rem_euclid(self.daily.len() as i32) as usize;
        &self.daily[idx]
    }

    /// Invocations for every theme contained in `theme` (or containing it), capped at [`MAX_RELATED`].
    pub fn related(&self, theme: &str) -> Vec<RelatedInvocation> {
        let wanted = theme.trim().to_lowercase();
        if wanted.is_empty() {
            return vec![];
        }
        let mut out = Vec::new();
        for (key, duas) in &self.related {
            if wanted.contains(key.as_str()) || key.contains(wanted.as_str()) {
                out.extend(duas.iter().cloned());
                if out.len() >= MAX_RELATED {
                    break;
                }
            }
        }
        out.truncate(MAX_RELATED);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::SourceKind;

    fn catalog() -> Catalog {
        Catalog::load().unwrap()
    }

    #[test]
    fn embedded_catalog_loads() {
        let c = catalog();
        assert_eq!(c.all().len(), 5);
        assert!(c.all().iter().all(|d| d.word_by_word.as_ref().is_some_and(|w| !w.is_empty())));
    }

    #[test]
    fn search_is_case_insensitive_and_blank_returns_all() {
        let c = catalog();
        assert_eq!(c.search("  ").len(), 5);
        let hits = c.search("PROTECTION");
        assert!(hits.iter().any(|d| d.id == "dua-001"));
        assert!(c.search("zzz-nothing").is_empty());
    }

    #[test]
    fn get_finds_curated_and_daily() {
        let c = catalog();
        assert_eq!(c.get("dua-001").unwrap().source.kind, SourceKind::Hadith);
        assert!(c.get("daily-1").is_some());
        assert!(c.get("missing").is_none());
    }

    #[test]
    fn daily_sources_are_classified() {
        let c = catalog();
        let d = c.get("daily-1").unwrap();
        assert_eq!(d.source.kind, SourceKind::Hadith);
        assert_eq!(d.source.reference, "Rapporté par Abu Dawud et An-Nasa'i");
    }

    #[test]
    fn daily_is_stable_within_a_day_and_rotates() {
        let c = catalog();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(c.daily_for(day).id, c.daily_for(day).id);
        let ids: std::collections::HashSet<_> = (0..7)
            .map(|i| c.daily_for(day + chrono::Days::new(i)).id.clone())
            .collect();
        assert_eq!(ids.len(), 7);
    }

    #[test]
    fn related_matches_substrings_with_stable_ids() {
        let c = catalog();
        let r = c.related("Protection contre le mal");
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].id.as_deref(), Some("related-protection-1"));
        assert_eq!(c.related("protection")[0].id, r[0].id);
        assert!(c.related("").is_empty());
        assert!(c.related("voyage").is_empty());
    }

    #[test]
    fn related_is_capped() {
        let c = catalog();
        let r = c.related("pardon matin soir protection maladie");
        assert_eq!(r.len(), MAX_RELATED);
    }

    #[test]
    fn rejects_catalog_without_daily_entries() {
        assert!(Catalog::from_json(r#"{"curated":[],"daily":[],"related":[]}"#).is_err());
    }
}
