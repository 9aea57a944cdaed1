//! Literal phrase-matching scorers.
//!
//! Two strategies live here and they are deliberately separate types: [`CategoryScorer`]
//! combines weighted 0-100 category scores for scripted scenarios, while [`ObjectionScorer`]
//! awards flat integer points for the objection mini-game. Matching is a case-insensitive
//! substring presence test in both; repeated occurrences of a phrase count once.

mod category;
mod gate;
mod objection;
mod rubric;

pub use category::{CategoryScorer, PhraseScore};
pub use gate::{ResponseGate, ValidationIssue};
pub use objection::{ObjectionScore, ObjectionScorer};
pub use rubric::{Category, KeyPhrase, ObjectionRubric, ScoringRubric};

/// Points removed from a category for each forbidden phrase used.
pub const CATEGORY_VIOLATION_PENALTY: f64 = 25.0;
/// Flat bonus for each distinct approved phrase in an objection response.
pub const APPROVED_PHRASE_BONUS: i64 = 50;
/// Flat deduction when an objection response uses any forbidden phrase.
pub const FORBIDDEN_PHRASE_PENALTY: i64 = 50;

/// Presence test against already lower-cased text. Blank phrases never match.
pub(crate) fn mentions(normalized: &str, phrase: &str) -> bool {
    let phrase = phrase.trim();
    !phrase.is_empty() && normalized.contains(&phrase.to_lowercase())
}

/// Phrases from `phrases` present in `normalized`, de-duplicated case-insensitively, in
/// content order.
pub(crate) fn matched<'a>(normalized: &str, phrases: &'a [String]) -> Vec<&'a str> {
    let mut seen: Vec<String> = Vec::new();
    let mut hits = Vec::new();
    for phrase in phrases {
        let key = phrase.trim().to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        if mentions(normalized, phrase) {
            seen.push(key);
            hits.push(phrase.as_str());
        }
    }
    hits
}

/// Number of distinct non-blank phrases, compared the same way [`matched`] compares them.
pub(crate) fn distinct_count(phrases: &[String]) -> usize {
    let mut seen: Vec<String> = Vec::new();
    for phrase in phrases {
        let key = phrase.trim().to_lowercase();
        if !key.is_empty() && !seen.contains(&key) {
            seen.push(key);
        }
    }
    seen.len()
}
