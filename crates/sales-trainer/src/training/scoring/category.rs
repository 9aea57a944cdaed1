use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::gate::ResponseGate;
use super::rubric::{Category, ScoringRubric};
use super::{distinct_count, matched, CATEGORY_VIOLATION_PENALTY};

/// Weighted result for a scripted scenario response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhraseScore {
    pub total_score: u32,
    /// Category score on the 0-100 scale, before weighting.
    pub per_category: BTreeMap<String, f64>,
    pub feedback: Vec<String>,
}

/// Scores free text against a [`ScoringRubric`].
///
/// `total = round(sum(category_score * weight) / 100)`; weights are not normalized, so a
/// rubric whose weights sum past 100 can exceed 100 overall.
#[derive(Debug, Clone, Default)]
pub struct CategoryScorer {
    gate: ResponseGate,
}

impl CategoryScorer {
    pub fn new(gate: ResponseGate) -> Self {
        Self { gate }
    }

    pub fn score(&self, response: &str, rubric: &ScoringRubric) -> PhraseScore {
        let normalized = match self.gate.admit(response) {
            Ok(normalized) => normalized,
            Err(issue) => {
                return PhraseScore {
                    total_score: 0,
                    per_category: rubric.iter().map(|(name, _)| (name.clone(), 0.0)).collect(),
                    feedback: vec![issue.feedback()],
                };
            }
        };

        let mut per_category = BTreeMap::new();
        let mut feedback = Vec::new();
        let mut weighted = 0.0;

        for (name, category) in rubric.iter() {
            let outcome = score_category(&normalized, category);
            if !outcome.violations.is_empty() {
                feedback.push(violation_feedback(name, &outcome.violations));
            } else if outcome.ratio >= 1.0 {
                feedback.push(format!("Strong {}: every key phrase landed.", display_name(name)));
            }
            weighted += outcome.score * category.weight;
            per_category.insert(name.clone(), outcome.score);
        }

        PhraseScore {
            total_score: (weighted / 100.0).round().max(0.0) as u32,
            per_category,
            feedback,
        }
    }
}

struct CategoryOutcome<'a> {
    score: f64,
    ratio: f64,
    violations: Vec<&'a str>,
}

fn score_category<'a>(normalized: &str, category: &'a Category) -> CategoryOutcome<'a> {
    let scored_phrases = distinct_count(&category.key_phrases);
    let hits = matched(normalized, &category.key_phrases).len();
    let ratio = hits as f64 / scored_phrases.max(1) as f64;
    let violations = matched(normalized, &category.forbidden_phrases);

    let raw = ratio * 100.0 - violations.len() as f64 * CATEGORY_VIOLATION_PENALTY;
    CategoryOutcome {
        score: raw.clamp(0.0, 100.0),
        ratio,
        violations,
    }
}

fn display_name(category: &str) -> String {
    let mut words = String::new();
    for ch in category.chars() {
        if ch.is_uppercase() && !words.is_empty() {
            words.push(' ');
        }
        words.extend(ch.to_lowercase());
    }
    words
}

fn violation_feedback(category: &str, violations: &[&str]) -> String {
    let quoted = violations
        .iter()
        .map(|phrase| format!("\"{phrase}\""))
        .collect::<Vec<_>>()
        .join(", ");
    match category {
        "tonality" => format!("Watch your tone: {quoted} can sound pushy or dismissive."),
        "phrasing" => format!("Rephrase without {quoted}; plain language keeps the prospect engaged."),
        "empathy" => format!("{quoted} undercuts empathy. Acknowledge the prospect's concern instead."),
        other => format!("Avoid {quoted} when working on {}.", display_name(other)),
    }
}
