use serde::{Deserialize, Serialize};

use super::gate::ResponseGate;
use super::rubric::ObjectionRubric;
use super::{matched, mentions, APPROVED_PHRASE_BONUS, FORBIDDEN_PHRASE_PENALTY};

/// Integer result for one objection response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectionScore {
    /// Points awarded, never negative.
    pub points: u32,
    /// Points before the zero floor; negative when the penalty outweighed the gains.
    pub raw_points: i64,
    pub forbidden_used: bool,
    /// The gate refused the response before any phrase was checked.
    pub rejected: bool,
    pub used_phrases: Vec<String>,
    pub key_phrases_used: Vec<String>,
    pub missed_opportunities: Vec<String>,
    pub feedback: String,
}

/// Flat-bonus scorer used by the objection game.
#[derive(Debug, Clone, Default)]
pub struct ObjectionScorer {
    gate: ResponseGate,
}

impl ObjectionScorer {
    pub fn new(gate: ResponseGate) -> Self {
        Self { gate }
    }

    pub fn gate(&self) -> &ResponseGate {
        &self.gate
    }

    pub fn score(&self, response: &str, rubric: &ObjectionRubric) -> ObjectionScore {
        let normalized = match self.gate.admit(response) {
            Ok(normalized) => normalized,
            Err(issue) => {
                return ObjectionScore {
                    points: 0,
                    raw_points: 0,
                    forbidden_used: false,
                    rejected: true,
                    used_phrases: Vec::new(),
                    key_phrases_used: Vec::new(),
                    missed_opportunities: rubric
                        .key_phrases
                        .iter()
                        .map(|key| key.phrase.clone())
                        .collect(),
                    feedback: issue.feedback(),
                };
            }
        };

        let approved = matched(&normalized, &rubric.approved_phrases);
        let mut gained = APPROVED_PHRASE_BONUS * approved.len() as i64;

        let mut key_phrases_used = Vec::new();
        let mut missed_opportunities = Vec::new();
        for key in &rubric.key_phrases {
            if mentions(&normalized, &key.phrase) {
                gained += i64::from(key.points);
                key_phrases_used.push(key.phrase.clone());
            } else {
                missed_opportunities.push(key.phrase.clone());
            }
        }

        if approved.len() > 1 {
            gained = (gained as f64 * rubric.effective_multiplier()).round() as i64;
        }

        let forbidden_used = rubric
            .forbidden_phrases
            .iter()
            .any(|phrase| mentions(&normalized, phrase));
        let raw_points = if forbidden_used {
            gained - FORBIDDEN_PHRASE_PENALTY
        } else {
            gained
        };
        let points = raw_points.clamp(0, i64::from(u32::MAX)) as u32;

        let feedback = if forbidden_used {
            "Be careful with your phrasing. Try a more positive approach.".to_string()
        } else if points > 0 {
            let mut line = format!("Great job! You earned {points} points.");
            if approved.len() > 1 {
                line.push_str(" Excellent use of multiple key phrases!");
            }
            line
        } else {
            let suggestions = rubric
                .key_phrases
                .iter()
                .take(2)
                .map(|key| key.phrase.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("Try incorporating some of the suggested phrases: {suggestions}")
        };

        ObjectionScore {
            points,
            raw_points,
            forbidden_used,
            rejected: false,
            used_phrases: approved.into_iter().map(str::to_string).collect(),
            key_phrases_used,
            missed_opportunities,
            feedback,
        }
    }
}
