use serde::{Deserialize, Serialize};

use super::badges::Badges;
use crate::training::objections::{ObjectionCategory, ObjectionType};
use crate::training::scoring::ObjectionScore;

/// Lifecycle of one level attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GamePhase {
    NotStarted,
    InLevel,
    LevelComplete { passed: bool },
    Ended,
}

impl GamePhase {
    pub fn label(&self) -> &'static str {
        match self {
            GamePhase::NotStarted => "not started",
            GamePhase::InLevel => "in level",
            GamePhase::LevelComplete { passed: true } => "level passed",
            GamePhase::LevelComplete { passed: false } => "level failed",
            GamePhase::Ended => "ended",
        }
    }
}

/// Aggregates for the end-of-level screen. Reset whenever a level starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStats {
    pub total_responses: u32,
    pub average_score: f64,
    pub best_response: Option<String>,
    pub best_score: u32,
    pub used_phrases: Vec<String>,
    pub missed_opportunities: Vec<String>,
}

impl LevelStats {
    pub(crate) fn record(&mut self, response: &str, outcome: &ObjectionScore) {
        let n = f64::from(self.total_responses);
        self.average_score = (self.average_score * n + f64::from(outcome.points)) / (n + 1.0);
        self.total_responses += 1;

        if self.best_response.is_none() || outcome.points > self.best_score {
            self.best_score = outcome.points;
            self.best_response = Some(response.trim().to_string());
        }

        merge_unique(&mut self.used_phrases, &outcome.used_phrases);
        merge_unique(&mut self.missed_opportunities, &outcome.missed_opportunities);
    }
}

fn merge_unique(into: &mut Vec<String>, from: &[String]) {
    for phrase in from {
        if !into.contains(phrase) {
            into.push(phrase.clone());
        }
    }
}

/// Session state for the objection game. Every game operation takes this by reference and
/// returns a fresh value; nothing here is mutated behind the caller's back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub current_level_id: u32,
    /// Session total, seeded from the trainee's prior persisted score.
    pub score: i64,
    pub consecutive_wins: u32,
    /// Every objection faced this session, in order.
    pub objection_history: Vec<ObjectionType>,
    pub emotional_intensity: f64,
    pub badges: Badges,
    pub objections_completed_in_level: u32,
    pub level_stats: LevelStats,
    pub phase: GamePhase,
}

impl GameState {
    /// Score as shown to the trainee, never below zero.
    pub fn display_score(&self) -> i64 {
        self.score.max(0)
    }

    pub fn category_count(&self, category: ObjectionCategory) -> usize {
        self.objection_history
            .iter()
            .filter(|kind| kind.category() == category)
            .count()
    }

    /// Objections drawn during the current level attempt.
    pub fn current_attempt(&self) -> &[ObjectionType] {
        let taken = (self.objections_completed_in_level as usize).min(self.objection_history.len());
        &self.objection_history[self.objection_history.len() - taken..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(points: u32, used: &[&str], missed: &[&str]) -> ObjectionScore {
        ObjectionScore {
            points,
            raw_points: i64::from(points),
            forbidden_used: false,
            rejected: false,
            used_phrases: used.iter().map(|p| p.to_string()).collect(),
            key_phrases_used: Vec::new(),
            missed_opportunities: missed.iter().map(|p| p.to_string()).collect(),
            feedback: String::new(),
        }
    }

    #[test]
    fn running_average_and_best_response() {
        let mut stats = LevelStats::default();
        stats.record("first answer", &score(50, &["fits your budget"], &["value"]));
        stats.record("second answer", &score(100, &["fits your budget"], &["value", "budget"]));
        stats.record("third answer", &score(0, &[], &["value"]));

        assert_eq!(stats.total_responses, 3);
        assert!((stats.average_score - 50.0).abs() < 1e-9);
        assert_eq!(stats.best_score, 100);
        assert_eq!(stats.best_response.as_deref(), Some("second answer"));
        assert_eq!(stats.used_phrases, vec!["fits your budget".to_string()]);
        assert_eq!(stats.missed_opportunities.len(), 2);
    }

    #[test]
    fn phase_serializes_with_state_tag() {
        let json = serde_json::to_value(GamePhase::LevelComplete { passed: false }).unwrap();
        assert_eq!(json, serde_json::json!({"state": "level_complete", "passed": false}));
    }
}
