use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::badges::{self, Badge, Badges};
use super::levels::{Level, LevelTable, ProspectEmotion};
use super::state::{GamePhase, GameState, LevelStats};
use super::GameRules;
use crate::training::error::{ConfigurationError, StateError, TrainingError};
use crate::training::objections::{ObjectionCatalog, ObjectionDifficulty, ObjectionType};
use crate::training::scoring::{ObjectionScore, ObjectionScorer, ResponseGate};

/// Intensity added by each escalation step.
pub const INTENSITY_STEP: f64 = 0.15;

/// What the prospect says next, with coaching context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectionPrompt {
    pub objection_type: ObjectionType,
    pub difficulty: ObjectionDifficulty,
    pub scenario: String,
    pub tips: String,
    pub emotion: ProspectEmotion,
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LevelTransition {
    /// More objections remain in this level.
    Continue,
    Advanced { level_id: u32 },
    /// Passed, but no later level admits the trainee yet. `requirement` describes what the
    /// next level asks for.
    Held { requirement: String },
    Failed,
    /// Passed the final level.
    GameComplete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseOutcome {
    pub score: ObjectionScore,
    pub level_complete: bool,
    pub passed_level: Option<bool>,
    pub transition: LevelTransition,
    pub new_badges: Vec<Badge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSummary {
    pub level_id: u32,
    pub level_name: String,
    pub score: i64,
    pub objections_completed: u32,
    pub objections_required: u32,
    pub passing_score: i64,
    pub stats: LevelStats,
    pub badges: Vec<Badge>,
    pub phase: GamePhase,
}

/// The objection mini-game: level table, objection content, and scorer bundled as read-only
/// data. All operations are pure functions of the state passed in.
#[derive(Debug)]
pub struct ObjectionGame {
    objections: ObjectionCatalog,
    levels: LevelTable,
    scorer: ObjectionScorer,
    rules: GameRules,
}

impl ObjectionGame {
    pub fn new(
        objections: ObjectionCatalog,
        levels: LevelTable,
        scorer: ObjectionScorer,
        rules: GameRules,
    ) -> Self {
        Self {
            objections,
            levels,
            scorer,
            rules,
        }
    }

    pub fn standard(rules: GameRules) -> Self {
        Self::new(
            ObjectionCatalog::standard(),
            LevelTable::standard(),
            ObjectionScorer::new(ResponseGate::new(rules.min_response_chars)),
            rules,
        )
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn objections(&self) -> &ObjectionCatalog {
        &self.objections
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Opens a session at the highest level `prior_score` qualifies for.
    pub fn start(&self, prior_score: i64) -> GameState {
        let level = self.levels.for_score(prior_score);
        info!(level = level.id, prior_score, "objection game started");
        GameState {
            current_level_id: level.id,
            score: prior_score,
            consecutive_wins: 0,
            objection_history: Vec::new(),
            emotional_intensity: level.emotion_range.min,
            badges: Badges::default(),
            objections_completed_in_level: 0,
            level_stats: LevelStats::default(),
            phase: GamePhase::InLevel,
        }
    }

    /// Starts (or retries) the current level after a completed one. Score and badges carry
    /// over; per-level counters reset.
    pub fn start_level(&self, state: &GameState) -> Result<GameState, TrainingError> {
        match state.phase {
            GamePhase::InLevel => {
                return Err(StateError::LevelInProgress { phase: state.phase }.into())
            }
            GamePhase::Ended => return Err(StateError::GameEnded.into()),
            GamePhase::NotStarted | GamePhase::LevelComplete { .. } => {}
        }

        let level = self.levels.level(state.current_level_id)?;
        let mut next = state.clone();
        next.objections_completed_in_level = 0;
        next.level_stats = LevelStats::default();
        next.emotional_intensity = level.emotion_range.min;
        next.phase = GamePhase::InLevel;
        debug!(level = level.id, score = next.score, "level started");
        Ok(next)
    }

    /// Draws the next objection, preferring types not yet faced in this attempt.
    pub fn next_objection<G: Rng + ?Sized>(
        &self,
        state: &GameState,
        rng: &mut G,
    ) -> Result<ObjectionPrompt, TrainingError> {
        let level = self.active_level(state)?;
        let attempt = state.current_attempt();
        let fresh: Vec<ObjectionType> = level
            .objection_types
            .iter()
            .copied()
            .filter(|kind| !attempt.contains(kind))
            .collect();
        let pool = if fresh.is_empty() {
            &level.objection_types
        } else {
            &fresh
        };

        let objection_type = *pool
            .choose(rng)
            .ok_or(ConfigurationError::EmptyLevel(level.id))?;
        let profile = self.objections.profile(objection_type)?;
        let scenario = profile
            .scenarios
            .choose(rng)
            .ok_or(ConfigurationError::MissingObjectionScenarios(objection_type))?;

        Ok(ObjectionPrompt {
            objection_type,
            difficulty: profile.difficulty,
            scenario: scenario.clone(),
            tips: profile.tips.clone(),
            emotion: level.emotion,
            intensity: state.emotional_intensity,
        })
    }

    pub fn submit_response(
        &self,
        state: &GameState,
        objection_type: ObjectionType,
        response: &str,
    ) -> Result<(GameState, ResponseOutcome), TrainingError> {
        let level = self.active_level(state)?;
        let rubric = self.objections.rubric(objection_type)?;
        let score = self.scorer.score(response, rubric);

        let mut next = state.clone();
        if score.forbidden_used {
            next.consecutive_wins = 0;
        } else {
            next.consecutive_wins = next.consecutive_wins.saturating_add(1);
        }
        next.objection_history.push(objection_type);
        next.objections_completed_in_level = next.objections_completed_in_level.saturating_add(1);
        next.level_stats.record(response, &score);
        next.score += i64::from(score.points);

        let earned = badges::evaluate(&next);
        let new_badges = badges::newly_earned(&next.badges, &earned);
        next.badges = earned;

        let level_complete = next.objections_completed_in_level >= self.rules.objections_per_level;
        let mut passed_level = None;
        let transition = if level_complete {
            let passed = next.score >= self.passing_score(level);
            passed_level = Some(passed);
            self.complete_level(level, &mut next, passed)
        } else {
            LevelTransition::Continue
        };

        debug!(
            objection = %objection_type,
            points = score.points,
            score = next.score,
            streak = next.consecutive_wins,
            "response scored"
        );

        Ok((
            next,
            ResponseOutcome {
                score,
                level_complete,
                passed_level,
                transition,
                new_badges,
            },
        ))
    }

    /// Raises the prospect's intensity one step, capped at the level's maximum.
    pub fn escalate_intensity(&self, state: &GameState) -> Result<GameState, TrainingError> {
        let level = self.levels.level(state.current_level_id)?;
        let mut next = state.clone();
        next.emotional_intensity =
            (state.emotional_intensity + INTENSITY_STEP).min(level.emotion_range.max);
        Ok(next)
    }

    pub fn level_summary(&self, state: &GameState) -> Result<LevelSummary, TrainingError> {
        let level = self.levels.level(state.current_level_id)?;
        Ok(LevelSummary {
            level_id: level.id,
            level_name: level.name.clone(),
            score: state.display_score(),
            objections_completed: state.objections_completed_in_level,
            objections_required: self.rules.objections_per_level,
            passing_score: self.passing_score(level),
            stats: state.level_stats.clone(),
            badges: state.badges.earned(),
            phase: state.phase,
        })
    }

    pub fn passing_score(&self, level: &Level) -> i64 {
        level.passing_score.unwrap_or(self.rules.passing_score)
    }

    fn active_level(&self, state: &GameState) -> Result<&Level, TrainingError> {
        if state.phase != GamePhase::InLevel {
            return Err(StateError::NoActiveLevel { phase: state.phase }.into());
        }
        Ok(self.levels.level(state.current_level_id)?)
    }

    fn complete_level(&self, level: &Level, next: &mut GameState, passed: bool) -> LevelTransition {
        next.phase = GamePhase::LevelComplete { passed };
        if !passed {
            info!(level = level.id, score = next.score, "level failed");
            return LevelTransition::Failed;
        }

        if self.levels.is_last(level.id) {
            next.phase = GamePhase::Ended;
            info!(level = level.id, score = next.score, "final level passed");
            return LevelTransition::GameComplete;
        }

        match self.levels.next_admitted(level.id, next) {
            Some(upcoming) => {
                info!(from = level.id, to = upcoming.id, score = next.score, "level advanced");
                next.current_level_id = upcoming.id;
                LevelTransition::Advanced {
                    level_id: upcoming.id,
                }
            }
            None => {
                let requirement = self
                    .levels
                    .following(level.id)
                    .map(Level::requirement)
                    .unwrap_or_default();
                debug!(level = level.id, %requirement, "no later level admits the trainee yet");
                LevelTransition::Held { requirement }
            }
        }
    }
}
