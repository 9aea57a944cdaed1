use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use super::badges::Badge;
use super::state::GameState;
use crate::training::catalog::Difficulty;
use crate::training::error::ConfigurationError;
use crate::training::objections::{ObjectionCategory, ObjectionType};

/// Extra admission rule attached to a level, checked on top of its minimum score.
pub trait LevelGate: Debug + Send + Sync {
    fn admits(&self, state: &GameState) -> bool;
    fn describe(&self) -> String;
}

/// Built-in gates. Content that needs something else can supply its own [`LevelGate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Open,
    PriorObjections {
        category: ObjectionCategory,
        count: usize,
    },
    Badge(Badge),
    ConsecutiveWins(u32),
    All(Vec<Requirement>),
}

impl LevelGate for Requirement {
    fn admits(&self, state: &GameState) -> bool {
        match self {
            Requirement::Open => true,
            Requirement::PriorObjections { category, count } => {
                state.category_count(*category) >= *count
            }
            Requirement::Badge(badge) => state.badges.has(*badge),
            Requirement::ConsecutiveWins(wins) => state.consecutive_wins >= *wins,
            Requirement::All(requirements) => requirements.iter().all(|req| req.admits(state)),
        }
    }

    fn describe(&self) -> String {
        match self {
            Requirement::Open => "no additional requirement".to_string(),
            Requirement::PriorObjections { category, count } => {
                format!("face at least {count} {category:?} objections")
            }
            Requirement::Badge(badge) => format!("earn the {badge} badge"),
            Requirement::ConsecutiveWins(wins) => format!("reach a streak of {wins}"),
            Requirement::All(requirements) => requirements
                .iter()
                .map(Requirement::describe)
                .collect::<Vec<_>>()
                .join(" and "),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProspectEmotion {
    Concerned,
    Skeptical,
    Frustrated,
}

/// Inclusive emotional-intensity band for a level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug)]
pub struct Level {
    pub id: u32,
    pub name: String,
    pub difficulty: Difficulty,
    pub min_score: i64,
    pub emotion: ProspectEmotion,
    pub emotion_range: EmotionRange,
    pub objection_types: Vec<ObjectionType>,
    /// Overrides the game-wide passing score when set.
    pub passing_score: Option<i64>,
    gate: Box<dyn LevelGate>,
}

impl Level {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        difficulty: Difficulty,
        min_score: i64,
        emotion: ProspectEmotion,
        emotion_range: EmotionRange,
        objection_types: Vec<ObjectionType>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            difficulty,
            min_score,
            emotion,
            emotion_range,
            objection_types,
            passing_score: None,
            gate: Box::new(Requirement::Open),
        }
    }

    pub fn with_gate(mut self, gate: impl LevelGate + 'static) -> Self {
        self.gate = Box::new(gate);
        self
    }

    pub fn with_passing_score(mut self, passing_score: i64) -> Self {
        self.passing_score = Some(passing_score);
        self
    }

    pub fn gate(&self) -> &dyn LevelGate {
        self.gate.as_ref()
    }

    /// Entry conditions in words, for trainees held below this level.
    pub fn requirement(&self) -> String {
        format!("at least {} points; {}", self.min_score, self.gate().describe())
    }

    /// Minimum score plus the level's own gate.
    pub fn admits(&self, state: &GameState) -> bool {
        state.score >= self.min_score && self.gate.admits(state)
    }
}

/// Levels in ascending `min_score` order. Never empty.
#[derive(Debug)]
pub struct LevelTable {
    levels: Vec<Level>,
}

impl LevelTable {
    pub fn new(mut levels: Vec<Level>) -> Result<Self, ConfigurationError> {
        if levels.is_empty() {
            return Err(ConfigurationError::InvalidContent(
                "level table has no levels".to_string(),
            ));
        }
        levels.sort_by_key(|level| level.min_score);
        for pair in levels.windows(2) {
            if pair[0].min_score == pair[1].min_score {
                return Err(ConfigurationError::InvalidContent(format!(
                    "levels {} and {} share minimum score {}",
                    pair[0].id, pair[1].id, pair[0].min_score
                )));
            }
        }
        for level in &levels {
            if level.objection_types.is_empty() {
                return Err(ConfigurationError::EmptyLevel(level.id));
            }
            if level.emotion_range.min > level.emotion_range.max {
                return Err(ConfigurationError::InvalidContent(format!(
                    "level {} has an inverted emotion range",
                    level.id
                )));
            }
        }
        Ok(Self { levels })
    }

    pub fn standard() -> Self {
        Self {
            levels: vec![
                Level::new(
                    1,
                    "Rookie Responder",
                    Difficulty::Beginner,
                    0,
                    ProspectEmotion::Concerned,
                    EmotionRange { min: 0.3, max: 0.6 },
                    vec![
                        ObjectionType::NotInterested,
                        ObjectionType::SendInfo,
                        ObjectionType::CallBack,
                        ObjectionType::AgeConcern,
                        ObjectionType::Price,
                    ],
                ),
                Level::new(
                    2,
                    "Intermediate Handler",
                    Difficulty::Intermediate,
                    250,
                    ProspectEmotion::Skeptical,
                    EmotionRange { min: 0.4, max: 0.7 },
                    vec![
                        ObjectionType::SpouseConsult,
                        ObjectionType::ExistingCoverage,
                        ObjectionType::Affordability,
                        ObjectionType::Trust,
                    ],
                )
                .with_gate(Requirement::PriorObjections {
                    category: ObjectionCategory::Price,
                    count: 3,
                }),
                Level::new(
                    3,
                    "Expert Negotiator",
                    Difficulty::Advanced,
                    500,
                    ProspectEmotion::Frustrated,
                    EmotionRange { min: 0.5, max: 0.8 },
                    vec![
                        ObjectionType::WorkingWithAgent,
                        ObjectionType::WontPay,
                        ObjectionType::ChildrenCare,
                        ObjectionType::Trust,
                        ObjectionType::Price,
                    ],
                )
                .with_gate(Requirement::Badge(Badge::Trustbuilder)),
            ],
        }
    }

    pub fn level(&self, id: u32) -> Result<&Level, ConfigurationError> {
        self.levels
            .iter()
            .find(|level| level.id == id)
            .ok_or(ConfigurationError::UnknownLevel(id))
    }

    /// Highest level whose minimum score the given score reaches; the first level otherwise.
    pub fn for_score(&self, score: i64) -> &Level {
        self.levels
            .iter()
            .rev()
            .find(|level| level.min_score <= score)
            .unwrap_or(&self.levels[0])
    }

    /// First level after `id`, in table order, that admits `state`.
    pub fn next_admitted(&self, id: u32, state: &GameState) -> Option<&Level> {
        self.levels
            .iter()
            .skip_while(|level| level.id != id)
            .skip(1)
            .find(|level| level.admits(state))
    }

    /// Level directly after `id` in table order.
    pub fn following(&self, id: u32) -> Option<&Level> {
        self.levels.iter().skip_while(|level| level.id != id).nth(1)
    }

    pub fn is_last(&self, id: u32) -> bool {
        self.levels.last().map(|level| level.id) == Some(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }
}
