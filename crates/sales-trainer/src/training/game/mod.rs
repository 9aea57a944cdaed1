//! Rebuttal Royale: the levelled objection-handling game.
//!
//! [`ObjectionGame`] owns the read-only pieces (level table, objection content, scorer) and
//! exposes state transitions as functions from one [`GameState`] to the next. Callers keep
//! whichever returned state they want; the game itself stores nothing per session.

pub mod badges;
mod engine;
mod levels;
mod state;

pub use badges::{Badge, Badges};
pub use engine::{
    LevelSummary, LevelTransition, ObjectionGame, ObjectionPrompt, ResponseOutcome,
    INTENSITY_STEP,
};
pub use levels::{EmotionRange, Level, LevelGate, LevelTable, ProspectEmotion, Requirement};
pub use state::{GamePhase, GameState, LevelStats};

/// Responses per level attempt.
pub const OBJECTIONS_PER_LEVEL: u32 = 3;
/// Session score needed to pass a level that sets no threshold of its own.
pub const PASSING_SCORE_PER_LEVEL: i64 = 200;
/// Shortest trimmed response the game will score.
pub const MIN_RESPONSE_CHARS: usize = 10;

/// Tunables shared by every level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    pub objections_per_level: u32,
    pub passing_score: i64,
    pub min_response_chars: usize,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            objections_per_level: OBJECTIONS_PER_LEVEL,
            passing_score: PASSING_SCORE_PER_LEVEL,
            min_response_chars: MIN_RESPONSE_CHARS,
        }
    }
}
