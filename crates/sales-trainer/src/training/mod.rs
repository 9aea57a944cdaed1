//! Scoring & progression core for the sales-training simulator.
//!
//! The content ([`Catalog`], [`ObjectionCatalog`], [`LevelTable`]) is loaded once and shared
//! read-only. Scoring, game transitions, and unlock checks are pure functions of the state
//! handed to them; [`TrainingService`] and [`training_router`] are the thin shell that loads
//! and saves progress around them.

pub mod catalog;
pub mod error;
pub mod game;
pub mod objections;
pub mod progress;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{
    CaptureField, CaptureRule, CaptureVerdict, Catalog, ContentWarning, Difficulty,
    EmotionalContext, Module, ProspectResponse, Scenario, ScenarioKind, Section, UnlockCriteria,
    WarningKind,
};
pub use error::{ConfigurationError, StateError, TrainingError};
pub use game::{
    Badge, Badges, GamePhase, GameRules, GameState, LevelGate, LevelSummary, LevelTable,
    LevelTransition, ObjectionGame, ObjectionPrompt, Requirement, ResponseOutcome,
};
pub use objections::{ObjectionCatalog, ObjectionCategory, ObjectionType};
pub use progress::{
    can_unlock, module_accessible, module_status, record_attempt, section_unlocked,
    tier_completion, unlocked_tiers, LockReason, ModuleAccess, ModuleProgress, ModuleStatus,
    ProgressRepository, RepositoryError, TraineeId, UnlockPolicy,
};
pub use router::training_router;
pub use scoring::{
    CategoryScorer, ObjectionRubric, ObjectionScore, ObjectionScorer, PhraseScore,
    ResponseGate, ScoringRubric,
};
pub use service::{ProgressOverview, ScenarioAttempt, TrainingService, TrainingServiceError};
