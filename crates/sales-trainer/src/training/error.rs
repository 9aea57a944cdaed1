use super::catalog::Difficulty;
use super::game::GamePhase;
use super::objections::ObjectionType;

/// Failures raised by the training core. Trainee input problems never surface here; the
/// scorers report those as a zero score with feedback.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    State(#[from] StateError),
}

/// Content or wiring problem: something the catalog was expected to hold is missing or
/// inconsistent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("no scoring rubric configured for objection type {0}")]
    MissingObjectionRubric(ObjectionType),
    #[error("objection type {0} has no scenario lines")]
    MissingObjectionScenarios(ObjectionType),
    #[error("unknown training module '{0}'")]
    UnknownModule(String),
    #[error("unknown training section '{0}'")]
    UnknownSection(String),
    #[error("module '{module_id}' has no scenario at index {index}")]
    UnknownScenario { module_id: String, index: usize },
    #[error("unknown game level {0}")]
    UnknownLevel(u32),
    #[error("level {0} has no objection types")]
    EmptyLevel(u32),
    #[error(
        "module '{module_id}' ({difficulty:?}) cannot require '{required_id}' ({required:?}); \
         prerequisites must sit in a lower tier"
    )]
    InvalidUnlockReference {
        module_id: String,
        difficulty: Difficulty,
        required_id: String,
        required: Option<Difficulty>,
    },
    #[error("duplicate module id '{0}'")]
    DuplicateModule(String),
    #[error("invalid training content: {0}")]
    InvalidContent(String),
}

/// The caller asked for a transition the current game phase does not allow.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateError {
    #[error("no level is active (phase: {phase:?})")]
    NoActiveLevel { phase: GamePhase },
    #[error("level is still in progress (phase: {phase:?})")]
    LevelInProgress { phase: GamePhase },
    #[error("the game has ended; start a new session")]
    GameEnded,
}
