use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::catalog::{Catalog, CaptureVerdict, Difficulty};
use super::error::{ConfigurationError, StateError, TrainingError};
use super::game::{GameState, LevelSummary, ObjectionGame, ObjectionPrompt, ResponseOutcome};
use super::objections::ObjectionType;
use super::progress::{
    module_status, record_attempt, tier_completion, unlocked_tiers, ModuleProgress,
    ModuleStatus, ProgressRepository, RepositoryError, TraineeId, UnlockPolicy,
};
use super::scoring::{CategoryScorer, PhraseScore};

/// Result of scoring one scripted scenario and recording it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioAttempt {
    pub module_id: String,
    pub scenario_index: usize,
    pub score: PhraseScore,
    pub progress: ModuleProgress,
    pub unlocked_tiers: Vec<Difficulty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOverview {
    pub trainee_id: TraineeId,
    pub modules: Vec<ModuleProgress>,
    pub tier_completion: BTreeMap<Difficulty, u32>,
    pub unlocked_tiers: Vec<Difficulty>,
}

/// Glue between the pure training core and the progress store. Holds no per-session state;
/// game state is handed in and returned on every call.
pub struct TrainingService<R> {
    catalog: Arc<Catalog>,
    game: Arc<ObjectionGame>,
    repository: Arc<R>,
    scorer: CategoryScorer,
    policy: UnlockPolicy,
}

impl<R> TrainingService<R>
where
    R: ProgressRepository + 'static,
{
    pub fn new(
        catalog: Arc<Catalog>,
        game: Arc<ObjectionGame>,
        repository: Arc<R>,
        policy: UnlockPolicy,
    ) -> Self {
        Self {
            catalog,
            game,
            repository,
            scorer: CategoryScorer::default(),
            policy,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn game(&self) -> &ObjectionGame {
        &self.game
    }

    pub fn policy(&self) -> &UnlockPolicy {
        &self.policy
    }

    /// Scores a scenario response, records the attempt, and persists the updated list.
    pub fn score_scenario(
        &self,
        trainee: &TraineeId,
        module_id: &str,
        scenario_index: usize,
        response: &str,
        now: DateTime<Utc>,
    ) -> Result<ScenarioAttempt, TrainingServiceError> {
        let scenario = self.catalog.scenario(module_id, scenario_index)?;
        let score = self.scorer.score(response, &scenario.rubric);

        let current = self.repository.load(trainee)?;
        let updated = record_attempt(&current, &self.catalog, module_id, score.total_score, now)?;
        let progress = updated
            .iter()
            .find(|entry| entry.module_id == module_id)
            .cloned()
            .ok_or_else(|| ConfigurationError::UnknownModule(module_id.to_string()))?;
        let unlocked = unlocked_tiers(&updated, &self.policy);
        self.repository.save(trainee, updated)?;

        info!(
            trainee = %trainee.0,
            module = module_id,
            score = score.total_score,
            best = progress.score,
            "scenario attempt recorded"
        );

        Ok(ScenarioAttempt {
            module_id: module_id.to_string(),
            scenario_index,
            score,
            progress,
            unlocked_tiers: unlocked,
        })
    }

    /// Checks a captured value against a data-capture scenario's format rule.
    pub fn check_capture(
        &self,
        module_id: &str,
        scenario_index: usize,
        captured: &str,
    ) -> Result<CaptureVerdict, TrainingServiceError> {
        let scenario = self.catalog.scenario(module_id, scenario_index)?;
        Ok(scenario.validate_capture(captured)?)
    }

    pub fn progress(&self, trainee: &TraineeId) -> Result<ProgressOverview, TrainingServiceError> {
        let modules = self.repository.load(trainee)?;
        Ok(ProgressOverview {
            trainee_id: trainee.clone(),
            tier_completion: tier_completion(&modules),
            unlocked_tiers: unlocked_tiers(&modules, &self.policy),
            modules,
        })
    }

    pub fn module_status(
        &self,
        trainee: &TraineeId,
        module_id: &str,
    ) -> Result<ModuleStatus, TrainingServiceError> {
        let modules = self.repository.load(trainee)?;
        Ok(module_status(module_id, &modules, &self.catalog, &self.policy)?)
    }

    pub fn unlocked_tiers(&self, trainee: &TraineeId) -> Result<Vec<Difficulty>, TrainingServiceError> {
        let modules = self.repository.load(trainee)?;
        Ok(unlocked_tiers(&modules, &self.policy))
    }

    pub fn start_game(&self, prior_score: i64) -> GameState {
        self.game.start(prior_score)
    }

    pub fn start_level(&self, state: &GameState) -> Result<GameState, TrainingServiceError> {
        Ok(self.game.start_level(state)?)
    }

    /// Draws the next objection. A seed makes the draw reproducible.
    pub fn next_objection(
        &self,
        state: &GameState,
        seed: Option<u64>,
    ) -> Result<ObjectionPrompt, TrainingServiceError> {
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(self.game.next_objection(state, &mut rng)?)
    }

    pub fn submit_objection_response(
        &self,
        state: &GameState,
        objection_type: ObjectionType,
        response: &str,
    ) -> Result<(GameState, ResponseOutcome), TrainingServiceError> {
        Ok(self.game.submit_response(state, objection_type, response)?)
    }

    pub fn escalate(&self, state: &GameState) -> Result<GameState, TrainingServiceError> {
        Ok(self.game.escalate_intensity(state)?)
    }

    pub fn level_summary(&self, state: &GameState) -> Result<LevelSummary, TrainingServiceError> {
        Ok(self.game.level_summary(state)?)
    }
}

/// Error raised by the training service.
#[derive(Debug, thiserror::Error)]
pub enum TrainingServiceError {
    #[error(transparent)]
    Training(#[from] TrainingError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ConfigurationError> for TrainingServiceError {
    fn from(value: ConfigurationError) -> Self {
        Self::Training(value.into())
    }
}

impl From<StateError> for TrainingServiceError {
    fn from(value: StateError) -> Self {
        Self::Training(value.into())
    }
}
