use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::training::catalog::{Catalog, Difficulty};
use crate::training::game::{GamePhase, GameRules, GameState, ObjectionGame};
use crate::training::objections::ObjectionType;
use crate::training::progress::{
    ModuleProgress, ProgressRepository, RepositoryError, TraineeId, UnlockPolicy,
};
use crate::training::{training_router, TrainingService};

/// Clean response scoring 0 against every standard objection rubric.
pub(super) const NEUTRAL_RESPONSE: &str = "Okay, I hear what you are saying there.";

/// Scores 75 against the PRICE rubric: one approved phrase plus "monthly payments".
pub(super) const PRICE_RESPONSE: &str =
    "I understand, let me share how we make this affordable, with monthly payments";

pub(super) fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::standard().expect("standard catalog"))
}

pub(super) fn game() -> ObjectionGame {
    ObjectionGame::standard(GameRules::default())
}

pub(super) fn game_with_rules(rules: GameRules) -> ObjectionGame {
    ObjectionGame::standard(rules)
}

pub(super) fn trainee() -> TraineeId {
    TraineeId("trainee-042".to_string())
}

/// Every approved and key phrase for the objection, so the response earns the rubric maximum.
pub(super) fn strong_response(game: &ObjectionGame, kind: ObjectionType) -> String {
    let rubric = game.objections().rubric(kind).expect("rubric present");
    rubric
        .approved_phrases
        .iter()
        .cloned()
        .chain(rubric.key_phrases.iter().map(|key| key.phrase.clone()))
        .collect::<Vec<_>>()
        .join(". ")
}

pub(super) fn forbidden_response(game: &ObjectionGame, kind: ObjectionType) -> String {
    let rubric = game.objections().rubric(kind).expect("rubric present");
    format!("Look, {}, that is all I can say.", rubric.forbidden_phrases[0])
}

pub(super) fn submit(
    game: &ObjectionGame,
    state: &GameState,
    kind: ObjectionType,
    response: &str,
) -> GameState {
    let (next, _) = game
        .submit_response(state, kind, response)
        .expect("response accepted");
    next
}

pub(super) fn in_level(mut state: GameState) -> GameState {
    state.phase = GamePhase::InLevel;
    state
}

pub(super) fn completed(module_id: &str, difficulty: Difficulty, score: u32) -> ModuleProgress {
    ModuleProgress {
        completed: true,
        score,
        attempts: 1,
        ..ModuleProgress::new(module_id, difficulty)
    }
}

/// Completed records for every module of `tier` in the standard catalog.
pub(super) fn completed_tier(catalog: &Catalog, tier: Difficulty, score: u32) -> Vec<ModuleProgress> {
    catalog
        .modules_by_difficulty(tier)
        .into_iter()
        .map(|module| completed(&module.id, tier, score))
        .collect()
}

pub(super) fn build_service() -> (TrainingService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = TrainingService::new(
        catalog(),
        Arc::new(game()),
        repository.clone(),
        UnlockPolicy::default(),
    );
    (service, repository)
}

pub(super) fn router_with_service(service: TrainingService<MemoryRepository>) -> axum::Router {
    training_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<TraineeId, Vec<ModuleProgress>>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, trainee: &TraineeId) -> Vec<ModuleProgress> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(trainee)
            .cloned()
            .unwrap_or_default()
    }
}

impl ProgressRepository for MemoryRepository {
    fn load(&self, trainee: &TraineeId) -> Result<Vec<ModuleProgress>, RepositoryError> {
        Ok(self.stored(trainee))
    }

    fn save(&self, trainee: &TraineeId, progress: Vec<ModuleProgress>) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(trainee.clone(), progress);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl ProgressRepository for UnavailableRepository {
    fn load(&self, _trainee: &TraineeId) -> Result<Vec<ModuleProgress>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save(&self, _trainee: &TraineeId, _progress: Vec<ModuleProgress>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Loads fine but refuses writes.
pub(super) struct ReadOnlyRepository;

impl ProgressRepository for ReadOnlyRepository {
    fn load(&self, _trainee: &TraineeId) -> Result<Vec<ModuleProgress>, RepositoryError> {
        Ok(Vec::new())
    }

    fn save(&self, _trainee: &TraineeId, _progress: Vec<ModuleProgress>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read-only replica".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
