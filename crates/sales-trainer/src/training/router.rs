use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::error::{ConfigurationError, TrainingError};
use super::game::GameState;
use super::objections::ObjectionType;
use super::progress::{ProgressRepository, RepositoryError, TraineeId};
use super::service::{TrainingService, TrainingServiceError};

/// Body shown for configuration and state failures; detail goes to the log only.
pub const GENERIC_ERROR: &str = "something went wrong, please retry";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioAttemptRequest {
    pub module_id: String,
    #[serde(default)]
    pub scenario_index: usize,
    pub response: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureCheckRequest {
    pub module_id: String,
    pub scenario_index: usize,
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    #[serde(default)]
    pub prior_score: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateRequest {
    pub state: GameState,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectionResponseRequest {
    pub state: GameState,
    pub objection_type: ObjectionType,
    pub response: String,
}

/// Router builder exposing the training and objection-game endpoints.
pub fn training_router<R>(service: Arc<TrainingService<R>>) -> Router
where
    R: ProgressRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/training/trainees/:trainee_id/attempts",
            post(attempt_handler::<R>),
        )
        .route(
            "/api/v1/training/trainees/:trainee_id/progress",
            get(progress_handler::<R>),
        )
        .route(
            "/api/v1/training/trainees/:trainee_id/modules/:module_id",
            get(module_status_handler::<R>),
        )
        .route("/api/v1/training/captures", post(capture_handler::<R>))
        .route(
            "/api/v1/rebuttal-royale/sessions",
            post(start_game_handler::<R>),
        )
        .route(
            "/api/v1/rebuttal-royale/levels",
            post(start_level_handler::<R>),
        )
        .route(
            "/api/v1/rebuttal-royale/objections",
            post(next_objection_handler::<R>),
        )
        .route(
            "/api/v1/rebuttal-royale/responses",
            post(submit_response_handler::<R>),
        )
        .route(
            "/api/v1/rebuttal-royale/escalations",
            post(escalate_handler::<R>),
        )
        .route(
            "/api/v1/rebuttal-royale/summary",
            post(summary_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn attempt_handler<R>(
    State(service): State<Arc<TrainingService<R>>>,
    Path(trainee_id): Path<String>,
    Json(request): Json<ScenarioAttemptRequest>,
) -> Response
where
    R: ProgressRepository + 'static,
{
    let trainee = TraineeId(trainee_id);
    match service.score_scenario(
        &trainee,
        &request.module_id,
        request.scenario_index,
        &request.response,
        Utc::now(),
    ) {
        Ok(attempt) => (StatusCode::OK, Json(attempt)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn progress_handler<R>(
    State(service): State<Arc<TrainingService<R>>>,
    Path(trainee_id): Path<String>,
) -> Response
where
    R: ProgressRepository + 'static,
{
    match service.progress(&TraineeId(trainee_id)) {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn module_status_handler<R>(
    State(service): State<Arc<TrainingService<R>>>,
    Path((trainee_id, module_id)): Path<(String, String)>,
) -> Response
where
    R: ProgressRepository + 'static,
{
    match service.module_status(&TraineeId(trainee_id), &module_id) {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn capture_handler<R>(
    State(service): State<Arc<TrainingService<R>>>,
    Json(request): Json<CaptureCheckRequest>,
) -> Response
where
    R: ProgressRepository + 'static,
{
    match service.check_capture(&request.module_id, request.scenario_index, &request.value) {
        Ok(verdict) => (StatusCode::OK, Json(verdict)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn start_game_handler<R>(
    State(service): State<Arc<TrainingService<R>>>,
    Json(request): Json<StartGameRequest>,
) -> Response
where
    R: ProgressRepository + 'static,
{
    let state = service.start_game(request.prior_score);
    (StatusCode::CREATED, Json(state)).into_response()
}

pub(crate) async fn start_level_handler<R>(
    State(service): State<Arc<TrainingService<R>>>,
    Json(request): Json<GameStateRequest>,
) -> Response
where
    R: ProgressRepository + 'static,
{
    match service.start_level(&request.state) {
        Ok(state) => (StatusCode::OK, Json(state)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn next_objection_handler<R>(
    State(service): State<Arc<TrainingService<R>>>,
    Json(request): Json<GameStateRequest>,
) -> Response
where
    R: ProgressRepository + 'static,
{
    match service.next_objection(&request.state, request.seed) {
        Ok(prompt) => (StatusCode::OK, Json(prompt)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_response_handler<R>(
    State(service): State<Arc<TrainingService<R>>>,
    Json(request): Json<ObjectionResponseRequest>,
) -> Response
where
    R: ProgressRepository + 'static,
{
    match service.submit_objection_response(
        &request.state,
        request.objection_type,
        &request.response,
    ) {
        Ok((state, outcome)) => {
            let payload = json!({
                "state": state,
                "outcome": outcome,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn escalate_handler<R>(
    State(service): State<Arc<TrainingService<R>>>,
    Json(request): Json<GameStateRequest>,
) -> Response
where
    R: ProgressRepository + 'static,
{
    match service.escalate(&request.state) {
        Ok(state) => (StatusCode::OK, Json(state)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<TrainingService<R>>>,
    Json(request): Json<GameStateRequest>,
) -> Response
where
    R: ProgressRepository + 'static,
{
    match service.level_summary(&request.state) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Lookups the client named map to 404; state misuse to 409; everything else is a 500 with
/// the generic retry message.
fn error_response(err: TrainingServiceError) -> Response {
    let (status, message) = match &err {
        TrainingServiceError::Training(TrainingError::Configuration(
            ConfigurationError::UnknownModule(_)
            | ConfigurationError::UnknownSection(_)
            | ConfigurationError::UnknownScenario { .. },
        )) => (StatusCode::NOT_FOUND, err.to_string()),
        TrainingServiceError::Training(TrainingError::State(_)) => {
            (StatusCode::CONFLICT, GENERIC_ERROR.to_string())
        }
        TrainingServiceError::Repository(RepositoryError::Unavailable(_)) => {
            (StatusCode::SERVICE_UNAVAILABLE, GENERIC_ERROR.to_string())
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR.to_string()),
    };

    if status.is_server_error() {
        error!(error = %err, "training request failed");
    }
    let payload = json!({
        "error": message,
    });
    (status, Json(payload)).into_response()
}
