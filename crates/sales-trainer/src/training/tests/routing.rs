use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::training::progress::UnlockPolicy;
use crate::training::router::GENERIC_ERROR;
use crate::training::{training_router, TrainingService};

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn attempt_endpoint_scores_and_records() {
    let (service, repository) = build_service();
    let app = router_with_service(service);

    let response = app
        .oneshot(post_json(
            "/api/v1/training/trainees/trainee-042/attempts",
            json!({
                "moduleId": "intake-beginner",
                "scenarioIndex": 0,
                "response": "Hello, how can I help?",
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["score"]["totalScore"], 20);
    assert_eq!(body["progress"]["attempts"], 1);
    assert_eq!(body["unlockedTiers"], json!(["BEGINNER"]));
    assert_eq!(repository.stored(&trainee()).len(), 1);
}

#[tokio::test]
async fn unknown_module_is_not_found() {
    let (service, _) = build_service();
    let app = router_with_service(service);

    let response = app
        .oneshot(get(
            "/api/v1/training/trainees/trainee-042/modules/closing-expert",
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("closing-expert"));
}

#[tokio::test]
async fn unavailable_store_maps_to_503_with_generic_message() {
    let service = TrainingService::new(
        catalog(),
        Arc::new(game()),
        Arc::new(UnavailableRepository),
        UnlockPolicy::default(),
    );
    let app = training_router(Arc::new(service));

    let response = app
        .oneshot(get("/api/v1/training/trainees/trainee-042/progress"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], GENERIC_ERROR);
}

#[tokio::test]
async fn session_start_returns_fresh_state() {
    let (service, _) = build_service();
    let app = router_with_service(service);

    let response = app
        .oneshot(post_json(
            "/api/v1/rebuttal-royale/sessions",
            json!({ "priorScore": 300 }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["currentLevelId"], 2);
    assert_eq!(body["score"], 300);
    assert_eq!(body["phase"]["state"], "in_level");
}

#[tokio::test]
async fn responding_outside_a_level_is_a_conflict() {
    let (service, _) = build_service();
    let mut state = game().start(0);
    state.phase = crate::training::game::GamePhase::NotStarted;
    let app = router_with_service(service);

    let response = app
        .oneshot(post_json(
            "/api/v1/rebuttal-royale/responses",
            json!({
                "state": state,
                "objectionType": "PRICE",
                "response": PRICE_RESPONSE,
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], GENERIC_ERROR);
}

#[tokio::test]
async fn submitted_response_returns_state_and_outcome() {
    let (service, _) = build_service();
    let state = game().start(0);
    let app = router_with_service(service);

    let response = app
        .oneshot(post_json(
            "/api/v1/rebuttal-royale/responses",
            json!({
                "state": state,
                "objectionType": "PRICE",
                "response": PRICE_RESPONSE,
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["state"]["score"], 75);
    assert_eq!(body["state"]["objectionsCompletedInLevel"], 1);
    assert_eq!(body["outcome"]["levelComplete"], false);
    assert_eq!(body["outcome"]["transition"]["kind"], "continue");
}

#[tokio::test]
async fn seeded_objection_draws_match() {
    let state = game().start(0);
    let request = json!({ "state": state, "seed": 11 });

    let mut drawn = Vec::new();
    for _ in 0..2 {
        let (service, _) = build_service();
        let response = router_with_service(service)
            .oneshot(post_json("/api/v1/rebuttal-royale/objections", request.clone()))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        drawn.push(read_json_body(response).await);
    }

    assert_eq!(drawn[0], drawn[1]);
    assert!(drawn[0]["objectionType"].is_string());
    assert!(drawn[0]["scenario"].is_string());
}
