//! Integration checks for trainee progression through the public API.
//!
//! Covers attempt recording, tier unlocking, the objection game's level loop, and custom
//! catalog loading without reaching into private modules.

mod common {
    use chrono::{DateTime, TimeZone, Utc};

    use sales_trainer::training::{record_attempt, Catalog, Difficulty, ModuleProgress};

    pub(super) fn catalog() -> Catalog {
        Catalog::standard().expect("standard catalog loads")
    }

    pub(super) fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 14, hour, 0, 0).unwrap()
    }

    /// Records one attempt at `score` for every module of `tier`, an hour apart.
    pub(super) fn attempt_tier(
        catalog: &Catalog,
        progress: Vec<ModuleProgress>,
        tier: Difficulty,
        score: u32,
    ) -> Vec<ModuleProgress> {
        catalog
            .modules_by_difficulty(tier)
            .into_iter()
            .zip(8..)
            .fold(progress, |progress, (module, hour)| {
                record_attempt(&progress, catalog, &module.id, score, at(hour))
                    .expect("module exists")
            })
    }

    pub(super) const TWO_TIER_CATALOG: &str = r#"{
        "sections": [{
            "id": "greeting",
            "title": "Greeting",
            "description": "Open the call",
            "requiredScore": 70,
            "modules": [
                {
                    "id": "greeting-beginner",
                    "title": "Greeting basics",
                    "difficulty": "BEGINNER",
                    "requiredScore": 70,
                    "scenarios": [{
                        "promptScript": "Thanks for calling, how can I help?",
                        "expectedResponse": "Warm opener",
                        "prospectResponse": ["Hi there", "Hello"],
                        "rubric": {
                            "tonality": { "weight": 50, "keyPhrases": ["thanks for calling"], "forbiddenPhrases": ["what"] },
                            "empathy": { "weight": 30, "keyPhrases": ["happy to help"], "forbiddenPhrases": [] }
                        },
                        "kind": { "type": "conversational" }
                    }]
                },
                {
                    "id": "greeting-intermediate",
                    "title": "Greeting under pressure",
                    "difficulty": "INTERMEDIATE",
                    "requiredScore": 75,
                    "unlockCriteria": { "requiredModuleIds": ["greeting-beginner"], "requiredScore": 70 },
                    "scenarios": []
                }
            ]
        }]
    }"#;
}

use common::*;
use sales_trainer::training::{
    can_unlock, module_accessible, record_attempt, Catalog, ConfigurationError, Difficulty,
    GamePhase, GameRules, GameState, LevelTransition, ObjectionGame, ObjectionType,
    UnlockPolicy, WarningKind,
};

#[test]
fn repeated_attempt_keeps_score_and_counts_attempts() {
    let catalog = catalog();
    let first = record_attempt(&[], &catalog, "intake-beginner", 85, at(9)).expect("recorded");
    let second = record_attempt(&first, &catalog, "intake-beginner", 85, at(10)).expect("recorded");

    assert_eq!(second.len(), 1);
    assert_eq!(second[0].score, 85);
    assert_eq!(second[0].attempts, 2);
    assert!(second[0].completed);
    assert_eq!(second[0].completed_at, Some(at(9)));
    assert_eq!(second[0].last_attempted_at, Some(at(10)));
}

#[test]
fn recorded_attempts_drive_tier_unlocks() {
    let catalog = catalog();
    let policy = UnlockPolicy::default();
    let progress = attempt_tier(&catalog, Vec::new(), Difficulty::Beginner, 70);
    assert_eq!(progress.len(), 10);
    assert!(progress.iter().all(|entry| entry.completed && entry.attempts == 1));
    assert!(can_unlock(Difficulty::Intermediate, &progress, &policy));
    assert!(!can_unlock(Difficulty::Advanced, &progress, &policy));

    // A weaker retry keeps the best score but clears completion, relocking the tier.
    let retried = record_attempt(&progress, &catalog, "intake-beginner", 40, at(20))
        .expect("recorded");
    let intake = retried
        .iter()
        .find(|entry| entry.module_id == "intake-beginner")
        .expect("intake recorded");
    assert_eq!(intake.score, 70);
    assert!(!intake.completed);
    assert!(!can_unlock(Difficulty::Intermediate, &retried, &policy));

    let progress = attempt_tier(&catalog, progress, Difficulty::Intermediate, 75);
    assert_eq!(progress.len(), 20);
    assert!(can_unlock(Difficulty::Advanced, &progress, &policy));
}

#[test]
fn finishing_the_prerequisite_opens_the_next_module() {
    let catalog = catalog();
    let policy = UnlockPolicy::default();
    let locked = module_accessible("eligibility-intermediate", &[], &catalog, &policy)
        .expect("module exists");
    assert!(!locked.accessible);

    let progress = record_attempt(&[], &catalog, "eligibility-beginner", 90, at(9))
        .expect("recorded");
    let open = module_accessible("eligibility-intermediate", &progress, &catalog, &policy)
        .expect("module exists");
    assert!(open.accessible);
}

fn play(game: &ObjectionGame, state: &GameState, kind: ObjectionType, response: &str) -> GameState {
    game.submit_response(state, kind, response)
        .expect("response accepted")
        .0
}

#[test]
fn failed_level_restarts_with_score_and_badges() {
    let game = ObjectionGame::standard(GameRules::default());
    let state = game.start(0);

    let state = play(&game, &state, ObjectionType::Price, "I understand, let me share how we make this affordable, with monthly payments");
    let state = play(&game, &state, ObjectionType::SendInfo, "Okay, I hear what you are saying there.");
    let (state, outcome) = game
        .submit_response(&state, ObjectionType::CallBack, "Okay, I hear what you are saying there.")
        .expect("response accepted");

    assert_eq!(state.objections_completed_in_level, 3);
    assert!(outcome.level_complete);
    assert_eq!(outcome.passed_level, Some(false));
    assert_eq!(outcome.transition, LevelTransition::Failed);

    let retry = game.start_level(&state).expect("retry starts");
    assert_eq!(retry.objections_completed_in_level, 0);
    assert_eq!(retry.score, state.score);
    assert_eq!(retry.badges, state.badges);
    assert_eq!(retry.phase, GamePhase::InLevel);
}

#[test]
fn forbidden_phrase_ends_a_four_win_streak() {
    let game = ObjectionGame::standard(GameRules {
        objections_per_level: 10,
        ..GameRules::default()
    });
    let mut state = game.start(0);
    for _ in 0..4 {
        state = play(&game, &state, ObjectionType::NotInterested, "Okay, I hear what you are saying there.");
    }
    assert_eq!(state.consecutive_wins, 4);

    let (next, outcome) = game
        .submit_response(&state, ObjectionType::Price, "Honestly it's cheap, just sign up")
        .expect("response accepted");
    assert_eq!(next.consecutive_wins, 0);
    assert_eq!(outcome.score.points, 0);
    assert!(outcome.score.forbidden_used);
}

#[test]
fn game_state_survives_a_json_round_trip_mid_level() {
    let game = ObjectionGame::standard(GameRules::default());
    let state = play(
        &game,
        &game.start(0),
        ObjectionType::Price,
        "I understand, let me share how we make this affordable, with monthly payments",
    );

    let wire = serde_json::to_string(&state).expect("serializes");
    let restored: GameState = serde_json::from_str(&wire).expect("deserializes");
    assert_eq!(restored, state);

    let continued = play(&game, &restored, ObjectionType::Trust, "Okay, I hear what you are saying there.");
    assert_eq!(continued.objections_completed_in_level, 2);
}

#[test]
fn custom_catalog_loads_from_a_reader_with_lint_warnings() {
    let catalog = Catalog::from_reader(TWO_TIER_CATALOG.as_bytes()).expect("custom catalog");
    assert_eq!(catalog.sections().len(), 1);
    assert_eq!(catalog.section_of("greeting-intermediate").expect("section").id, "greeting");

    let warnings = catalog.lint();
    assert!(warnings
        .iter()
        .any(|warning| matches!(warning.kind, WarningKind::WeightsDoNotSumTo100 { total } if total == 80.0)));
    assert!(warnings
        .iter()
        .any(|warning| warning.kind == WarningKind::ModuleWithoutScenarios
            && warning.location == "greeting-intermediate"));
}

#[test]
fn prerequisites_in_the_same_tier_are_rejected() {
    let broken = TWO_TIER_CATALOG.replace(
        "\"difficulty\": \"INTERMEDIATE\"",
        "\"difficulty\": \"BEGINNER\"",
    );
    match Catalog::from_json(&broken) {
        Err(ConfigurationError::InvalidUnlockReference {
            module_id,
            required_id,
            ..
        }) => {
            assert_eq!(module_id, "greeting-intermediate");
            assert_eq!(required_id, "greeting-beginner");
        }
        other => panic!("expected invalid unlock reference, got {other:?}"),
    }
}
