use crate::infra::{load_progress_file, training_service, InMemoryProgressRepository};
use chrono::Utc;
use clap::Args;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sales_trainer::config::TrainingConfig;
use sales_trainer::error::AppError;
use sales_trainer::training::scoring::{CategoryScorer, ObjectionScorer, ResponseGate};
use sales_trainer::training::{
    module_status, tier_completion, unlocked_tiers, Catalog, Difficulty, GamePhase,
    LevelTransition, ObjectionCatalog, ObjectionGame, ObjectionType, TraineeId,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScenarioScoreArgs {
    /// Module id, e.g. intake-beginner
    #[arg(long)]
    pub(crate) module: String,
    /// Scenario index within the module
    #[arg(long, default_value_t = 0)]
    pub(crate) scenario: usize,
    /// The trainee's response text
    pub(crate) response: String,
}

#[derive(Args, Debug)]
pub(crate) struct ObjectionScoreArgs {
    /// Objection type, e.g. PRICE or send-info
    #[arg(long, value_parser = parse_objection)]
    pub(crate) objection: ObjectionType,
    /// The trainee's response text
    pub(crate) response: String,
}

#[derive(Args, Debug)]
pub(crate) struct ProgressArgs {
    /// JSON file holding a trainee's module progress list
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Only list modules of this tier (BEGINNER, INTERMEDIATE, ADVANCED)
    #[arg(long, value_parser = parse_difficulty)]
    pub(crate) tier: Option<Difficulty>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Seed for objection draws and simulated responses
    #[arg(long, default_value_t = 7)]
    pub(crate) seed: u64,
    /// Session score carried in from earlier play
    #[arg(long, default_value_t = 0)]
    pub(crate) prior_score: i64,
    /// Stop after this many level attempts
    #[arg(long, default_value_t = 6)]
    pub(crate) max_levels: u32,
    /// Skip the scripted-scenario portion of the demo
    #[arg(long)]
    pub(crate) skip_scenarios: bool,
}

fn parse_objection(raw: &str) -> Result<ObjectionType, String> {
    ObjectionType::parse(raw).ok_or_else(|| {
        let known = ObjectionType::ALL
            .iter()
            .map(|kind| kind.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown objection type '{raw}' (expected one of {known})")
    })
}

fn parse_difficulty(raw: &str) -> Result<Difficulty, String> {
    Difficulty::parse(raw).ok_or_else(|| format!("unknown tier '{raw}'"))
}

pub(crate) fn run_scenario_score(args: ScenarioScoreArgs, config: &TrainingConfig) -> Result<(), AppError> {
    let catalog = Catalog::standard()?;
    let module = catalog.module(&args.module)?;
    let scenario = catalog.scenario(&args.module, args.scenario)?;
    let outcome = CategoryScorer::default().score(&args.response, &scenario.rubric);

    println!("Scenario {}#{}: {}", module.id, args.scenario, scenario.prompt_script);
    println!(
        "Total score: {} (module requires {})",
        outcome.total_score, module.required_score
    );
    for (category, score) in &outcome.per_category {
        let weight = scenario.rubric.get(category).map_or(0.0, |c| c.weight);
        println!("- {category}: {score:.0}/100 (weight {weight})");
    }
    for line in &outcome.feedback {
        println!("  {line}");
    }
    let tier_pass = config.unlock_policy().pass_score(module.difficulty);
    if outcome.total_score >= tier_pass {
        println!("Meets the {} pass score of {tier_pass}.", module.difficulty.label());
    }
    Ok(())
}

pub(crate) fn run_objection_score(args: ObjectionScoreArgs, config: &TrainingConfig) -> Result<(), AppError> {
    let objections = ObjectionCatalog::standard();
    let rubric = objections.rubric(args.objection)?;
    let scorer = ObjectionScorer::new(ResponseGate::new(config.min_response_chars));
    let outcome = scorer.score(&args.response, rubric);

    println!("Objection {} ({:?})", args.objection.label(), args.objection.category());
    println!("Points: {} (raw {})", outcome.points, outcome.raw_points);
    if !outcome.used_phrases.is_empty() {
        println!("Approved phrases: {}", outcome.used_phrases.join(", "));
    }
    if !outcome.missed_opportunities.is_empty() {
        println!("Missed: {}", outcome.missed_opportunities.join(", "));
    }
    println!("{}", outcome.feedback);
    Ok(())
}

pub(crate) fn run_progress_report(args: ProgressArgs, config: &TrainingConfig) -> Result<(), AppError> {
    let catalog = Catalog::standard()?;
    let progress = load_progress_file(&args.file)?;
    let policy = config.unlock_policy();

    println!("Progress report for {} recorded modules", progress.len());
    let completion = tier_completion(&progress);
    let unlocked = unlocked_tiers(&progress, &policy);
    for tier in Difficulty::ALL {
        let state = if unlocked.contains(&tier) { "unlocked" } else { "locked" };
        println!(
            "- {}: {}% complete ({state})",
            tier.label(),
            completion.get(&tier).copied().unwrap_or(0)
        );
    }

    println!("\nModules");
    for module in catalog.modules() {
        if args.tier.is_some_and(|tier| tier != module.difficulty) {
            continue;
        }
        let status = module_status(&module.id, &progress, &catalog, &policy)?;
        let detail = match (&status.lock_message, status.completed) {
            (Some(message), _) => format!("locked: {message}"),
            (None, true) => format!("completed, best {}", status.score),
            (None, false) if status.attempts > 0 => {
                format!("best {} of {} needed", status.score, status.minimum_score_required)
            }
            (None, false) => "not started".to_string(),
        };
        println!("- {} | {}", status.module_id, detail);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs, config: &TrainingConfig) -> Result<(), AppError> {
    let DemoArgs {
        seed,
        prior_score,
        max_levels,
        skip_scenarios,
    } = args;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    println!("Sales training demo (seed {seed})");
    if !skip_scenarios {
        run_scenario_demo(config, &mut rng)?;
    }

    println!("\nRebuttal Royale");
    let game = ObjectionGame::standard(config.game_rules());
    let mut state = game.start(prior_score);
    let mut attempts = 0;

    while attempts < max_levels {
        attempts += 1;
        let level = game.levels().level(state.current_level_id)?;
        println!(
            "\nLevel {}: {} ({}, needs {} points)",
            level.id,
            level.name,
            level.difficulty.label(),
            game.passing_score(level)
        );

        loop {
            let prompt = game.next_objection(&state, &mut rng)?;
            let response = simulated_response(&game, prompt.objection_type, &mut rng)?;
            println!(
                "  Prospect ({:?}, intensity {:.2}): {}",
                prompt.emotion, prompt.intensity, prompt.scenario
            );
            println!("  Agent: {response}");

            let (next, outcome) = game.submit_response(&state, prompt.objection_type, &response)?;
            println!("  -> {} | {}", outcome.score.points, outcome.score.feedback);
            for badge in &outcome.new_badges {
                println!("  Badge earned: {badge}");
            }
            state = next;

            if !outcome.level_complete {
                state = game.escalate_intensity(&state)?;
                continue;
            }

            let summary = game.level_summary(&state)?;
            println!(
                "  Level finished with {} points, {} responses, average {:.1}",
                summary.score, summary.stats.total_responses, summary.stats.average_score
            );
            match outcome.transition {
                LevelTransition::Failed => println!("  Not passed; retrying the level."),
                LevelTransition::Advanced { level_id } => println!("  Advanced to level {level_id}."),
                LevelTransition::Held { requirement } => {
                    println!("  Passed; the next level needs {requirement}.")
                }
                LevelTransition::GameComplete => println!("  Final level passed."),
                LevelTransition::Continue => {}
            }
            break;
        }

        if state.phase == GamePhase::Ended {
            break;
        }
        state = game.start_level(&state)?;
    }

    let badges = state.badges.earned();
    println!(
        "\nFinal score {} | badges: {}",
        state.display_score(),
        if badges.is_empty() {
            "none".to_string()
        } else {
            badges.iter().map(|badge| badge.to_string()).collect::<Vec<_>>().join(", ")
        }
    );
    Ok(())
}

fn run_scenario_demo(config: &TrainingConfig, rng: &mut ChaCha8Rng) -> Result<(), AppError> {
    let service = training_service(config, InMemoryProgressRepository::default())?;
    let trainee = TraineeId("demo-trainee".to_string());
    let module_id = "intake-beginner";

    println!("\nScripted scenarios for {module_id}");
    let module = service.catalog().module(module_id)?;
    for (index, scenario) in module.scenarios.iter().enumerate() {
        let keys: Vec<&str> = scenario
            .rubric
            .iter()
            .flat_map(|(_, category)| category.key_phrases.iter().map(String::as_str))
            .collect();
        let response = format!("Thank you for that. {}", keys.join(", "));
        let attempt = service.score_scenario(&trainee, module_id, index, &response, Utc::now())?;

        println!("- Agent: {}", scenario.prompt_script);
        match scenario.emotional_context() {
            Some(context) if !context.mood.is_empty() => {
                println!("  Prospect ({}): {}", context.mood, scenario.pick_prospect_line(rng))
            }
            _ => println!("  Prospect: {}", scenario.pick_prospect_line(rng)),
        }
        println!(
            "  Score {} | best {} | attempts {}",
            attempt.score.total_score, attempt.progress.score, attempt.progress.attempts
        );
    }

    let overview = service.progress(&trainee)?;
    let tiers = overview
        .unlocked_tiers
        .iter()
        .map(|tier| tier.label())
        .collect::<Vec<_>>()
        .join(", ");
    println!("Unlocked tiers: {tiers}");
    Ok(())
}

/// Mostly strong answers with an occasional slip, so the demo shows every transition.
fn simulated_response(
    game: &ObjectionGame,
    kind: ObjectionType,
    rng: &mut ChaCha8Rng,
) -> Result<String, AppError> {
    let rubric = game.objections().rubric(kind)?;
    if rng.gen_bool(0.15) {
        let slip = rubric
            .forbidden_phrases
            .choose(rng)
            .map(String::as_str)
            .unwrap_or("whatever");
        return Ok(format!("Honestly, {slip}."));
    }

    let mut parts: Vec<&str> = rubric
        .approved_phrases
        .choose_multiple(rng, 2)
        .map(String::as_str)
        .collect();
    if let Some(key) = rubric.key_phrases.choose(rng) {
        parts.push(key.phrase.as_str());
    }
    Ok(format!("I hear you. {}.", parts.join(", ")))
}
