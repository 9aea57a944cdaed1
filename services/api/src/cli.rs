use crate::demo::{
    run_demo, run_objection_score, run_progress_report, run_scenario_score, DemoArgs,
    ObjectionScoreArgs, ProgressArgs, ScenarioScoreArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sales_trainer::config::AppConfig;
use sales_trainer::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Sales Trainer",
    about = "Run the sales training service or score practice responses from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single practice response
    Score {
        #[command(subcommand)]
        command: ScoreCommand,
    },
    /// Summarize tier and module status from an exported progress list
    Progress(ProgressArgs),
    /// Play a seeded session: scripted scenarios, then the objection game
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ScoreCommand {
    /// Score a response against a scripted scenario's weighted rubric
    Scenario(ScenarioScoreArgs),
    /// Score a response to an objection in the game's point system
    Objection(ObjectionScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score { command } => {
            let config = AppConfig::load()?;
            match command {
                ScoreCommand::Scenario(args) => run_scenario_score(args, &config.training),
                ScoreCommand::Objection(args) => run_objection_score(args, &config.training),
            }
        }
        Command::Progress(args) => run_progress_report(args, &AppConfig::load()?.training),
        Command::Demo(args) => run_demo(args, &AppConfig::load()?.training),
    }
}
