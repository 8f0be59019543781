use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::{Level, event};

use war_core::{GameOutcome, Seat};
use war_sim::config::{DealMode, OutputFormat, PlayMode, SimConfig};
use war_sim::logging::init_logging;
use war_sim::run_session;

/// Two-player War card game simulator.
#[derive(Debug, Parser)]
#[command(
    name = "war-sim",
    author,
    version,
    about = "Simulates a two-player game of War from given or random hands"
)]
struct Cli {
    /// Path to an optional YAML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Name for player 1.
    #[arg(long, value_name = "NAME")]
    name1: Option<String>,

    /// Name for player 2.
    #[arg(long, value_name = "NAME")]
    name2: Option<String>,

    /// Player 1's hand, e.g. K2T4J59.
    #[arg(long, value_name = "HAND")]
    hand1: Option<String>,

    /// Player 2's hand.
    #[arg(long, value_name = "HAND")]
    hand2: Option<String>,

    /// Deal a shuffled 52-card deck instead of explicit hands.
    #[arg(long)]
    random: bool,

    /// Seed for the deal and all reshuffles.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the safety limit on rounds.
    #[arg(long, value_name = "ROUNDS")]
    max_rounds: Option<u32>,

    #[arg(long, value_enum)]
    mode: Option<PlayMode>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write structured JSON logs to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Tracing level for structured logs (RUST_LOG takes precedence).
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Fail instead of prompting when hands are missing.
    #[arg(long)]
    no_prompt: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => SimConfig::from_path(path)?,
        None => SimConfig::default(),
    };

    let overrides = [
        (Seat::One, cli.name1, cli.hand1),
        (Seat::Two, cli.name2, cli.hand2),
    ];
    for (seat, name, hand) in overrides {
        if let Some(name) = name {
            config.player_mut(seat).name = Some(name);
        }
        if let Some(hand) = hand {
            config.player_mut(seat).hand = Some(hand);
        }
    }

    if cli.random {
        config.deal = DealMode::Random;
    }

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    if let Some(max_rounds) = cli.max_rounds {
        config.max_rounds = max_rounds;
    }

    if let Some(mode) = cli.mode {
        config.mode = Some(mode);
    }

    if let Some(format) = cli.format {
        config.output.format = format;
    }

    if let Some(path) = cli.log_file {
        config.enable_log_file(path);
    }

    if let Some(level) = cli.log_level {
        config.logging.tracing_level = level;
    }

    config.validate()?;

    let _logging_guard = init_logging(&config.logging)?;

    let stdin = io::stdin();
    let report = match config.output.format {
        OutputFormat::Text => run_session(
            &config,
            !cli.no_prompt,
            stdin.lock(),
            io::stdout(),
            io::stdout(),
        )?,
        // Keep stdout pure JSON lines; prompts go to stderr.
        OutputFormat::Jsonl => run_session(
            &config,
            !cli.no_prompt,
            stdin.lock(),
            io::stderr(),
            io::stdout(),
        )?,
    };

    let result = match &report.outcome {
        GameOutcome::Winner { name, .. } => format!("winner {name}"),
        GameOutcome::Draw => "draw".to_string(),
        GameOutcome::Unresolved { .. } => "unresolved".to_string(),
    };
    event!(
        target: "war_sim",
        Level::INFO,
        seed = report.seed,
        rounds = report.rounds,
        result = %result,
        "session complete"
    );

    Ok(())
}
