use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use itertools::Itertools;
use serde::Serialize;
use settlers_core::game::{Game, GameConfig, MAX_PLAYERS, MIN_PLAYERS, PlayerSpec};
use settlers_core::players::CpuWeights;
use settlers_core::types::Color;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser, Clone)]
#[command(name = "settlers-sim")]
#[command(about = "Simulate games between heuristic CPU seats")]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 5)]
    num: u32,

    /// Number of CPU seats (3 or 4)
    #[arg(long, default_value_t = 4)]
    players: usize,

    /// Random seed for reproducibility; game i uses seed + i
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Victory points needed to win
    #[arg(long, default_value_t = 10)]
    vps_to_win: u8,

    /// JSON file overriding CPU scoring weights
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Silence per-game lines
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    games: u32,
    finished: u32,
    wins: BTreeMap<String, usize>,
    avg_turns: f64,
    avg_duration_ms: f64,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_weights(path: Option<&PathBuf>) -> Result<CpuWeights> {
    let Some(path) = path else {
        return Ok(CpuWeights::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading weights from {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing weights in {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.json_logs);

    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&args.players) {
        bail!("--players must be between {MIN_PLAYERS} and {MAX_PLAYERS}");
    }
    let weights = load_weights(args.weights.as_ref())?;
    let specs: Vec<PlayerSpec> = Color::ORDERED
        .iter()
        .take(args.players)
        .map(|&color| PlayerSpec::cpu(format!("{color:?}"), color))
        .collect();

    let mut winners: Vec<String> = Vec::new();
    let mut total_turns = 0u64;
    let mut total_duration = Duration::ZERO;

    for game_idx in 0..args.num {
        let config = GameConfig {
            vps_to_win: args.vps_to_win,
            seed: args.seed + u64::from(game_idx),
            ..GameConfig::default()
        };
        let start = Instant::now();
        let mut game = Game::new(config, specs.clone())?.with_weights(weights.clone());
        let winner = game.play()?;
        let duration = start.elapsed();

        total_turns += u64::from(game.state.turn);
        total_duration += duration;
        let winner_name = winner.map(|seat| game.state.players[seat].name.clone());
        if let Some(name) = &winner_name {
            winners.push(name.clone());
        }

        if !args.quiet {
            let seating = game
                .state
                .cursor
                .order()
                .iter()
                .map(|&seat| &game.state.players[seat].name)
                .join(",");
            println!(
                "Game {:>4}: Seating=[{}], Winner={:>6}, Turns={:>4}, Duration={:?}",
                game_idx + 1,
                seating,
                winner_name.as_deref().unwrap_or("None"),
                game.state.turn,
                duration
            );
        }
    }

    let games = args.num.max(1) as f64;
    let summary = Summary {
        games: args.num,
        finished: winners.len() as u32,
        wins: winners.into_iter().counts().into_iter().collect(),
        avg_turns: total_turns as f64 / games,
        avg_duration_ms: total_duration.as_secs_f64() * 1000.0 / games,
    };
    info!(games = summary.games, finished = summary.finished, "simulation complete");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
