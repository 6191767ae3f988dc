//! Headless Turn Simulator
//!
//! Generates a seeded scenario, runs a number of turns through the full
//! pipeline and writes a JSON report of every turn plus the final ledger.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use stellar_regency::core::types::{CharacterId, FactionId};
use stellar_regency::core::{Result, SimulationConfig};
use stellar_regency::economy::EconomyState;
use stellar_regency::galaxy::generate;
use stellar_regency::turn::{GameState, Intent, IntentKind, SocialPlanner, TurnPipeline, TurnReport};
use stellar_regency::world::Character;

/// Headless Turn Simulator - run the kernel for N turns
#[derive(Parser, Debug)]
#[command(name = "turn_sim")]
#[command(about = "Run the per-turn simulation kernel and output a JSON report")]
struct Args {
    /// Number of turns to run
    #[arg(long, default_value_t = 12)]
    turns: u64,

    /// Scenario seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// TOML config file; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct SimReport {
    seed: u64,
    turns: Vec<TurnReport>,
    balances: BTreeMap<FactionId, i64>,
    social_events: usize,
    economy: EconomyState,
}

/// Every actor socializes with the next living character in id order
struct RosterPlanner;

impl SocialPlanner for RosterPlanner {
    fn plan_intents(&mut self, actor: &Character, state: &GameState) -> Result<Vec<Intent>> {
        let living = state.world.living_characters();
        let target: Option<CharacterId> = living
            .iter()
            .copied()
            .find(|id| *id > actor.id)
            .or_else(|| living.first().copied())
            .filter(|id| *id != actor.id);
        Ok(vec![Intent::new(IntentKind::Socialize, target)])
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stellar_regency=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load_from_toml(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.galaxy.seed = seed;
    }

    let mut state = generate(&config.galaxy)?.into_game_state(&config)?;
    let mut pipeline = TurnPipeline::new().with_planner(RosterPlanner);

    let mut turns = Vec::with_capacity(args.turns as usize);
    for turn in 1..=args.turns {
        turns.push(pipeline.process_all_turn_events(&mut state, turn));
    }

    let failed = turns.iter().filter(|r| !r.all_succeeded()).count();
    tracing::info!(turns = turns.len(), turns_with_failures = failed, "simulation finished");

    let report = SimReport {
        seed: config.galaxy.seed,
        turns,
        balances: state.funds.snapshot(),
        social_events: state.social_log.len(),
        economy: state.economy.snapshot(),
    };
    let json = serde_json::to_string_pretty(&report)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{}", json),
    }
    Ok(())
}
