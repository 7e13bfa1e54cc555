//! Robot Service - Entry Point
//!
//! Loads configuration, installs logging and either runs a scripted skirmish
//! against the in-memory map and store, or asks the configured map service
//! for a route. Results are printed to stdout as JSON.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use robot_service::combat::LootReport;
use robot_service::command::{Command, CommandEnvelope, CommandExecutor};
use robot_service::core::config::{config, set_config, ServiceConfig};
use robot_service::core::error::{GameError, Result};
use robot_service::core::types::{PlanetId, PlayerId};
use robot_service::events::TracingPublisher;
use robot_service::planet::{MapClient, Planet, PlanetMap, StaticMap};
use robot_service::robot::resource::ResourceType;
use robot_service::robot::state::Robot;
use robot_service::store::{InMemoryStore, RobotRepository};

#[derive(Parser, Debug)]
#[command(name = "robot-service")]
#[command(about = "Robot lifecycle, combat and loot service")]
struct Args {
    /// TOML config file; environment overrides still apply
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic loot distribution
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Two players fight over a coal planet
    Skirmish {
        /// Robots per player
        #[arg(long, default_value_t = 3)]
        robots: usize,

        #[arg(long, default_value_t = 15)]
        rounds: u32,
    },
    /// Resolve a move through the map service at `map_service_url`
    Route {
        #[arg(long)]
        from: Uuid,

        #[arg(long)]
        to: Uuid,
    },
}

type Skirmish = CommandExecutor<InMemoryStore, StaticMap, TracingPublisher>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Distribution {
    round: u32,
    planet: PlanetId,
    report: LootReport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SkirmishResult {
    seed: Option<u64>,
    rounds: u32,
    robots: Vec<Robot>,
    planets: Vec<Planet>,
    distributions: Vec<Distribution>,
    failed_commands: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut loaded = match &args.config {
        Some(path) => ServiceConfig::load_from_toml(path)?.with_env_overrides()?,
        None => ServiceConfig::from_env()?,
    };
    if args.seed.is_some() {
        loaded.rng_seed = args.seed;
    }
    loaded.validate()?;
    set_config(loaded).map_err(|_| GameError::Config("config already initialized".into()))?;
    let config = config();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Robot service starting...");

    let rt = Runtime::new()?;
    let output = match args.mode {
        Some(Mode::Route { from, to }) => {
            let map = MapClient::from_config(config)?;
            let route = rt.block_on(map.route(PlanetId(from), PlanetId(to)))?;
            serde_json::to_string_pretty(&route)?
        }
        Some(Mode::Skirmish { robots, rounds }) => {
            serde_json::to_string_pretty(&rt.block_on(run_skirmish(config, robots, rounds))?)?
        }
        None => serde_json::to_string_pretty(&rt.block_on(run_skirmish(config, 3, 15))?)?,
    };

    println!("{}", output);
    Ok(())
}

/// Player one starts on the coal field, player two on the outpost next to it
async fn run_skirmish(
    config: &ServiceConfig,
    robots_per_player: usize,
    rounds: u32,
) -> Result<SkirmishResult> {
    let field = Planet::new(PlanetId::new()).with_resource(ResourceType::Coal);
    let outpost = Planet::new(PlanetId::new()).with_resource(ResourceType::Iron);

    let map = StaticMap::new();
    map.add_planet(field.clone(), 2, 500);
    map.add_planet(outpost.clone(), 1, 200);
    map.connect(field.id, outpost.id);

    let mut executor = Skirmish::new(InMemoryStore::new(), map, TracingPublisher, config);

    let defenders = PlayerId::new();
    let raiders = PlayerId::new();
    for _ in 0..robots_per_player {
        executor.spawn(defenders, field.clone());
        executor.spawn(raiders, outpost.clone());
    }
    tracing::info!(robots = robots_per_player * 2, rounds, "skirmish set up");

    let mut distributions = Vec::new();
    let mut failed_commands = 0;

    for round in 1..=rounds {
        for robot in executor.store().all_robots() {
            if !robot.is_alive() {
                continue;
            }
            let command = next_command(&executor, &robot, round, field.id);
            let envelope = CommandEnvelope::new(robot.player(), robot.id(), command);
            if !executor.execute(envelope).await.success {
                failed_commands += 1;
            }
        }

        for (planet, report) in executor.end_round()? {
            distributions.push(Distribution {
                round,
                planet,
                report,
            });
        }
        tracing::debug!(round, alive = executor.store().robot_count(), "round closed");
    }

    Ok(SkirmishResult {
        seed: config.rng_seed,
        rounds,
        robots: executor.store().all_robots(),
        planets: executor.store().all_planets(),
        distributions,
        failed_commands,
    })
}

/// Scripted behaviour: the first defender blocks the field in round one,
/// raiders head for the field, everyone fights when an enemy is in reach and
/// mines otherwise
fn next_command(executor: &Skirmish, robot: &Robot, round: u32, field: PlanetId) -> Command {
    if robot.planet() != field {
        return if robot.energy() >= 2 {
            Command::Move { target: field }
        } else {
            Command::Regenerate
        };
    }
    if round == 1 && robot.energy() >= robot.block_cost() {
        let first_on_field = executor
            .store()
            .of_player_on_planet(robot.player(), field)
            .first()
            .map(|r| r.id());
        if first_on_field == Some(robot.id()) {
            return Command::Block;
        }
    }
    if robot.energy() < robot.attack_cost() {
        return Command::Regenerate;
    }

    let enemy = executor
        .store()
        .on_planet(field)
        .into_iter()
        .find(|r| r.is_alive() && r.player() != robot.player());
    match enemy {
        Some(enemy) => Command::Attack { target: enemy.id() },
        None if robot.inventory().is_full() => Command::Regenerate,
        None if robot.energy() >= robot.mining_cost() => Command::Mine,
        None => Command::Regenerate,
    }
}
