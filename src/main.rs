//! brawlcore headless runner.
//!
//! Runs the scripted demo arena on the simulation core and prints the result:
//!
//! ```sh
//! cargo run --release -- --ticks 1800 --seed 7
//! cargo run --release -- --config brawlcore.ini --abilities abilities.json --json
//! ```

use std::path::PathBuf;

use clap::Parser;

use brawlcore::arena::run_demo;
use brawlcore::resources::simconfig::SimConfig;
use brawlcore::simulation::Simulation;

/// Headless 2D action-game simulation core
#[derive(Parser, Debug)]
#[command(name = "brawlcore")]
#[command(version, about = "Runs a headless demo bout on the brawlcore simulation")]
struct Cli {
    /// INI file with [world], [physics] and [combat] settings
    #[arg(long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// JSON file with extra ability definitions
    #[arg(long, value_name = "ABILITIES_FILE")]
    abilities: Option<PathBuf>,

    /// Seed for block and critical rolls
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Maximum number of ticks to run
    #[arg(long, default_value_t = 1800)]
    ticks: u32,

    /// Print the combat log as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let mut config = SimConfig::with_path(path);
            if let Err(e) = config.load_from_file() {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
            config
        }
        None => SimConfig::new(),
    };

    let mut sim = Simulation::new(config);
    if let Some(path) = &cli.abilities
        && let Err(e) = sim.abilities_mut().load_from_file(path)
    {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Some(seed) = cli.seed {
        sim.seed(seed);
    }

    let report = run_demo(&mut sim, cli.ticks, cli.dt);

    if cli.json {
        match sim.combat_log().to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!(
        "{} ticks, {:.2}s simulated",
        report.ticks, report.elapsed
    );
    println!("hero:  {}", describe(report.hero_health));
    println!("brute: {}", describe(report.brute_health));
    match report.winner() {
        Some(name) => println!("winner: {name}"),
        None => println!("no winner"),
    }
    let log = sim.combat_log();
    for (name, entity) in [("hero", report.hero), ("brute", report.brute)] {
        let totals = log.totals_for(entity);
        println!(
            "{name}: dealt {:.0}, taken {:.0}, healed {:.0}, kills {}",
            totals.damage_dealt, totals.damage_taken, totals.healing_received, totals.kills
        );
    }
}

fn describe(health: Option<f32>) -> String {
    match health {
        Some(h) => format!("{h:.0} hp"),
        None => "dead".to_string(),
    }
}
