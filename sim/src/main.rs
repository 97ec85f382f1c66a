//! Blight headless combat simulator
//!
//! Loads a JSON scenario, resolves one combat or a seeded batch, and prints the
//! result as a combat log or as JSON.

mod batch;
mod cli;
mod report;
mod scenario;

use blight_battle::{resolve_combat, XorShiftRng};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Args;
use crate::scenario::Scenario;

fn main() {
    let args = cli::parse_args();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), String> {
    // stdout carries the report, diagnostics go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(args.log_level())
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))?;

    let scenario = Scenario::load_from_file(&args.scenario)?;
    let catalog = scenario.catalog().map_err(|e| e.to_string())?;
    tracing::info!(
        "Loaded '{}': {} heroes vs {} monsters, {} abilities",
        scenario.name,
        scenario.heroes.len(),
        scenario.monsters.len(),
        catalog.len()
    );

    if args.runs > 1 {
        let results = batch::run_batch(&scenario, &catalog, args.seed, args.runs);
        if args.json {
            let json = serde_json::to_string_pretty(&results).map_err(|e| format!("Failed to encode results: {}", e))?;
            println!("{}", json);
        } else {
            report::print_batch(&results);
        }
        return Ok(());
    }

    let report = resolve_combat(
        scenario.heroes(),
        scenario.monsters(),
        catalog,
        scenario.config.clone(),
        XorShiftRng::seed_from_u64(args.seed),
    );
    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| format!("Failed to encode report: {}", e))?;
        println!("{}", json);
    } else {
        report::print_combat(&scenario.name, args.seed, &report);
    }
    Ok(())
}
