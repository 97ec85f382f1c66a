//! Command-line interface for the Blight combat simulator

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Headless Blight combat simulator
#[derive(Parser, Debug)]
#[command(name = "blight-sim")]
#[command(about = "Resolve Blight party combats from a JSON scenario")]
#[command(version)]
pub struct Args {
    /// Scenario file describing both parties
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Seed for the first run; batch runs use consecutive seeds
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Number of combats to resolve
    #[arg(long, default_value = "1")]
    pub runs: u32,

    /// Print the report as JSON instead of the combat log
    #[arg(long)]
    pub json: bool,

    /// Show engine diagnostics on stderr
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::DEBUG
        } else if self.quiet {
            LevelFilter::WARN
        } else {
            LevelFilter::INFO
        }
    }
}

pub fn parse_args() -> Args {
    Args::parse()
}
