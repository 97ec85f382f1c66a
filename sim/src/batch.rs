//! Batch combat runner for balance checks.
//!
//! Resolves the same scenario under consecutive seeds in parallel and
//! aggregates the outcomes.

use blight_battle::{resolve_combat, AbilityCatalog, CombatOutcome, Team, XorShiftRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::scenario::Scenario;

/// Result of one combat in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub outcome: CombatOutcome,
    pub rounds: u32,
    pub heroes_standing: usize,
    pub monsters_standing: usize,
}

/// Aggregate over a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: u32,
    pub victories: u32,
    pub defeats: u32,
    pub aborted: u32,
    pub victory_rate: f64,
    pub avg_rounds: f64,
    pub min_rounds: u32,
    pub max_rounds: u32,
}

impl BatchSummary {
    pub fn from_runs(runs: &[RunSummary]) -> Self {
        if runs.is_empty() {
            return Self::default();
        }
        let total = runs.len() as u32;
        let count = |team: Option<Team>| runs.iter().filter(|r| r.outcome.winner() == team).count() as u32;
        let victories = count(Some(Team::Hero));
        let defeats = count(Some(Team::Monster));
        let rounds = runs.iter().map(|r| r.rounds);
        Self {
            total,
            victories,
            defeats,
            aborted: total - victories - defeats,
            victory_rate: victories as f64 / total as f64,
            avg_rounds: runs.iter().map(|r| r.rounds as f64).sum::<f64>() / total as f64,
            min_rounds: rounds.clone().min().unwrap_or(0),
            max_rounds: rounds.max().unwrap_or(0),
        }
    }
}

/// Full batch output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    pub scenario: String,
    pub seed_start: u64,
    pub runs: Vec<RunSummary>,
    pub summary: BatchSummary,
}

fn run_single(scenario: &Scenario, catalog: &AbilityCatalog, seed: u64) -> RunSummary {
    let report = resolve_combat(
        scenario.heroes(),
        scenario.monsters(),
        catalog.clone(),
        scenario.config.clone(),
        XorShiftRng::seed_from_u64(seed),
    );
    RunSummary {
        seed,
        rounds: report.rounds,
        heroes_standing: report.heroes.iter().filter(|u| u.is_active()).count(),
        monsters_standing: report.monsters.iter().filter(|u| u.is_active()).count(),
        outcome: report.outcome,
    }
}

/// Runs `count` combats with seeds `seed_start..seed_start + count`.
pub fn run_batch(scenario: &Scenario, catalog: &AbilityCatalog, seed_start: u64, count: u32) -> BatchResults {
    tracing::info!("Running {} combats of '{}' from seed {}", count, scenario.name, seed_start);

    let runs: Vec<RunSummary> = (0..count)
        .into_par_iter()
        .map(|i| {
            let seed = seed_start.wrapping_add(i as u64);
            let run = run_single(scenario, catalog, seed);
            if let CombatOutcome::Aborted(reason) = &run.outcome {
                tracing::warn!("Seed {} aborted: {}", seed, reason);
            }
            run
        })
        .collect();

    let summary = BatchSummary::from_runs(&runs);
    tracing::info!(
        "Batch done: {} victories, {} defeats, {} aborted",
        summary.victories,
        summary.defeats,
        summary.aborted
    );
    BatchResults {
        scenario: scenario.name.clone(),
        seed_start,
        runs,
        summary,
    }
}
