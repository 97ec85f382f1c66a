//! Text rendering of combat reports

use blight_battle::{CombatEvent, CombatOutcome, CombatReport, Combatant, LogTone};

use crate::batch::BatchResults;

fn tone_marker(tone: LogTone) -> &'static str {
    match tone {
        LogTone::Neutral => " ",
        LogTone::Damage => "-",
        LogTone::Heal => "+",
        LogTone::Miss => "~",
        LogTone::Death => "x",
        LogTone::Retreat => "<",
        LogTone::Infection => "*",
        LogTone::Buff => "^",
        LogTone::Debuff => "v",
    }
}

pub fn describe_outcome(outcome: &CombatOutcome) -> String {
    match outcome {
        CombatOutcome::Victory => "Victory".to_string(),
        CombatOutcome::Defeat => "Defeat".to_string(),
        CombatOutcome::Aborted(reason) => format!("Aborted ({})", reason),
    }
}

fn unit_line(unit: &Combatant) -> String {
    let state = if !unit.is_alive() {
        "dead"
    } else if unit.retreated {
        "retreated"
    } else {
        "standing"
    };
    let mut line = format!(
        "  #{:<3} {:<14} pos {} HP {:>3}/{:<3}",
        unit.id.0, unit.name, unit.position, unit.stats.health, unit.stats.max_health
    );
    if unit.is_hero {
        line.push_str(&format!(" MOR {:>3}/{:<3}", unit.stats.morale, unit.stats.max_morale));
    }
    line.push_str(&format!(" {}", state));
    line
}

/// Prints the player-facing log of one combat followed by both rosters.
pub fn print_combat(scenario: &str, seed: u64, report: &CombatReport) {
    println!("=== {} (seed {}) ===", scenario, seed);
    for event in &report.events {
        match event {
            CombatEvent::RoundStarted { round } => println!("-- Round {} --", round),
            CombatEvent::Log { text, tone } => println!(" {} {}", tone_marker(*tone), text),
            CombatEvent::CombatEnded { outcome } => println!("Result: {}", describe_outcome(outcome)),
            _ => {}
        }
    }
    println!("Rounds: {}", report.rounds);
    println!("Heroes:");
    for unit in &report.heroes {
        println!("{}", unit_line(unit));
    }
    println!("Monsters:");
    for unit in &report.monsters {
        println!("{}", unit_line(unit));
    }
}

pub fn print_batch(results: &BatchResults) {
    let s = &results.summary;
    println!("=== {} x{} (seeds {}..) ===", results.scenario, s.total, results.seed_start);
    println!("Victories: {:>5} ({:.1}%)", s.victories, s.victory_rate * 100.0);
    println!("Defeats:   {:>5}", s.defeats);
    println!("Aborted:   {:>5}", s.aborted);
    println!("Rounds:    avg {:.2}, min {}, max {}", s.avg_rounds, s.min_rounds, s.max_rounds);
}
