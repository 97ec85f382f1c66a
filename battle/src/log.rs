//! Diagnostic logging helpers
//!
//! Thin wrappers over the `log` facade. Nothing is printed unless the host
//! installs a logger; the player-facing combat log travels in the event stream.

use crate::limits::Team;

const TARGET: &str = "blight::battle";

/// Log an info message
#[inline]
pub fn info(msg: &str) {
    log::info!(target: TARGET, "{}", msg);
}

/// Log a warning message
#[inline]
pub fn warn(msg: &str) {
    log::warn!(target: TARGET, "{}", msg);
}

/// Log a debug message with a label
#[inline]
pub fn debug(label: &str, msg: &str) {
    log::debug!(target: TARGET, "[{}] {}", label, msg);
}

/// Log the state of both sides at a round boundary
#[inline]
pub fn round_summary(round: u32, heroes_active: usize, monsters_active: usize) {
    log::debug!(
        target: TARGET,
        "round {}: {} heroes, {} monsters standing",
        round,
        heroes_active,
        monsters_active
    );
}

/// Log an action being performed
#[inline]
pub fn action(unit: &str, ability: &str, targets: usize) {
    log::trace!(target: TARGET, "{} uses {} on {} target(s)", unit, ability, targets);
}

/// Log the end of a combat
#[inline]
pub fn outcome(winner: Option<Team>, rounds: u32) {
    match winner {
        Some(team) => log::info!(target: TARGET, "{} side wins after {} rounds", team, rounds),
        None => log::info!(target: TARGET, "combat aborted after {} rounds", rounds),
    }
}
