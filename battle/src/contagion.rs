//! Infection spread between combatants.
//!
//! Every adversarial Health or Morale change gives the viruses riding on that
//! vector one chance to jump each way: forward from source to target, and back
//! from target to source at a dampened rate.

use alloc::format;
use alloc::vec::Vec;

use crate::battle::{CombatEvent, LogTone};
use crate::config::CombatConfig;
use crate::effects::VitalChange;
use crate::rng::BattleRng;
use crate::roster::Roster;
use crate::types::{round_div, CombatantId, Infection, StatKind, TransmissionVector};
use crate::view::UnitView;

/// Chance that a virus with `modifier` infects a unit with `immunity`, in
/// per-mille: `1 - (immunity / 100 + modifier / 100)`, clamped to [0, 1].
pub fn forward_infection_chance_permille(immunity: i32, modifier: i32) -> u32 {
    let resistance = (immunity as i64 + modifier as i64) * 10;
    (1000 - resistance).clamp(0, 1000) as u32
}

/// Forward chance scaled by the configured dampening factor.
pub fn counter_infection_chance_permille(immunity: i32, modifier: i32, config: &CombatConfig) -> u32 {
    let forward = forward_infection_chance_permille(immunity, modifier) as i64;
    round_div(forward * config.counter_infection_permille as i64, 1000) as u32
}

fn vector_of(stat: StatKind) -> Option<TransmissionVector> {
    match stat {
        StatKind::Health => Some(TransmissionVector::Health),
        StatKind::Morale => Some(TransmissionVector::Morale),
        _ => None,
    }
}

/// Viruses on `vector` carried by `from` that `to` does not have yet.
fn candidates(roster: &Roster, from: CombatantId, to: CombatantId, vector: TransmissionVector) -> Vec<Infection> {
    let (Some(from), Some(to)) = (roster.get(from), roster.get(to)) else {
        return Vec::new();
    };
    from.infections
        .iter()
        .filter(|i| i.vector == vector && !to.has_virus(i.virus))
        .cloned()
        .collect()
}

/// Rolls each candidate against `to`, infecting on success.
fn transmit<R: BattleRng>(
    roster: &mut Roster,
    from: CombatantId,
    to: CombatantId,
    infections: Vec<Infection>,
    dampened: Option<&CombatConfig>,
    rng: &mut R,
    events: &mut Vec<CombatEvent>,
) {
    for infection in infections {
        let Some(unit) = roster.get_mut(to) else {
            return;
        };
        if !unit.is_alive() || unit.has_virus(infection.virus) {
            continue;
        }
        let immunity = unit.stat(StatKind::Immunity);
        let chance = match dampened {
            Some(config) => counter_infection_chance_permille(immunity, infection.infectivity_modifier, config),
            None => forward_infection_chance_permille(immunity, infection.infectivity_modifier),
        };
        if !rng.chance_permille(chance) {
            continue;
        }
        let name = infection.name.clone();
        let virus = infection.virus;
        unit.infections.push(infection);
        events.push(CombatEvent::InfectionSpread {
            source: from,
            target: to,
            virus,
        });
        events.push(CombatEvent::Log {
            text: format!("{} contracts {}!", unit.name, name),
            tone: LogTone::Infection,
        });
        events.push(CombatEvent::UnitUpdated {
            unit: UnitView::from(&*unit),
        });
    }
}

/// Runs forward and counter transmission for one vital change.
pub fn spread<R: BattleRng>(
    change: &VitalChange,
    roster: &mut Roster,
    config: &CombatConfig,
    rng: &mut R,
) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    if !change.adversarial || change.delta == 0 {
        return events;
    }
    let Some(vector) = vector_of(change.stat) else {
        return events;
    };

    // Both directions are computed from the infections held before any roll.
    let forward = candidates(roster, change.source, change.target, vector);
    let counter = candidates(roster, change.target, change.source, vector);

    transmit(roster, change.source, change.target, forward, None, rng, &mut events);
    transmit(roster, change.target, change.source, counter, Some(config), rng, &mut events);
    events
}
