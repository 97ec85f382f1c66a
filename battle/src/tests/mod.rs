mod catalog;
mod retreat;
mod scheduler;
mod targeting;

use alloc::collections::BTreeMap;

use crate::abilities::*;
use crate::attack_state::UnitAttackState;
use crate::battle::{CombatEvent, CombatOutcome};
use crate::rng::BattleRng;
use crate::roster::Roster;
use crate::types::*;

// ==========================================
// HELPER FUNCTIONS
// ==========================================

/// Replays a fixed list of raw draws, cycling when exhausted.
struct ScriptedRng {
    values: Vec<u32>,
    next: usize,
}

impl ScriptedRng {
    fn new(values: &[u32]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }

    /// Draws that make `roll_percent` return `roll`.
    fn rolling(roll: u32) -> Self {
        Self::new(&[roll - 1])
    }
}

impl BattleRng for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

fn stats(health: i32, attack: i32, defense: i32, speed: i32) -> StatBlock {
    StatBlock {
        health,
        max_health: health,
        morale: 100,
        max_morale: 100,
        attack,
        defense,
        speed,
        evasion: 0,
        infectivity: 0,
        immunity: 0,
    }
}

fn hero(id: u32, health: i32, attack: i32, defense: i32, speed: i32) -> Combatant {
    Combatant::hero(id, &format!("Hero{}", id), stats(health, attack, defense, speed))
        .at_position(id as u8)
        .with_abilities(vec![AbilityId::basic_attack()])
}

fn monster(id: u32, health: i32, attack: i32, defense: i32, speed: i32) -> Combatant {
    Combatant::monster(id, &format!("Monster{}", id), stats(health, attack, defense, speed))
        .at_position((id - 10) as u8)
        .with_abilities(vec![AbilityId::basic_attack()])
}

fn basic_attack() -> AbilityDefinition {
    AbilityDefinition::new(BASIC_ATTACK, "Attack", vec![EffectDefinition::strike(10_000)])
}

fn catalog(mut abilities: Vec<AbilityDefinition>) -> AbilityCatalog {
    abilities.push(basic_attack());
    AbilityCatalog::new(abilities).expect("test catalog is valid")
}

fn roster(heroes: Vec<Combatant>, monsters: Vec<Combatant>) -> Roster {
    let catalog = catalog(vec![]);
    Roster::new(heroes, monsters, &catalog).expect("test roster is valid")
}

fn states_for(roster: &Roster) -> BTreeMap<CombatantId, UnitAttackState> {
    roster.all().map(|u| (u.id, UnitAttackState::new())).collect()
}

fn outcome_of(events: &[CombatEvent]) -> Option<CombatOutcome> {
    events.iter().rev().find_map(|e| match e {
        CombatEvent::CombatEnded { outcome } => Some(outcome.clone()),
        _ => None,
    })
}

/// Ids of the units that used an ability, in order.
fn actors(events: &[CombatEvent]) -> Vec<CombatantId> {
    events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::AbilityUsed { unit, .. } => Some(*unit),
            _ => None,
        })
        .collect()
}

/// Events between the start of `round` and its end.
fn round_events(events: &[CombatEvent], round: u32) -> Vec<CombatEvent> {
    events
        .iter()
        .skip_while(|e| !matches!(e, CombatEvent::RoundStarted { round: r } if *r == round))
        .take_while(|e| !matches!(e, CombatEvent::RoundEnded { round: r } if *r == round))
        .cloned()
        .collect()
}
