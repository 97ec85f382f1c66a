//! Read-only snapshots of combatants for presentation layers.

use alloc::string::String;
use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::types::{Combatant, CombatantId};

/// View of a combatant at one point of the fight
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub struct UnitView {
    pub id: CombatantId,
    pub name: String,
    pub is_hero: bool,
    pub position: u8,
    pub rank: u8,
    pub health: i32,
    pub max_health: i32,
    pub morale: i32,
    pub max_morale: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub evasion: i32,
    /// Names of active infections
    pub infections: Vec<String>,
    pub alive: bool,
    pub retreated: bool,
}

impl From<&Combatant> for UnitView {
    fn from(unit: &Combatant) -> Self {
        let s = &unit.stats;
        Self {
            id: unit.id,
            name: unit.name.clone(),
            is_hero: unit.is_hero,
            position: unit.position,
            rank: unit.rank,
            health: s.health,
            max_health: s.max_health,
            morale: s.morale,
            max_morale: s.max_morale,
            attack: s.attack,
            defense: s.defense,
            speed: s.speed,
            evasion: s.evasion,
            infections: unit.infections.iter().map(|i| i.name.clone()).collect(),
            alive: unit.is_alive(),
            retreated: unit.retreated,
        }
    }
}
