//! Combatant stat model.
//!
//! A [`Combatant`] is one hero or monster in a party slot. All stats are plain
//! integers so the record stays SCALE-encodable and bit-exact across platforms.

use alloc::string::String;
use alloc::vec::Vec;
use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::abilities::AbilityId;

/// Maximum number of combatants a party can field.
pub const MAX_PARTY_SIZE: usize = 4;

/// Stable identifier of a combatant for the lifetime of a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
pub struct CombatantId(pub u32);

/// Identifier of a virus strain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
pub struct VirusId(pub u32);

/// Every stat an ability can read or modify.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
pub enum StatKind {
    Health,
    MaxHealth,
    Morale,
    MaxMorale,
    Attack,
    Defense,
    Speed,
    Evasion,
    Infectivity,
    Immunity,
}

impl StatKind {
    pub const ALL: [StatKind; 10] = [
        StatKind::Health,
        StatKind::MaxHealth,
        StatKind::Morale,
        StatKind::MaxMorale,
        StatKind::Attack,
        StatKind::Defense,
        StatKind::Speed,
        StatKind::Evasion,
        StatKind::Infectivity,
        StatKind::Immunity,
    ];

    /// Health and Morale are outcomes of a fight rather than buffs; they survive
    /// the end-of-combat rollback.
    pub fn is_vital(self) -> bool {
        matches!(self, StatKind::Health | StatKind::Morale)
    }

    /// The stat that caps this one, if any.
    pub fn cap(self) -> Option<StatKind> {
        match self {
            StatKind::Health => Some(StatKind::MaxHealth),
            StatKind::Morale => Some(StatKind::MaxMorale),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StatKind::Health => "health",
            StatKind::MaxHealth => "max health",
            StatKind::Morale => "morale",
            StatKind::MaxMorale => "max morale",
            StatKind::Attack => "attack",
            StatKind::Defense => "defense",
            StatKind::Speed => "speed",
            StatKind::Evasion => "evasion",
            StatKind::Infectivity => "infectivity",
            StatKind::Immunity => "immunity",
        }
    }
}

/// Which stat change carries a virus from one unit to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub enum TransmissionVector {
    Health,
    Morale,
}

impl TransmissionVector {
    pub fn stat(self) -> StatKind {
        match self {
            TransmissionVector::Health => StatKind::Health,
            TransmissionVector::Morale => StatKind::Morale,
        }
    }
}

/// An active infection carried by a combatant.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub struct Infection {
    pub virus: VirusId,
    pub name: String,
    pub vector: TransmissionVector,
    /// Added to the target's immunity when rolling transmission, in percentage points.
    pub infectivity_modifier: i32,
}

/// Raw attribute block of a combatant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub struct StatBlock {
    pub health: i32,
    pub max_health: i32,
    pub morale: i32,
    pub max_morale: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    /// Chance to dodge in percent (0-100).
    pub evasion: i32,
    pub infectivity: i32,
    pub immunity: i32,
}

impl StatBlock {
    pub fn get(&self, stat: StatKind) -> i32 {
        match stat {
            StatKind::Health => self.health,
            StatKind::MaxHealth => self.max_health,
            StatKind::Morale => self.morale,
            StatKind::MaxMorale => self.max_morale,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Speed => self.speed,
            StatKind::Evasion => self.evasion,
            StatKind::Infectivity => self.infectivity,
            StatKind::Immunity => self.immunity,
        }
    }

    fn slot_mut(&mut self, stat: StatKind) -> &mut i32 {
        match stat {
            StatKind::Health => &mut self.health,
            StatKind::MaxHealth => &mut self.max_health,
            StatKind::Morale => &mut self.morale,
            StatKind::MaxMorale => &mut self.max_morale,
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::Speed => &mut self.speed,
            StatKind::Evasion => &mut self.evasion,
            StatKind::Infectivity => &mut self.infectivity,
            StatKind::Immunity => &mut self.immunity,
        }
    }

    /// Sets a stat and re-establishes the vital invariants
    /// (`0 <= health <= max_health`, `0 <= morale <= max_morale`).
    pub fn set(&mut self, stat: StatKind, value: i32) {
        *self.slot_mut(stat) = value.max(0);
        self.health = self.health.clamp(0, self.max_health.max(0));
        self.morale = self.morale.clamp(0, self.max_morale.max(0));
    }

    /// Scales the rank-sensitive stats by `percent`.
    fn scale(&mut self, percent: i64) {
        let scale = |v: i32| round_div(v as i64 * percent, 100) as i32;
        self.max_health = scale(self.max_health);
        self.health = scale(self.health).min(self.max_health);
        self.attack = scale(self.attack);
        self.defense = scale(self.defense);
    }
}

/// One hero or monster participating in a combat session.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub is_hero: bool,
    /// Party slot, 1 is the front.
    pub position: u8,
    pub rank: u8,
    pub stats: StatBlock,
    #[serde(default)]
    pub infections: Vec<Infection>,
    #[serde(default)]
    pub retreated: bool,
    /// Ability loadout; each id must exist in the catalog.
    #[serde(default)]
    pub abilities: Vec<AbilityId>,
}

impl Combatant {
    pub fn hero(id: u32, name: &str, stats: StatBlock) -> Self {
        Self {
            id: CombatantId(id),
            name: name.into(),
            is_hero: true,
            position: 1,
            rank: 1,
            stats,
            infections: Vec::new(),
            retreated: false,
            abilities: Vec::new(),
        }
    }

    /// Monsters never track morale.
    pub fn monster(id: u32, name: &str, mut stats: StatBlock) -> Self {
        stats.morale = 0;
        stats.max_morale = 0;
        Self {
            is_hero: false,
            ..Self::hero(id, name, stats)
        }
    }

    pub fn at_position(mut self, position: u8) -> Self {
        self.position = position;
        self
    }

    pub fn with_abilities(mut self, abilities: Vec<AbilityId>) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn with_infection(mut self, infection: Infection) -> Self {
        self.infections.push(infection);
        self
    }

    /// Applies the rank multiplier to the base stat block. Rank 1 is unscaled,
    /// each further rank adds 25%.
    pub fn at_rank(mut self, rank: u8) -> Self {
        let rank = rank.max(1);
        self.stats.scale(100 + 25 * (rank as i64 - 1));
        self.rank = rank;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.stats.health > 0
    }

    /// Alive and still on the field.
    pub fn is_active(&self) -> bool {
        self.is_alive() && !self.retreated
    }

    pub fn is_infected(&self) -> bool {
        !self.infections.is_empty()
    }

    pub fn has_virus(&self, virus: VirusId) -> bool {
        self.infections.iter().any(|i| i.virus == virus)
    }

    pub fn stat(&self, stat: StatKind) -> i32 {
        self.stats.get(stat)
    }

    pub fn set_stat(&mut self, stat: StatKind, value: i32) {
        self.stats.set(stat, value);
    }

    /// Adds `delta` to a stat (clamped), returning the change actually applied.
    pub fn adjust(&mut self, stat: StatKind, delta: i32) -> i32 {
        let before = self.stat(stat);
        self.set_stat(stat, before.saturating_add(delta));
        self.stat(stat) - before
    }

    /// Denominator used when a stat is read as a percentage.
    pub fn percent_base(&self, stat: StatKind) -> i32 {
        match stat.cap() {
            Some(cap) => self.stat(cap),
            None => 1,
        }
    }

    /// True if `stat` is at least `percent` of its cap.
    pub fn at_least_percent(&self, stat: StatKind, percent: u32) -> bool {
        let base = self.percent_base(stat) as i64;
        self.stat(stat) as i64 * 100 >= base * percent as i64
    }
}

// ==========================================
// INTEGER MATH
// ==========================================

/// Divides and rounds half away from zero.
pub fn round_div(num: i64, den: i64) -> i64 {
    if den == 0 {
        return 0;
    }
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    if num >= 0 {
        (num + den / 2) / den
    } else {
        -((-num + den / 2) / den)
    }
}
