//! The two parties of a combat session.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::abilities::AbilityCatalog;
use crate::error::{CombatError, CombatResult};
use crate::limits::Team;
use crate::types::{Combatant, CombatantId, MAX_PARTY_SIZE};

/// Both sides of a fight, each kept sorted by party position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub heroes: Vec<Combatant>,
    pub monsters: Vec<Combatant>,
}

fn check_side(
    team: Team,
    units: &mut [Combatant],
    catalog: &AbilityCatalog,
    ids: &mut BTreeSet<CombatantId>,
) -> CombatResult<()> {
    if units.len() > MAX_PARTY_SIZE {
        return Err(CombatError::RosterTooLarge {
            team,
            size: units.len() as u32,
        });
    }
    if !units.iter().any(|u| u.is_active()) {
        return Err(CombatError::EmptyRoster { team });
    }

    let mut positions = BTreeSet::new();
    for unit in units.iter_mut() {
        if !ids.insert(unit.id) {
            return Err(CombatError::DuplicateCombatant { id: unit.id });
        }
        if unit.position == 0 || unit.position as usize > MAX_PARTY_SIZE || !positions.insert(unit.position) {
            return Err(CombatError::InvalidPosition {
                id: unit.id,
                position: unit.position,
            });
        }

        let s = &unit.stats;
        let malformed = s.max_health <= 0
            || s.health < 0
            || s.health > s.max_health
            || s.morale < 0
            || s.morale > s.max_morale
            || !(0..=100).contains(&s.evasion)
            || s.attack < 0
            || s.defense < 0
            || s.speed < 0;
        if malformed {
            return Err(CombatError::MalformedCombatant { id: unit.id });
        }

        if let Some(missing) = unit.abilities.iter().find(|a| !catalog.contains(a)) {
            return Err(CombatError::MissingAbility {
                id: unit.id,
                ability: missing.clone(),
            });
        }

        unit.is_hero = team == Team::Hero;
        if team == Team::Monster {
            unit.stats.morale = 0;
            unit.stats.max_morale = 0;
        }
    }
    units.sort_by_key(|u| u.position);
    Ok(())
}

impl Roster {
    /// Validates both parties against the start preconditions.
    pub fn new(
        mut heroes: Vec<Combatant>,
        mut monsters: Vec<Combatant>,
        catalog: &AbilityCatalog,
    ) -> CombatResult<Self> {
        let mut ids = BTreeSet::new();
        check_side(Team::Hero, &mut heroes, catalog, &mut ids)?;
        check_side(Team::Monster, &mut monsters, catalog, &mut ids)?;
        Ok(Self { heroes, monsters })
    }

    pub fn side(&self, team: Team) -> &[Combatant] {
        match team {
            Team::Hero => &self.heroes,
            Team::Monster => &self.monsters,
        }
    }

    pub fn side_mut(&mut self, team: Team) -> &mut Vec<Combatant> {
        match team {
            Team::Hero => &mut self.heroes,
            Team::Monster => &mut self.monsters,
        }
    }

    pub fn team_of(&self, id: CombatantId) -> Option<Team> {
        if self.heroes.iter().any(|u| u.id == id) {
            Some(Team::Hero)
        } else if self.monsters.iter().any(|u| u.id == id) {
            Some(Team::Monster)
        } else {
            None
        }
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.all().find(|u| u.id == id)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.heroes
            .iter_mut()
            .chain(self.monsters.iter_mut())
            .find(|u| u.id == id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Combatant> {
        self.heroes.iter().chain(self.monsters.iter())
    }

    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.heroes.iter_mut().chain(self.monsters.iter_mut())
    }

    /// Living, non-retreated members of a side in position order.
    pub fn active(&self, team: Team) -> impl Iterator<Item = &Combatant> {
        self.side(team).iter().filter(|u| u.is_active())
    }

    pub fn active_count(&self, team: Team) -> usize {
        self.active(team).count()
    }

    /// Closes ranks: active members are renumbered 1..n in their current
    /// order, fallen and retreated members are moved behind them.
    pub fn compact_positions(&mut self, team: Team) -> bool {
        let side = self.side_mut(team);
        side.sort_by_key(|u| (!u.is_active(), u.position));
        let mut moved = false;
        for (i, unit) in side.iter_mut().enumerate() {
            let position = i as u8 + 1;
            if unit.position != position {
                unit.position = position;
                moved = true;
            }
        }
        moved
    }
}
