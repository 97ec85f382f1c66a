//! Per-unit transient combat state.
//!
//! One [`UnitAttackState`] exists for every combatant while a session runs. It
//! gates turn eligibility, tracks cooldowns and owns the bookkeeping needed to
//! undo timed stat modifiers exactly.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::abilities::{AbilityDefinition, AbilityId, CooldownKind, ModifierDuration};
use crate::types::{Combatant, StatKind};

/// An active timed modifier on one stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempStat {
    pub delta: i32,
    pub remaining: ModifierDuration,
    /// Stat value before the modifier was applied.
    pub base: i32,
    /// Change actually made after clamping.
    pub applied: i32,
}

impl TempStat {
    /// Undoes the modifier. Health and Morale give back only the applied
    /// change, and never to a fallen unit, so damage and healing taken
    /// meanwhile stick. Every other stat returns to its exact base.
    fn revert(&self, unit: &mut Combatant, stat: StatKind) {
        if stat.is_vital() {
            if unit.is_alive() {
                unit.adjust(stat, -self.applied);
            }
        } else {
            unit.set_stat(stat, self.base);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitAttackState {
    pub attacks_this_round: u32,
    pub round_counter: u32,
    /// Cooldowns that tick down per action of the owner.
    pub ability_cooldowns: BTreeMap<AbilityId, u32>,
    /// Cooldowns that tick down per round.
    pub round_cooldowns: BTreeMap<AbilityId, u32>,
    pub skip_next_attack: bool,
    pub interrupted_this_round: bool,
    pub temp_stats: BTreeMap<StatKind, TempStat>,
}

fn tick(cooldowns: &mut BTreeMap<AbilityId, u32>) {
    cooldowns.retain(|_, left| {
        *left = left.saturating_sub(1);
        *left > 0
    });
}

impl UnitAttackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Round-start bookkeeping. Returns the stats whose modifiers expired.
    pub fn begin_round(&mut self, unit: &mut Combatant) -> Vec<StatKind> {
        self.attacks_this_round = 0;
        self.round_counter += 1;
        self.interrupted_this_round = false;
        tick(&mut self.round_cooldowns);
        self.tick_modifiers(unit)
    }

    pub fn is_ready(&self, ability: &AbilityId) -> bool {
        !self.ability_cooldowns.contains_key(ability) && !self.round_cooldowns.contains_key(ability)
    }

    pub fn cooldown_left(&self, ability: &AbilityId) -> u32 {
        let uses = self.ability_cooldowns.get(ability).copied().unwrap_or(0);
        let rounds = self.round_cooldowns.get(ability).copied().unwrap_or(0);
        uses.max(rounds)
    }

    /// Records an action: counts it, ticks uses-type cooldowns and then puts
    /// the ability just used on cooldown.
    pub fn finish_action(&mut self, used: Option<&AbilityDefinition>) {
        self.attacks_this_round += 1;
        tick(&mut self.ability_cooldowns);
        if let Some(ability) = used {
            if ability.cooldown > 0 {
                let map = match ability.cooldown_kind {
                    CooldownKind::Uses => &mut self.ability_cooldowns,
                    CooldownKind::Rounds => &mut self.round_cooldowns,
                };
                map.insert(ability.id.clone(), ability.cooldown);
            }
        }
    }

    /// Marks the unit to lose its next turn.
    pub fn interrupt(&mut self) {
        self.skip_next_attack = true;
        self.interrupted_this_round = true;
    }

    /// Consumes a pending skip. Returns true if the turn is lost.
    pub fn consume_skip(&mut self) -> bool {
        core::mem::take(&mut self.skip_next_attack)
    }

    // ==========================================
    // TIMED MODIFIERS
    // ==========================================

    /// Applies `delta` to `stat`, replacing any modifier already active on it.
    /// Returns the new stat value.
    pub fn apply_modifier(
        &mut self,
        unit: &mut Combatant,
        stat: StatKind,
        delta: i32,
        duration: ModifierDuration,
    ) -> i32 {
        if let Some(previous) = self.temp_stats.remove(&stat) {
            previous.revert(unit, stat);
        }
        let base = unit.stat(stat);
        unit.set_stat(stat, base.saturating_add(delta).max(0));
        self.temp_stats.insert(
            stat,
            TempStat {
                delta,
                remaining: duration,
                base,
                applied: unit.stat(stat) - base,
            },
        );
        unit.stat(stat)
    }

    /// Ticks every round-limited modifier and reverts those reaching zero.
    pub fn tick_modifiers(&mut self, unit: &mut Combatant) -> Vec<StatKind> {
        let mut expired = Vec::new();
        for (stat, temp) in self.temp_stats.iter_mut() {
            if let ModifierDuration::Rounds(left) = &mut temp.remaining {
                *left = left.saturating_sub(1);
                if *left == 0 {
                    expired.push(*stat);
                }
            }
        }
        for stat in &expired {
            if let Some(temp) = self.temp_stats.remove(stat) {
                temp.revert(unit, *stat);
            }
        }
        expired
    }
}
