//! Effect execution
//!
//! One effect of an ability is applied to its resolved targets. Every kind is
//! handled by an exhaustive match; the executor returns the events it produced
//! and the vital changes that may spread infections.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::vec::Vec;

use crate::abilities::{
    DefenseCheck, EffectDefinition, EffectKind, HealAmount, HealParams, InstantKillParams,
    SelfSacrificeParams, StatModifierParams, StrikeParams,
};
use crate::attack_state::UnitAttackState;
use crate::battle::{CombatEvent, LogTone};
use crate::config::CombatConfig;
use crate::rng::BattleRng;
use crate::roster::Roster;
use crate::types::{round_div, Combatant, CombatantId, StatKind};
use crate::view::UnitView;

/// Basis points representing a factor of 1.
pub const BP_ONE: i64 = 10_000;

/// A change of Health or Morale caused by one unit on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VitalChange {
    pub source: CombatantId,
    pub target: CombatantId,
    pub stat: StatKind,
    pub delta: i32,
    /// Source and target fight on opposite sides.
    pub adversarial: bool,
}

#[derive(Debug, Default)]
pub struct EffectOutput {
    pub events: Vec<CombatEvent>,
    pub vital_changes: Vec<VitalChange>,
    /// Set when a refused self-sacrifice cancels the rest of the ability.
    pub cancel_rest: bool,
}

impl EffectOutput {
    fn log(&mut self, text: alloc::string::String, tone: LogTone) {
        self.events.push(CombatEvent::Log { text, tone });
    }

    fn updated(&mut self, unit: &Combatant) {
        self.events.push(CombatEvent::UnitUpdated {
            unit: UnitView::from(unit),
        });
    }

    fn vital(&mut self, source: CombatantId, target: CombatantId, stat: StatKind, delta: i32, adversarial: bool) {
        if delta != 0 {
            self.vital_changes.push(VitalChange {
                source,
                target,
                stat,
                delta,
                adversarial,
            });
        }
    }

    fn death(&mut self, unit: &Combatant) {
        self.events.push(CombatEvent::UnitDied { unit: unit.id });
        self.log(format!("{} falls!", unit.name), LogTone::Death);
    }
}

// ==========================================
// FORMULAS
// ==========================================

/// Strike damage for `attack` against `defense`.
///
/// The defense factor is `1 - per_point * defense`, where `per_point` is the
/// configured standard factor or the effect's partial factor (basis points).
pub fn strike_damage(
    attack: i32,
    defense: i32,
    check: DefenseCheck,
    multiplier_bp: u32,
    partial_defense_bp: u32,
    config: &CombatConfig,
) -> i32 {
    let per_point = match check {
        DefenseCheck::Standard => config.defense_bp_per_point as i64,
        DefenseCheck::Partial => partial_defense_bp as i64,
        DefenseCheck::None => 0,
    };
    let factor_bp = (BP_ONE - per_point * defense.max(0) as i64).max(0);
    let scale = BP_ONE * BP_ONE;
    let raw = (attack as i128 * factor_bp as i128 * multiplier_bp as i128).clamp(0, (i64::MAX - scale) as i128) as i64;
    round_div(raw, scale).clamp(0, i32::MAX as i64) as i32
}

/// Dodge roll: a uniform percent roll at or under the clamped evasion dodges.
pub fn roll_dodge<R: BattleRng>(evasion: i32, rng: &mut R) -> bool {
    let evasion = evasion.clamp(0, 100) as u32;
    rng.roll_percent() <= evasion
}

/// Whether `user` can currently pay for a self-sacrifice.
pub fn can_pay_sacrifice(user: &Combatant, params: &SelfSacrificeParams) -> bool {
    let max = user.stat(StatKind::MaxHealth) as i64;
    user.stat(StatKind::Health) as i64 * 100 > max * params.min_health_percent as i64
}

// ==========================================
// EXECUTOR
// ==========================================

/// Applies `effect` from `user` to `targets`.
pub fn execute<R: BattleRng>(
    effect: &EffectDefinition,
    user: CombatantId,
    targets: &[CombatantId],
    roster: &mut Roster,
    states: &mut BTreeMap<CombatantId, UnitAttackState>,
    config: &CombatConfig,
    rng: &mut R,
) -> EffectOutput {
    let mut out = EffectOutput::default();

    if let EffectKind::SelfSacrifice(params) = effect.kind {
        self_sacrifice(&params, user, roster, &mut out);
        return out;
    }

    let Some(user_team) = roster.team_of(user) else {
        return out;
    };
    let (user_name, user_attack) = match roster.get(user) {
        Some(u) => (u.name.clone(), u.stat(StatKind::Attack)),
        None => return out,
    };

    for &target_id in targets {
        let adversarial = roster.team_of(target_id) != Some(user_team);
        let Some(target) = roster.get_mut(target_id) else {
            continue;
        };
        if !target.is_active() {
            continue;
        }

        if effect.dodgeable && adversarial && roll_dodge(target.stat(StatKind::Evasion), rng) {
            out.events.push(CombatEvent::Dodged {
                attacker: user,
                target: target_id,
            });
            out.log(format!("{} dodges {}'s attack!", target.name, user_name), LogTone::Miss);
            continue;
        }

        match effect.kind {
            EffectKind::Strike(params) => strike(
                &params,
                effect,
                user,
                &user_name,
                user_attack,
                target,
                adversarial,
                config,
                &mut out,
            ),
            EffectKind::Heal(params) => heal(&params, user, target, adversarial, &mut out),
            EffectKind::Interrupt => {
                if let Some(state) = states.get_mut(&target_id) {
                    state.interrupt();
                }
                out.log(format!("{} is interrupted!", target.name), LogTone::Debuff);
            }
            EffectKind::InstantKill(params) => instant_kill(&params, user, target, adversarial, &mut out),
            EffectKind::StatModifier(params) => {
                let Some(state) = states.get_mut(&target_id) else {
                    continue;
                };
                stat_modifier(&params, effect, user, target, state, adversarial, &mut out)
            }
            EffectKind::SelfSacrifice(_) => {}
        }
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn strike(
    params: &StrikeParams,
    effect: &EffectDefinition,
    user: CombatantId,
    user_name: &str,
    attack: i32,
    target: &mut Combatant,
    adversarial: bool,
    config: &CombatConfig,
    out: &mut EffectOutput,
) {
    let damage = strike_damage(
        attack,
        target.stat(StatKind::Defense),
        effect.defense_check,
        params.multiplier_bp,
        effect.partial_defense_bp,
        config,
    );
    let dealt = -target.adjust(StatKind::Health, -damage);
    out.vital(user, target.id, StatKind::Health, -dealt, adversarial);
    out.log(
        format!("{} hits {} for {} damage", user_name, target.name, dealt),
        LogTone::Damage,
    );

    if params.morale_damage > 0 && target.is_hero && target.is_alive() {
        let lost = -target.adjust(StatKind::Morale, -(params.morale_damage as i32));
        out.vital(user, target.id, StatKind::Morale, -lost, adversarial);
        if lost > 0 {
            out.log(format!("{} loses {} morale", target.name, lost), LogTone::Debuff);
        }
    }

    out.updated(target);
    if !target.is_alive() {
        out.death(target);
    }
}

fn heal(params: &HealParams, user: CombatantId, target: &mut Combatant, adversarial: bool, out: &mut EffectOutput) {
    let stat = params.stat.stat();
    if target.at_least_percent(stat, params.threshold_percent) {
        out.log(
            format!("{} does not need {} restored", target.name, stat.name()),
            LogTone::Neutral,
        );
        return;
    }
    let amount = match params.amount {
        HealAmount::Flat(n) => n,
        HealAmount::PercentOfMax(p) => round_div(target.percent_base(stat) as i64 * p as i64, 100) as i32,
    };
    let gained = target.adjust(stat, amount.max(0));
    out.vital(user, target.id, stat, gained, adversarial);
    out.log(format!("{} recovers {} {}", target.name, gained, stat.name()), LogTone::Heal);
    out.updated(target);
}

fn self_sacrifice(params: &SelfSacrificeParams, user: CombatantId, roster: &mut Roster, out: &mut EffectOutput) {
    let Some(unit) = roster.get_mut(user) else {
        out.cancel_rest = true;
        return;
    };
    if !can_pay_sacrifice(unit, params) {
        out.log(format!("{} is too weak to pay the price", unit.name), LogTone::Neutral);
        out.cancel_rest = true;
        return;
    }
    let max = unit.stat(StatKind::MaxHealth) as i64;
    let cost = round_div(max * params.cost_percent as i64, 100) as i32;
    let floor = if params.can_kill { 0 } else { 1 };
    let health = unit.stat(StatKind::Health);
    let remaining = health.saturating_sub(cost).max(floor).min(health);
    let paid = -unit.adjust(StatKind::Health, remaining - health);
    out.vital(user, user, StatKind::Health, -paid, false);
    out.log(format!("{} sacrifices {} health", unit.name, paid), LogTone::Damage);
    out.updated(unit);
    if !unit.is_alive() {
        out.death(unit);
    }
}

fn instant_kill(
    params: &InstantKillParams,
    user: CombatantId,
    target: &mut Combatant,
    adversarial: bool,
    out: &mut EffectOutput,
) {
    if target.at_least_percent(StatKind::Health, params.threshold_percent) {
        out.log(format!("{} resists the execution", target.name), LogTone::Neutral);
        return;
    }
    let removed = target.stat(StatKind::Health);
    target.set_stat(StatKind::Health, 0);
    out.vital(user, target.id, StatKind::Health, -removed, adversarial);
    out.log(format!("{} is executed!", target.name), LogTone::Damage);
    out.updated(target);
    out.death(target);
}

fn stat_modifier(
    params: &StatModifierParams,
    effect: &EffectDefinition,
    user: CombatantId,
    target: &mut Combatant,
    state: &mut UnitAttackState,
    adversarial: bool,
    out: &mut EffectOutput,
) {
    let Some(duration) = effect.modifier_duration() else {
        crate::log::warn("stat modifier with invalid duration skipped");
        return;
    };
    let before = target.stat(params.stat);
    let after = state.apply_modifier(target, params.stat, params.delta, duration);
    if params.stat.is_vital() {
        out.vital(user, target.id, params.stat, after - before, adversarial);
    }
    let tone = if params.delta >= 0 { LogTone::Buff } else { LogTone::Debuff };
    out.log(
        format!("{}'s {} is now {}", target.name, params.stat.name(), after),
        tone,
    );
    out.updated(target);
    if !target.is_alive() {
        out.death(target);
    }
}
