//! Target resolution for a single effect.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::abilities::{EffectDefinition, TargetScope, TargetingRule};
use crate::effects::BP_ONE;
use crate::rng::BattleRng;
use crate::types::{Combatant, CombatantId, StatKind, MAX_PARTY_SIZE};

/// Most targets a melee effect can reach.
pub const MELEE_REACH: usize = 2;

/// Compares `a.stat / a.cap` with `b.stat / b.cap` exactly.
fn ratio_cmp(a: &Combatant, b: &Combatant, stat: StatKind) -> Ordering {
    let cap_a = a.percent_base(stat).max(1) as i64;
    let cap_b = b.percent_base(stat).max(1) as i64;
    (a.stat(stat) as i64 * cap_b).cmp(&(b.stat(stat) as i64 * cap_a))
}

fn raw_cmp(a: &Combatant, b: &Combatant, stat: StatKind) -> Ordering {
    a.stat(stat).cmp(&b.stat(stat))
}

/// Samples up to `count` members without replacement. Each member weighs
/// `BP_ONE + stat * weight_factor`, so a factor of 0 draws uniformly and a
/// factor of `BP_ONE` counts every stat point as one extra share.
fn weighted_sample<R: BattleRng>(
    mut pool: Vec<&Combatant>,
    stat: StatKind,
    weight_factor: u32,
    count: usize,
    rng: &mut R,
) -> Vec<CombatantId> {
    let mut picked = Vec::new();
    while picked.len() < count && !pool.is_empty() {
        let weights: Vec<u64> = pool
            .iter()
            .map(|u| BP_ONE as u64 + u.stat(stat).max(0) as u64 * weight_factor as u64)
            .collect();
        let total: u64 = weights.iter().sum();
        let hi = rng.next_u32() as u64;
        let lo = rng.next_u32() as u64;
        let mut roll = ((hi << 32) | lo) % total;
        let mut index = pool.len() - 1;
        for (i, w) in weights.iter().enumerate() {
            if roll < *w {
                index = i;
                break;
            }
            roll -= w;
        }
        picked.push(pool.remove(index).id);
    }
    picked
}

/// Resolves the ordered targets of `effect` used by `user`.
///
/// `allies` is the user's own side (the user included), `enemies` the opposing
/// side. Fallen and retreated units are never returned. An empty result is a
/// valid outcome.
pub fn resolve<R: BattleRng>(
    user: &Combatant,
    effect: &EffectDefinition,
    allies: &[Combatant],
    enemies: &[Combatant],
    rng: &mut R,
) -> Vec<CombatantId> {
    let all_allies = matches!(effect.rule, TargetingRule::AllAllies);
    let scope = if all_allies { TargetScope::Ally } else { effect.scope };

    let side = match scope {
        TargetScope::User => {
            return if user.is_active() { alloc::vec![user.id] } else { Vec::new() };
        }
        TargetScope::Ally => allies,
        TargetScope::Enemy => enemies,
    };

    let mut pool: Vec<&Combatant> = side.iter().filter(|u| u.is_active()).collect();
    pool.sort_by_key(|u| u.position);
    if effect.melee_only {
        pool.truncate(MELEE_REACH);
    }
    pool.retain(|u| {
        effect.min_position.map_or(true, |min| u.position >= min)
            && effect.max_position.map_or(true, |max| u.position <= max)
    });

    if all_allies {
        return pool.iter().map(|u| u.id).collect();
    }

    let reach = if effect.melee_only { MELEE_REACH } else { MAX_PARTY_SIZE };
    let count = (effect.target_count as usize).min(reach);

    match effect.rule {
        TargetingRule::Random => rng.shuffle(&mut pool),
        TargetingRule::LowestHealth => pool.sort_by(|a, b| ratio_cmp(a, b, StatKind::Health)),
        TargetingRule::HighestHealth => pool.sort_by(|a, b| ratio_cmp(b, a, StatKind::Health)),
        TargetingRule::LowestMorale => pool.sort_by(|a, b| raw_cmp(a, b, StatKind::Morale)),
        TargetingRule::HighestMorale => pool.sort_by(|a, b| raw_cmp(b, a, StatKind::Morale)),
        TargetingRule::LowestAttack => pool.sort_by(|a, b| raw_cmp(a, b, StatKind::Attack)),
        TargetingRule::HighestAttack => pool.sort_by(|a, b| raw_cmp(b, a, StatKind::Attack)),
        TargetingRule::WeightedRandom { stat, weight_factor } => {
            return weighted_sample(pool, stat.unwrap_or(StatKind::Health), weight_factor, count, rng);
        }
        TargetingRule::AllAllies => {}
    }

    pool.into_iter().take(count).map(|u| u.id).collect()
}
