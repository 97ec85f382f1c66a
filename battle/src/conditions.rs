//! Ability condition evaluation
//!
//! Values are compared as exact fractions `num / den` against the integer
//! threshold, so averages and percentages never round.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::abilities::{AbilityCondition, CompareOp, ConditionTarget, TeamCondition};
use crate::types::Combatant;

fn compare(op: CompareOp, num: i64, den: i64, threshold: i32) -> bool {
    let den = den.max(1);
    let ord = num.cmp(&(threshold as i64 * den));
    match op {
        CompareOp::Greater => ord == Ordering::Greater,
        CompareOp::Lesser => ord == Ordering::Less,
        CompareOp::Equal => ord == Ordering::Equal,
    }
}

/// `(num, den)` of a single unit's stat, as a percentage of its cap if asked.
fn unit_value(condition: &AbilityCondition, unit: &Combatant) -> (i64, i64) {
    let value = unit.stat(condition.stat) as i64;
    if condition.percentage {
        (value * 100, unit.percent_base(condition.stat).max(1) as i64)
    } else {
        (value, 1)
    }
}

/// True if `condition` holds for `unit`.
///
/// `party` is the unit's own side (itself included) and `opponents` the other
/// side. Only living, non-retreated members are considered.
pub fn evaluate(
    condition: &AbilityCondition,
    unit: &Combatant,
    party: &[Combatant],
    opponents: &[Combatant],
) -> bool {
    let side = match condition.target {
        ConditionTarget::User => {
            let (num, den) = unit_value(condition, unit);
            return compare(condition.op, num, den, condition.threshold);
        }
        ConditionTarget::Ally => party,
        ConditionTarget::Enemy => opponents,
    };

    let team: Vec<&Combatant> = side
        .iter()
        .filter(|u| u.is_active())
        .filter(|u| condition.min_position.map_or(true, |min| u.position >= min))
        .filter(|u| condition.max_position.map_or(true, |max| u.position <= max))
        .collect();

    let size = team.len();
    if condition.min_target_count.is_some_and(|min| size < min as usize)
        || condition.max_target_count.is_some_and(|max| size > max as usize)
    {
        return false;
    }

    match condition.team_condition {
        TeamCondition::None => team.iter().any(|member| {
            let (num, den) = unit_value(condition, member);
            compare(condition.op, num, den, condition.threshold)
        }),
        TeamCondition::AverageStat | TeamCondition::TotalStat => {
            if team.is_empty() {
                return false;
            }
            let mut num: i64 = team.iter().map(|u| u.stat(condition.stat) as i64).sum();
            let mut den: i64 = 1;
            if condition.team_condition == TeamCondition::AverageStat {
                den = size as i64;
            }
            if condition.percentage {
                num *= 100;
                den *= unit.percent_base(condition.stat).max(1) as i64;
            }
            compare(condition.op, num, den, condition.threshold)
        }
    }
}

/// True if every condition holds.
pub fn all_hold(
    conditions: &[AbilityCondition],
    unit: &Combatant,
    party: &[Combatant],
    opponents: &[Combatant],
) -> bool {
    conditions
        .iter()
        .all(|c| evaluate(c, unit, party, opponents))
}
