//! Tunable combat rules.

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Rule constants read by the scheduler, retreat check and damage formulas.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Heroes at or below this morale retreat.
    pub retreat_threshold: i32,
    /// Morale handed back to a hero when it retreats.
    pub retreat_morale_rebate: i32,
    /// Morale every remaining teammate loses when a hero retreats.
    pub retreat_team_penalty: i32,
    /// Units faster than this get a bonus action at round end.
    pub two_attacks_threshold: i32,
    pub swift_speed: i32,
    pub quick_speed: i32,
    pub steady_speed: i32,
    pub sluggish_speed: i32,
    /// Counter-infection chance scale, per-mille.
    pub counter_infection_permille: u32,
    /// Standard defense reduction per defense point, basis points.
    pub defense_bp_per_point: u32,
    pub max_rounds: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            retreat_threshold: 20,
            retreat_morale_rebate: 10,
            retreat_team_penalty: 10,
            two_attacks_threshold: 7,
            swift_speed: 10,
            quick_speed: 7,
            steady_speed: 4,
            sluggish_speed: 1,
            counter_infection_permille: 300,
            defense_bp_per_point: 500,
            max_rounds: 100,
        }
    }
}

impl CombatConfig {
    /// Checks the tier ordering and ranges the scheduler relies on.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.swift_speed >= self.quick_speed
            && self.quick_speed >= self.steady_speed
            && self.steady_speed >= self.sluggish_speed
            && self.sluggish_speed >= 1)
        {
            return Err("speed tiers must satisfy swift >= quick >= steady >= sluggish >= 1");
        }
        if self.counter_infection_permille > 1000 {
            return Err("counter_infection_permille must be at most 1000");
        }
        if self.max_rounds == 0 {
            return Err("max_rounds must be positive");
        }
        if self.retreat_morale_rebate < 0 || self.retreat_team_penalty < 0 {
            return Err("retreat rebate and penalty must not be negative");
        }
        Ok(())
    }

    /// Turns a unit of `speed` is granted in `round` (1-based).
    pub fn turns_for(&self, speed: i32, round: u32) -> u32 {
        let odd = round % 2 == 1;
        if speed >= self.swift_speed {
            1
        } else if speed >= self.quick_speed {
            if odd {
                2
            } else {
                1
            }
        } else if speed >= self.steady_speed {
            1
        } else if speed >= self.sluggish_speed && odd {
            1
        } else {
            0
        }
    }
}
