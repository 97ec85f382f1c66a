/// Session limits that guarantee every combat terminates
use core::fmt;

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::error::AbortReason;

/// Hard cap on actions resolved in one round (four units, two actions each,
/// plus the bonus pass).
pub const MAX_ACTIONS_PER_ROUND: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, TypeInfo, Serialize, Deserialize)]
pub enum Team {
    Hero,
    Monster,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Hero => Team::Monster,
            Team::Monster => Team::Hero,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Hero => f.write_str("HERO"),
            Team::Monster => f.write_str("MONSTER"),
        }
    }
}

/// Tracks round and action counts against the configured caps
#[derive(Debug, Clone)]
pub struct CombatLimits {
    pub max_rounds: u32,
    pub rounds: u32,
    pub round_actions: u32,
}

impl CombatLimits {
    pub fn new(max_rounds: u32) -> Self {
        Self {
            max_rounds,
            rounds: 0,
            round_actions: 0,
        }
    }

    /// Counts a new round, failing once the cap is passed.
    pub fn record_round(&mut self) -> Result<u32, AbortReason> {
        if self.rounds >= self.max_rounds {
            return Err(AbortReason::RoundLimit {
                rounds: self.rounds,
            });
        }
        self.rounds += 1;
        self.round_actions = 0;
        Ok(self.rounds)
    }

    /// Counts an action; `false` once the per-round cap is reached.
    pub fn record_action(&mut self) -> bool {
        if self.round_actions >= MAX_ACTIONS_PER_ROUND {
            return false;
        }
        self.round_actions += 1;
        true
    }
}
