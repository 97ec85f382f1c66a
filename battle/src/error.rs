//! Error types for combat setup
//!
//! Plain enums rather than String-based errors so they stay SCALE-encodable and
//! usable without `std`.

use alloc::string::String;
use core::fmt;

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::abilities::AbilityId;
use crate::limits::Team;
use crate::types::CombatantId;

/// Catalog data that cannot be used for combat.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CatalogError {
    /// Two definitions share an id
    DuplicateAbility { ability: AbilityId },
    /// An ability without any effect
    NoEffects { ability: AbilityId },
    /// An effect asking for zero targets
    ZeroTargets { ability: AbilityId },
    /// A position bound outside 1..=4
    InvalidPosition { ability: AbilityId },
    /// A stat modifier duration that is neither positive nor -1
    InvalidDuration { ability: AbilityId, duration: i32 },
}

/// Reasons a combat session refuses to start.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum CombatError {
    /// A side has no combatant able to fight
    EmptyRoster { team: Team },
    /// A side fields more than four combatants
    RosterTooLarge { team: Team, size: u32 },
    /// Two combatants share an id
    DuplicateCombatant { id: CombatantId },
    /// A party position outside 1..=4 or used twice on one side
    InvalidPosition { id: CombatantId, position: u8 },
    /// A combatant whose vitals are out of range
    MalformedCombatant { id: CombatantId },
    /// A loadout names an ability the catalog does not define
    MissingAbility { id: CombatantId, ability: AbilityId },
    /// The catalog itself failed validation
    Catalog(CatalogError),
    /// Rule constants that cannot drive a combat
    InvalidConfig { reason: String },
}

/// Why a session ended without a winner.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum AbortReason {
    /// The session never started
    CouldNotStart(CombatError),
    /// The round limit was reached without a decision
    RoundLimit { rounds: u32 },
    /// An external cancel signal
    Cancelled,
}

/// Result type alias for combat operations
pub type CombatResult<T> = Result<T, CombatError>;

impl From<CatalogError> for CombatError {
    fn from(err: CatalogError) -> Self {
        CombatError::Catalog(err)
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateAbility { ability } => {
                write!(f, "ability '{}' is defined twice", ability.as_str())
            }
            CatalogError::NoEffects { ability } => {
                write!(f, "ability '{}' has no effects", ability.as_str())
            }
            CatalogError::ZeroTargets { ability } => {
                write!(f, "ability '{}' has an effect with zero targets", ability.as_str())
            }
            CatalogError::InvalidPosition { ability } => {
                write!(f, "ability '{}' uses a position outside 1..=4", ability.as_str())
            }
            CatalogError::InvalidDuration { ability, duration } => write!(
                f,
                "ability '{}' has invalid modifier duration {}",
                ability.as_str(),
                duration
            ),
        }
    }
}

impl fmt::Display for CombatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatError::EmptyRoster { team } => write!(f, "{} roster is empty", team),
            CombatError::RosterTooLarge { team, size } => {
                write!(f, "{} roster has {} combatants (max 4)", team, size)
            }
            CombatError::DuplicateCombatant { id } => {
                write!(f, "combatant id {} is used twice", id.0)
            }
            CombatError::InvalidPosition { id, position } => {
                write!(f, "combatant {} has invalid position {}", id.0, position)
            }
            CombatError::MalformedCombatant { id } => {
                write!(f, "combatant {} has out-of-range vitals", id.0)
            }
            CombatError::MissingAbility { id, ability } => write!(
                f,
                "combatant {} uses unknown ability '{}'",
                id.0,
                ability.as_str()
            ),
            CombatError::Catalog(err) => write!(f, "invalid catalog: {}", err),
            CombatError::InvalidConfig { reason } => write!(f, "invalid config: {}", reason),
        }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::CouldNotStart(err) => write!(f, "could not start: {}", err),
            AbortReason::RoundLimit { rounds } => {
                write!(f, "no decision after {} rounds", rounds)
            }
            AbortReason::Cancelled => f.write_str("cancelled"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CatalogError {}

#[cfg(feature = "std")]
impl std::error::Error for CombatError {}
