//! Blight combat resolution engine.
//!
//! Two parties of up to four combatants fight in speed-derived rounds. Every unit
//! picks the first ready ability whose conditions hold, resolves targets against
//! its effects, and applies damage, healing, interrupts, timed stat modifiers and
//! infection spread until one side is wiped out or routed.
//!
//! The engine is deterministic for a given [`rng::BattleRng`] seed and can be
//! stepped one transition at a time through [`battle::CombatSession`].

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod abilities;
pub mod attack_state;
pub mod battle;
pub mod conditions;
pub mod config;
pub mod contagion;
pub mod effects;
pub mod error;
pub mod limits;
pub mod log;
pub mod pacing;
pub mod rng;
pub mod roster;
pub mod starter;
pub mod targeting;
pub mod types;
pub mod view;

#[cfg(test)]
mod tests;

pub use abilities::*;
pub use battle::{
    resolve_combat, start_combat, CombatEvent, CombatOutcome, CombatPhase, CombatReport, CombatSession, EventSink,
    LogTone, StepResult,
};
pub use config::CombatConfig;
pub use error::{AbortReason, CatalogError, CombatError, CombatResult};
pub use limits::Team;
pub use rng::{BattleRng, XorShiftRng};
pub use types::*;
pub use view::UnitView;
