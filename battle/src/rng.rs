//! Deterministic RNG for combat resolution
//!
//! The engine draws every random number through [`BattleRng`], so a seed fully
//! determines a combat.

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

/// Trait for random number generation in combat
pub trait BattleRng {
    /// Generate a random u32
    fn next_u32(&mut self) -> u32;

    /// Generate a random number in range [0, max)
    fn gen_range(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u32() as usize) % max
    }

    /// Uniform roll in 1..=100
    fn roll_percent(&mut self) -> u32 {
        self.gen_range(100) as u32 + 1
    }

    /// True with probability `permille / 1000`
    fn chance_permille(&mut self, permille: u32) -> bool {
        if permille == 0 {
            return false;
        }
        (self.gen_range(1000) as u32) < permille
    }

    /// Shuffle a slice using Fisher-Yates algorithm
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.gen_range(i + 1);
            slice.swap(i, j);
        }
    }
}

/// XorShift32 RNG
///
/// Not cryptographic. The same seed always produces the same sequence.
#[derive(Debug, Clone, Encode, Decode, TypeInfo)]
pub struct XorShiftRng {
    state: u32,
}

impl XorShiftRng {
    /// Folds a u64 seed into a non-zero u32 state
    pub fn seed_from_u64(seed: u64) -> Self {
        let state = ((seed as u32) ^ ((seed >> 32) as u32)).max(1);
        Self { state }
    }
}

impl BattleRng for XorShiftRng {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl<R: BattleRng + ?Sized> BattleRng for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}
