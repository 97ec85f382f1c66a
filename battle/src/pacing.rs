//! Presentation pacing.
//!
//! Pacing only produces advisory delays for hosts that animate a fight. It is
//! never consulted by resolution, so it cannot change an outcome.

/// Base delay after a unit action at 1x speed.
pub const ACTION_DELAY_MS: u32 = 800;
/// Base delay at round boundaries at 1x speed.
pub const ROUND_DELAY_MS: u32 = 1200;

pub const MIN_SPEED_PERCENT: u32 = 25;
pub const MAX_SPEED_PERCENT: u32 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceKind {
    Action,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Playback speed, 100 = 1x.
    speed_percent: u32,
    paused: bool,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            speed_percent: 100,
            paused: false,
        }
    }
}

impl Pacing {
    /// Sets the playback multiplier in percent, clamped to the supported range.
    pub fn set_speed(&mut self, speed_percent: u32) {
        self.speed_percent = speed_percent.clamp(MIN_SPEED_PERCENT, MAX_SPEED_PERCENT);
    }

    pub fn speed_percent(&self) -> u32 {
        self.speed_percent
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn delay_ms(&self, kind: PaceKind) -> u32 {
        let base = match kind {
            PaceKind::Action => ACTION_DELAY_MS,
            PaceKind::Round => ROUND_DELAY_MS,
        };
        base * 100 / self.speed_percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faster_playback_shortens_delays() {
        let mut pacing = Pacing::default();
        assert_eq!(pacing.delay_ms(PaceKind::Action), 800);
        pacing.set_speed(200);
        assert_eq!(pacing.delay_ms(PaceKind::Action), 400);
        assert_eq!(pacing.delay_ms(PaceKind::Round), 600);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut pacing = Pacing::default();
        pacing.set_speed(0);
        assert_eq!(pacing.speed_percent(), MIN_SPEED_PERCENT);
        pacing.set_speed(10_000);
        assert_eq!(pacing.speed_percent(), MAX_SPEED_PERCENT);
    }
}
