//! Countdown timers for cooldowns and polling intervals.

/// Seconds-remaining countdown. Zero (the default) counts as ready.
#[derive(Copy, Clone, Debug, Default)]
pub struct Countdown {
    remaining_s: f32,
}

impl Countdown {
    pub fn ready(&self) -> bool {
        self.remaining_s <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining_s
    }

    pub fn reset(&mut self, duration_s: f32) {
        self.remaining_s = duration_s.max(0.0);
    }

    /// Advances the countdown. Returns true only on the tick that crosses
    /// zero, so callers can run an edge action exactly once.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining_s <= 0.0 {
            return false;
        }
        self.remaining_s = (self.remaining_s - dt).max(0.0);
        self.remaining_s == 0.0
    }
}
