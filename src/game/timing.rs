use super::constants::{DELAY_DECAY, MIN_DELAY_MS};

/// Milliseconds per cell at `level`. Shrinks every level and never hits zero.
pub fn delay_for_level(base_delay_ms: f64, level: u32) -> f64 {
    let decayed = base_delay_ms * DELAY_DECAY.powi(level.min(i32::MAX as u32) as i32);
    decayed.max(MIN_DELAY_MS)
}

/// Per-mover clock: the window in which the current cell is being crossed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveClock {
    pub last_move: f64,
    pub next_move: f64,
}

impl MoveClock {
    pub fn new(now: f64, delay: f64) -> Self {
        Self {
            last_move: now,
            next_move: now + delay,
        }
    }

    pub fn is_due(&self, now: f64) -> bool {
        now >= self.next_move
    }

    /// Progress through the current cell, in `[0, 1)`.
    pub fn percent(&self, now: f64) -> f64 {
        let span = self.next_move - self.last_move;
        if span <= 0.0 {
            return 0.0;
        }
        ((now - self.last_move) / span).clamp(0.0, 1.0 - f64::EPSILON)
    }

    /// Start the next cell, carrying over the time already spent past the
    /// boundary.
    pub fn advance(&mut self, now: f64, delay: f64) {
        let overshoot = (now - self.next_move).max(0.0);
        self.last_move = now - overshoot;
        self.next_move = now + delay - overshoot;
    }
}
