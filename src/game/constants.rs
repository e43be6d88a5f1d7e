pub const FIELD_WIDTH: usize = 20;
pub const FIELD_HEIGHT: usize = 20;
pub const SNAKE_PREDICTION: usize = 3;
pub const MAX_SNAKES: usize = 6;
pub const SNAKE_LENGTH: usize = 5;
pub const INITIAL_SNAKES: usize = 1;

pub const BASE_DELAY_MS: f64 = 1000.0;
pub const PLAYER_DELAY_MS: f64 = 250.0;
pub const LEVEL_UP_MS: f64 = 20_000.0;
pub const STUN_MS: f64 = 1200.0;
pub const DELAY_DECAY: f64 = 0.95;
// Smallest per-cell delay; decay saturates here instead of reaching zero.
pub const MIN_DELAY_MS: f64 = f64::MIN_POSITIVE;

pub const MAX_SPAWN_ATTEMPTS: usize = 10_000;
pub const SPAWN_RETRY_MS: f64 = 1000.0;

// Planner tie-breaks.
pub const FORWARD_BIAS: f64 = 0.9;
pub const LEFT_TURN_BIAS: f64 = 0.5;

// Level-up spawn thresholds, cumulative.
pub const DOUBLE_SPAWN_CHANCE: f64 = 0.1;
pub const SINGLE_SPAWN_CHANCE: f64 = 0.8;

pub const CELL_SIZE: f64 = 1.0;
pub const SURFACE_HEIGHT: f64 = 0.0;
pub const BURROW_DEPTH: f64 = 1.0;
pub const SURFACE_RISE_DEPTH: u32 = 1;

pub const TICK_MS: u64 = 16;
