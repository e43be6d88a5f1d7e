use crate::game::constants::{
    BASE_DELAY_MS, FIELD_HEIGHT, FIELD_WIDTH, INITIAL_SNAKES, LEVEL_UP_MS, MAX_SNAKES,
    MAX_SPAWN_ATTEMPTS, PLAYER_DELAY_MS, SNAKE_LENGTH, SNAKE_PREDICTION, STUN_MS, TICK_MS,
};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub field_width: usize,
    pub field_height: usize,
    pub snake_prediction: usize,
    pub max_snakes: usize,
    pub snake_length: usize,
    pub initial_snakes: usize,
    pub base_delay_ms: f64,
    pub player_delay_ms: f64,
    pub level_up_ms: f64,
    pub stun_ms: f64,
    pub max_spawn_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            snake_prediction: SNAKE_PREDICTION,
            max_snakes: MAX_SNAKES,
            snake_length: SNAKE_LENGTH,
            initial_snakes: INITIAL_SNAKES,
            base_delay_ms: BASE_DELAY_MS,
            player_delay_ms: PLAYER_DELAY_MS,
            level_up_ms: LEVEL_UP_MS,
            stun_ms: STUN_MS,
            max_spawn_attempts: MAX_SPAWN_ATTEMPTS,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.field_width < 4 || self.field_height < 4 {
            bail!(
                "field must be at least 4x4, got {}x{}",
                self.field_width,
                self.field_height
            );
        }
        if self.snake_prediction == 0 {
            bail!("snake prediction must be at least 1");
        }
        if self.snake_length == 0 {
            bail!("snake length must be at least 1");
        }
        if self.max_snakes == 0 {
            bail!("max snakes must be at least 1");
        }
        if self.initial_snakes > self.max_snakes {
            bail!(
                "initial snakes ({}) exceed max snakes ({})",
                self.initial_snakes,
                self.max_snakes
            );
        }
        for (name, value) in [
            ("base delay", self.base_delay_ms),
            ("player delay", self.player_delay_ms),
            ("level up interval", self.level_up_ms),
        ] {
            if !value.is_finite() || value <= 0.0 {
                bail!("{name} must be a positive number of milliseconds, got {value}");
            }
        }
        if !self.stun_ms.is_finite() || self.stun_ms < 0.0 {
            bail!("stun duration must be non-negative, got {}", self.stun_ms);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
    pub port: u16,
    pub tick_ms: u64,
    pub game: GameConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8787,
            tick_ms: TICK_MS,
            game: GameConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults, then the JSON file named by `SNAKE_FIELD_CONFIG`, then
    /// individual environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match env::var("SNAKE_FIELD_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim()))?,
            _ => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let parse = |key: &str| lookup(key).map(|value| value.trim().to_string());
        if let Some(port) = parse("PORT").and_then(|value| value.parse().ok()) {
            self.port = port;
        }
        if let Some(tick_ms) = parse("TICK_MS").and_then(|value| value.parse().ok()) {
            self.tick_ms = tick_ms;
        }
        if let Some(width) = parse("FIELD_WIDTH").and_then(|value| value.parse().ok()) {
            self.game.field_width = width;
        }
        if let Some(height) = parse("FIELD_HEIGHT").and_then(|value| value.parse().ok()) {
            self.game.field_height = height;
        }
        if let Some(max_snakes) = parse("MAX_SNAKES").and_then(|value| value.parse().ok()) {
            self.game.max_snakes = max_snakes;
        }
        if let Some(length) = parse("SNAKE_LENGTH").and_then(|value| value.parse().ok()) {
            self.game.snake_length = length;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_ms == 0 {
            bail!("tick interval must be at least 1ms");
        }
        self.game.validate().context("invalid game config")
    }
}
