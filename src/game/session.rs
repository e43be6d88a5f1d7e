use super::animator::{animate_segment, classify, MotionState, StepEvent};
use super::constants::{DOUBLE_SPAWN_CHANCE, SINGLE_SPAWN_CHANCE, SPAWN_RETRY_MS};
use super::field::GridField;
use super::planner::{fill, RngDecider};
use super::player::{Player, PlayerEvent};
use super::scene::{SceneNode, Vec3};
use super::snake::{SnakeBody, TurnIndicator};
use super::spawn::{reserve, SpawnError};
use super::timing::delay_for_level;
use super::types::{Cell, Direction};
use crate::config::GameConfig;
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
  Running,
  GameOver,
}

/// One game: the board, the live snakes and the player.
#[derive(Debug)]
pub struct GameSession<R: Rng = StdRng> {
  config: GameConfig,
  field: GridField,
  snakes: Vec<SnakeBody>,
  player: Player,
  rng: R,
  started_at: f64,
  ended_at: Option<f64>,
  level: u32,
  status: SessionStatus,
  next_snake_id: u64,
  pending_spawns: Vec<usize>,
  spawn_retry_at: Option<f64>,
}

impl<R: Rng> GameSession<R> {
  pub fn new(config: GameConfig, rng: R, now: f64) -> Self {
    let field = GridField::new(config.field_width, config.field_height);
    let player = Self::make_player(&config, now);
    let mut session = Self {
      config,
      field,
      snakes: Vec::new(),
      player,
      rng,
      started_at: now,
      ended_at: None,
      level: 0,
      status: SessionStatus::Running,
      next_snake_id: 1,
      pending_spawns: Vec::new(),
      spawn_retry_at: None,
    };
    session.spawn_initial(now);
    session
  }

  fn make_player(config: &GameConfig, now: f64) -> Player {
    let cell = Cell::new(config.field_height / 2, config.field_width / 2);
    Player::new(cell, Direction::Up, now, config.player_delay_ms)
  }

  fn spawn_initial(&mut self, now: f64) {
    for _ in 0..self.config.initial_snakes {
      self.pending_spawns.push(self.config.snake_length);
    }
    self.flush_pending_spawns(now);
  }

  /// Back to the initial state, keeping config and the random source.
  pub fn restart(&mut self, now: f64) {
    self.field.reset();
    self.snakes.clear();
    self.pending_spawns.clear();
    self.spawn_retry_at = None;
    self.player = Self::make_player(&self.config, now);
    self.started_at = now;
    self.ended_at = None;
    self.level = 0;
    self.status = SessionStatus::Running;
    self.spawn_initial(now);
    tracing::info!("session restarted");
  }

  pub fn handle_input(&mut self, direction: Direction) {
    if self.status == SessionStatus::Running {
      self.player.queue_direction(direction);
    }
  }

  pub fn level(&self) -> u32 {
    self.level
  }

  pub fn current_delay(&self) -> f64 {
    delay_for_level(self.config.base_delay_ms, self.level)
  }

  /// Elapsed seconds, frozen once the game is over.
  pub fn score(&self, now: f64) -> f64 {
    let end = self.ended_at.unwrap_or(now);
    ((end - self.started_at) / 1000.0).max(0.0)
  }

  /// One frame.
  pub fn tick(&mut self, now: f64) -> SessionStatus {
    if self.status == SessionStatus::GameOver {
      return self.status;
    }

    self.update_level(now);

    let event = self.player.advance(
      &self.field,
      now,
      self.config.player_delay_ms,
      self.config.stun_ms,
    );
    if event == PlayerEvent::Caught {
      self.status = SessionStatus::GameOver;
      self.ended_at = Some(now);
      tracing::info!(level = self.level, score = self.score(now), "player caught, game over");
      return self.status;
    }

    self.advance_snakes(now);
    self.replace_finished();
    self.flush_pending_spawns(now);
    self.status
  }

  fn update_level(&mut self, now: f64) {
    let reached = ((now - self.started_at) / self.config.level_up_ms).floor().max(0.0) as u32;
    while self.level < reached {
      self.level += 1;
      let spawns = self.level_up_spawns();
      tracing::info!(level = self.level, spawns, "level up");
    }
  }

  /// Snakes to add at a level-up, capped so live plus pending never exceeds
  /// `max_snakes`.
  fn level_up_spawns(&mut self) -> usize {
    let draw = self.rng.gen::<f64>();
    let wanted = if draw < DOUBLE_SPAWN_CHANCE {
      2
    } else if draw < SINGLE_SPAWN_CHANCE {
      1
    } else {
      0
    };
    let live = self.snakes.len() + self.pending_spawns.len();
    let count = wanted.min(self.config.max_snakes.saturating_sub(live));
    for _ in 0..count {
      self.pending_spawns.push(self.config.snake_length);
    }
    count
  }

  fn advance_snakes(&mut self, now: f64) {
    let delay = self.current_delay();
    let prediction = self.config.snake_prediction;
    let Self {
      field, snakes, rng, ..
    } = self;
    let mut decider = RngDecider(rng);

    for snake in snakes.iter_mut() {
      let head = snake.head_index();
      for index in snake.order() {
        let event = animate_segment(snake, index, field, now, delay);
        if index == head {
          if let StepEvent::Crossed { .. } = event {
            snake.planned_depth = snake.planned_depth.saturating_sub(1);
            fill(field, snake, &mut decider, prediction);
          }
        }
      }
    }
  }

  fn replace_finished(&mut self) {
    let mut index = 0;
    while index < self.snakes.len() {
      if !self.snakes[index].is_finished() {
        index += 1;
        continue;
      }
      let finished = self.snakes.swap_remove(index);
      tracing::debug!(snake_id = finished.id, length = finished.length, "snake burrowed away");
      self.pending_spawns.push(finished.length);
      // Its cells are free again.
      self.spawn_retry_at = None;
    }
  }

  /// Place pending snakes. After a starved attempt the board is left alone
  /// for `SPAWN_RETRY_MS` unless a snake burrows away first.
  fn flush_pending_spawns(&mut self, now: f64) {
    if self.pending_spawns.is_empty() {
      return;
    }
    if self.spawn_retry_at.is_some_and(|retry_at| now < retry_at) {
      return;
    }
    self.spawn_retry_at = None;

    let pending = std::mem::take(&mut self.pending_spawns);
    let mut starved = None;
    for length in pending {
      if starved.is_some() {
        self.pending_spawns.push(length);
        continue;
      }
      if let Err(err) = self.spawn_snake(length, now) {
        starved = Some(err);
        self.pending_spawns.push(length);
      }
    }

    if let Some(err) = starved {
      self.spawn_retry_at = Some(now + SPAWN_RETRY_MS);
      tracing::warn!(%err, pending = self.pending_spawns.len(), "snake spawns postponed");
    }
  }

  fn spawn_snake(&mut self, length: usize, now: f64) -> Result<u64, SpawnError> {
    let spawn = reserve(&mut self.field, &mut self.rng, self.config.max_spawn_attempts)?;
    let id = self.next_snake_id;
    self.next_snake_id += 1;
    let mut snake = SnakeBody::new(id, &spawn, length, now, self.current_delay());
    let mut decider = RngDecider(&mut self.rng);
    fill(&mut self.field, &mut snake, &mut decider, self.config.snake_prediction);
    tracing::debug!(
      snake_id = id,
      length,
      origin = ?spawn.origin,
      direction = ?spawn.direction,
      "snake spawned"
    );
    self.snakes.push(snake);
    Ok(id)
  }

  pub fn snapshot(&self, now: f64) -> SessionSnapshot {
    let score = self.score(now);
    SessionSnapshot {
      now,
      score,
      level: self.level,
      hud: format!("Score: {:.1}  Level: {}", score, self.level),
      status: self.status,
      player: PlayerSnapshot {
        cell: self.player.cell,
        node: self.player.node,
        stunned: self.player.is_stunned(now),
      },
      snakes: self
        .snakes
        .iter()
        .map(|snake| SnakeSnapshot {
          id: snake.id,
          length: snake.length,
          segments: snake
            .segments()
            .map(|segment| SegmentSnapshot {
              state: motion_label(classify(segment, &self.field)),
              percent: segment.percent_moved,
              visible: !segment.to_destroy,
              world: segment.node.world_position(),
              heading: segment.node.world_heading(),
              node: segment.node,
            })
            .collect(),
          indicators: snake.indicators().copied().collect(),
        })
        .collect(),
    }
  }
}

fn motion_label(state: MotionState) -> &'static str {
  match state {
    MotionState::Surfacing { .. } => "surfacing",
    MotionState::Straight { .. } => "straight",
    MotionState::Turning { .. } => "turning",
    MotionState::Burrowing { .. } => "burrowing",
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
  pub now: f64,
  pub score: f64,
  pub level: u32,
  pub hud: String,
  pub status: SessionStatus,
  pub player: PlayerSnapshot,
  pub snakes: Vec<SnakeSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
  pub cell: Cell,
  pub node: SceneNode,
  pub stunned: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnakeSnapshot {
  pub id: u64,
  pub length: usize,
  pub segments: Vec<SegmentSnapshot>,
  pub indicators: Vec<TurnIndicator>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentSnapshot {
  pub state: &'static str,
  pub percent: f64,
  pub visible: bool,
  /// Position and compass heading with any pivot applied.
  pub world: Vec3,
  pub heading: f64,
  pub node: SceneNode,
}

#[cfg(test)]
mod tests;
