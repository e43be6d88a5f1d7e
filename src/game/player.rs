use super::constants::{CELL_SIZE, SURFACE_HEIGHT};
use super::direction::heading_of;
use super::field::GridField;
use super::scene::{Rotation, SceneNode, Vec3};
use super::timing::MoveClock;
use super::types::{Cell, Direction, Occupancy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    Idle,
    Moved { from: Cell, to: Cell },
    Blocked,
    Stunned,
    Caught,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub cell: Cell,
    pub target: Option<Cell>,
    pub direction: Direction,
    pub queued: Option<Direction>,
    pub stunned_until: f64,
    pub clock: MoveClock,
    pub node: SceneNode,
}

impl Player {
    pub fn new(cell: Cell, direction: Direction, now: f64, delay: f64) -> Self {
        let mut player = Self {
            cell,
            target: None,
            direction,
            queued: None,
            stunned_until: now,
            clock: MoveClock::new(now, delay),
            node: SceneNode::default(),
        };
        player.pose(now);
        player
    }

    /// Takes effect at the next move boundary, never mid-move.
    pub fn queue_direction(&mut self, direction: Direction) {
        self.queued = Some(direction);
    }

    pub fn is_stunned(&self, now: f64) -> bool {
        now < self.stunned_until
    }

    /// Advance to `now`. At a move boundary the player settles into its
    /// target, applies the queued direction and picks the next target.
    pub fn advance(&mut self, field: &GridField, now: f64, delay: f64, stun_ms: f64) -> PlayerEvent {
        if !self.clock.is_due(now) {
            self.pose(now);
            return PlayerEvent::Idle;
        }
        self.clock.advance(now, delay);

        let from = self.cell;
        if let Some(target) = self.target.take() {
            self.cell = target;
        }
        if field.occupancy(self.cell) == Occupancy::LethalHead {
            self.pose(now);
            return PlayerEvent::Caught;
        }
        if let Some(direction) = self.queued.take() {
            self.direction = direction;
        }

        let event = if self.is_stunned(now) {
            PlayerEvent::Stunned
        } else {
            match field.neighbor(self.cell, self.direction) {
                None => PlayerEvent::Blocked,
                Some(next) if field.occupancy(next) != Occupancy::Free => {
                    self.stunned_until = now + stun_ms;
                    PlayerEvent::Stunned
                }
                Some(next) => {
                    self.target = Some(next);
                    if from == self.cell {
                        PlayerEvent::Idle
                    } else {
                        PlayerEvent::Moved { from, to: self.cell }
                    }
                }
            }
        };
        self.pose(now);
        event
    }

    fn pose(&mut self, now: f64) {
        let start = center(self.cell);
        let position = match self.target {
            Some(target) => {
                let end = center(target);
                start.add(end.sub(start).scale(self.clock.percent(now)))
            }
            None => start,
        };
        self.node.set_position(position);
        self.node.set_rotation(Rotation::heading(heading_of(self.direction)));
    }
}

fn center(cell: Cell) -> Vec3 {
    Vec3::new(
        (cell.col as f64 + 0.5) * CELL_SIZE,
        (cell.row as f64 + 0.5) * CELL_SIZE,
        SURFACE_HEIGHT,
    )
}
