//! Turns discrete cell-to-cell moves into continuous segment transforms.
//!
//! Every segment is in exactly one [`MotionState`], derived from its own
//! placement and the mark stored at its cell. [`animate_segment`] performs the
//! discrete move when the segment's clock runs out and then poses its
//! [`SceneNode`](super::scene::SceneNode) for the current fraction of the cell.

use super::constants::{BURROW_DEPTH, CELL_SIZE, SURFACE_HEIGHT, SURFACE_RISE_DEPTH};
use super::direction::{heading_of, offset_of, turn_sign};
use super::field::GridField;
use super::scene::{Parent, Pivot, Rotation, Vec3};
use super::snake::{Placement, Segment, SnakeBody};
use super::types::{Cell, CellMark, Direction, Occupancy};
use std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    /// Below the board, `depth` moves away from the spawn cell.
    Surfacing { depth: u32 },
    Straight { heading: Direction },
    Turning { from: Direction, to: Direction, sign: i8 },
    /// Sinking through the burrow cell, or fully below it once `descended`.
    Burrowing { descended: bool },
}

/// What a segment did at its move boundary this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    Idle,
    Rose,
    Surfaced { cell: Cell },
    Crossed { from: Cell, to: Cell },
    Descended { cell: Cell },
    Destroyed { cell: Cell },
}

pub fn classify(segment: &Segment, field: &GridField) -> MotionState {
    let cell = match segment.placement {
        Placement::Underground { depth } => return MotionState::Surfacing { depth },
        Placement::Surface { cell } => cell,
    };
    if segment.burrowing || segment.to_destroy {
        return MotionState::Burrowing { descended: true };
    }
    match field.mark(cell) {
        CellMark::Heading(heading) if heading == segment.facing => MotionState::Straight { heading },
        CellMark::Heading(to) => MotionState::Turning {
            from: segment.facing,
            to,
            sign: turn_sign(segment.facing, to),
        },
        CellMark::Burrow | CellMark::Empty | CellMark::Surface => {
            MotionState::Burrowing { descended: false }
        }
    }
}

/// Advance one segment to `now`. Moves it to its next cell if its clock ran
/// out, then poses it for the fraction of the cell already covered.
pub fn animate_segment(
    snake: &mut SnakeBody,
    index: usize,
    field: &mut GridField,
    now: f64,
    delay: f64,
) -> StepEvent {
    if snake.segment(index).to_destroy {
        return StepEvent::Idle;
    }

    let mut event = StepEvent::Idle;
    if snake.segment(index).clock.is_due(now) {
        snake.segment_mut(index).clock.advance(now, delay);
        event = step(snake, index, field);
    }

    let segment = snake.segment_mut(index);
    segment.percent_moved = segment.clock.percent(now);
    let state = classify(segment, field);
    pose(segment, state, field);
    event
}

fn step(snake: &mut SnakeBody, index: usize, field: &mut GridField) -> StepEvent {
    let is_head = index == snake.head_index();
    let is_tail = snake.is_tail(index);
    let arrival = if is_head {
        Occupancy::LethalHead
    } else {
        Occupancy::SnakeBody
    };

    let placement = snake.segment(index).placement;
    let cell = match placement {
        Placement::Underground { depth } if depth > 1 => {
            snake.segment_mut(index).placement = Placement::Underground { depth: depth - 1 };
            return StepEvent::Rose;
        }
        Placement::Underground { .. } => {
            let segment = snake.segment_mut(index);
            let cell = segment.spawn_position;
            // The spawn cell's plan may have changed since the snake was made.
            if let Some(heading) = field.mark(cell).heading() {
                segment.facing = heading;
            }
            segment.placement = Placement::Surface { cell };
            field.set_occupancy(cell, arrival);
            return StepEvent::Surfaced { cell };
        }
        Placement::Surface { cell } => cell,
    };

    if snake.segment(index).burrowing {
        snake.segment_mut(index).to_destroy = true;
        if is_tail {
            field.release(cell);
        }
        return StepEvent::Destroyed { cell };
    }

    let mark = field.mark(cell);
    let next = match mark {
        CellMark::Heading(heading) => field.neighbor(cell, heading).map(|next| (next, heading)),
        CellMark::Burrow => None,
        CellMark::Empty | CellMark::Surface => {
            debug_assert!(false, "segment left {cell:?} through mark {mark:?}");
            tracing::error!(snake_id = snake.id, index, code = mark.code(), "segment lost its path");
            None
        }
    };

    let Some((next, heading)) = next else {
        if mark.heading().is_some() {
            debug_assert!(false, "planned path leaves the field at {cell:?}");
            tracing::error!(snake_id = snake.id, index, "planned path leaves the field");
        }
        snake.segment_mut(index).burrowing = true;
        if is_head {
            field.set_occupancy(cell, Occupancy::SnakeBody);
        }
        return StepEvent::Descended { cell };
    };

    let segment = snake.segment_mut(index);
    segment.placement = Placement::Surface { cell: next };
    segment.facing = heading;
    field.set_occupancy(next, arrival);
    if is_tail {
        field.release(cell);
    } else {
        field.set_occupancy(cell, Occupancy::SnakeBody);
    }
    if index == snake.indicator_consumer() {
        snake.consume_indicator_at(cell);
    }
    StepEvent::Crossed { from: cell, to: next }
}

fn cell_center(cell: Cell) -> Vec3 {
    Vec3::new(
        (cell.col as f64 + 0.5) * CELL_SIZE,
        (cell.row as f64 + 0.5) * CELL_SIZE,
        SURFACE_HEIGHT,
    )
}

fn step_vector(direction: Direction) -> Vec3 {
    let (d_row, d_col) = offset_of(direction);
    Vec3::new(d_col as f64 * CELL_SIZE, d_row as f64 * CELL_SIZE, 0.0)
}

/// Midpoint of the edge through which `direction` enters `cell`.
fn entry_point(cell: Cell, direction: Direction) -> Vec3 {
    cell_center(cell).sub(step_vector(direction).scale(0.5))
}

fn pose(segment: &mut Segment, state: MotionState, field: &GridField) {
    let percent = segment.percent_moved;
    match state {
        MotionState::Straight { heading } => {
            let position = entry_point(current_cell(segment), heading)
                .add(step_vector(heading).scale(percent));
            segment.node.reparent(Parent::Scene);
            segment.node.set_position(position);
            segment.node.set_rotation(Rotation::heading(heading_of(heading)));
        }
        MotionState::Turning { from, to, sign } => {
            let entry = entry_point(current_cell(segment), from);
            let origin = entry.add(step_vector(to).scale(0.5));
            segment.node.reparent(Parent::Pivot(Pivot {
                origin,
                sweep: f64::from(sign) * FRAC_PI_2 * percent,
            }));
            segment.node.set_position(entry.sub(origin));
            segment.node.set_rotation(Rotation::heading(heading_of(from)));
        }
        MotionState::Burrowing { descended } => {
            let (advance, sink) = if descended { (0.5, 1.0) } else { (0.5 * percent, percent) };
            let mut position = entry_point(current_cell(segment), segment.facing)
                .add(step_vector(segment.facing).scale(advance));
            position.z = SURFACE_HEIGHT - BURROW_DEPTH * sink;
            segment.node.reparent(Parent::Scene);
            segment.node.set_position(position);
            segment.node.set_rotation(Rotation {
                pitch: -FRAC_PI_2 * sink,
                ..Rotation::heading(heading_of(segment.facing))
            });
        }
        MotionState::Surfacing { depth } => {
            let spawn = segment.spawn_position;
            let heading = field.mark(spawn).heading().unwrap_or(segment.facing);
            let rise = if depth <= SURFACE_RISE_DEPTH { 1.0 - percent } else { 1.0 };
            let mut position = entry_point(spawn, heading);
            position.z = SURFACE_HEIGHT - BURROW_DEPTH * depth.saturating_sub(1) as f64 - BURROW_DEPTH * rise;
            segment.node.reparent(Parent::Scene);
            segment.node.set_position(position);
            segment.node.set_rotation(Rotation {
                pitch: FRAC_PI_2 * rise,
                ..Rotation::heading(heading_of(heading))
            });
        }
    }
}

fn current_cell(segment: &Segment) -> Cell {
    segment.cell().unwrap_or(segment.spawn_position)
}
