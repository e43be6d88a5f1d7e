use super::constants::{FORWARD_BIAS, LEFT_TURN_BIAS};
use super::direction::{left_of, right_of};
use super::field::GridField;
use super::snake::{SnakeBody, TurnIndicator};
use super::types::{Cell, CellMark, Direction};
use rand::Rng;

/// Source of the uniform draws that steer planning.
pub trait Decider {
    /// A value in `[0, 1)`.
    fn decide(&mut self) -> f64;
}

#[derive(Debug)]
pub struct RngDecider<R>(pub R);

impl<R: Rng> Decider for RngDecider<R> {
    fn decide(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Forward,
    Turn(Direction),
    Burrow,
}

/// Reserve one more cell past the snake's frontier.
///
/// Returns the new frontier, or `None` once the plan ends in a burrow.
pub fn extend<D: Decider + ?Sized>(
    field: &mut GridField,
    snake: &mut SnakeBody,
    decider: &mut D,
) -> Option<Cell> {
    let frontier = snake.frontier;
    let heading = match field.mark(frontier) {
        CellMark::Burrow => {
            snake.burrow_planned = true;
            return None;
        }
        CellMark::Heading(direction) => direction,
        other => {
            debug_assert!(false, "frontier {frontier:?} carries no heading: {other:?}");
            tracing::error!(snake_id = snake.id, code = other.code(), "frontier lost its heading");
            field.set_mark(frontier, CellMark::Burrow);
            snake.burrow_planned = true;
            return None;
        }
    };

    let forward = field.clear_neighbor(frontier, heading);
    let left = field.clear_neighbor(frontier, left_of(heading));
    let right = field.clear_neighbor(frontier, right_of(heading));

    let draw = decider.decide();
    let step = if forward.is_some() && draw <= FORWARD_BIAS {
        Step::Forward
    } else {
        let prefers_left = decider.decide() < LEFT_TURN_BIAS;
        if prefers_left && left.is_some() {
            Step::Turn(left_of(heading))
        } else if right.is_some() {
            Step::Turn(right_of(heading))
        } else if left.is_some() {
            Step::Turn(left_of(heading))
        } else if forward.is_some() {
            Step::Forward
        } else {
            Step::Burrow
        }
    };

    let next = match step {
        Step::Forward => {
            let next = forward?;
            field.set_mark(next, CellMark::Heading(heading));
            next
        }
        Step::Turn(direction) => {
            let next = field.clear_neighbor(frontier, direction)?;
            field.set_mark(frontier, CellMark::Heading(direction));
            field.set_mark(next, CellMark::Heading(direction));
            snake.enqueue_indicator(TurnIndicator {
                cell: frontier,
                direction,
            });
            next
        }
        Step::Burrow => {
            field.set_mark(frontier, CellMark::Burrow);
            snake.burrow_planned = true;
            tracing::trace!(snake_id = snake.id, ?frontier, "boxed in, planning a burrow");
            return None;
        }
    };

    snake.frontier = next;
    snake.planned_depth += 1;
    Some(next)
}

/// Extend until `prediction` cells are reserved ahead of the head or the plan
/// ends in a burrow.
pub fn fill<D: Decider + ?Sized>(
    field: &mut GridField,
    snake: &mut SnakeBody,
    decider: &mut D,
    prediction: usize,
) {
    while snake.planned_depth < prediction && !snake.burrow_planned {
        if extend(field, snake, decider).is_none() {
            break;
        }
    }
}
