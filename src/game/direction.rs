use super::types::Direction;
use std::f64::consts::FRAC_PI_2;

/// Row/column step for a direction. UP moves toward higher rows.
pub fn offset_of(direction: Direction) -> (i32, i32) {
    match direction {
        Direction::Up => (1, 0),
        Direction::Right => (0, 1),
        Direction::Down => (-1, 0),
        Direction::Left => (0, -1),
    }
}

pub fn left_of(direction: Direction) -> Direction {
    Direction::from_index(direction.index() + 3)
}

pub fn right_of(direction: Direction) -> Direction {
    Direction::from_index(direction.index() + 1)
}

/// Sign of the shortest rotation from `from` to `to`: +1 clockwise, -1
/// counter-clockwise. UP -> LEFT is one step counter-clockwise, not three
/// clockwise.
pub fn turn_sign(from: Direction, to: Direction) -> i8 {
    match (to.index() + 4 - from.index()) % 4 {
        3 => -1,
        _ => 1,
    }
}

/// Compass heading in radians, clockwise from UP.
pub fn heading_of(direction: Direction) -> f64 {
    direction.index() as f64 * FRAC_PI_2
}
