use serde::{Deserialize, Serialize};

/// A grid cell as `[row, col]`. Rows grow upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
  pub row: usize,
  pub col: usize,
}

impl Cell {
  pub fn new(row: usize, col: usize) -> Self {
    Self { row, col }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Up,
  Right,
  Down,
  Left,
}

impl Direction {
  pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

  pub fn index(self) -> usize {
    match self {
      Direction::Up => 0,
      Direction::Right => 1,
      Direction::Down => 2,
      Direction::Left => 3,
    }
  }

  pub fn from_index(index: usize) -> Self {
    Self::ALL[index % 4]
  }
}

/// What an occupant plans to do when it crosses a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellMark {
  #[default]
  Empty,
  Heading(Direction),
  Burrow,
  /// Board code 6. Surfacing is tracked per segment, so no cell carries it.
  #[allow(dead_code)]
  Surface,
}

impl CellMark {
  pub fn code(self) -> i8 {
    match self {
      CellMark::Empty => -1,
      CellMark::Heading(direction) => direction.index() as i8,
      CellMark::Burrow => 5,
      CellMark::Surface => 6,
    }
  }

  pub fn is_empty(self) -> bool {
    matches!(self, CellMark::Empty)
  }

  pub fn heading(self) -> Option<Direction> {
    match self {
      CellMark::Heading(direction) => Some(direction),
      _ => None,
    }
  }
}

/// What is physically on a cell right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Occupancy {
  #[default]
  Free,
  SnakeBody,
  LethalHead,
}

#[cfg(test)]
impl Occupancy {
  pub fn code(self) -> u8 {
    match self {
      Occupancy::Free => 0,
      Occupancy::SnakeBody => 1,
      Occupancy::LethalHead => 2,
    }
  }
}
