use super::field::GridField;
use super::types::{Cell, CellMark, Direction};
use rand::Rng;
use std::fmt;

/// Where a new snake surfaces and the two cells reserved for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub origin: Cell,
    pub neighbor: Cell,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
    NoPlacement { attempts: usize },
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::NoPlacement { attempts } => {
                write!(f, "no free pair of adjacent cells found after {attempts} attempts")
            }
        }
    }
}

impl std::error::Error for SpawnError {}

/// Sample random cells and facings until an empty cell with an empty
/// neighbour turns up, then reserve both with the chosen facing.
pub fn reserve<R: Rng + ?Sized>(
    field: &mut GridField,
    rng: &mut R,
    max_attempts: usize,
) -> Result<Spawn, SpawnError> {
    if field.width() == 0 || field.height() == 0 {
        return Err(SpawnError::NoPlacement { attempts: 0 });
    }

    for _ in 0..max_attempts {
        let origin = Cell::new(
            rng.gen_range(0..field.height()),
            rng.gen_range(0..field.width()),
        );
        if !field.is_clear(origin) {
            continue;
        }

        let facing = rng.gen_range(0..4);
        for step in 0..4 {
            let direction = Direction::from_index(facing + step);
            let Some(neighbor) = field.clear_neighbor(origin, direction) else { continue };
            field.set_mark(origin, CellMark::Heading(direction));
            field.set_mark(neighbor, CellMark::Heading(direction));
            return Ok(Spawn {
                origin,
                neighbor,
                direction,
            });
        }
    }

    Err(SpawnError::NoPlacement {
        attempts: max_attempts,
    })
}
