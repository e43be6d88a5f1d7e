use super::direction::offset_of;
use super::types::{Cell, CellMark, Direction, Occupancy};

/// Planned directions and present-tense occupancy for the whole board.
///
/// `marks` tracks intent (what a snake will do at a cell, reserved ahead of
/// its head); `occupied` tracks only what is physically there this tick.
#[derive(Debug, Clone)]
pub struct GridField {
    width: usize,
    height: usize,
    marks: Vec<CellMark>,
    occupied: Vec<Occupancy>,
}

impl GridField {
    pub fn new(width: usize, height: usize) -> Self {
        let cells = width * height;
        Self {
            width,
            height,
            marks: vec![CellMark::Empty; cells],
            occupied: vec![Occupancy::Free; cells],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, cell: Cell) -> usize {
        debug_assert!(self.contains(cell), "cell {cell:?} outside the field");
        cell.row * self.width + cell.col
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Neighbouring cell one step in `direction`, or `None` past the edge.
    pub fn neighbor(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let (d_row, d_col) = offset_of(direction);
        let row = cell.row.checked_add_signed(d_row as isize)?;
        let col = cell.col.checked_add_signed(d_col as isize)?;
        let next = Cell::new(row, col);
        self.contains(next).then_some(next)
    }

    pub fn mark(&self, cell: Cell) -> CellMark {
        self.marks[self.index(cell)]
    }

    pub fn set_mark(&mut self, cell: Cell, mark: CellMark) {
        let index = self.index(cell);
        self.marks[index] = mark;
    }

    pub fn occupancy(&self, cell: Cell) -> Occupancy {
        self.occupied[self.index(cell)]
    }

    pub fn set_occupancy(&mut self, cell: Cell, occupancy: Occupancy) {
        let index = self.index(cell);
        self.occupied[index] = occupancy;
    }

    /// In bounds and not reserved by any plan.
    pub fn is_clear(&self, cell: Cell) -> bool {
        self.contains(cell) && self.mark(cell).is_empty()
    }

    /// Step from `cell` toward `direction` if the destination is clear.
    pub fn clear_neighbor(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        self.neighbor(cell, direction).filter(|next| self.is_clear(*next))
    }

    pub fn release(&mut self, cell: Cell) {
        self.set_mark(cell, CellMark::Empty);
        self.set_occupancy(cell, Occupancy::Free);
    }

    pub fn reset(&mut self) {
        self.marks.fill(CellMark::Empty);
        self.occupied.fill(Occupancy::Free);
    }
}

#[cfg(test)]
impl GridField {
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Cell::new(row, col)))
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = (Cell, Occupancy)> + '_ {
        self.cells()
            .map(|cell| (cell, self.occupancy(cell)))
            .filter(|(_, occupancy)| *occupancy != Occupancy::Free)
    }

    pub fn marked_cells(&self) -> impl Iterator<Item = (Cell, CellMark)> + '_ {
        self.cells()
            .map(|cell| (cell, self.mark(cell)))
            .filter(|(_, mark)| !mark.is_empty())
    }
}
