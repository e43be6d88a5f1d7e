use super::constants::SURFACE_RISE_DEPTH;
use super::scene::SceneNode;
use super::spawn::Spawn;
use super::timing::MoveClock;
use super::types::{Cell, Direction};
use serde::Serialize;
use std::collections::VecDeque;

/// Marker left where a planned path changes direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnIndicator {
    pub cell: Cell,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Still below the board; counts down once per move.
    Underground { depth: u32 },
    Surface { cell: Cell },
}

#[derive(Debug, Clone)]
pub struct Segment {
    pub next: Option<usize>,
    pub placement: Placement,
    pub facing: Direction,
    pub spawn_position: Cell,
    pub clock: MoveClock,
    pub percent_moved: f64,
    pub burrowing: bool,
    pub to_destroy: bool,
    pub node: SceneNode,
}

impl Segment {
    pub fn cell(&self) -> Option<Cell> {
        match self.placement {
            Placement::Surface { cell } => Some(cell),
            Placement::Underground { .. } => None,
        }
    }
}

/// One live snake: an arena of segments linked head to tail.
#[derive(Debug, Clone)]
pub struct SnakeBody {
    pub id: u64,
    pub length: usize,
    pub planned_depth: usize,
    pub frontier: Cell,
    pub burrow_planned: bool,
    segments: Vec<Segment>,
    head: usize,
    turn_indicators: VecDeque<TurnIndicator>,
}

impl SnakeBody {
    pub fn new(id: u64, spawn: &Spawn, length: usize, now: f64, delay: f64) -> Self {
        let length = length.max(1);
        let segments = (0..length)
            .map(|index| Segment {
                next: (index + 1 < length).then_some(index + 1),
                placement: Placement::Underground {
                    depth: SURFACE_RISE_DEPTH + index as u32,
                },
                facing: spawn.direction,
                spawn_position: spawn.origin,
                clock: MoveClock::new(now, delay),
                percent_moved: 0.0,
                burrowing: false,
                to_destroy: false,
                node: SceneNode::default(),
            })
            .collect();

        Self {
            id,
            length,
            planned_depth: 1,
            frontier: spawn.neighbor,
            burrow_planned: false,
            segments,
            head: 0,
            turn_indicators: VecDeque::new(),
        }
    }

    pub fn head_index(&self) -> usize {
        self.head
    }

    /// Segment indices from head to tail.
    pub fn order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.segments.len());
        let mut cursor = Some(self.head);
        while let Some(index) = cursor {
            order.push(index);
            cursor = self.segments[index].next;
        }
        order
    }

    pub fn tail_index(&self) -> usize {
        let mut index = self.head;
        while let Some(next) = self.segments[index].next {
            index = next;
        }
        index
    }

    pub fn is_tail(&self, index: usize) -> bool {
        self.segments[index].next.is_none()
    }

    /// The segment that retires turn indicators as it passes them.
    pub fn indicator_consumer(&self) -> usize {
        self.segments[self.head].next.unwrap_or(self.head)
    }

    pub fn segment(&self, index: usize) -> &Segment {
        &self.segments[index]
    }

    pub fn segment_mut(&mut self, index: usize) -> &mut Segment {
        &mut self.segments[index]
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.order().into_iter().map(move |index| &self.segments[index])
    }

    pub fn is_finished(&self) -> bool {
        self.segments[self.tail_index()].to_destroy
    }

    pub fn enqueue_indicator(&mut self, indicator: TurnIndicator) {
        self.turn_indicators.push_back(indicator);
    }

    /// Pop the oldest indicator if it sits on `cell`.
    pub fn consume_indicator_at(&mut self, cell: Cell) -> Option<TurnIndicator> {
        match self.turn_indicators.front() {
            Some(front) if front.cell == cell => self.turn_indicators.pop_front(),
            _ => None,
        }
    }

    pub fn indicators(&self) -> impl Iterator<Item = &TurnIndicator> + '_ {
        self.turn_indicators.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn() -> Spawn {
        Spawn {
            origin: Cell::new(4, 4),
            neighbor: Cell::new(5, 4),
            direction: Direction::Up,
        }
    }

    #[test]
    fn chain_runs_head_to_tail() {
        let snake = SnakeBody::new(1, &spawn(), 4, 0.0, 100.0);
        assert_eq!(snake.order(), vec![0, 1, 2, 3]);
        assert_eq!(snake.tail_index(), 3);
        assert!(snake.is_tail(3));
        assert_eq!(snake.indicator_consumer(), 1);
        assert_eq!(snake.planned_depth, 1);
        assert_eq!(snake.frontier, Cell::new(5, 4));
    }

    #[test]
    fn segments_wait_underground_in_order() {
        let snake = SnakeBody::new(1, &spawn(), 3, 0.0, 100.0);
        let depths: Vec<_> = snake
            .segments()
            .map(|segment| match segment.placement {
                Placement::Underground { depth } => depth,
                Placement::Surface { .. } => 0,
            })
            .collect();
        assert_eq!(depths, vec![1, 2, 3]);
        assert!(snake.segments().all(|segment| segment.spawn_position == Cell::new(4, 4)));
    }

    #[test]
    fn spawn_position_is_a_copy_per_segment() {
        let mut snake = SnakeBody::new(1, &spawn(), 2, 0.0, 100.0);
        snake.segment_mut(0).spawn_position = Cell::new(0, 0);
        assert_eq!(snake.segment(1).spawn_position, Cell::new(4, 4));
    }

    #[test]
    fn indicators_leave_in_fifo_order() {
        let mut snake = SnakeBody::new(1, &spawn(), 2, 0.0, 100.0);
        let first = TurnIndicator {
            cell: Cell::new(6, 4),
            direction: Direction::Left,
        };
        let second = TurnIndicator {
            cell: Cell::new(6, 2),
            direction: Direction::Up,
        };
        snake.enqueue_indicator(first);
        snake.enqueue_indicator(second);

        assert_eq!(snake.consume_indicator_at(second.cell), None);
        assert_eq!(snake.consume_indicator_at(first.cell), Some(first));
        assert_eq!(snake.consume_indicator_at(first.cell), None);
        assert_eq!(snake.consume_indicator_at(second.cell), Some(second));
        assert_eq!(snake.consume_indicator_at(second.cell), None);
        assert_eq!(snake.indicators().count(), 0);
    }

    #[test]
    fn single_segment_snake_consumes_its_own_indicators() {
        let snake = SnakeBody::new(1, &spawn(), 1, 0.0, 100.0);
        assert_eq!(snake.indicator_consumer(), snake.head_index());
        assert!(snake.is_tail(snake.head_index()));
    }
}
