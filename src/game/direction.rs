/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns true if self is horizontal
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Returns true if other lies on the other axis of travel
    pub fn is_perpendicular(&self, other: Direction) -> bool {
        self.is_horizontal() != other.is_horizontal()
    }

    /// Returns the unit delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Gates raw direction input against the current axis of travel.
///
/// Input arrives once per frame but the snake only moves once per tick, so
/// the requested direction is validated against the direction of the last
/// committed step rather than the last request. Two quick turns inside one
/// tick (Right, Up, Left) therefore cannot add up to a reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionController {
    travel: Direction,
    pending: Direction,
}

impl DirectionController {
    pub fn new(initial: Direction) -> Self {
        Self {
            travel: initial,
            pending: initial,
        }
    }

    /// Request a new direction. Only perpendicular turns are accepted;
    /// anything else is silently ignored. Returns whether it was accepted.
    pub fn request(&mut self, direction: Direction) -> bool {
        if self.travel.is_perpendicular(direction) {
            self.pending = direction;
            true
        } else {
            false
        }
    }

    /// Direction the next tick will use
    pub fn current(&self) -> Direction {
        self.pending
    }

    /// Direction of the last committed step
    pub fn travel(&self) -> Direction {
        self.travel
    }

    /// Lock in the pending direction for the tick about to run
    pub fn commit(&mut self) -> Direction {
        self.travel = self.pending;
        self.travel
    }
}
