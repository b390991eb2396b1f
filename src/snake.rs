use crate::{Coord, Coords};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Offset applied to the head for one step in this direction
    pub fn delta(self) -> Coords {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

/// Body cells ordered head first. Never empty.
#[derive(Clone, Debug)]
pub struct Snake {
    body: Vec<Coords>,
    direction: Direction,
}

impl Snake {
    /// Builds a snake heading in `direction` with its head at `head` and the
    /// rest of the body trailing straight behind it.
    pub fn new(head: Coords, size: Coord, direction: Direction) -> Self {
        let diff = direction.delta();

        let body = (0..size.max(1))
            .map(|i| (head.0 - diff.0 * i, head.1 - diff.1 * i))
            .collect();
        Snake { body, direction }
    }

    #[cfg(test)]
    pub fn from_body(body: Vec<Coords>, direction: Direction) -> Self {
        assert!(!body.is_empty());
        Snake { body, direction }
    }

    pub fn body(&self) -> &[Coords] {
        &self.body
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Advances one cell: every segment takes the place of the one ahead of
    /// it and the head moves by the current direction. Returns the new head.
    pub fn move_step(&mut self) -> Coords {
        let (dx, dy) = self.direction.delta();
        let old_head = self.head();
        let new_head = (old_head.0 + dx, old_head.1 + dy);

        self.body.rotate_right(1);
        self.body[0] = new_head;
        new_head
    }

    pub fn bites_itself(&self) -> bool {
        self.body[1..].contains(&self.head())
    }

    pub fn occupies(&self, pos: Coords) -> bool {
        self.body.contains(&pos)
    }

    pub fn set_direction(&mut self, new_direction: Direction) {
        self.direction = new_direction;
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// Adds a segment on top of the current tail. The two cells separate on
    /// the next move.
    pub fn grow(&mut self) {
        let tail = self.body[self.body.len() - 1];
        self.body.push(tail);
    }
}
