use crate::error::TermError;
use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Quit,
}

impl Key {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            Key::Quit => None,
        }
    }
}

pub trait KeySource {
    /// Returns the next pending key without blocking, or `None` when nothing
    /// usable is waiting.
    fn poll_key(&mut self) -> Result<Option<Key>, TermError>;
}
