use std::io;

use thiserror::Error;

use crate::Coord;

/// Problems building a game from its configuration.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum GameError {
    #[error("a {width}x{height} board cannot fit a snake of length {length}")]
    BoardTooSmall { width: Coord, height: Coord, length: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Terminal backend failures. None of these are recovered from.
#[derive(Error, Debug)]
pub enum TermError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("terminal is {cols}x{rows}, need at least {min_cols}x{min_rows}")]
    TooSmall { cols: u16, rows: u16, min_cols: u16, min_rows: u16 },
    #[error("cell ({x}, {y}) is outside the terminal")]
    OffScreen { x: Coord, y: Coord },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Term(#[from] TermError),
}
