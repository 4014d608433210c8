use crate::board::{Move, Side};

/// Errors raised while building a [`Move`] from outside input.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MoveError {
    /// A coordinate lies outside the 8x8 grid.
    #[error("cell ({x}, {y}) is off the board")]
    OutOfBounds { x: u8, y: u8 },

    /// The text is not a column letter followed by a row digit.
    #[error("invalid move notation: {0:?}")]
    Notation(String),
}

/// Errors raised while reading a board diagram.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BoardParseError {
    #[error("board diagram has {0} cells, expected 64")]
    WrongCellCount(usize),

    #[error("unknown cell marker {marker:?} at cell {index}")]
    UnknownCell { index: usize, marker: char },
}

/// Errors returned by [`Player::decide_move`](crate::player::Player::decide_move).
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PlayerError {
    /// The harness reported an opponent move that the tracked board does not allow.
    #[error("opponent move {mv} is not legal for {side}")]
    IllegalOpponentMove { mv: Move, side: Side },
}
