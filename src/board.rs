use crate::error::MoveError;
use std::fmt;
use std::str::FromStr;

/// Width and height of the playing grid.
pub const BOARD_SIZE: u8 = 8;
/// Number of cells on the grid.
pub const BOARD_CELLS: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// The interface the search needs from a game position.
///
/// `Clone` is the deep copy: a clone must share nothing with its source, so that
/// applying a move to one never shows up in the other.
pub trait Board: Clone {
    /// The largest absolute weight a single cell contributes to [`Board::score`].
    ///
    /// Bounds every reachable score: `|score(side)| <= BOARD_CELLS * MAX_CELL_WEIGHT`.
    const MAX_CELL_WEIGHT: i32;

    /// Returns `true` if `side` may place a disc on `mv`.
    fn check_move(&self, mv: &Move, side: Side) -> bool;

    /// Applies a move for `side` in place. `None` is a pass and leaves the board unchanged.
    fn do_move(&mut self, mv: Option<Move>, side: Side);

    /// The marginal value for `side` of playing `mv`, computed before the move is applied.
    fn score_move(&self, mv: &Move, side: Side) -> i32;

    /// The absolute positional value of the board from the point of view of `side`.
    fn score(&self, side: Side) -> i32;

    /// Number of black discs on the board.
    fn count_black(&self) -> u32;

    /// Number of white discs on the board.
    fn count_white(&self) -> u32;

    /// Number of discs owned by `side`.
    fn count(&self, side: Side) -> u32 {
        match side {
            Side::Black => self.count_black(),
            Side::White => self.count_white(),
        }
    }

    /// Number of discs of either colour.
    fn total_discs(&self) -> u32 {
        self.count_black() + self.count_white()
    }

    /// Returns `true` if `side` has at least one legal cell.
    fn has_moves(&self, side: Side) -> bool {
        all_cells().any(|mv| self.check_move(&mv, side))
    }

    /// All legal moves for `side`, in row-major cell order.
    fn legal_moves(&self, side: Side) -> Vec<Move> {
        all_cells().filter(|mv| self.check_move(mv, side)).collect()
    }

    /// The game is over once neither side can move.
    fn is_done(&self) -> bool {
        !self.has_moves(Side::Black) && !self.has_moves(Side::White)
    }
}

/// Iterates over every cell of the grid, row by row.
pub fn all_cells() -> impl Iterator<Item = Move> {
    (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Move::new(x, y)))
}

/// One of the two players.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Side {
    /// Moves first.
    Black,
    White,
}

impl Side {
    /// The opponent of this side.
    pub const fn other(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Black => f.write_str("black"),
            Side::White => f.write_str("white"),
        }
    }
}

/// A cell on the grid. `x` is the column, `y` the row, both in `0..8`.
///
/// The search tries candidate cells by moving a single `Move` around with the setters
/// rather than building a new value per trial.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct Move {
    x: u8,
    y: u8,
}

impl Move {
    /// Creates a move without range checks; callers inside the crate only pass grid coordinates.
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Creates a move, rejecting coordinates that fall off the grid.
    pub fn try_new(x: u8, y: u8) -> Result<Self, MoveError> {
        if x >= BOARD_SIZE || y >= BOARD_SIZE {
            return Err(MoveError::OutOfBounds { x, y });
        }
        Ok(Self::new(x, y))
    }

    pub const fn x(&self) -> u8 {
        self.x
    }

    pub const fn y(&self) -> u8 {
        self.y
    }

    pub fn set_x(&mut self, x: u8) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: u8) {
        self.y = y;
    }

    /// Row-major index of the cell, `x + 8 * y`.
    pub const fn index(&self) -> usize {
        self.x as usize + BOARD_SIZE as usize * self.y as usize
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.x) as char, self.y + 1)
    }
}

impl FromStr for Move {
    type Err = MoveError;

    /// Parses algebraic notation: a column letter `a`..`h` followed by a row digit `1`..`8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let notation = || MoveError::Notation(s.to_string());
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(notation());
        }

        let column = bytes[0].to_ascii_lowercase();
        let row = bytes[1];
        if !(b'a'..=b'h').contains(&column) || !(b'1'..=b'8').contains(&row) {
            return Err(notation());
        }

        Move::try_new(column - b'a', row - b'1')
    }
}
