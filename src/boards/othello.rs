use crate::board::{Board, Move, Side, BOARD_CELLS, BOARD_SIZE};
use crate::error::BoardParseError;
use crate::search::score_infinity;
use std::fmt;
use std::str::FromStr;

const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

// Corners are worth holding; the cells that hand a corner to the opponent are not.
#[rustfmt::skip]
const POSITIONAL_WEIGHTS: [i32; BOARD_CELLS] = [
    100, -20,  10,   5,   5,  10, -20, 100,
    -20, -50,  -2,  -2,  -2,  -2, -50, -20,
     10,  -2,  -1,  -1,  -1,  -1,  -2,  10,
      5,  -2,  -1,  -1,  -1,  -1,  -2,   5,
      5,  -2,  -1,  -1,  -1,  -1,  -2,   5,
     10,  -2,  -1,  -1,  -1,  -1,  -2,  10,
    -20, -50,  -2,  -2,  -2,  -2, -50, -20,
    100, -20,  10,   5,   5,  10, -20, 100,
];

const DISC_WEIGHTS: [i32; BOARD_CELLS] = [1; BOARD_CELLS];

/// The largest absolute weight any single cell carries under any [`Heuristic`].
pub const MAX_CELL_WEIGHT: i32 = max_i32(max_abs(&POSITIONAL_WEIGHTS), max_abs(&DISC_WEIGHTS));

/// The search bound standing in for infinity on this board.
pub const SCORE_INFINITY: i32 = score_infinity(MAX_CELL_WEIGHT);

const fn max_abs(table: &[i32; BOARD_CELLS]) -> i32 {
    let mut max = 0;
    let mut i = 0;
    while i < BOARD_CELLS {
        let weight = table[i].abs();
        if weight > max {
            max = weight;
        }
        i += 1;
    }
    max
}

const fn max_i32(a: i32, b: i32) -> i32 {
    if a > b { a } else { b }
}

/// How a position is valued.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum Heuristic {
    /// Each cell carries a weight favouring corners and edges.
    #[default]
    Positional,
    /// Every disc counts 1; the score is the plain disc difference.
    DiscCount,
}

impl Heuristic {
    fn weights(self) -> &'static [i32; BOARD_CELLS] {
        match self {
            Heuristic::Positional => &POSITIONAL_WEIGHTS,
            Heuristic::DiscCount => &DISC_WEIGHTS,
        }
    }
}

/// An implementation of the `Board` trait for Othello.
///
/// Each colour is a 64-bit occupancy mask with bit `x + 8 * y` set for an owned cell.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct OthelloBoard {
    black: u64,
    white: u64,
    heuristic: Heuristic,
}

impl OthelloBoard {
    /// Creates the standard starting position: white on d4 and e5, black on e4 and d5.
    pub fn new() -> Self {
        Self {
            black: bit(4, 3) | bit(3, 4),
            white: bit(3, 3) | bit(4, 4),
            heuristic: Heuristic::default(),
        }
    }

    /// Switches the evaluation used by [`Board::score`] and [`Board::score_move`].
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// The owner of a cell, if any.
    pub fn get(&self, x: u8, y: u8) -> Option<Side> {
        let cell = bit(x, y);
        if self.black & cell != 0 {
            Some(Side::Black)
        } else if self.white & cell != 0 {
            Some(Side::White)
        } else {
            None
        }
    }

    fn masks(&self, side: Side) -> (u64, u64) {
        match side {
            Side::Black => (self.black, self.white),
            Side::White => (self.white, self.black),
        }
    }

    fn weighted_sum(&self, mut mask: u64) -> i32 {
        let weights = self.heuristic.weights();
        let mut sum = 0;
        while mask != 0 {
            sum += weights[mask.trailing_zeros() as usize];
            mask &= mask - 1;
        }
        sum
    }

    /// The discs that playing `mv` would turn over; empty when the move is illegal.
    fn flips(&self, mv: &Move, side: Side) -> u64 {
        if mv.x() >= BOARD_SIZE || mv.y() >= BOARD_SIZE {
            return 0;
        }
        if (self.black | self.white) & bit(mv.x(), mv.y()) != 0 {
            return 0;
        }

        let (own, opponent) = self.masks(side);
        let mut flipped = 0;
        for (dx, dy) in DIRECTIONS {
            let mut line = 0;
            let mut x = mv.x() as i8 + dx;
            let mut y = mv.y() as i8 + dy;
            while on_board(x, y) {
                let cell = bit(x as u8, y as u8);
                if opponent & cell != 0 {
                    line |= cell;
                } else {
                    if own & cell != 0 {
                        flipped |= line;
                    }
                    break;
                }
                x += dx;
                y += dy;
            }
        }
        flipped
    }
}

impl Default for OthelloBoard {
    fn default() -> Self {
        OthelloBoard::new()
    }
}

impl Board for OthelloBoard {
    const MAX_CELL_WEIGHT: i32 = MAX_CELL_WEIGHT;

    fn check_move(&self, mv: &Move, side: Side) -> bool {
        self.flips(mv, side) != 0
    }

    fn do_move(&mut self, mv: Option<Move>, side: Side) {
        let Some(mv) = mv else {
            return;
        };

        let flipped = self.flips(&mv, side);
        if flipped == 0 {
            log::warn!("ignoring illegal move {mv} for {side}");
            return;
        }

        let placed = bit(mv.x(), mv.y()) | flipped;
        match side {
            Side::Black => {
                self.black |= placed;
                self.white &= !flipped;
            }
            Side::White => {
                self.white |= placed;
                self.black &= !flipped;
            }
        }
    }

    fn score_move(&self, mv: &Move, side: Side) -> i32 {
        let flipped = self.flips(mv, side);
        if flipped == 0 {
            return 0;
        }
        // A flipped disc leaves the opponent's sum and joins ours.
        self.heuristic.weights()[mv.index()] + 2 * self.weighted_sum(flipped)
    }

    fn score(&self, side: Side) -> i32 {
        let (own, opponent) = self.masks(side);
        self.weighted_sum(own) - self.weighted_sum(opponent)
    }

    fn count_black(&self) -> u32 {
        self.black.count_ones()
    }

    fn count_white(&self) -> u32 {
        self.white.count_ones()
    }
}

impl FromStr for OthelloBoard {
    type Err = BoardParseError;

    /// Reads a 64-cell diagram, row by row from the top. `b`/`x` mark black, `w`/`o` mark white,
    /// `.`, `-` and `_` mark empty cells. Whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let markers: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if markers.len() != BOARD_CELLS {
            return Err(BoardParseError::WrongCellCount(markers.len()));
        }

        let mut board = OthelloBoard {
            black: 0,
            white: 0,
            heuristic: Heuristic::default(),
        };
        for (index, &marker) in markers.iter().enumerate() {
            let cell = 1u64 << index;
            match marker.to_ascii_lowercase() {
                'b' | 'x' => board.black |= cell,
                'w' | 'o' => board.white |= cell,
                '.' | '-' | '_' => {}
                _ => return Err(BoardParseError::UnknownCell { index, marker }),
            }
        }
        Ok(board)
    }
}

impl fmt::Display for OthelloBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let marker = match self.get(x, y) {
                    Some(Side::Black) => 'b',
                    Some(Side::White) => 'w',
                    None => '.',
                };
                if x > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{marker}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

const fn bit(x: u8, y: u8) -> u64 {
    1u64 << (x as u32 + BOARD_SIZE as u32 * y as u32)
}

fn on_board(x: i8, y: i8) -> bool {
    (0..BOARD_SIZE as i8).contains(&x) && (0..BOARD_SIZE as i8).contains(&y)
}
