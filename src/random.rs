use crate::board::{Board, Move, Side};
use crate::boards::othello::OthelloBoard;
use rand::rngs::{StdRng, ThreadRng};
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// Picks one of `side`'s legal moves uniformly, or `None` if it has to pass.
pub fn random_move<B: Board, R: Rng + ?Sized>(board: &B, side: Side, rng: &mut R) -> Option<Move> {
    board.legal_moves(side).choose(rng).copied()
}

/// Plays up to `plies` random moves (passes included) starting with `side`, stopping early
/// once the game is over. Returns the reached position and the side to move there.
pub fn random_playout<B: Board, R: Rng + ?Sized>(
    mut board: B,
    mut side: Side,
    plies: usize,
    rng: &mut R,
) -> (B, Side) {
    for _ in 0..plies {
        if board.is_done() {
            break;
        }
        let mv = random_move(&board, side, rng);
        board.do_move(mv, side);
        side = side.other();
    }
    (board, side)
}

/// An opponent that plays uniformly random legal moves while tracking its own board.
pub struct RandomPlayer<R: Rng = ThreadRng> {
    side: Side,
    board: OthelloBoard,
    rng: R,
}

impl RandomPlayer<ThreadRng> {
    pub fn new(side: Side) -> Self {
        Self::with_rng(side, rand::rng())
    }
}

impl RandomPlayer<StdRng> {
    /// A reproducible opponent.
    pub fn seeded(side: Side, seed: u64) -> Self {
        Self::with_rng(side, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomPlayer<R> {
    pub fn with_rng(side: Side, rng: R) -> Self {
        Self {
            side,
            board: OthelloBoard::default(),
            rng,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Records the opponent's move, then answers with a random legal move of our own.
    pub fn decide_move(&mut self, opponents_move: Option<Move>) -> Option<Move> {
        self.board.do_move(opponents_move, self.side.other());
        let mv = random_move(&self.board, self.side, &mut self.rng);
        self.board.do_move(mv, self.side);
        mv
    }
}
