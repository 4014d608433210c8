//! Fixed-depth minimax search with alpha-beta pruning.
//!
//! Scores are threaded through the recursion incrementally: each applied move adds the marginal
//! value from [`Board::score_move`] when it is ours and subtracts it when it is the opponent's.
//! The value reaching a leaf is therefore the change in our positional score along that path.

use crate::board::{Board, Move, Side, BOARD_CELLS, BOARD_SIZE};

/// The bound standing in for infinity, given the largest per-cell weight of a board.
///
/// A path can move a score at most from `-BOARD_CELLS * w` to `BOARD_CELLS * w`, so the bound
/// sits one above that swing and no real value can reach it.
pub const fn score_infinity(max_cell_weight: i32) -> i32 {
    2 * BOARD_CELLS as i32 * max_cell_weight + 1
}

/// Alpha-beta searcher playing for one side.
///
/// The searcher itself holds no positions; every explored branch works on its own copy of the
/// board that lives only as long as the loop iteration that made it.
#[derive(Debug, Clone)]
pub struct Searcher {
    side: Side,
    use_alpha_beta_pruning: bool,
    nodes: u64,
}

impl Searcher {
    /// Creates a searcher maximising the score of `side`.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            use_alpha_beta_pruning: true,
            nodes: 0,
        }
    }

    /// Enables or disables pruning. Without it the search is a full minimax.
    pub fn with_alpha_beta_pruning(mut self, use_abp: bool) -> Self {
        self.use_alpha_beta_pruning = use_abp;
        self
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of search calls made since creation or the last [`reset_nodes`](Self::reset_nodes).
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn reset_nodes(&mut self) {
        self.nodes = 0;
    }

    /// Returns the best value `value` can be driven to within `depth` plies, `to_move` moving first.
    ///
    /// The search runs relative to `value`, so the infinity bounds of `B` only have to cover the
    /// swing of the explored moves. The window is shifted and clamped to match; an inverted
    /// window is swapped back.
    pub fn search<B: Board>(
        &mut self,
        board: &B,
        value: i32,
        depth: u32,
        alpha: i32,
        beta: i32,
        to_move: Side,
    ) -> i32 {
        let infinity = score_infinity(B::MAX_CELL_WEIGHT);
        let (mut alpha, mut beta) = (alpha, beta);
        if alpha > beta {
            log::warn!("inverted search window [{alpha}, {beta}], swapping bounds");
            std::mem::swap(&mut alpha, &mut beta);
        }
        let alpha = alpha.saturating_sub(value).clamp(-infinity, infinity);
        let beta = beta.saturating_sub(value).clamp(-infinity, infinity);
        let swing = self.alpha_beta(board, 0, depth, alpha, beta, to_move);
        value.saturating_add(swing)
    }

    /// Finds our best move on `board` looking `depth` plies ahead, the move itself counting as the
    /// first ply. Returns `None` when we have no legal move.
    ///
    /// Cells are tried in row-major order and a later move must be strictly better to replace an
    /// earlier one.
    pub fn best_move<B: Board>(&mut self, board: &B, depth: u32) -> Option<(Move, i32)> {
        let infinity = score_infinity(B::MAX_CELL_WEIGHT);
        let depth = depth.max(1);
        let mut best: Option<(Move, i32)> = None;
        let mut cell = Move::new(0, 0);

        for y in 0..BOARD_SIZE {
            cell.set_y(y);
            for x in 0..BOARD_SIZE {
                cell.set_x(x);
                if !board.check_move(&cell, self.side) {
                    continue;
                }

                let mut child = board.clone();
                let delta = child.score_move(&cell, self.side);
                child.do_move(Some(cell), self.side);

                // Later siblings only matter if they beat the current best.
                let alpha = best.map_or(-infinity, |(_, value)| value);
                let value =
                    self.alpha_beta(&child, delta, depth - 1, alpha, infinity, self.side.other());
                if best.is_none_or(|(_, best_value)| value > best_value) {
                    best = Some((cell, value));
                }
            }
        }

        best
    }

    fn alpha_beta<B: Board>(
        &mut self,
        board: &B,
        value: i32,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        to_move: Side,
    ) -> i32 {
        self.nodes += 1;
        if depth == 0 {
            return value;
        }

        let infinity = score_infinity(B::MAX_CELL_WEIGHT);
        let maximizing = to_move == self.side;
        let mut best = if maximizing { -infinity } else { infinity };
        let mut moved = false;
        let mut cell = Move::new(0, 0);

        'cells: for y in 0..BOARD_SIZE {
            cell.set_y(y);
            for x in 0..BOARD_SIZE {
                cell.set_x(x);
                if !board.check_move(&cell, to_move) {
                    continue;
                }
                moved = true;

                let mut child = board.clone();
                let delta = child.score_move(&cell, to_move);
                child.do_move(Some(cell), to_move);

                if maximizing {
                    let score =
                        self.alpha_beta(&child, value + delta, depth - 1, alpha, beta, to_move.other());
                    best = best.max(score);
                    alpha = alpha.max(best);
                } else {
                    let score =
                        self.alpha_beta(&child, value - delta, depth - 1, alpha, beta, to_move.other());
                    best = best.min(score);
                    beta = beta.min(best);
                }

                if self.use_alpha_beta_pruning && beta <= alpha {
                    break 'cells;
                }
            }
        }

        if moved {
            return best;
        }

        // Forced pass: nothing is placed, so the board is shared rather than copied.
        if !board.has_moves(to_move.other()) {
            return value;
        }
        self.alpha_beta(board, value, depth - 1, alpha, beta, to_move.other())
    }
}
