use crate::board::{Board, Move, Side, BOARD_CELLS};
use crate::boards::othello::OthelloBoard;
use crate::error::PlayerError;
use crate::search::Searcher;
use crate::time_budget::{estimate_moves_left, TimeBudget};
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

/// Depth the first deepening iteration searches.
pub const DEFAULT_START_DEPTH: u32 = 4;
/// Assumed growth in time from one depth to the next.
pub const DEFAULT_BRANCHING_MULTIPLIER: u32 = 8;
/// Deepest search when the harness gives no clock.
pub const DEFAULT_UNBOUNDED_DEPTH: u32 = 6;

/// Tuning of the per-turn search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Depth of the first iteration of iterative deepening.
    pub start_depth: u32,
    /// Factor applied to the last iteration's duration to project the next one.
    pub branching_multiplier: u32,
    /// Range of estimated moves left in which a turn gets a boosted allowance.
    pub midgame_window: RangeInclusive<u32>,
    /// Factor applied to the allowance inside the mid-game window.
    pub midgame_boost: u32,
    /// Depth cap used when there is no clock.
    pub unbounded_depth: u32,
    /// Search exactly this depth, skipping iterative deepening and the clock.
    pub fixed_depth: Option<u32>,
    pub alpha_beta_pruning: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            start_depth: DEFAULT_START_DEPTH,
            branching_multiplier: DEFAULT_BRANCHING_MULTIPLIER,
            midgame_window: 12..=22,
            midgame_boost: 2,
            unbounded_depth: DEFAULT_UNBOUNDED_DEPTH,
            fixed_depth: None,
            alpha_beta_pruning: true,
        }
    }
}

/// Summary of the deepest completed search of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    /// Plies searched, counting our own move. 0 when the move was forced.
    pub depth: u32,
    pub score: i32,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// An automated player that tracks the game on its own board and picks a move each turn.
pub struct Player<B: Board = OthelloBoard> {
    side: Side,
    board: B,
    config: SearchConfig,
    last_search: Option<SearchReport>,
}

/// A builder for creating instances of `Player`.
pub struct PlayerBuilder<B: Board = OthelloBoard> {
    side: Side,
    board: B,
    config: SearchConfig,
}

impl PlayerBuilder<OthelloBoard> {
    /// Creates a builder for `side`, starting from the standard Othello position.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            board: OthelloBoard::default(),
            config: SearchConfig::default(),
        }
    }
}

impl<B: Board> PlayerBuilder<B> {
    /// Starts the player from `board` instead of the standard position.
    pub fn with_board<C: Board>(self, board: C) -> PlayerBuilder<C> {
        PlayerBuilder {
            side: self.side,
            board,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_start_depth(mut self, depth: u32) -> Self {
        self.config.start_depth = depth;
        self
    }

    pub fn with_branching_multiplier(mut self, multiplier: u32) -> Self {
        self.config.branching_multiplier = multiplier;
        self
    }

    pub fn with_midgame_boost(mut self, window: RangeInclusive<u32>, boost: u32) -> Self {
        self.config.midgame_window = window;
        self.config.midgame_boost = boost;
        self
    }

    pub fn with_unbounded_depth(mut self, depth: u32) -> Self {
        self.config.unbounded_depth = depth;
        self
    }

    /// Searches exactly `depth` plies every turn, ignoring the clock.
    pub fn with_fixed_depth(mut self, depth: u32) -> Self {
        self.config.fixed_depth = Some(depth);
        self
    }

    pub fn with_alpha_beta_pruning(mut self, use_abp: bool) -> Self {
        self.config.alpha_beta_pruning = use_abp;
        self
    }

    pub fn build(self) -> Player<B> {
        Player {
            side: self.side,
            board: self.board,
            config: self.config,
            last_search: None,
        }
    }
}

impl Player<OthelloBoard> {
    /// Creates a player for `side` with the default configuration.
    pub fn new(side: Side) -> Self {
        PlayerBuilder::new(side).build()
    }

    /// Returns a new builder for `Player`.
    pub fn builder(side: Side) -> PlayerBuilder<OthelloBoard> {
        PlayerBuilder::new(side)
    }
}

impl<B: Board> Player<B> {
    pub fn side(&self) -> Side {
        self.side
    }

    /// The board as this player currently sees the game.
    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The search behind the last move returned by [`decide_move`](Self::decide_move).
    pub fn last_search(&self) -> Option<&SearchReport> {
        self.last_search.as_ref()
    }

    /// Records the opponent's last move (`None` if they passed or this is the first turn) and
    /// answers with our own, or `None` when we have to pass.
    ///
    /// `ms_left` is what remains of our clock for the whole game; `-1` means no limit. The chosen
    /// move is applied to the tracked board before it is returned.
    pub fn decide_move(
        &mut self,
        opponents_move: Option<Move>,
        ms_left: i64,
    ) -> Result<Option<Move>, PlayerError> {
        let turn_started = Instant::now();
        let opponent = self.side.other();
        if let Some(mv) = opponents_move {
            if !self.board.check_move(&mv, opponent) {
                return Err(PlayerError::IllegalOpponentMove { mv, side: opponent });
            }
        }
        self.board.do_move(opponents_move, opponent);
        self.last_search = None;

        let legal_moves = self.board.legal_moves(self.side);
        let decision = match legal_moves.as_slice() {
            [] => None,
            [only] => Some((
                *only,
                SearchReport {
                    depth: 0,
                    score: self.board.score_move(only, self.side),
                    nodes: 0,
                    elapsed: turn_started.elapsed(),
                },
            )),
            _ => match self.config.fixed_depth {
                Some(depth) => self.search_depth(depth),
                None => self.iterative_deepening(ms_left, turn_started),
            },
        };

        let Some((mv, report)) = decision else {
            log::info!("{} has no legal move and passes", self.side);
            return Ok(None);
        };

        self.board.do_move(Some(mv), self.side);
        log::info!(
            "{} plays {mv} (depth {}, score {}, {} nodes, {:?})",
            self.side,
            report.depth,
            report.score,
            report.nodes,
            turn_started.elapsed(),
        );
        self.last_search = Some(report);
        Ok(Some(mv))
    }

    fn searcher(&self) -> Searcher {
        Searcher::new(self.side).with_alpha_beta_pruning(self.config.alpha_beta_pruning)
    }

    fn search_depth(&self, depth: u32) -> Option<(Move, SearchReport)> {
        let started = Instant::now();
        let mut searcher = self.searcher();
        let depth = depth.max(1);
        searcher.best_move(&self.board, depth).map(|(mv, score)| {
            let report = SearchReport {
                depth,
                score,
                nodes: searcher.nodes(),
                elapsed: started.elapsed(),
            };
            (mv, report)
        })
    }

    /// Deepens one ply at a time until the next iteration is projected to overrun the turn's
    /// allowance or the depth reaches the end of the game. Every iteration runs to completion,
    /// so the result always comes from a finished search.
    fn iterative_deepening(
        &self,
        ms_left: i64,
        turn_started: Instant,
    ) -> Option<(Move, SearchReport)> {
        let total_discs = self.board.total_discs();
        let mut budget = TimeBudget::for_turn(ms_left, estimate_moves_left(total_discs), &self.config);
        budget.charge(turn_started.elapsed());

        let empty_cells = (BOARD_CELLS as u32).saturating_sub(total_discs).max(1);
        let max_depth = if budget.is_bounded() {
            empty_cells
        } else {
            empty_cells.min(self.config.unbounded_depth.max(1))
        };

        let start_depth = self.config.start_depth.clamp(1, max_depth);
        deepen(budget, start_depth, max_depth, |depth| self.search_depth(depth))
    }
}

/// Runs `search_depth` from `start_depth` upwards, charging each iteration's reported time to
/// `budget`, until `max_depth` is done or the budget projects that the next depth would not
/// finish. Returns the deepest iteration that produced a move.
fn deepen<F>(
    mut budget: TimeBudget,
    start_depth: u32,
    max_depth: u32,
    mut search_depth: F,
) -> Option<(Move, SearchReport)>
where
    F: FnMut(u32) -> Option<(Move, SearchReport)>,
{
    let mut depth = start_depth;
    let mut best = None;
    loop {
        let Some((mv, report)) = search_depth(depth) else {
            break;
        };
        budget.charge(report.elapsed);
        log::debug!(
            "depth {depth}: {mv} scores {} after {} nodes in {:?}, {:?} left",
            report.score,
            report.nodes,
            report.elapsed,
            budget.remaining(),
        );
        best = Some((mv, report));

        if depth >= max_depth || !budget.allows_next(report.elapsed) {
            break;
        }
        depth += 1;
    }
    best
}

#[cfg(test)]
mod tests {
    use crate::board::{Board, Move, Side};
    use crate::boards::othello::{Heuristic, OthelloBoard};
    use crate::error::PlayerError;
    use crate::player::{deepen, Player, SearchConfig, SearchReport, DEFAULT_START_DEPTH};
    use crate::random::{random_playout, RandomPlayer};
    use crate::time_budget::TimeBudget;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::{Duration, Instant};

    /// Stands in for a search of `depth` plies that took `cost`.
    fn finished(depth: u32, cost: Duration) -> Option<(Move, SearchReport)> {
        let report = SearchReport {
            depth,
            score: depth as i32,
            nodes: u64::from(depth),
            elapsed: cost,
        };
        Some((Move::new(depth as u8 % 8, 0), report))
    }

    /// Plays a whole game, checking every move against a separate referee board. Timing is
    /// covered by the `deepening_*` tests, which do not depend on the machine's speed.
    fn play_against_random(engine_side: Side, seed: u64, clock_ms: i64) {
        let mut engine = Player::new(engine_side);
        let mut opponent = RandomPlayer::seeded(engine_side.other(), seed);
        let mut referee = OthelloBoard::default();
        let mut clock = clock_ms;
        let mut to_move = Side::Black;
        let mut last_move: Option<Move> = None;

        while !referee.is_done() {
            let mv = if to_move == engine_side {
                let started = Instant::now();
                let mv = engine.decide_move(last_move, clock).unwrap();
                clock = (clock - started.elapsed().as_millis() as i64).max(0);
                mv
            } else {
                opponent.decide_move(last_move)
            };

            match mv {
                Some(mv) => assert!(referee.check_move(&mv, to_move)),
                None => assert!(!referee.has_moves(to_move)),
            }
            referee.do_move(mv, to_move);
            if to_move == engine_side {
                assert_eq!(engine.board(), &referee);
            }

            last_move = mv;
            to_move = to_move.other();
        }
    }

    #[test]
    fn deepening_stops_when_the_next_depth_is_projected_to_overrun() {
        // arrange: 1000 ms for the turn, each depth costing five times the previous one.
        let budget = TimeBudget::for_turn(1_000, 1, &SearchConfig::default());
        let mut searched = Vec::new();
        let mut spent = Duration::ZERO;

        // act
        let result = deepen(budget, 4, 60, |depth| {
            let cost = Duration::from_millis(10 * 5u64.pow(depth - 4));
            searched.push(depth);
            spent += cost;
            finished(depth, cost)
        });

        // assert: 10 + 50 + 250 ms leaves 690 ms, short of the projected 8 * 250 ms.
        assert_eq!(searched, vec![4, 5, 6]);
        assert_eq!(result.unwrap().1.depth, 6);
        assert_eq!(spent, Duration::from_millis(310));
    }

    #[test]
    fn deepening_charges_every_iteration_against_the_allowance() {
        // arrange: flat 100 ms iterations pass the projection alone until the total is charged.
        let budget = TimeBudget::for_turn(1_000, 1, &SearchConfig::default());
        let mut searched = Vec::new();

        // act
        let result = deepen(budget, 1, 60, |depth| {
            searched.push(depth);
            finished(depth, Duration::from_millis(100))
        });

        // assert: after two iterations 800 ms remain, which no longer beats 8 * 100 ms.
        assert_eq!(searched, vec![1, 2]);
        assert_eq!(result.unwrap().1.depth, 2);
    }

    #[test]
    fn deepening_stays_inside_the_clock_across_growth_rates() {
        // Iteration costs grow by less than the multiplier per ply, as the projection assumes.
        let first = Duration::from_micros(300);
        for ms_left in [50, 400, 3_000, 60_000] {
            for moves_left in [1, 5, 15, 30] {
                for growth in [2u32, 5, 7] {
                    // arrange
                    let budget = TimeBudget::for_turn(ms_left, moves_left, &SearchConfig::default());
                    let allowance = budget.remaining().unwrap();
                    let mut spent = Duration::ZERO;

                    // act
                    let result = deepen(budget, 4, 60, |depth| {
                        let cost = first * growth.pow(depth - 4);
                        spent += cost;
                        finished(depth, cost)
                    });

                    // assert
                    assert!(result.is_some());
                    assert!(spent <= allowance.max(first), "{ms_left} ms, {moves_left} moves, x{growth}");
                    assert!(spent <= Duration::from_millis(ms_left as u64));
                }
            }
        }
    }

    #[test]
    fn deepening_returns_the_first_iteration_even_over_budget() {
        let budget = TimeBudget::for_turn(0, 30, &SearchConfig::default());
        let mut calls = 0;

        let result = deepen(budget, 4, 60, |depth| {
            calls += 1;
            finished(depth, Duration::from_millis(40))
        });

        assert_eq!(calls, 1);
        assert_eq!(result.unwrap().1.depth, 4);
    }

    #[test]
    fn deepening_without_a_clock_runs_to_the_depth_cap() {
        let budget = TimeBudget::unbounded(8);
        let mut searched = Vec::new();

        let result = deepen(budget, 2, 6, |depth| {
            searched.push(depth);
            finished(depth, Duration::from_secs(3_600))
        });

        assert_eq!(searched, vec![2, 3, 4, 5, 6]);
        assert_eq!(result.unwrap().1.depth, 6);
    }

    #[test]
    fn deepening_keeps_the_last_depth_that_found_a_move() {
        let budget = TimeBudget::unbounded(8);

        let result = deepen(budget, 3, 10, |depth| {
            if depth > 4 {
                None
            } else {
                finished(depth, Duration::from_millis(1))
            }
        });

        assert_eq!(result.unwrap().1.depth, 4);
    }

    #[test]
    fn opening_move_is_one_of_the_four_legal_cells() {
        // arrange
        let mut player = Player::builder(Side::Black).with_unbounded_depth(4).build();
        let openings = OthelloBoard::default().legal_moves(Side::Black);

        // act
        let mv = player.decide_move(None, -1).unwrap().unwrap();

        // assert
        assert!(openings.contains(&mv));
        assert_eq!(player.board().count_black(), 4);
        assert_eq!(player.board().count_white(), 1);
        assert_eq!(player.last_search().unwrap().depth, 4);
    }

    #[test]
    fn unlimited_clock_deepens_to_the_configured_cap() {
        let mut player = Player::builder(Side::White)
            .with_start_depth(2)
            .with_unbounded_depth(5)
            .build();

        player.decide_move(Some(Move::new(3, 2)), -1).unwrap().unwrap();

        assert_eq!(player.last_search().unwrap().depth, 5);
    }

    #[test]
    fn opponent_move_is_tracked_before_answering() {
        // arrange
        let mut player = Player::builder(Side::White).with_fixed_depth(2).build();

        // act
        let mv = player.decide_move(Some(Move::new(2, 3)), 10_000).unwrap().unwrap();

        // assert
        let mut expected = OthelloBoard::default();
        expected.do_move(Some(Move::new(2, 3)), Side::Black);
        assert!(expected.check_move(&mv, Side::White));
        expected.do_move(Some(mv), Side::White);
        assert_eq!(player.board(), &expected);
    }

    #[test]
    fn illegal_opponent_move_is_rejected() {
        // arrange
        let mut player = Player::new(Side::White);

        // act
        let result = player.decide_move(Some(Move::new(0, 0)), 10_000);

        // assert
        assert_eq!(
            result,
            Err(PlayerError::IllegalOpponentMove {
                mv: Move::new(0, 0),
                side: Side::Black
            })
        );
        assert_eq!(player.board(), &OthelloBoard::default());
    }

    #[test]
    fn no_legal_move_means_pass() {
        // arrange: white is boxed in while black still has c1.
        let board: OthelloBoard = "
            b w . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
        "
        .parse()
        .unwrap();
        let mut player = Player::builder(Side::White).with_board(board.clone()).build();

        // act
        let mv = player.decide_move(None, 5_000).unwrap();

        // assert
        assert_eq!(mv, None);
        assert_eq!(player.board(), &board);
        assert!(player.last_search().is_none());
    }

    #[test]
    fn single_legal_move_is_returned_without_search() {
        let board: OthelloBoard = "
            b w . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
        "
        .parse()
        .unwrap();
        let mut player = Player::builder(Side::Black).with_board(board).build();

        let mv = player.decide_move(None, 5_000).unwrap();

        assert_eq!(mv, Some(Move::new(2, 0)));
        assert_eq!(player.last_search().unwrap().depth, 0);
        assert_eq!(player.board().count_white(), 0);
    }

    #[test]
    fn depth_never_exceeds_the_empty_cells() {
        // arrange: a seeded endgame with a handful of empty cells and a real choice to make.
        let (board, side) = (0..500u64)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                random_playout(OthelloBoard::default(), Side::Black, 56, &mut rng)
            })
            .find(|(board, side)| board.total_discs() >= 58 && board.legal_moves(*side).len() >= 2)
            .unwrap();
        let empty = 64 - board.total_discs();
        let mut player = Player::builder(side)
            .with_board(board)
            .with_unbounded_depth(10)
            .build();

        // act
        let mv = player.decide_move(None, -1).unwrap();

        // assert
        assert!(mv.is_some());
        assert_eq!(player.last_search().unwrap().depth, empty);
    }

    #[test]
    fn fixed_depth_disc_count_is_a_plain_two_ply_minimax() {
        let mut rng = StdRng::seed_from_u64(5);
        for plies in [0, 8, 16, 24] {
            // arrange
            let start = OthelloBoard::default().with_heuristic(Heuristic::DiscCount);
            let (board, side) = random_playout(start, Side::Black, plies, &mut rng);
            if board.legal_moves(side).len() < 2 {
                continue;
            }
            let mut player = Player::builder(side)
                .with_board(board.clone())
                .with_fixed_depth(2)
                .build();

            // act
            let mv = player.decide_move(None, 1_000).unwrap().unwrap();

            // assert: the first move whose worst reply leaves the best disc difference.
            let worst_reply = |mv: &Move| {
                let mut after = board.clone();
                after.do_move(Some(*mv), side);
                let replies = after.legal_moves(side.other());
                if replies.is_empty() {
                    return after.score(side);
                }
                replies
                    .iter()
                    .map(|reply| {
                        let mut next = after.clone();
                        next.do_move(Some(*reply), side.other());
                        next.score(side)
                    })
                    .min()
                    .unwrap()
            };
            let moves = board.legal_moves(side);
            let best = moves.iter().map(worst_reply).max().unwrap();
            let expected = moves.iter().find(|mv| worst_reply(*mv) == best).copied();
            assert_eq!(Some(mv), expected, "after {plies} plies\n{board}");
        }
    }

    #[test]
    fn pruning_switch_does_not_change_the_choice() {
        let mut rng = StdRng::seed_from_u64(99);
        for plies in [4, 12, 20] {
            let (board, side) = random_playout(OthelloBoard::default(), Side::Black, plies, &mut rng);
            if !board.has_moves(side) {
                continue;
            }
            let mut pruned = Player::builder(side).with_board(board.clone()).with_fixed_depth(3).build();
            let mut full = Player::builder(side)
                .with_board(board)
                .with_fixed_depth(3)
                .with_alpha_beta_pruning(false)
                .build();

            assert_eq!(pruned.decide_move(None, -1), full.decide_move(None, -1));
        }
    }

    #[test]
    fn default_config_starts_at_depth_four() {
        let player = Player::new(Side::Black);
        assert_eq!(player.config(), &SearchConfig::default());
        assert_eq!(player.config().start_depth, DEFAULT_START_DEPTH);
        assert_eq!(player.side(), Side::Black);
    }

    #[test]
    fn full_games_against_a_random_opponent() {
        play_against_random(Side::Black, 1, 4_000);
        play_against_random(Side::White, 2, 4_000);
    }
}
