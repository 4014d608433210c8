use crate::board::BOARD_CELLS;
use crate::player::SearchConfig;
use std::time::Duration;

/// Estimates how many more moves we will make: half the empty cells, rounded up, at least 1.
pub fn estimate_moves_left(total_discs: u32) -> u32 {
    let empty = (BOARD_CELLS as u32).saturating_sub(total_discs);
    empty.div_ceil(2).max(1)
}

/// The wall-clock allowance of a single turn, drawn down as deepening iterations complete.
///
/// The search cannot be interrupted, so the budget only decides whether another, deeper
/// iteration may start: it must be projected to finish inside what is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBudget {
    remaining: Option<Duration>,
    branching_multiplier: u32,
}

impl TimeBudget {
    /// A budget that never runs out. A multiplier below 1 is raised to 1.
    pub fn unbounded(branching_multiplier: u32) -> Self {
        Self {
            remaining: None,
            branching_multiplier: branching_multiplier.max(1),
        }
    }

    /// Splits the game clock `ms_left` evenly over `moves_left` turns. A negative clock means no
    /// limit; an exhausted one leaves room for the first iteration only. Inside the mid-game
    /// window the share is boosted, but a turn never gets more than the whole clock. Multiplier
    /// and boost are taken as at least 1.
    pub fn for_turn(ms_left: i64, moves_left: u32, config: &SearchConfig) -> Self {
        if ms_left < 0 {
            return Self::unbounded(config.branching_multiplier);
        }

        let moves_left = if moves_left == 0 {
            log::warn!("moves left estimated at 0, treating as 1");
            1
        } else {
            moves_left
        };

        let clock = ms_left as u64;
        let mut allowance = clock / u64::from(moves_left);
        if config.midgame_window.contains(&moves_left) {
            allowance = allowance.saturating_mul(u64::from(config.midgame_boost.max(1)));
        }

        Self {
            remaining: Some(Duration::from_millis(allowance.min(clock))),
            branching_multiplier: config.branching_multiplier.max(1),
        }
    }

    /// What is left of the allowance; `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining
    }

    pub fn is_bounded(&self) -> bool {
        self.remaining.is_some()
    }

    /// Deducts time spent.
    pub fn charge(&mut self, elapsed: Duration) {
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(elapsed);
        }
    }

    /// Whether one more iteration, projected at `last_iteration` times the branching multiplier,
    /// fits in the remaining allowance.
    pub fn allows_next(&self, last_iteration: Duration) -> bool {
        match self.remaining {
            None => true,
            Some(remaining) => last_iteration.saturating_mul(self.branching_multiplier) < remaining,
        }
    }
}
