//! An automated Othello/Reversi player.
//!
//! Each turn the player records the opponent's move on its own board, splits what is left of
//! the game clock over the moves it still expects to make, and runs an iterative-deepening
//! alpha-beta search inside that allowance. The move of the deepest completed iteration is
//! played.
//!
//! # Example
//!
//! ```rust
//! use othello_player::board::{Board, Side};
//! use othello_player::player::Player;
//!
//! // Black moves first; the opponent has not moved yet.
//! let mut player = Player::builder(Side::Black)
//!     .with_start_depth(2)
//!     .build();
//!
//! // Six seconds left for the whole game.
//! let mv = player.decide_move(None, 6_000).unwrap();
//!
//! let mv = mv.expect("black always has an opening move");
//! println!("The engine plays {mv}");
//! assert_eq!(player.board().count_black(), 4);
//! ```

/// The `Board` trait the search runs against, plus `Move` and `Side`.
pub mod board;
/// Ready-made implementations of the `Board` trait.
pub mod boards;
/// Error types.
pub mod error;
/// The `Player` entry point: per-turn time budgeting and iterative deepening.
pub mod player;
/// Random move selection, for opponents and for reaching test positions.
pub mod random;
/// Fixed-depth alpha-beta search.
pub mod search;
/// Per-turn time allowance.
pub mod time_budget;
