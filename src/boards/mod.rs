//! Contains pre-made implementations of the `Board` trait.

/// A `Board` implementation for Othello on the standard 8x8 grid.
pub mod othello;
