//! Core Sudoku engine.
//!
//! Three cooperating pieces, wired generation-then-session:
//!
//! - [`Generator`] produces a randomized, fully valid [`Solution`] and
//!   derives a playable [`Grid`] from it by revealing a difficulty-dependent
//!   number of cells.
//! - [`Game`] is the session state machine: it owns the live grid, the
//!   selection cursor, score, hint budget, and snapshot-based undo/redo.
//! - [`leaderboard`] defines the boundary to the external score store; the
//!   engine itself performs no I/O.

mod board;
mod difficulty;
mod game;
mod generator;
pub mod leaderboard;

pub use board::{Cell, Grid, Position, Solution, BOX_SIZE, CELL_COUNT, GRID_SIZE};
pub use difficulty::Difficulty;
pub use game::{Direction, Game, Intent, Snapshot, HINT_LIMIT};
pub use generator::{Generator, REVEAL_OFFSET_MAX};
