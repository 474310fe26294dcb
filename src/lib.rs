//! A* solver for N×N sliding-tile puzzles.
//!
//! ```
//! use slider_astar::{solve, Board, Heuristic};
//!
//! let board: Board = "1 2 3 4 5 _ 7 8 6".parse().unwrap();
//! let solution = solve(&board, Heuristic::ManhattanDistance).unwrap();
//! assert_eq!(solution.cost(), 1);
//! ```

pub mod error;
pub mod heuristic;
pub mod puzzle;
pub mod queue;
pub mod solver;
pub mod state;

pub use crate::error::PuzzleError;
pub use crate::heuristic::{Evaluation, Heuristic};
pub use crate::puzzle::{Board, Move, Tile, BLANK};
pub use crate::queue::{MinPriorityQueue, Prioritized};
pub use crate::solver::{solve, solve_tiles, SearchStats, Solution};
pub use crate::state::{State, StateId, StateKey};
