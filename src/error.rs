use thiserror::Error;

use crate::puzzle::{Tile, MAX_SIDE, MIN_SIDE};

/// Errors raised while building a board or parsing solver input.
///
/// A well-formed board that cannot be solved is not an error: the solver
/// reports that case as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("board has {len} cells, which is not a perfect square")]
    NotSquare { len: usize },

    #[error("board side {side} is outside the supported range {}..={}", MIN_SIDE, MAX_SIDE)]
    UnsupportedSide { side: usize },

    #[error("tile {value} at index {index} is out of range for a board of {cells} cells")]
    TileOutOfRange { value: Tile, index: usize, cells: usize },

    #[error("tile {value} appears more than once")]
    DuplicateTile { value: Tile },

    #[error("cannot parse tile '{0}'")]
    InvalidToken(String),

    #[error("unknown heuristic '{0}' (expected 'manhattan' or 'misplaced')")]
    UnknownHeuristic(String),
}
