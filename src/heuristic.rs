use std::fmt;
use std::str::FromStr;

use crate::error::PuzzleError;
use crate::puzzle::{integer_sqrt, Tile, BLANK};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heuristic {
    ManhattanDistance,
    MisplacedTiles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub cost: u32,
    pub blank_index: usize,
}

impl Heuristic {
    pub const ALL: [Heuristic; 2] = [Heuristic::ManhattanDistance, Heuristic::MisplacedTiles];

    /// Scores `tiles` and locates the blank in the same pass. The blank
    /// itself is never counted, so one move changes the cost by at most one.
    pub fn evaluate(self, tiles: &[Tile]) -> Evaluation {
        let side = integer_sqrt(tiles.len());
        let mut cost = 0;
        let mut blank_index = 0;

        for (index, &value) in tiles.iter().enumerate() {
            if value == BLANK {
                blank_index = index;
                continue;
            }

            let home = value as usize - 1;
            if home == index {
                continue;
            }

            cost += match self {
                Heuristic::MisplacedTiles => 1,
                Heuristic::ManhattanDistance => {
                    let (home_row, home_col) = (home / side, home % side);
                    let (row, col) = (index / side, index % side);
                    (home_row.abs_diff(row) + home_col.abs_diff(col)) as u32
                }
            };
        }

        Evaluation { cost, blank_index }
    }

    pub fn cost(self, tiles: &[Tile]) -> u32 {
        self.evaluate(tiles).cost
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Heuristic::ManhattanDistance => "manhattan",
            Heuristic::MisplacedTiles => "misplaced",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Heuristic {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manhattan" | "manhattan-distance" => Ok(Heuristic::ManhattanDistance),
            "misplaced" | "misplaced-tiles" => Ok(Heuristic::MisplacedTiles),
            _ => Err(PuzzleError::UnknownHeuristic(s.to_string())),
        }
    }
}
