use rand::{seq::SliceRandom, Rng};
use std::fmt;
use std::str::FromStr;

use crate::error::PuzzleError;

/// A tile value. Tiles are numbered `1..side*side`, the blank is [`BLANK`].
pub type Tile = u8;

pub const BLANK: Tile = 0;

pub const MIN_SIDE: usize = 2;
// largest side whose tiles fit in a u8
pub const MAX_SIDE: usize = 16;

/// Direction the blank travels in. Moving the blank `Up` slides the tile
/// above it down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Successors are always generated in this order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// Cell the blank at `blank_index` moves to, or `None` if that would
    /// leave a grid of side `side`.
    pub fn target(self, blank_index: usize, side: usize) -> Option<usize> {
        let (row, col) = (blank_index / side, blank_index % side);
        match self {
            Move::Up if row > 0 => Some(blank_index - side),
            Move::Down if row + 1 < side => Some(blank_index + side),
            Move::Left if col > 0 => Some(blank_index - 1),
            Move::Right if col + 1 < side => Some(blank_index + 1),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Down => "Down",
            Move::Left => "Left",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// A validated square arrangement: every value of `1..side*side` exactly
/// once plus a single blank, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    side: usize,
    tiles: Vec<Tile>,
    blank: usize,
}

impl Board {
    pub fn new(tiles: Vec<Tile>) -> Result<Self, PuzzleError> {
        let cells = tiles.len();
        let side = integer_sqrt(cells);
        if side * side != cells {
            return Err(PuzzleError::NotSquare { len: cells });
        }
        check_side(side)?;

        let mut seen = vec![false; cells];
        let mut blank = 0;
        for (index, &value) in tiles.iter().enumerate() {
            let slot = value as usize;
            if slot >= cells {
                return Err(PuzzleError::TileOutOfRange { value, index, cells });
            }
            if seen[slot] {
                return Err(PuzzleError::DuplicateTile { value });
            }
            seen[slot] = true;
            if value == BLANK {
                blank = index;
            }
        }

        // `cells` distinct values below `cells` means the blank is present.
        Ok(Self { side, tiles, blank })
    }

    pub fn solved(side: usize) -> Result<Self, PuzzleError> {
        check_side(side)?;
        let cells = side * side;
        let mut tiles: Vec<Tile> = (1..cells).map(|v| v as Tile).collect();
        tiles.push(BLANK);

        Ok(Self {
            side,
            tiles,
            blank: cells - 1,
        })
    }

    /// A uniformly shuffled board, redrawn until it is solvable.
    pub fn shuffled<R: Rng + ?Sized>(side: usize, rng: &mut R) -> Result<Self, PuzzleError> {
        let mut board = Self::solved(side)?;

        loop {
            board.tiles.shuffle(rng);
            board.blank = board
                .tiles
                .iter()
                .position(|&t| t == BLANK)
                .unwrap_or_default();

            if board.is_solvable() {
                return Ok(board);
            }
        }
    }

    /// Walks the blank `steps` random moves away from the goal, never undoing
    /// the previous move. The optimal solution is at most `steps` long.
    pub fn scrambled<R: Rng + ?Sized>(
        side: usize,
        steps: usize,
        rng: &mut R,
    ) -> Result<Self, PuzzleError> {
        let mut board = Self::solved(side)?;
        let mut last: Option<Move> = None;

        for _ in 0..steps {
            let options: Vec<Move> = Move::ALL
                .into_iter()
                .filter(|mv| last.map_or(true, |l| *mv != l.opposite()))
                .filter(|mv| mv.target(board.blank, side).is_some())
                .collect();

            if let Some(&mv) = options.choose(rng) {
                board.apply_move(mv);
                last = Some(mv);
            }
        }

        Ok(board)
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn blank_index(&self) -> usize {
        self.blank
    }

    pub fn into_tiles(self) -> Vec<Tile> {
        self.tiles
    }

    /// Moves the blank one cell. Returns `false` and leaves the board
    /// untouched if the move would leave the grid.
    pub fn apply_move(&mut self, movement: Move) -> bool {
        match movement.target(self.blank, self.side) {
            Some(target) => {
                self.tiles.swap(self.blank, target);
                self.blank = target;
                true
            }
            None => false,
        }
    }

    pub fn is_solved(&self) -> bool {
        is_goal(&self.tiles)
    }

    /// Permutation parity test. The search itself never calls this: an
    /// unsolvable board is only detected by exhausting its reachable states.
    pub fn is_solvable(&self) -> bool {
        let inversions = count_inversions(&self.tiles);
        let blank_row = self.blank / self.side;

        if self.side % 2 == 1 {
            // Odd width: solvable iff the inversion count is even
            inversions % 2 == 0
        } else {
            // Even width: solvable iff inversions plus the blank's row is odd
            (inversions + blank_row) % 2 == 1
        }
    }
}

impl FromStr for Board {
    type Err = PuzzleError;

    /// Parses values separated by whitespace or commas; `_` and `0` denote
    /// the blank.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tiles = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(|token| match token {
                "_" => Ok(BLANK),
                _ => token
                    .parse::<Tile>()
                    .map_err(|_| PuzzleError::InvalidToken(token.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(tiles)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = cell_width(self.tiles.len());
        for row in self.tiles.chunks(self.side) {
            for &val in row {
                write!(f, "{} ", cell_text(val, width))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub(crate) fn is_goal(tiles: &[Tile]) -> bool {
    let last = tiles.len() - 1;
    tiles[last] == BLANK
        && tiles[..last]
            .iter()
            .enumerate()
            .all(|(i, &v)| v as usize == i + 1)
}

pub fn cell_width(cells: usize) -> usize {
    (cells.saturating_sub(1)).to_string().len()
}

// right-aligned to `width`, the blank as padding
pub fn cell_text(value: Tile, width: usize) -> String {
    if value == BLANK {
        format!("{:>width$}", "")
    } else {
        format!("{:>width$}", value)
    }
}

pub(crate) fn integer_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

fn check_side(side: usize) -> Result<(), PuzzleError> {
    if (MIN_SIDE..=MAX_SIDE).contains(&side) {
        Ok(())
    } else {
        Err(PuzzleError::UnsupportedSide { side })
    }
}

fn count_inversions(flattened: &[Tile]) -> usize {
    flattened
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != BLANK)
        .map(|(i, &val)| {
            flattened[i + 1..]
                .iter()
                .filter(|&&next| next != BLANK && next < val)
                .count()
        })
        .sum()
}
