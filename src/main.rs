use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use slider_astar::puzzle::{cell_text, cell_width};
use slider_astar::{solve, Board, Heuristic, Tile, BLANK};

/// Board solved when neither `--tiles` nor `--shuffle` is given.
const SAMPLE_BOARD: &str = "1 4 3 2 5 8 7 _ 6";

#[derive(Parser, Debug)]
#[command(author, version, about = "Solve sliding-tile puzzles with A*", long_about = None)]
struct Args {
    /// Board as row-major values separated by spaces or commas, `_` or `0` for the blank
    #[arg(short, long, conflicts_with = "shuffle")]
    tiles: Option<Board>,

    /// Solve a random solvable board of this side length instead
    #[arg(short, long, value_name = "SIDE")]
    shuffle: Option<usize>,

    /// Seed for `--shuffle`
    #[arg(long, requires = "shuffle")]
    seed: Option<u64>,

    /// Heuristic to run (`manhattan` or `misplaced`); repeatable, defaults to both
    #[arg(short = 'H', long = "heuristic", value_name = "NAME")]
    heuristics: Vec<Heuristic>,

    /// Log search progress at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let board = initial_board(&args)?;
    let styled = std::io::stdout().is_tty();

    println!("Initial board:\n{}", render(board.tiles(), board.side(), styled));
    if !board.is_solvable() {
        warn!("Board has odd parity; the search will exhaust every reachable state");
    }

    let heuristics = if args.heuristics.is_empty() {
        Heuristic::ALL.to_vec()
    } else {
        args.heuristics.clone()
    };

    for heuristic in heuristics {
        run(&board, heuristic, styled);
    }

    Ok(())
}

fn initial_board(args: &Args) -> Result<Board> {
    if let Some(side) = args.shuffle {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        return Board::shuffled(side, &mut rng)
            .with_context(|| format!("Failed to generate a {side}x{side} board"));
    }

    match &args.tiles {
        Some(board) => Ok(board.clone()),
        None => SAMPLE_BOARD
            .parse()
            .context("Failed to parse the built-in sample board"),
    }
}

fn run(board: &Board, heuristic: Heuristic, styled: bool) {
    println!("Heuristic method selected: {}", heuristic);

    let start = Instant::now();
    let result = solve(board, heuristic);
    info!("{} search finished in {:.2?}", heuristic, start.elapsed());

    match result {
        Some(solution) => {
            for state in solution.path() {
                println!("{}", state);
            }

            let moves: Vec<String> = solution.moves().iter().map(|m| m.to_string()).collect();
            println!("Found optimal solution with {} moves: {}", solution.cost(), moves.join(" "));
            println!("{}", solution.stats());

            let goal = solution.goal();
            println!("{}", render(goal.tiles(), goal.side(), styled));
        }
        None => println!("No solution found."),
    }

    println!("End");
}

/// Draws the grid, highlighting the blank and tiles already at home.
fn render(tiles: &[Tile], side: usize, styled: bool) -> String {
    let width = cell_width(tiles.len());
    let mut out = String::new();

    for (row_index, row) in tiles.chunks(side).enumerate() {
        for (col, &val) in row.iter().enumerate() {
            let index = row_index * side + col;
            let cell = cell_text(val, width);

            let cell = if !styled {
                cell
            } else if val == BLANK {
                cell.on_dark_grey().to_string()
            } else if val as usize == index + 1 {
                cell.green().to_string()
            } else {
                cell.yellow().to_string()
            };

            out.push_str(&cell);
            out.push(' ');
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_render_matches_board_display() {
        for text in [SAMPLE_BOARD, "1 2 3 4 5 6 7 8 9 10 11 12 13 _ 14 15"] {
            let board: Board = text.parse().unwrap();
            assert_eq!(render(board.tiles(), board.side(), false), board.to_string());
        }
    }
}
