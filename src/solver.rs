// Expanded states live in the arena until the search returns, so every
// `parent` id stays valid. The winning chain is cloned out at the end.

use std::collections::HashMap;
use std::fmt;

use log::{debug, trace, warn};

use crate::error::PuzzleError;
use crate::heuristic::Heuristic;
use crate::puzzle::{Board, Move, Tile};
use crate::queue::MinPriorityQueue;
use crate::state::{State, StateId, StateKey};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub expanded: usize,
    pub generated: usize,
    pub open_replacements: usize,
    /// Closed entries overwritten by a cheaper copy. Stays at zero for
    /// consistent heuristics.
    pub closed_improvements: usize,
    pub peak_open: usize,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expanded: {}, generated: {}, open replacements: {}, closed improvements: {}, peak open: {}",
            self.expanded,
            self.generated,
            self.open_replacements,
            self.closed_improvements,
            self.peak_open
        )
    }
}

/// States from the initial board to the goal. Their `parent` ids point into
/// the finished search's arena and mean nothing afterwards.
#[derive(Debug, Clone)]
pub struct Solution {
    path: Vec<State>,
    stats: SearchStats,
}

impl Solution {
    pub fn path(&self) -> &[State] {
        &self.path
    }

    pub fn into_path(self) -> Vec<State> {
        self.path
    }

    pub fn initial(&self) -> &State {
        &self.path[0]
    }

    pub fn goal(&self) -> &State {
        &self.path[self.path.len() - 1]
    }

    pub fn cost(&self) -> u32 {
        self.goal().g()
    }

    /// Directions the blank travels, one per step of the path.
    pub fn moves(&self) -> Vec<Move> {
        self.path.iter().filter_map(State::last_move).collect()
    }

    pub fn heuristic(&self) -> Heuristic {
        self.goal().heuristic()
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}

/// Shortest solution for `board`, or `None` once every reachable
/// arrangement is expanded (wrong permutation parity).
pub fn solve(board: &Board, heuristic: Heuristic) -> Option<Solution> {
    let root = State::root(board.tiles(), heuristic);
    Search::new(board.tiles().len()).run(root)
}

pub fn solve_tiles(tiles: Vec<Tile>, heuristic: Heuristic) -> Result<Option<Solution>, PuzzleError> {
    let board = Board::new(tiles)?;
    Ok(solve(&board, heuristic))
}

struct Search {
    open: MinPriorityQueue<State>,
    /// Keys in `open`, with the `g` of the queued copy.
    open_costs: HashMap<StateKey, u32>,
    closed: HashMap<StateKey, StateId>,
    arena: Vec<State>,
    stats: SearchStats,
}

impl Search {
    fn new(capacity: usize) -> Self {
        Self {
            open: MinPriorityQueue::with_capacity(capacity),
            open_costs: HashMap::new(),
            closed: HashMap::new(),
            arena: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    fn run(mut self, root: State) -> Option<Solution> {
        debug!("A* ({}) from {}", root.heuristic(), root);

        self.open_costs.insert(root.key().clone(), root.g());
        self.open.enqueue(root);
        self.stats.peak_open = self.open.len();

        while let Some(current) = self.open.dequeue_min() {
            self.open_costs.remove(current.key());

            if current.is_final() {
                debug!("Reached goal at g = {}; {}", current.g(), self.stats);
                return Some(self.finish(current));
            }

            trace!("Expanding {}", current);
            let id = self.alloc(current);
            let successors = self.arena[id.index()].generate_successors(id);
            self.stats.generated += successors.len();

            for next in successors {
                self.admit(next);
            }

            let key = self.arena[id.index()].key().clone();
            self.closed.insert(key, id);

            self.stats.expanded += 1;
            self.stats.peak_open = self.stats.peak_open.max(self.open.len());
        }

        debug!("Frontier exhausted without reaching the goal; {}", self.stats);
        None
    }

    fn admit(&mut self, next: State) {
        if let Some(&open_g) = self.open_costs.get(next.key()) {
            // Only a strictly shorter path displaces the queued copy, so
            // the linear scan runs only when a replacement will happen.
            if open_g > next.g() {
                if let Some(index) = self.open.find(&next) {
                    if let Some(stale) = self.open.remove(index) {
                        debug_assert!(stale.is_costlier_than(&next));
                    }
                }
                self.open_costs.insert(next.key().clone(), next.g());
                self.open.enqueue(next);
                self.stats.open_replacements += 1;
            }
            return;
        }

        if let Some(&closed_id) = self.closed.get(next.key()) {
            if self.arena[closed_id.index()].is_costlier_than(&next) {
                // The cheaper copy is recorded but not reopened. With unit
                // move costs and a consistent heuristic this is unreachable.
                warn!(
                    "Cheaper path to closed state {} (g {} < {}); not re-expanding",
                    next.key(),
                    next.g(),
                    self.arena[closed_id.index()].g()
                );
                let key = next.key().clone();
                let id = self.alloc(next);
                self.closed.insert(key, id);
                self.stats.closed_improvements += 1;
            }
            return;
        }

        self.open_costs.insert(next.key().clone(), next.g());
        self.open.enqueue(next);
    }

    fn alloc(&mut self, state: State) -> StateId {
        self.arena.push(state);
        StateId(self.arena.len() - 1)
    }

    // root first
    fn finish(self, goal: State) -> Solution {
        let mut cursor = goal.parent();
        let mut path = vec![goal];

        while let Some(id) = cursor {
            let state = self.arena[id.index()].clone();
            cursor = state.parent();
            path.push(state);
        }
        path.reverse();

        Solution {
            path,
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::BLANK;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SAMPLE: [Tile; 9] = [1, 4, 3, 2, 5, 8, 7, BLANK, 6];

    fn board(tiles: &[Tile]) -> Board {
        Board::new(tiles.to_vec()).unwrap()
    }

    fn assert_single_moves(solution: &Solution) {
        for pair in solution.path().windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let movement = to.last_move().unwrap();
            assert_eq!(
                movement.target(from.blank_index(), from.side()),
                Some(to.blank_index())
            );

            let mut expected = from.tiles().to_vec();
            expected.swap(from.blank_index(), to.blank_index());
            assert_eq!(to.tiles(), &expected[..]);
            assert_eq!(to.g(), from.g() + 1);
        }
    }

    #[test]
    fn solved_board_is_a_single_state() {
        for heuristic in Heuristic::ALL {
            let solution = solve(&Board::solved(3).unwrap(), heuristic).unwrap();
            assert_eq!(solution.path().len(), 1);

            let only = solution.goal();
            assert_eq!((only.g(), only.h(), only.f()), (0, 0, 0));
            assert!(solution.moves().is_empty());
            assert_eq!(solution.stats().expanded, 0);
            assert_eq!(solution.stats().peak_open, 1);
        }
    }

    #[test]
    fn one_move_from_solved() {
        // blank swapped with its Down-neighbour from the goal position
        let start = board(&[1, 2, 3, 4, 5, BLANK, 7, 8, 6]);
        for heuristic in Heuristic::ALL {
            let solution = solve(&start, heuristic).unwrap();
            assert_eq!(solution.path().len(), 2);
            assert_eq!(solution.path()[1].g(), 1);
            assert_eq!(solution.moves(), vec![Move::Down]);
            assert!(solution.goal().is_final());
        }
    }

    #[test]
    fn sample_board_solves_identically_under_both_heuristics() {
        let start = board(&SAMPLE);
        let manhattan = solve(&start, Heuristic::ManhattanDistance).unwrap();
        let misplaced = solve(&start, Heuristic::MisplacedTiles).unwrap();

        for solution in [&manhattan, &misplaced] {
            assert_eq!(solution.initial().tiles(), &SAMPLE);
            assert!(solution.goal().is_final());
            assert_eq!(solution.path().len() as u32 - 1, solution.cost());
            assert_eq!(solution.moves().len() as u32, solution.cost());
            assert_single_moves(solution);
        }
        assert_eq!(manhattan.cost(), misplaced.cost());
        assert_eq!(manhattan.heuristic(), Heuristic::ManhattanDistance);
        assert_eq!(misplaced.heuristic(), Heuristic::MisplacedTiles);
    }

    #[test]
    fn replaying_moves_reaches_the_goal() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..10 {
            let start = Board::scrambled(3, 18, &mut rng).unwrap();
            let solution = solve(&start, Heuristic::ManhattanDistance).unwrap();
            assert!(solution.cost() <= 18);

            let mut replay = start.clone();
            for movement in solution.moves() {
                assert!(replay.apply_move(movement));
            }
            assert!(replay.is_solved());
        }
    }

    #[test]
    fn two_by_two_unsolvable_exhausts() {
        // 12 reachable arrangements, none of them the goal
        let start = board(&[2, 1, 3, BLANK]);
        for heuristic in Heuristic::ALL {
            assert!(solve(&start, heuristic).is_none());
        }
    }

    #[test]
    fn two_by_two_solvable() {
        let solution = solve(&board(&[BLANK, 1, 3, 2]), Heuristic::ManhattanDistance).unwrap();
        assert_eq!(solution.cost(), 2);
        assert_eq!(solution.moves(), vec![Move::Right, Move::Down]);
    }

    #[test]
    fn consistent_heuristics_never_improve_closed_states() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut replacements = 0;
        for _ in 0..10 {
            let start = Board::shuffled(3, &mut rng).unwrap();
            for heuristic in Heuristic::ALL {
                let solution = solve(&start, heuristic).unwrap();
                assert_eq!(solution.stats().closed_improvements, 0);
                replacements += solution.stats().open_replacements;
            }
        }
        // queued copies do get displaced on real boards
        assert!(replacements > 0);
    }

    // SAMPLE, the same board reached in two moves, and the move in between
    fn round_trip() -> (State, State) {
        let start = State::root(SAMPLE, Heuristic::ManhattanDistance);
        let child = start
            .generate_successors(StateId(0))
            .into_iter()
            .find(|s| s.last_move() == Some(Move::Up))
            .unwrap();
        let back = child
            .generate_successors(StateId(1))
            .into_iter()
            .find(|s| s.last_move() == Some(Move::Down))
            .unwrap();
        assert_eq!(back, start);
        assert_eq!(back.g(), 2);
        (start, back)
    }

    #[test]
    fn cheaper_path_replaces_queued_copy() {
        let (start, back) = round_trip();
        let mut search = Search::new(SAMPLE.len());

        search.admit(back);
        assert_eq!(search.open.len(), 1);
        assert_eq!(search.open_costs[start.key()], 2);

        search.admit(start.clone());
        assert_eq!(search.stats.open_replacements, 1);
        assert_eq!(search.open.len(), 1);
        assert_eq!(search.open.peek().unwrap().g(), 0);
        assert_eq!(search.open_costs[start.key()], 0);

        // a costlier copy leaves the queue alone
        let (_, back) = round_trip();
        search.admit(back);
        assert_eq!(search.stats.open_replacements, 1);
        assert_eq!(search.open.len(), 1);
        assert_eq!(search.open.peek().unwrap().g(), 0);
    }

    #[test]
    fn cheaper_path_to_closed_state_is_recorded_not_reopened() {
        let (start, back) = round_trip();
        let mut search = Search::new(SAMPLE.len());

        let key = back.key().clone();
        let stale = search.alloc(back);
        search.closed.insert(key, stale);

        search.admit(start.clone());
        assert_eq!(search.stats.closed_improvements, 1);
        assert!(search.open.is_empty());
        assert!(search.open_costs.is_empty());

        let closed = search.closed[start.key()];
        assert_ne!(closed, stale);
        assert_eq!(search.arena[closed.index()].g(), 0);
        assert_eq!(search.arena.len(), 2);
    }

    #[test]
    fn solve_tiles_rejects_bad_input() {
        assert_eq!(
            solve_tiles(vec![1, 2, 3], Heuristic::ManhattanDistance).unwrap_err(),
            PuzzleError::NotSquare { len: 3 }
        );
        let solution = solve_tiles(SAMPLE.to_vec(), Heuristic::MisplacedTiles)
            .unwrap()
            .unwrap();
        assert!(solution.goal().is_final());
    }
}
