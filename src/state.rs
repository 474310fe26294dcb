use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::heuristic::Heuristic;
use crate::puzzle::{integer_sqrt, is_goal, Move, Tile};
use crate::queue::Prioritized;

/// The tiles themselves; lookups can borrow it as `&[Tile]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey(Box<[Tile]>);

impl StateKey {
    pub fn tiles(&self) -> &[Tile] {
        &self.0
    }
}

impl Borrow<[Tile]> for StateKey {
    fn borrow(&self) -> &[Tile] {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for tile in self.0.iter() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{}", tile)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

// Equality and hashing go through the key only; the queue orders by `f`.
#[derive(Debug, Clone)]
pub struct State {
    key: StateKey,
    side: usize,
    blank_index: usize,
    g: u32,
    h: u32,
    f: u32,
    heuristic: Heuristic,
    parent: Option<StateId>,
    last_move: Option<Move>,
}

impl State {
    pub fn root(tiles: impl Into<Box<[Tile]>>, heuristic: Heuristic) -> Self {
        Self::build(tiles.into(), heuristic, 0, None, None)
    }

    pub fn derived(
        parent: &State,
        parent_id: StateId,
        tiles: Box<[Tile]>,
        movement: Move,
    ) -> Self {
        Self::build(
            tiles,
            parent.heuristic,
            parent.g + 1,
            Some(parent_id),
            Some(movement),
        )
    }

    fn build(
        tiles: Box<[Tile]>,
        heuristic: Heuristic,
        g: u32,
        parent: Option<StateId>,
        last_move: Option<Move>,
    ) -> Self {
        let side = integer_sqrt(tiles.len());
        let eval = heuristic.evaluate(&tiles);

        Self {
            key: StateKey(tiles),
            side,
            blank_index: eval.blank_index,
            g,
            h: eval.cost,
            f: g + eval.cost,
            heuristic,
            parent,
            last_move,
        }
    }

    pub fn key(&self) -> &StateKey {
        &self.key
    }

    pub fn tiles(&self) -> &[Tile] {
        self.key.tiles()
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn blank_index(&self) -> usize {
        self.blank_index
    }

    pub fn g(&self) -> u32 {
        self.g
    }

    pub fn h(&self) -> u32 {
        self.h
    }

    pub fn f(&self) -> u32 {
        self.f
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    // both heuristics are zero only on the goal
    pub fn is_final(&self) -> bool {
        debug_assert_eq!(self.h == 0, is_goal(self.tiles()));
        self.h == 0
    }

    pub fn is_costlier_than(&self, other: &State) -> bool {
        self.g > other.g
    }

    /// Every arrangement one blank move away, in `Move::ALL` order.
    /// `this` is the arena id the successors will point back to.
    pub fn generate_successors(&self, this: StateId) -> Vec<State> {
        Move::ALL
            .into_iter()
            .filter_map(|movement| {
                let target = movement.target(self.blank_index, self.side)?;
                let mut tiles: Box<[Tile]> = self.tiles().into();
                tiles.swap(self.blank_index, target);
                Some(State::derived(self, this, tiles, movement))
            })
            .collect()
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Prioritized for State {
    type Priority = u32;

    fn priority(&self) -> u32 {
        self.f
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "State: {}, g: {}, h: {}, f: {}",
            self.key, self.g, self.h, self.f
        )
    }
}
