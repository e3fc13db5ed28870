use fnv::FnvHashSet;

use crate::data::{Position, RelativeState, State};
use crate::heuristics::Heuristic;

type PositionPair = (Position, Position);

/// The novelty heuristic for best-first width search (Lipovetzky & Geffner,
/// "Best-first width search: Exploration and exploitation in classical
/// planning", AAAI 2017).
///
/// The estimate is history dependent: every call records the positions and
/// position pairs of the given state, and the value says whether the state
/// introduced anything unseen. Lower is more novel.
#[derive(Debug)]
pub struct NoveltyHeuristic {
    state_size: usize,
    visited_positions: Vec<FnvHashSet<Position>>,
    // Only the upper triangle (i < j) is used. Pairs are stored with the
    // smaller object index first, which halves the memory compared to
    // storing both orders.
    visited_position_pairs: Vec<Vec<FnvHashSet<PositionPair>>>,
}

impl NoveltyHeuristic {
    pub fn new(state_size: usize) -> Self {
        NoveltyHeuristic {
            state_size,
            visited_positions: vec![FnvHashSet::default(); state_size],
            visited_position_pairs: vec![vec![FnvHashSet::default(); state_size]; state_size],
        }
    }

    /// The legacy variant over plain states. It scans all object indices
    /// instead of just the moved ones and returns:
    ///
    /// - 0 if any object is in a position never seen before,
    /// - 1 if any pair of objects is in a combination never seen before,
    /// - 2 otherwise.
    ///
    /// The values sit one below the `RelativeState` variant on purpose; both
    /// scales are kept for compatibility.
    pub fn estimate_state(&mut self, state: &State) -> f32 {
        let mut novelty = 2.0;

        for i in 0..self.state_size {
            for j in (i + 1)..self.state_size {
                if self.visited_position_pairs[i][j].insert((state[i], state[j])) {
                    novelty = 1.0;
                }
            }
        }

        for i in 0..self.state_size {
            if self.visited_positions[i].insert(state[i]) {
                novelty = 0.0;
            }
        }

        novelty
    }
}

impl Heuristic for NoveltyHeuristic {
    /// Returns 1 if any moved object is in a never-seen position, 2 if any
    /// pair involving a moved object is in a never-seen combination, and 3
    /// otherwise. Only moved objects are scanned; unmoved objects cannot
    /// introduce new positions or pairs among themselves.
    fn estimate(&mut self, relative_state: &RelativeState) -> f32 {
        let mut novelty = 3.0;

        for &i in &relative_state.moved_object_indices {
            let p_i = relative_state.state[i];

            if self.visited_positions[i].insert(p_i) {
                novelty = 1.0;
            }

            for j in 0..self.state_size {
                if j == i {
                    continue;
                }
                let p_j = relative_state.state[j];
                let (a, b, pair) = if j < i {
                    (j, i, (p_j, p_i))
                } else {
                    (i, j, (p_i, p_j))
                };
                if self.visited_position_pairs[a][b].insert(pair) && novelty > 2.0 {
                    novelty = 2.0;
                }
            }
        }

        novelty
    }
}
