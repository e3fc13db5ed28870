use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::{Action, ACTIONS};

/// Cycles through pre-shuffled orderings of all four actions.
///
/// Expanding actions in a fixed order biases the search systematically, so
/// the driver asks this iterator for a fresh ordering at every node. All
/// orderings are generated up front from a fixed-seed generator; the seed is
/// part of the design so that searches are reproducible.
#[derive(Clone, Debug)]
pub struct RandomActionIterator {
    action_groups: Vec<[Action; 4]>,
    next_action_group: usize,
}

impl RandomActionIterator {
    pub fn new(num_action_groups: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(42);

        let mut action_groups = Vec::with_capacity(num_action_groups);
        for _ in 0..num_action_groups {
            let mut action_group = ACTIONS;
            action_group.shuffle(&mut rng);
            action_groups.push(action_group);
        }

        RandomActionIterator {
            action_groups,
            next_action_group: 0,
        }
    }

    /// All four actions in one of the random orders.
    pub fn next(&mut self) -> &[Action; 4] {
        self.next_action_group = (self.next_action_group + 1) % self.action_groups.len();
        &self.action_groups[self.next_action_group]
    }
}

impl Default for RandomActionIterator {
    fn default() -> Self {
        RandomActionIterator::new(1000)
    }
}
