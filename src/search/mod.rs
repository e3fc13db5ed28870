pub mod actions;
pub mod queue;

use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use separator::Separatable;

use crate::data::{Plan, RelativeState, State, StateSet, ACTIONS};
use crate::heuristics::Heuristic;
use crate::puzzle::PushWorldPuzzle;
use crate::search::actions::RandomActionIterator;
use crate::search::queue::{Cost, PriorityQueue};

/// A node of the search tree. The action that produced a node is not stored;
/// it is cheaper to recover actions by replay during backtracking than to
/// carry them on every node.
#[derive(Debug)]
pub struct SearchNode {
    /// `None` for the root node.
    pub parent: Option<Rc<SearchNode>>,
    pub state: State,
}

/// Counts reported by `solve` for one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub unique_visited: usize,
    pub frontier_left: usize,
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Unique states visited: {}",
            self.unique_visited.separated_string()
        )?;
        writeln!(
            f,
            "States left in the frontier: {}",
            self.frontier_left.separated_string()
        )
    }
}

/// Walks from `end_node` to the root and recovers the plan by replaying all
/// four actions against each parent state to find the one that reproduces
/// the child state.
///
/// Panics if no action reproduces a child state, which means the search tree
/// is corrupt.
pub fn backtrack_plan(puzzle: &PushWorldPuzzle, end_node: &Rc<SearchNode>) -> Plan {
    let mut plan = Plan::new();
    let mut node = end_node;

    while let Some(parent) = &node.parent {
        let action = ACTIONS
            .iter()
            .copied()
            .find(|&action| puzzle.next_state(&parent.state, action).state == node.state)
            .unwrap_or_else(|| {
                panic!("no action transitions a parent state into the state of its child")
            });
        plan.push(action);
        node = parent;
    }

    plan.reverse();
    plan
}

/// Best-first search: repeatedly expands the frontier node with the minimum
/// estimated cost until a goal state is generated or the reachable state
/// space is exhausted. Returns `None` when no plan exists.
///
/// `frontier` and `visited` are cleared before the search; passing them in
/// lets callers pick the queue implementation and inspect the visited set
/// afterwards.
pub fn best_first_search(
    puzzle: &PushWorldPuzzle,
    heuristic: &mut dyn Heuristic,
    frontier: &mut dyn PriorityQueue<Rc<SearchNode>, Cost>,
    visited: &mut StateSet,
) -> Option<Plan> {
    let initial_state = puzzle.initial_state();

    if puzzle.satisfies_goal(initial_state) {
        // the plan to reach the goal has no actions
        return Some(Plan::new());
    }

    let mut action_iterator = RandomActionIterator::default();

    visited.clear();
    visited.insert(initial_state.clone());

    frontier.clear();
    let root = Rc::new(SearchNode {
        parent: None,
        state: initial_state.clone(),
    });
    let estimate = heuristic.estimate(&RelativeState::all_moved(initial_state.clone()));
    frontier.push(root, Cost(estimate));

    while let Some(parent_node) = frontier.pop() {
        for &action in action_iterator.next() {
            let relative_state = puzzle.next_state(&parent_node.state, action);

            if visited.contains(&relative_state.state) {
                continue;
            }

            let node = Rc::new(SearchNode {
                parent: Some(Rc::clone(&parent_node)),
                state: relative_state.state.clone(),
            });

            if puzzle.satisfies_goal(&node.state) {
                // return the first solution found
                return Some(backtrack_plan(puzzle, &node));
            }

            let estimate = heuristic.estimate(&relative_state);
            visited.insert(relative_state.state);
            frontier.push(node, Cost(estimate));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::data::Action::*;
    use crate::data::{Action, RelativeState};
    use crate::heuristics::rgd::RecursiveGraphDistanceHeuristic;
    use crate::search::queue::HeapQueue;

    const TRIVIAL: &str = r"
        w  .  g0
        a  m0 .
        aw .  .
    ";

    const NO_SOLUTION: &str = r"
        a  .  .
        .  .  .
        .  .  .
        w  w  w
        m0 g0 w
    ";

    /// Ignores the state entirely.
    struct NullHeuristic;

    impl Heuristic for NullHeuristic {
        fn estimate(&mut self, _relative_state: &RelativeState) -> f32 {
            0.0
        }
    }

    #[test]
    fn backtracking() {
        let puzzle: PushWorldPuzzle = TRIVIAL.parse().unwrap();

        let mut node = Rc::new(SearchNode {
            parent: None,
            state: puzzle.initial_state().clone(),
        });
        assert!(backtrack_plan(&puzzle, &node).is_empty());

        let expected_plan: Vec<Action> = vec![Right, Down, Right, Up];
        for &action in &expected_plan {
            let state = puzzle.next_state(&node.state, action).state;
            node = Rc::new(SearchNode {
                parent: Some(node),
                state,
            });
        }

        assert_eq!(backtrack_plan(&puzzle, &node), expected_plan);

        let parent = node.parent.as_ref().unwrap();
        assert_eq!(backtrack_plan(&puzzle, parent), vec![Right, Down, Right]);
    }

    #[test]
    fn finds_a_valid_plan() {
        let puzzle: Rc<PushWorldPuzzle> = Rc::new(TRIVIAL.parse().unwrap());
        let mut heuristic = RecursiveGraphDistanceHeuristic::new(Rc::clone(&puzzle));
        let mut frontier = HeapQueue::new();
        let mut visited = StateSet::default();

        let plan = best_first_search(&puzzle, &mut heuristic, &mut frontier, &mut visited)
            .expect("the trivial puzzle is solvable");
        assert!(puzzle.is_valid_plan(&plan));
    }

    #[test]
    fn finds_a_valid_plan_with_null_heuristic() {
        let puzzle: Rc<PushWorldPuzzle> = Rc::new(TRIVIAL.parse().unwrap());
        let mut heuristic = NullHeuristic;
        let mut frontier = HeapQueue::new();
        let mut visited = StateSet::default();

        let plan = best_first_search(&puzzle, &mut heuristic, &mut frontier, &mut visited)
            .expect("the trivial puzzle is solvable");
        assert!(puzzle.is_valid_plan(&plan));
    }

    #[test]
    fn solved_at_the_start() {
        let puzzle: PushWorldPuzzle = "a m0+g0".parse().unwrap();
        let mut heuristic = NullHeuristic;
        let mut frontier = HeapQueue::new();
        let mut visited = StateSet::default();

        let plan = best_first_search(&puzzle, &mut heuristic, &mut frontier, &mut visited);
        assert_eq!(plan, Some(Vec::new()));
    }

    #[test]
    fn exhausts_unsolvable_puzzles() {
        let puzzle: PushWorldPuzzle = NO_SOLUTION.parse().unwrap();
        let mut heuristic = NullHeuristic;
        let mut frontier = HeapQueue::new();
        let mut visited = StateSet::default();

        let plan = best_first_search(&puzzle, &mut heuristic, &mut frontier, &mut visited);
        assert_eq!(plan, None);
        assert!(frontier.is_empty());

        // the agent roams a 3x3 area and nothing else ever moves
        assert_eq!(visited.len(), 9);
    }
}
