use std::rc::Rc;

use fnv::{FnvHashMap, FnvHashSet};

use crate::data::{Action, Position, RelativeState, State, AGENT};
use crate::heuristics::graph::{
    build_feasible_movement_graphs, FeasibleMovementGraph, PathDistances,
};
use crate::heuristics::Heuristic;
use crate::puzzle::PushWorldPuzzle;

/// All arguments of `pushing_costs`, used as the memoization key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PushingCostKey {
    pusher_id: usize,
    pusher_position: Position,
    pushee_id: usize,
    pushee_start_position: Position,
    pushee_end_position: Position,
}

/// The Recursive Graph Distance heuristic.
///
/// Estimates the cost of pushing every goal object to its goal position by
/// walking the object's feasible movement graph, and recursively estimates
/// the cost of bringing a pusher into position for the first movement of
/// that walk. All movements after the first are assumed to cost 1 each.
///
/// A "tool" is an object between the agent and a target object that lets
/// the agent push the target without direct contact. With `fewest_tools`
/// (the default), each goal cost uses the smallest pushing depth that yields
/// a finite cost, which is much cheaper to compute; without it, up to all
/// other objects may act as tools at once, which is exponentially more
/// expensive but estimates tighter costs.
#[derive(Debug)]
pub struct RecursiveGraphDistanceHeuristic {
    puzzle: Rc<PushWorldPuzzle>,
    fewest_tools: bool,
    movement_graphs: Vec<Rc<FeasibleMovementGraph>>,
    path_distances: Vec<PathDistances>,
    pushing_cost_cache: FnvHashMap<PushingCostKey, Rc<FnvHashMap<Position, f32>>>,
}

impl RecursiveGraphDistanceHeuristic {
    pub fn new(puzzle: Rc<PushWorldPuzzle>) -> Self {
        Self::with_fewest_tools(puzzle, true)
    }

    pub fn with_fewest_tools(puzzle: Rc<PushWorldPuzzle>, fewest_tools: bool) -> Self {
        let movement_graphs = build_feasible_movement_graphs(&puzzle);
        let path_distances = movement_graphs.iter().map(PathDistances::new).collect();
        RecursiveGraphDistanceHeuristic {
            puzzle,
            fewest_tools,
            movement_graphs,
            path_distances,
            pushing_cost_cache: FnvHashMap::default(),
        }
    }

    /// Estimated cost to move one object from its position in `state` to
    /// `goal_position`, with at most `pushing_depth` tools.
    fn goal_cost(
        &mut self,
        state: &State,
        object_id: usize,
        goal_position: Position,
        pushing_depth: usize,
    ) -> f32 {
        let current_position = state[object_id];

        if goal_position == current_position {
            return 0.0;
        }

        let mut min_cost = f32::INFINITY;
        let skipped_object_ids = FnvHashSet::default();

        // Consider each feasible movement of the object out of its current
        // position; the rest of the path to the goal is costed by graph
        // distance alone.
        let graph = Rc::clone(&self.movement_graphs[object_id]);
        if let Some(effect_positions) = graph.get(&current_position) {
            for &effect_position in effect_positions {
                let goal_distance_cost =
                    self.path_distances[object_id].distance(effect_position, goal_position);

                if goal_distance_cost >= min_cost {
                    continue;
                }

                min_cost = goal_distance_cost
                    + self.recursive_pushing_cost(
                        state,
                        object_id,
                        current_position,
                        effect_position,
                        &skipped_object_ids,
                        pushing_depth,
                        min_cost - goal_distance_cost,
                    );
            }
        }

        min_cost
    }

    /// Estimated cost using as few tools as possible: the first pushing depth
    /// with a finite cost wins.
    fn fewest_tools_goal_cost(
        &mut self,
        state: &State,
        object_id: usize,
        goal_position: Position,
    ) -> f32 {
        for pushing_depth in 0..state.len().saturating_sub(1) {
            let cost = self.goal_cost(state, object_id, goal_position, pushing_depth);
            if cost.is_finite() {
                return cost;
            }
        }
        f32::INFINITY
    }

    /// Estimated cost of making some pusher move the object from
    /// `current_position` to the adjacent `effect_position`.
    ///
    /// `cost_upper_bound` doubles as the initial minimum, so anything at or
    /// above it is pruned and the bound is returned when nothing beats it.
    #[allow(clippy::too_many_arguments)]
    fn recursive_pushing_cost(
        &mut self,
        state: &State,
        object_id: usize,
        current_position: Position,
        effect_position: Position,
        skipped_object_ids: &FnvHashSet<usize>,
        pushing_depth: usize,
        cost_upper_bound: f32,
    ) -> f32 {
        let mut min_cost = cost_upper_bound;

        let mut next_skipped_object_ids = skipped_object_ids.clone();
        next_skipped_object_ids.insert(object_id);

        // With no pushing depth left only the agent may push; otherwise any
        // other object may serve as the pusher and the agent's own movement
        // is costed one level deeper.
        let pusher_ids = if pushing_depth == 0 {
            AGENT..AGENT + 1
        } else {
            1..state.len()
        };

        for pusher_id in pusher_ids {
            if next_skipped_object_ids.contains(&pusher_id) {
                continue;
            }

            let pusher_position = state[pusher_id];
            let pushing_costs = self.pushing_costs(
                pusher_id,
                pusher_position,
                object_id,
                current_position,
                effect_position,
            );

            for (&pusher_next_position, &pusher_distance_cost) in pushing_costs.iter() {
                if pusher_distance_cost >= min_cost {
                    continue;
                }

                if pusher_id == AGENT {
                    // the agent pushes directly by moving to the adjacent
                    // position, which costs one action
                    let total_cost = pusher_distance_cost + 1.0;
                    if total_cost < min_cost {
                        min_cost = total_cost;
                    }
                } else {
                    min_cost = pusher_distance_cost
                        + self.recursive_pushing_cost(
                            state,
                            pusher_id,
                            pusher_position,
                            pusher_next_position,
                            &next_skipped_object_ids,
                            pushing_depth - 1,
                            min_cost - pusher_distance_cost,
                        );
                }
            }
        }

        min_cost
    }

    /// For every position adjacent to `pusher_position` in the pusher's
    /// movement graph, the cost of moving the pusher from there into a spot
    /// where it pushes the pushee from its start to its end position. A cost
    /// of zero means the pusher's very next movement performs the push.
    ///
    /// Memoized; the cache only saves recomputation and never changes values.
    fn pushing_costs(
        &mut self,
        pusher_id: usize,
        pusher_position: Position,
        pushee_id: usize,
        pushee_start_position: Position,
        pushee_end_position: Position,
    ) -> Rc<FnvHashMap<Position, f32>> {
        let key = PushingCostKey {
            pusher_id,
            pusher_position,
            pushee_id,
            pushee_start_position,
            pushee_end_position,
        };

        if let Some(cached_costs) = self.pushing_cost_cache.get(&key) {
            return Rc::clone(cached_costs);
        }

        let mut costs = FnvHashMap::default();

        let displacement = pushee_end_position - pushee_start_position;
        let action = match Action::from_displacement(displacement) {
            Some(action) => action,
            None => unreachable!("pushee movements are always single action displacements"),
        };

        let puzzle = Rc::clone(&self.puzzle);
        let relative_positions =
            &puzzle.object_collisions().dynamic_collisions[action as usize][pusher_id][pushee_id];

        let pusher_graph = Rc::clone(&self.movement_graphs[pusher_id]);
        if let Some(pusher_next_positions) = pusher_graph.get(&pusher_position) {
            // every relative position from which the pusher can execute this
            // push
            for &relative_position in relative_positions {
                let pushing_start_position = pushee_start_position + relative_position;
                let pushing_end_position = pushing_start_position + displacement;

                let pushing_feasible = pusher_graph
                    .get(&pushing_start_position)
                    .map_or(false, |ends| ends.contains(&pushing_end_position));
                if !pushing_feasible {
                    continue;
                }

                for &pusher_next_position in pusher_next_positions {
                    let distance_cost;

                    if pushing_start_position == pusher_position
                        && pushing_end_position == pusher_next_position
                    {
                        // a simultaneous push, the movement itself is the push
                        distance_cost = 0.0;
                    } else {
                        let distance = self.path_distances[pusher_id]
                            .distance(pusher_next_position, pushing_start_position);
                        if distance == f32::INFINITY {
                            continue;
                        }
                        // one more step into the pushing spot
                        distance_cost = distance + 1.0;
                    }

                    let best_cost = costs.entry(pusher_next_position).or_insert(f32::INFINITY);
                    if distance_cost < *best_cost {
                        *best_cost = distance_cost;
                    }
                }
            }
        }

        let costs = Rc::new(costs);
        self.pushing_cost_cache.insert(key, Rc::clone(&costs));
        costs
    }
}

impl Heuristic for RecursiveGraphDistanceHeuristic {
    /// Sums the goal costs of all goal objects. An infinite result proves
    /// that no sequence of actions reaches the goal from this state.
    fn estimate(&mut self, relative_state: &RelativeState) -> f32 {
        let state = &relative_state.state;
        let mut cost = 0.0;

        for goal_index in 0..self.puzzle.goal().len() {
            let goal_position = self.puzzle.goal()[goal_index];
            let object_id = goal_index + 1;

            if self.fewest_tools {
                cost += self.fewest_tools_goal_cost(state, object_id, goal_position);
            } else {
                cost += self.goal_cost(state, object_id, goal_position, state.len() - 2);
            }

            if cost == f32::INFINITY {
                break;
            }
        }

        cost
    }
}
