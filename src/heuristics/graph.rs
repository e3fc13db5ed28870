use std::rc::Rc;

use fnv::{FnvHashMap, FnvHashSet};

use crate::data::{Position, ACTIONS, AGENT};
use crate::puzzle::PushWorldPuzzle;

/// Stores whether an object can potentially move from one position to one or
/// more adjacent positions. A movement absent from this graph is proven to be
/// unachievable; a movement present in it is *not* proven to be achievable.
///
/// Maps each start position to the set of reachable end positions.
pub type FeasibleMovementGraph = FnvHashMap<Position, FnvHashSet<Position>>;

/// An object's movement from one position to an adjacent one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Transition {
    object_id: usize,
    start_position: Position,
    end_position: Position,
}

/// Transitions that become feasible once the key transition is proven
/// feasible.
type DependentTransitions = FnvHashMap<Transition, Vec<Transition>>;

/// Adds a transition to its object's graph. The first time a transition is
/// inserted, all transitions depending on it are added in turn, and its end
/// position joins the work list if the object has never reached it before.
fn add_transition(
    transition: Transition,
    frontier: &mut Vec<(usize, Position)>,
    graphs: &mut [FeasibleMovementGraph],
    dependent_transitions: &mut DependentTransitions,
) {
    let mut pending = vec![transition];

    while let Some(t) = pending.pop() {
        let inserted = graphs[t.object_id]
            .entry(t.start_position)
            .or_default()
            .insert(t.end_position);
        if !inserted {
            continue;
        }

        if let Some(dependents) = dependent_transitions.remove(&t) {
            pending.extend(dependents);
        }

        if !graphs[t.object_id].contains_key(&t.end_position) {
            graphs[t.object_id].insert(t.end_position, FnvHashSet::default());
            frontier.push((t.object_id, t.end_position));
        }
    }
}

/// Builds one `FeasibleMovementGraph` per object, indexed by object ID.
///
/// An edge is justified either directly (the agent moving without hitting a
/// wall) or by some pusher whose matching pushing edge is already justified.
/// Edges whose pusher edge is not yet justified are parked in a dependency
/// map and added automatically if the pusher edge appears later.
pub fn build_feasible_movement_graphs(puzzle: &PushWorldPuzzle) -> Vec<Rc<FeasibleMovementGraph>> {
    let initial_state = puzzle.initial_state();
    let collisions = puzzle.object_collisions();
    let num_objects = initial_state.len();

    let mut graphs: Vec<FeasibleMovementGraph> = vec![FnvHashMap::default(); num_objects];
    let mut frontier: Vec<(usize, Position)> = Vec::new();
    let mut dependent_transitions = DependentTransitions::default();

    for (i, &position) in initial_state.iter().enumerate() {
        // populate the initial node in case there are no outgoing edges
        graphs[i].entry(position).or_default();
        frontier.push((i, position));
    }

    while let Some((object_id, position)) = frontier.pop() {
        if object_id == AGENT {
            for &action in &ACTIONS {
                let static_collisions = &collisions.static_collisions[action as usize][AGENT];
                if !static_collisions.contains(&position) {
                    let transition = Transition {
                        object_id: AGENT,
                        start_position: position,
                        end_position: position + action.displacement(),
                    };
                    add_transition(transition, &mut frontier, &mut graphs, &mut dependent_transitions);
                }
            }
            continue;
        }

        // consider pushing movements from all directions
        for &action in &ACTIONS {
            if collisions.static_collisions[action as usize][object_id].contains(&position) {
                continue;
            }

            let displacement = action.displacement();
            let transition = Transition {
                object_id,
                start_position: position,
                end_position: position + displacement,
            };

            'pushers: for pusher_id in 0..num_objects {
                if pusher_id == object_id {
                    continue;
                }

                let relative_positions =
                    &collisions.dynamic_collisions[action as usize][pusher_id][object_id];

                for &relative_position in relative_positions {
                    let start_position = position + relative_position;
                    let end_position = start_position + displacement;

                    let pusher_feasible = graphs[pusher_id]
                        .get(&start_position)
                        .map_or(false, |ends| ends.contains(&end_position));

                    if pusher_feasible {
                        add_transition(
                            transition,
                            &mut frontier,
                            &mut graphs,
                            &mut dependent_transitions,
                        );
                        break 'pushers;
                    } else {
                        // Record the pusher's movement as a possible cause of
                        // this one so it can be justified later.
                        let pusher_transition = Transition {
                            object_id: pusher_id,
                            start_position,
                            end_position,
                        };
                        dependent_transitions
                            .entry(pusher_transition)
                            .or_default()
                            .push(transition);
                    }
                }
            }
        }
    }

    graphs.into_iter().map(Rc::new).collect()
}

fn reverse_graph(graph: &FeasibleMovementGraph) -> FeasibleMovementGraph {
    let mut reversed = FeasibleMovementGraph::default();
    for (&start, ends) in graph {
        reversed.entry(start).or_default();
        for &end in ends {
            reversed.entry(end).or_default().insert(start);
        }
    }
    reversed
}

/// The number of movements on the shortest path from a single start position
/// to other positions of a `FeasibleMovementGraph`, expanded breadth-first
/// one level at a time, only as far as queries require.
#[derive(Debug)]
pub struct SingleSourcePathDistances {
    graph: Rc<FeasibleMovementGraph>,
    frontier_depth: f32,
    frontier: Vec<Position>,
    distances: FnvHashMap<Position, f32>,
}

impl SingleSourcePathDistances {
    pub fn new(graph: Rc<FeasibleMovementGraph>, start: Position) -> Self {
        let mut distances = FnvHashMap::default();
        distances.insert(start, 0.0);
        SingleSourcePathDistances {
            graph,
            frontier_depth: 0.0,
            frontier: vec![start],
            distances,
        }
    }

    /// Returns the hop count from the start to `target`, or infinity if no
    /// path exists.
    pub fn distance(&mut self, target: Position) -> f32 {
        if let Some(&distance) = self.distances.get(&target) {
            return distance;
        }

        let mut target_found = false;
        while !self.frontier.is_empty() {
            self.frontier_depth += 1.0;
            let mut next_frontier = Vec::new();

            for position in &self.frontier {
                for &next_position in &self.graph[position] {
                    if !self.distances.contains_key(&next_position) {
                        next_frontier.push(next_position);
                        self.distances.insert(next_position, self.frontier_depth);
                        if next_position == target {
                            target_found = true;
                        }
                    }
                }
            }

            self.frontier = next_frontier;

            if target_found {
                return self.frontier_depth;
            }
        }

        f32::INFINITY
    }
}

/// Shortest-path hop counts between arbitrary pairs of positions in one
/// `FeasibleMovementGraph`.
///
/// Runs one BFS per target over the reversed graph, so queries that share a
/// target also share a cache.
#[derive(Debug)]
pub struct PathDistances {
    distances: FnvHashMap<Position, SingleSourcePathDistances>,
}

impl PathDistances {
    pub fn new(graph: &Rc<FeasibleMovementGraph>) -> Self {
        let reversed = Rc::new(reverse_graph(graph));
        let distances = reversed
            .keys()
            .map(|&position| {
                (
                    position,
                    SingleSourcePathDistances::new(Rc::clone(&reversed), position),
                )
            })
            .collect();
        PathDistances { distances }
    }

    /// Returns the hop count of the shortest path from `source` to `target`,
    /// or infinity if `target` is unreachable or not part of the graph.
    pub fn distance(&mut self, source: Position, target: Position) -> f32 {
        match self.distances.get_mut(&target) {
            Some(single_source) => single_source.distance(source),
            None => f32::INFINITY,
        }
    }
}
