use fnv::FnvHashSet;

use crate::data::{Action, Goal, Position, RelativeState, State, AGENT, NUM_ACTIONS};

/// Pixel offsets of one object, relative to its top left corner.
/// Wall pixel sets are the exception, they stay in absolute coordinates.
pub(crate) type PixelSet = FnvHashSet<(i32, i32)>;

/// Precomputed collision tables for all objects of one puzzle. Frozen after
/// construction, they depend only on the pixel geometry of the objects.
#[derive(Clone, Debug, Default)]
pub struct ObjectCollisions {
    /// `static_collisions[action][i]` holds every position of object `i` from
    /// which the action would collide with a static obstacle.
    pub static_collisions: Vec<Vec<FnvHashSet<Position>>>,

    /// `dynamic_collisions[action][i][j]` holds every relative position
    /// `pos(i) - pos(j)` at which moving object `i` collides into object `j`,
    /// i.e. `i` pushes `j`.
    pub dynamic_collisions: Vec<Vec<Vec<FnvHashSet<Position>>>>,
}

impl ObjectCollisions {
    pub fn new(num_objects: usize) -> Self {
        let mut collisions = ObjectCollisions::default();
        collisions.resize(num_objects);
        collisions
    }

    pub fn resize(&mut self, num_objects: usize) {
        self.static_collisions
            .resize_with(NUM_ACTIONS, Vec::new);
        self.dynamic_collisions
            .resize_with(NUM_ACTIONS, Vec::new);

        for a in 0..NUM_ACTIONS {
            self.static_collisions[a].resize_with(num_objects, FnvHashSet::default);
            self.dynamic_collisions[a].resize_with(num_objects, Vec::new);
            for m in 0..num_objects {
                self.dynamic_collisions[a][m].resize_with(num_objects, FnvHashSet::default);
            }
        }
    }
}

/// Returns whether any pixel of `s1`, offset by `offset`, occurs in `s2`.
fn pixels_overlap(s1: &PixelSet, s2: &PixelSet, offset: (i32, i32)) -> bool {
    s1.iter()
        .any(|&(x, y)| s2.contains(&(x + offset.0, y + offset.1)))
}

fn pixel_size(pixels: &PixelSet) -> (i32, i32) {
    let mut size = (0, 0);
    for &(x, y) in pixels {
        size.0 = size.0.max(x + 1);
        size.1 = size.1.max(y + 1);
    }
    size
}

/// Computes all positions of a pusher relative to a pushee at which moving
/// the pusher via `action` collides into the pushee.
pub(crate) fn populate_collisions(
    collisions: &mut FnvHashSet<Position>,
    action: Action,
    pusher_pixels: &PixelSet,
    pushee_pixels: &PixelSet,
) {
    let (dx, dy) = action.delta();
    let mut relative_positions = PixelSet::default();

    for &(px, py) in pusher_pixels {
        for &(qx, qy) in pushee_pixels {
            relative_positions.insert((qx - (px + dx), qy - (py + dy)));
        }
    }

    for &(rx, ry) in &relative_positions {
        // Positions where the objects already overlap can never occur.
        if !pixels_overlap(pusher_pixels, pushee_pixels, (rx, ry)) {
            collisions.insert(Position::new(rx, ry));
        }
    }
}

/// Like `populate_collisions`, with the added constraint that the pusher must
/// lie fully inside `[0, width) x [0, height)` at the relative position.
pub(crate) fn populate_bounded_collisions(
    collisions: &mut FnvHashSet<Position>,
    action: Action,
    pusher_pixels: &PixelSet,
    pushee_pixels: &PixelSet,
    width: i32,
    height: i32,
) {
    let (dx, dy) = action.delta();
    let mut relative_positions = PixelSet::default();

    // If the pusher has size 1, `max_x` is `width - 1`, so `x <= max_x` is
    // equivalent to `x < width` for integers.
    let (size_x, size_y) = pixel_size(pusher_pixels);
    let max_x = width - size_x;
    let max_y = height - size_y;

    for &(px, py) in pusher_pixels {
        for &(qx, qy) in pushee_pixels {
            relative_positions.insert((qx - (px + dx), qy - (py + dy)));
        }
    }

    for &(rx, ry) in &relative_positions {
        if rx >= 0
            && ry >= 0
            && rx <= max_x
            && ry <= max_y
            && !pixels_overlap(pusher_pixels, pushee_pixels, (rx, ry))
        {
            collisions.insert(Position::new(rx, ry));
        }
    }
}

/// One puzzle: the initial positions, the goal and the collision tables.
/// Immutable after construction and freely shareable between readers.
#[derive(Clone, Debug)]
pub struct PushWorldPuzzle {
    initial_state: State,
    num_objects: usize,
    goal: Goal,
    object_collisions: ObjectCollisions,
}

impl PushWorldPuzzle {
    pub fn new(initial_state: State, goal: Goal, object_collisions: ObjectCollisions) -> Self {
        let num_objects = initial_state.len();
        PushWorldPuzzle {
            initial_state,
            num_objects,
            goal,
            object_collisions,
        }
    }

    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    pub fn object_collisions(&self) -> &ObjectCollisions {
        &self.object_collisions
    }

    pub fn num_objects(&self) -> usize {
        self.num_objects
    }

    /// Computes the state reached by performing `action` in `state`, together
    /// with the indices of the objects that moved, in ascending order.
    ///
    /// Pushing is transitive: any chain of objects in contact along the action
    /// direction moves as a unit. Stopping is transitive too: if any member of
    /// the chain would hit a static obstacle, nothing moves at all and the
    /// moved index list is empty.
    pub fn next_state(&self, state: &State, action: Action) -> RelativeState {
        let static_collisions = &self.object_collisions.static_collisions[action as usize];

        if static_collisions[AGENT].contains(&state[AGENT]) {
            // The agent cannot move.
            return RelativeState {
                state: state.clone(),
                moved_object_indices: Vec::new(),
            };
        }

        let dynamic_collisions = &self.object_collisions.dynamic_collisions[action as usize];

        // The frontier holds objects that move but have not yet been checked
        // for whether they push other objects in turn.
        let mut pushed = vec![false; self.num_objects];
        pushed[AGENT] = true;
        let mut frontier = vec![AGENT];

        while let Some(object_idx) = frontier.pop() {
            let object_position = state[object_idx];
            let object_dynamic_collisions = &dynamic_collisions[object_idx];

            for obstacle_idx in 1..self.num_objects {
                if pushed[obstacle_idx] {
                    continue;
                }

                let obstacle_position = state[obstacle_idx];
                let relative_position = object_position - obstacle_position;

                if object_dynamic_collisions[obstacle_idx].contains(&relative_position) {
                    if static_collisions[obstacle_idx].contains(&obstacle_position) {
                        // transitive stopping, nothing can move
                        return RelativeState {
                            state: state.clone(),
                            moved_object_indices: Vec::new(),
                        };
                    }

                    pushed[obstacle_idx] = true;
                    frontier.push(obstacle_idx);
                }
            }
        }

        let displacement = action.displacement();
        let mut next = State::with_capacity(self.num_objects);
        let mut moved_object_indices = Vec::new();

        for (i, &position) in state.iter().enumerate() {
            if pushed[i] {
                next.push(position + displacement);
                moved_object_indices.push(i);
            } else {
                next.push(position);
            }
        }

        RelativeState {
            state: next,
            moved_object_indices,
        }
    }

    pub fn satisfies_goal(&self, state: &State) -> bool {
        self.goal
            .iter()
            .enumerate()
            .all(|(i, &goal_position)| state[i + 1] == goal_position)
    }

    /// Replays the plan from the initial state and checks the goal.
    pub fn is_valid_plan(&self, plan: &[Action]) -> bool {
        let mut state = self.initial_state.clone();
        for &action in plan {
            state = self.next_state(&state, action).state;
        }
        self.satisfies_goal(&state)
    }
}
