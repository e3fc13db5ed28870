use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Sub};

use fnv::FnvHashSet;

/// Every X and Y coordinate must stay below this limit so that positions fit
/// the integer encoding. The value 10000 keeps encoded positions readable.
pub const POSITION_LIMIT: i32 = 10_000;

/// A 2D grid coordinate packed into one integer: upper digits X, lower Y.
///
/// The encoding is additive, so displacements (with possibly negative
/// components) can be added to positions:
/// `Position::new(x, y) + Position::new(dx, dy) == Position::new(x + dx, y + dy)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(i32);

impl Position {
    pub fn new(x: i32, y: i32) -> Position {
        Position(x * POSITION_LIMIT + y)
    }

    /// Only valid for non-negative coordinates, not for displacements.
    pub fn xy(self) -> (i32, i32) {
        (self.0 / POSITION_LIMIT, self.0 % POSITION_LIMIT)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position(self.0 + other.0)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, other: Position) -> Position {
        Position(self.0 - other.0)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (x, y) = self.xy();
        write!(f, "({}, {})", x, y)
    }
}

/// Index of the agent in every `State`. The agent is the only object that
/// actions move directly.
pub const AGENT: usize = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
}

pub const ACTIONS: [Action; 4] = [Action::Left, Action::Right, Action::Up, Action::Down];
pub const NUM_ACTIONS: usize = 4;

impl Action {
    // (0, 0) is the top left corner
    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
            Action::Up => (0, -1),
            Action::Down => (0, 1),
        }
    }

    pub fn displacement(self) -> Position {
        let (dx, dy) = self.delta();
        Position::new(dx, dy)
    }

    pub fn from_displacement(displacement: Position) -> Option<Action> {
        ACTIONS
            .iter()
            .copied()
            .find(|a| a.displacement() == displacement)
    }

    pub fn to_char(self) -> char {
        match self {
            Action::Left => 'L',
            Action::Right => 'R',
            Action::Up => 'U',
            Action::Down => 'D',
        }
    }

    pub fn from_char(c: char) -> Option<Action> {
        match c {
            'L' => Some(Action::Left),
            'R' => Some(Action::Right),
            'U' => Some(Action::Up),
            'D' => Some(Action::Down),
            _ => None,
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// The positions of all objects, one per object, agent first.
pub type State = Vec<Position>;

/// Desired positions of goal objects; element k is the target of `state[k+1]`.
pub type Goal = Vec<Position>;

pub type Plan = Vec<Action>;

pub type StateSet = FnvHashSet<State>;

/// A state plus the indices of the objects whose positions differ from some
/// reference state, in ascending order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelativeState {
    pub state: State,
    pub moved_object_indices: Vec<usize>,
}

impl RelativeState {
    /// Treats every object as moved. Used for the root of a search where
    /// there is no reference state to diff against.
    pub fn all_moved(state: State) -> RelativeState {
        let moved_object_indices = (0..state.len()).collect();
        RelativeState {
            state,
            moved_object_indices,
        }
    }
}
