use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use fnv::FnvHashMap;

use crate::data::{Goal, Position, State, ACTIONS, AGENT, POSITION_LIMIT};
use crate::puzzle::{
    populate_bounded_collisions, populate_collisions, ObjectCollisions, PixelSet, PushWorldPuzzle,
};

#[derive(Debug, PartialEq)]
pub enum ParseError {
    /// An unrecognized identifier in a cell, with its 1-based (x, y) position.
    InvalidCell(usize, usize),
    /// A row whose number of cells differs from the first row.
    InconsistentRows(usize),
    TooLarge,
    NoAgent,
    /// A goal without a matching movable, holding the missing identifier.
    NoMovable(String),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ParseError::InvalidCell(x, y) => write!(f, "Invalid cell at position ({}, {})", x, y),
            ParseError::InconsistentRows(y) => {
                write!(f, "Row {} does not contain the same number of cells", y)
            }
            ParseError::TooLarge => write!(
                f,
                "The maximum width and height of a puzzle is {}",
                POSITION_LIMIT
            ),
            ParseError::NoAgent => write!(
                f,
                "Every puzzle must have an agent object whose pixels are indicated by 'a'"
            ),
            ParseError::NoMovable(ref id) => {
                write!(f, "Goal has no associated movable object: {}", id)
            }
        }
    }
}

impl Error for ParseError {}

impl FromStr for PushWorldPuzzle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

fn valid_id(id: &str) -> bool {
    id == "a" || id == "w" || id == "aw" || id.starts_with('m') || id.starts_with('g')
}

/// Parses a whitespace-separated pixel grid into a puzzle.
///
/// Cells hold `.` (empty), `a` (agent), `w` (wall), `aw` (agent-only wall),
/// `m<K>` (movable), `g<K>` (goal of `m<K>`) or a `+`-separated combination.
/// The grid is implicitly surrounded by a perimeter of walls, so pixel
/// coordinates start at (1, 1).
pub fn parse(text: &str) -> Result<PushWorldPuzzle, ParseError> {
    let mut obj_pixels: BTreeMap<String, PixelSet> = BTreeMap::new();

    let mut cells_per_row = 0;
    let mut y = 0;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        y += 1;

        let cells: Vec<&str> = line.split_whitespace().collect();
        if y == 1 {
            cells_per_row = cells.len();
        } else if cells.len() != cells_per_row {
            return Err(ParseError::InconsistentRows(y));
        }

        for (i, cell) in cells.iter().enumerate() {
            let x = i + 1;
            for elem in cell.split('+').filter(|e| !e.is_empty()) {
                let elem = elem.to_lowercase();
                if elem == "." {
                    continue;
                }
                if !valid_id(&elem) {
                    return Err(ParseError::InvalidCell(x, y));
                }
                obj_pixels
                    .entry(elem)
                    .or_default()
                    .insert((x as i32, y as i32));
            }
        }
    }

    if !obj_pixels.contains_key("a") {
        return Err(ParseError::NoAgent);
    }

    // one column/row of perimeter wall on each side
    let width = cells_per_row as i32 + 2;
    let height = y as i32 + 2;

    if width >= POSITION_LIMIT || height >= POSITION_LIMIT {
        return Err(ParseError::TooLarge);
    }

    let wall_pixels = obj_pixels.entry("w".to_string()).or_default();
    for x in 0..width {
        wall_pixels.insert((x, 0));
        wall_pixels.insert((x, height - 1));
    }
    for y in 0..height {
        wall_pixels.insert((0, y));
        wall_pixels.insert((width - 1, y));
    }

    // Re-express every non-wall object's pixels relative to its minimum
    // corner, which becomes the object's canonical position.
    let mut object_positions: FnvHashMap<String, (i32, i32)> = FnvHashMap::default();
    for (id, pixels) in obj_pixels.iter_mut() {
        if id == "w" || id == "aw" {
            continue;
        }
        let min_x = pixels.iter().map(|p| p.0).min().unwrap_or(0);
        let min_y = pixels.iter().map(|p| p.1).min().unwrap_or(0);
        object_positions.insert(id.clone(), (min_x, min_y));
        let offset_pixels: PixelSet =
            pixels.iter().map(|&(x, y)| (x - min_x, y - min_y)).collect();
        *pixels = offset_pixels;
    }

    // The object order is: the agent, then the movables matched to goals in
    // goal order, then the remaining movables. BTreeMap iteration makes the
    // goal order the lexicographic order of the goal identifiers.
    let mut objects = vec!["a".to_string()];
    let mut goal = Goal::new();

    for id in obj_pixels.keys() {
        if let Some(suffix) = id.strip_prefix('g') {
            let movable_id = format!("m{}", suffix);
            if !obj_pixels.contains_key(&movable_id) {
                return Err(ParseError::NoMovable(movable_id));
            }
            let (x, y) = object_positions[id];
            goal.push(Position::new(x, y));
            objects.push(movable_id);
        }
    }

    for id in obj_pixels.keys() {
        if id.starts_with('m') && !objects.contains(id) {
            objects.push(id.clone());
        }
    }

    let num_objects = objects.len();
    let initial_state: State = objects
        .iter()
        .map(|id| {
            let (x, y) = object_positions[id];
            Position::new(x, y)
        })
        .collect();

    let mut collisions = ObjectCollisions::new(num_objects);

    // Walls for the agent include both "aw" and "w" pixels.
    let mut agent_walls = obj_pixels["w"].clone();
    if let Some(aw) = obj_pixels.get("aw") {
        agent_walls.extend(aw);
    }

    for &action in &ACTIONS {
        populate_bounded_collisions(
            &mut collisions.static_collisions[action as usize][AGENT],
            action,
            &obj_pixels["a"],
            &agent_walls,
            width,
            height,
        );
    }

    for m in 1..num_objects {
        for &action in &ACTIONS {
            populate_bounded_collisions(
                &mut collisions.static_collisions[action as usize][m],
                action,
                &obj_pixels[&objects[m]],
                &obj_pixels["w"],
                width,
                height,
            );
        }
    }

    // Collisions between all object pairs. Nothing ever pushes the agent,
    // since the agent is the cause of all movement.
    for pusher in 0..num_objects {
        for pushee in 1..num_objects {
            for &action in &ACTIONS {
                populate_collisions(
                    &mut collisions.dynamic_collisions[action as usize][pusher][pushee],
                    action,
                    &obj_pixels[&objects[pusher]],
                    &obj_pixels[&objects[pushee]],
                );
            }
        }
    }

    Ok(PushWorldPuzzle::new(initial_state, goal, collisions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Action::*;

    const TRIVIAL: &str = r"
        w  .  g0
        a  m0 .
        aw .  .
    ";

    #[test]
    fn trivial() {
        let puzzle: PushWorldPuzzle = TRIVIAL.parse().unwrap();

        assert_eq!(puzzle.goal(), &vec![Position::new(3, 1)]);
        assert_eq!(
            puzzle.initial_state(),
            &vec![Position::new(1, 2), Position::new(2, 2)]
        );

        let static_collisions = &puzzle.object_collisions().static_collisions;
        let dynamic_collisions = &puzzle.object_collisions().dynamic_collisions;

        for &action in &ACTIONS {
            assert_eq!(static_collisions[action as usize][AGENT].len(), 3);
            assert_eq!(dynamic_collisions[action as usize][0][1].len(), 1);
        }

        assert!(static_collisions[Left as usize][AGENT].contains(&Position::new(2, 1)));
        assert!(static_collisions[Left as usize][AGENT].contains(&Position::new(1, 2)));
        assert!(static_collisions[Left as usize][AGENT].contains(&Position::new(2, 3)));

        assert!(static_collisions[Up as usize][AGENT].contains(&Position::new(1, 2)));
        assert!(static_collisions[Up as usize][AGENT].contains(&Position::new(2, 1)));
        assert!(static_collisions[Up as usize][AGENT].contains(&Position::new(3, 1)));

        assert!(static_collisions[Right as usize][AGENT].contains(&Position::new(3, 1)));
        assert!(static_collisions[Right as usize][AGENT].contains(&Position::new(3, 2)));
        assert!(static_collisions[Right as usize][AGENT].contains(&Position::new(3, 3)));

        assert!(static_collisions[Down as usize][AGENT].contains(&Position::new(1, 2)));
        assert!(static_collisions[Down as usize][AGENT].contains(&Position::new(2, 3)));
        assert!(static_collisions[Down as usize][AGENT].contains(&Position::new(3, 3)));

        assert!(dynamic_collisions[Left as usize][0][1].contains(&Position::new(1, 0)));
        assert!(dynamic_collisions[Right as usize][0][1].contains(&Position::new(-1, 0)));
        assert!(dynamic_collisions[Up as usize][0][1].contains(&Position::new(0, 1)));
        assert!(dynamic_collisions[Down as usize][0][1].contains(&Position::new(0, -1)));
    }

    #[test]
    fn trivial_walkthrough() {
        let puzzle: PushWorldPuzzle = TRIVIAL.parse().unwrap();
        let mut state = puzzle.initial_state().clone();
        assert!(!puzzle.satisfies_goal(&state));

        // pushes into walls leave the state unchanged
        state = puzzle.next_state(&state, Left).state;
        assert_eq!(state, vec![Position::new(1, 2), Position::new(2, 2)]);

        state = puzzle.next_state(&state, Up).state;
        assert_eq!(state, vec![Position::new(1, 2), Position::new(2, 2)]);

        // the cell below the agent is an agent-only wall
        state = puzzle.next_state(&state, Down).state;
        assert_eq!(state, vec![Position::new(1, 2), Position::new(2, 2)]);

        state = puzzle.next_state(&state, Right).state;
        assert_eq!(state, vec![Position::new(2, 2), Position::new(3, 2)]);

        // transitive stopping against the right wall
        state = puzzle.next_state(&state, Right).state;
        assert_eq!(state, vec![Position::new(2, 2), Position::new(3, 2)]);

        state = puzzle.next_state(&state, Down).state;
        state = puzzle.next_state(&state, Right).state;
        state = puzzle.next_state(&state, Up).state;
        assert_eq!(state, vec![Position::new(3, 2), Position::new(3, 1)]);
        assert!(puzzle.satisfies_goal(&state));

        assert!(puzzle.is_valid_plan(&[Right, Down, Right, Up]));
        assert!(puzzle.is_valid_plan(&[Right, Down, Right, Down, Right, Up]));
        assert!(!puzzle.is_valid_plan(&[Right, Down, Left, Up]));
    }

    #[test]
    fn overlapping_pixels() {
        // a goal may share a cell with any object
        let puzzle: PushWorldPuzzle = "a+g0 m0".parse().unwrap();
        assert_eq!(
            puzzle.initial_state(),
            &vec![Position::new(1, 1), Position::new(2, 1)]
        );
        assert_eq!(puzzle.goal(), &vec![Position::new(1, 1)]);
        assert!(!puzzle.satisfies_goal(puzzle.initial_state()));

        let solved: PushWorldPuzzle = "a m0+g0".parse().unwrap();
        assert!(solved.satisfies_goal(solved.initial_state()));
    }

    #[test]
    fn goal_order_and_extra_movables() {
        // goal objects come first in goal identifier order, then the rest
        let puzzle: PushWorldPuzzle = r"
            a  m1 g1
            m2 m0 g0
        "
        .parse()
        .unwrap();

        assert_eq!(
            puzzle.initial_state(),
            &vec![
                Position::new(1, 1), // a
                Position::new(2, 2), // m0
                Position::new(2, 1), // m1
                Position::new(1, 2), // m2
            ]
        );
        assert_eq!(
            puzzle.goal(),
            &vec![Position::new(3, 2), Position::new(3, 1)]
        );
    }

    #[test]
    fn multi_pixel_objects() {
        let puzzle: PushWorldPuzzle = r"
            a  a  .
            .  m0 m0
            .  m0 .
        "
        .parse()
        .unwrap();

        assert_eq!(
            puzzle.initial_state(),
            &vec![Position::new(1, 1), Position::new(2, 2)]
        );

        let dynamic_collisions = &puzzle.object_collisions().dynamic_collisions;
        assert_eq!(dynamic_collisions[Right as usize][0][1].len(), 2);
        assert_eq!(dynamic_collisions[Down as usize][0][1].len(), 3);
        assert!(dynamic_collisions[Down as usize][0][1].contains(&Position::new(-1, -1)));

        // pressing down pushes the object with the whole chain blocked below
        let next = puzzle.next_state(puzzle.initial_state(), Down);
        assert_eq!(next.state, puzzle.initial_state().clone());
        assert!(next.moved_object_indices.is_empty());
    }

    #[test]
    fn fail_no_agent() {
        assert_eq!("m0 g0".parse::<PushWorldPuzzle>().unwrap_err(), ParseError::NoAgent);
    }

    #[test]
    fn fail_no_movable() {
        assert_eq!(
            "a g7".parse::<PushWorldPuzzle>().unwrap_err(),
            ParseError::NoMovable("m7".to_string())
        );
    }

    #[test]
    fn fail_inconsistent_rows() {
        let text = r"
            a  .  .
            .  .
        ";
        assert_eq!(
            text.parse::<PushWorldPuzzle>().unwrap_err(),
            ParseError::InconsistentRows(2)
        );
    }

    #[test]
    fn fail_invalid_cell() {
        assert_eq!(
            "a x .".parse::<PushWorldPuzzle>().unwrap_err(),
            ParseError::InvalidCell(2, 1)
        );
    }

    #[test]
    fn fail_too_large() {
        let row = ". ".repeat(10_000) + "a";
        assert_eq!(row.parse::<PushWorldPuzzle>().unwrap_err(), ParseError::TooLarge);
    }
}
