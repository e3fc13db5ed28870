// Opt in to warnings about new 2018 idioms
#![warn(rust_2018_idioms)]
// Additional warnings that are allow by default (`rustc -W help`)
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused)]
// Clippy
#![warn(clippy::all)]

pub mod config;
pub mod data;
pub mod heuristics;
pub mod parser;
pub mod puzzle;
pub mod search;

use std::error::Error;
use std::path::Path;
use std::rc::Rc;

use crate::config::Mode;
use crate::data::Plan;
use crate::heuristics::novelty::NoveltyHeuristic;
use crate::heuristics::rgd::RecursiveGraphDistanceHeuristic;
use crate::heuristics::weighted_sum::WeightedSumHeuristic;
use crate::heuristics::Heuristic;
use crate::puzzle::PushWorldPuzzle;
use crate::search::queue::{HeapQueue, PriorityQueue};
use crate::search::{best_first_search, Stats};

pub trait LoadPuzzle {
    fn load_puzzle(&self) -> Result<PushWorldPuzzle, Box<dyn Error>>;
}

impl<T: AsRef<Path>> LoadPuzzle for T {
    fn load_puzzle(&self) -> Result<PushWorldPuzzle, Box<dyn Error>> {
        let text = std::fs::read_to_string(self)?;
        Ok(parser::parse(&text)?)
    }
}

#[derive(Debug)]
pub struct SolverOk {
    /// `None` means no plan exists.
    pub plan: Option<Plan>,
    pub stats: Stats,
}

/// Runs a best-first search over the puzzle with the heuristic selected by
/// `mode`.
pub fn solve(puzzle: &Rc<PushWorldPuzzle>, mode: Mode) -> SolverOk {
    let mut frontier = HeapQueue::new();
    let mut visited = data::StateSet::default();

    let rgd = RecursiveGraphDistanceHeuristic::new(Rc::clone(puzzle));

    let plan = match mode {
        Mode::Rgd => {
            let mut heuristic = rgd;
            best_first_search(puzzle, &mut heuristic, &mut frontier, &mut visited)
        }
        Mode::NoveltyRgd => {
            let novelty = NoveltyHeuristic::new(puzzle.initial_state().len());
            // The maximum novelty is 3, so 1e6 keeps the sum exact in an f32.
            // All RGD values are non-negative integers or infinite.
            let heuristics_and_weights: Vec<(Box<dyn Heuristic>, f32)> =
                vec![(Box::new(novelty), 1e6), (Box::new(rgd), 1.0)];
            let mut heuristic = match WeightedSumHeuristic::new(heuristics_and_weights) {
                Ok(heuristic) => heuristic,
                Err(_) => unreachable!("the heuristic list is never empty"),
            };
            best_first_search(puzzle, &mut heuristic, &mut frontier, &mut visited)
        }
    };

    SolverOk {
        plan,
        stats: Stats {
            unique_visited: visited.len(),
            frontier_left: frontier.len(),
        },
    }
}
