use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

use crate::data::RelativeState;
use crate::heuristics::Heuristic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightedSumErr {
    NoHeuristics,
}

impl Display for WeightedSumErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            WeightedSumErr::NoHeuristics => write!(
                f,
                "At least one heuristic must be provided to compute a weighted sum of costs"
            ),
        }
    }
}

impl Error for WeightedSumErr {}

/// Combines child heuristics into a weighted sum.
///
/// With a sufficiently large weight on the first child this doubles as a
/// lexicographic combination, e.g. novelty weighted by 1e6 over RGD: novelty
/// is at most 3 and RGD costs are non-negative integers or infinite, so the
/// sum stays exact in an `f32`.
pub struct WeightedSumHeuristic {
    heuristics_and_weights: Vec<(Box<dyn Heuristic>, f32)>,
}

impl WeightedSumHeuristic {
    pub fn new(
        heuristics_and_weights: Vec<(Box<dyn Heuristic>, f32)>,
    ) -> Result<Self, WeightedSumErr> {
        if heuristics_and_weights.is_empty() {
            return Err(WeightedSumErr::NoHeuristics);
        }
        Ok(WeightedSumHeuristic {
            heuristics_and_weights,
        })
    }
}

impl Heuristic for WeightedSumHeuristic {
    fn estimate(&mut self, relative_state: &RelativeState) -> f32 {
        self.heuristics_and_weights
            .iter_mut()
            .map(|(heuristic, weight)| heuristic.estimate(relative_state) * *weight)
            .sum()
    }
}

impl Debug for WeightedSumHeuristic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let weights: Vec<f32> = self
            .heuristics_and_weights
            .iter()
            .map(|&(_, weight)| weight)
            .collect();
        write!(f, "WeightedSumHeuristic {{ weights: {:?} }}", weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantHeuristic(f32);

    impl Heuristic for ConstantHeuristic {
        fn estimate(&mut self, _relative_state: &RelativeState) -> f32 {
            self.0
        }
    }

    fn empty_relative_state() -> RelativeState {
        RelativeState::all_moved(Vec::new())
    }

    #[test]
    fn weighted_sums() {
        let rs = empty_relative_state();

        for i in 0..5 {
            let i = i as f32;
            let mut h =
                WeightedSumHeuristic::new(vec![(Box::new(ConstantHeuristic(i)) as Box<dyn Heuristic>, i + 1.0)])
                    .unwrap();
            assert_eq!(h.estimate(&rs), i * (i + 1.0));

            for j in -5..5 {
                let j = j as f32;
                let mut h2 = WeightedSumHeuristic::new(vec![
                    (Box::new(ConstantHeuristic(i)) as Box<dyn Heuristic>, i + 1.0),
                    (Box::new(ConstantHeuristic(j)) as Box<dyn Heuristic>, j + 1.0),
                ])
                .unwrap();
                assert_eq!(h2.estimate(&rs), i * (i + 1.0) + j * (j + 1.0));
            }
        }
    }

    #[test]
    fn empty_list_is_an_error() {
        assert_eq!(
            WeightedSumHeuristic::new(Vec::new()).unwrap_err(),
            WeightedSumErr::NoHeuristics
        );
    }
}
