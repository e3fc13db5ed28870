use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which heuristic drives the best-first search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// The recursive graph distance heuristic.
    Rgd,
    /// Novelty lexicographically before RGD, realized as a weighted sum.
    NoveltyRgd,
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Mode::Rgd => write!(f, "RGD"),
            Mode::NoveltyRgd => write!(f, "N+RGD"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeErr(String);

impl Display for ModeErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Unrecognized mode: {}", self.0)
    }
}

impl Error for ModeErr {}

impl FromStr for Mode {
    type Err = ModeErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RGD" => Ok(Mode::Rgd),
            "N+RGD" => Ok(Mode::NoveltyRgd),
            _ => Err(ModeErr(s.to_string())),
        }
    }
}
