//! Common contract implemented by every search strategy.
use crate::astar::AStarSolver;
use crate::engine::{Board, Move};
use crate::error::SolveError;
use crate::ida_star::IdaStarSolver;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Search counters collected during the last `solve` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Boards taken off the frontier (best-first) or probed (depth-bounded).
    pub expansions: usize,
}

/// A strategy turning a board into a sequence of moves that sorts it.
///
/// One instance runs one search at a time; its bookkeeping is reset at the start
/// of every `solve` call.
pub trait Solver {
    /// Short name used in reports.
    fn name(&self) -> &str;

    /// Finds a move sequence leading from `initial` to a terminal board.
    fn solve(&mut self, initial: &Board) -> Result<Vec<Move>, SolveError>;

    /// Counters of the last `solve` call.
    fn stats(&self) -> Stats;
}

/// Shared cancellation signal checked once per expansion.
#[derive(Clone, Debug, Default)]
pub(crate) struct StopFlag(Option<Arc<AtomicBool>>);

impl StopFlag {
    pub(crate) fn new(flag: Arc<AtomicBool>) -> Self {
        StopFlag(Some(flag))
    }

    #[inline]
    pub(crate) fn is_raised(&self) -> bool {
        self.0
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// The available search strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    AStar,
    Dijkstra,
    IdaStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::AStar, Algorithm::Dijkstra, Algorithm::IdaStar];

    /// Creates a fresh solver for this strategy.
    pub fn build(self) -> Box<dyn Solver> {
        match self {
            Algorithm::AStar => Box::new(AStarSolver::new()),
            Algorithm::Dijkstra => Box::new(AStarSolver::dijkstra()),
            Algorithm::IdaStar => Box::new(IdaStarSolver::new()),
        }
    }

    /// Like `build`, with the solver watching `stop_flag`.
    pub fn build_with_stop_flag(self, stop_flag: Arc<AtomicBool>) -> Box<dyn Solver> {
        match self {
            Algorithm::AStar => Box::new(AStarSolver::new().with_stop_flag(stop_flag)),
            Algorithm::Dijkstra => Box::new(AStarSolver::dijkstra().with_stop_flag(stop_flag)),
            Algorithm::IdaStar => Box::new(IdaStarSolver::new().with_stop_flag(stop_flag)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::AStar => "astar",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::IdaStar => "idastar",
        };
        f.write_str(name)
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "astar" | "a*" => Ok(Algorithm::AStar),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "idastar" | "ida*" => Ok(Algorithm::IdaStar),
            other => Err(format!(
                "unknown algorithm '{}', choices: astar, dijkstra, idastar",
                other
            )),
        }
    }
}
