//! Iterative-Deepening A*.
//!
//! Each probe is a depth-first search cut off where `depth + heuristic` exceeds the
//! current bound. The smallest value that overflowed becomes the next bound. The
//! search keeps one path and the canonical keys on it, pushing before each
//! recursive call and popping after it, so no state repeats along a path.
use crate::engine::{Board, Move};
use crate::error::SolveError;
use crate::heuristics::{self, HeuristicFn};
use crate::solver::{Solver, Stats, StopFlag};
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, error, trace};

/// Result of one bounded probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// A terminal board is at the end of the current path.
    Found,
    /// Nothing found within the bound. Carries the smallest `f` that exceeded it,
    /// or `None` if no successor overflowed.
    Exceeded(Option<u32>),
}

fn min_bound(a: Option<u32>, b: Option<u32>) -> Option<u32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

#[derive(Debug)]
pub struct IdaStarSolver {
    heuristic: HeuristicFn,
    path: Vec<Board>,
    path_keys: HashSet<String>,
    stop_flag: StopFlag,
    stats: Stats,
}

impl Default for IdaStarSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IdaStarSolver {
    pub fn new() -> Self {
        IdaStarSolver {
            heuristic: heuristics::lower_bound,
            path: Vec::new(),
            path_keys: HashSet::new(),
            stop_flag: StopFlag::default(),
            stats: Stats::default(),
        }
    }

    /// Replaces the heuristic. It must never overestimate the remaining moves.
    pub fn with_heuristic(mut self, heuristic: HeuristicFn) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Makes `solve` return `SolveError::Cancelled` once `stop_flag` is set.
    pub fn with_stop_flag(mut self, stop_flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = StopFlag::new(stop_flag);
        self
    }

    fn reset(&mut self) {
        self.path.clear();
        self.path_keys.clear();
        self.stats = Stats::default();
    }

    /// Explores below `state`, the last board of `self.path`.
    fn probe(&mut self, state: &Board, bound: u32) -> Result<Probe, SolveError> {
        if self.stop_flag.is_raised() {
            return Err(SolveError::Cancelled {
                expansions: self.stats.expansions,
            });
        }
        self.stats.expansions += 1;

        let depth = (self.path.len() - 1) as u32;
        let estimate = depth + (self.heuristic)(state);
        if estimate > bound {
            return Ok(Probe::Exceeded(Some(estimate)));
        }
        if state.is_terminal() {
            return Ok(Probe::Found);
        }

        let mut next_bound = None;
        for child in state.reachable_states() {
            let key = child.canonical_key();
            if !self.path_keys.insert(key.clone()) {
                continue;
            }
            self.path.push(child.clone());

            match self.probe(&child, bound)? {
                Probe::Found => return Ok(Probe::Found),
                Probe::Exceeded(candidate) => next_bound = min_bound(next_bound, candidate),
            }

            self.path.pop();
            self.path_keys.remove(&key);
        }
        Ok(Probe::Exceeded(next_bound))
    }

    /// Turns the retained path into moves.
    fn compose_path(&self) -> Result<Vec<Move>, SolveError> {
        self.path
            .windows(2)
            .map(|pair| {
                pair[0].step_to(&pair[1]).map_err(|err| {
                    error!(parent = %pair[0], child = %pair[1], %err, "path step cannot be recovered");
                    SolveError::BrokenPath(pair[1].positional_key())
                })
            })
            .collect()
    }
}

impl Solver for IdaStarSolver {
    fn name(&self) -> &str {
        "idastar"
    }

    fn solve(&mut self, initial: &Board) -> Result<Vec<Move>, SolveError> {
        self.reset();
        debug!(board = %initial, "starting iterative deepening search");

        self.path.push(initial.clone());
        self.path_keys.insert(initial.canonical_key());

        let mut bound = (self.heuristic)(initial);
        loop {
            trace!(bound, expansions = self.stats.expansions, "probing");
            match self.probe(initial, bound)? {
                Probe::Found => {
                    let moves = self.compose_path()?;
                    debug!(
                        expansions = self.stats.expansions,
                        length = moves.len(),
                        "solution found"
                    );
                    return Ok(moves);
                }
                Probe::Exceeded(Some(next)) => bound = next,
                Probe::Exceeded(None) => {
                    debug!(expansions = self.stats.expansions, "search space exhausted");
                    return Err(SolveError::NoSolution);
                }
            }
        }
    }

    fn stats(&self) -> Stats {
        self.stats
    }
}
