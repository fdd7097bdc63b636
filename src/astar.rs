//! Best-first search over canonical board states: A* and, with the zero
//! heuristic, Dijkstra's algorithm.
use crate::engine::{Board, Move};
use crate::error::SolveError;
use crate::heuristics::{self, HeuristicFn};
use crate::queue::{Handle, IndexedPriorityQueue};
use crate::solver::{Solver, Stats, StopFlag};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, error};

/// Best known way to reach a canonical state.
///
/// Several positional boards can collapse onto the same canonical key at the
/// same distance, so every parent achieving that distance is kept.
#[derive(Debug, Clone)]
struct ParentRecord {
    parents: Vec<Board>,
    distance: u32,
}

/// Payload of a frontier entry; its queue priority is `distance + heuristic`.
#[derive(Debug, Clone)]
struct FrontierEntry {
    board: Board,
    distance: u32,
}

/// A* search keyed by `Board::canonical_key`.
///
/// # Examples
/// ```
/// use watersort_solver::astar::AStarSolver;
/// use watersort_solver::engine::Board;
/// use watersort_solver::solver::Solver;
///
/// let board: Board = "FOFO;OFOF;".parse().unwrap();
/// let moves = AStarSolver::new().solve(&board).unwrap();
/// assert_eq!(moves.len(), 7);
/// assert!(board.replay(&moves).unwrap().is_terminal());
/// ```
#[derive(Debug)]
pub struct AStarSolver {
    name: &'static str,
    heuristic: HeuristicFn,
    frontier: IndexedPriorityQueue<FrontierEntry>,
    parents: HashMap<String, ParentRecord>,
    handles: HashMap<String, Handle>,
    stop_flag: StopFlag,
    stats: Stats,
}

impl Default for AStarSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AStarSolver {
    /// A* guided by `heuristics::lower_bound`.
    pub fn new() -> Self {
        AStarSolver {
            name: "astar",
            heuristic: heuristics::lower_bound,
            frontier: IndexedPriorityQueue::new(),
            parents: HashMap::new(),
            handles: HashMap::new(),
            stop_flag: StopFlag::default(),
            stats: Stats::default(),
        }
    }

    /// Dijkstra's algorithm: A* with a heuristic that is always zero.
    pub fn dijkstra() -> Self {
        AStarSolver {
            name: "dijkstra",
            ..Self::new().with_heuristic(heuristics::zero)
        }
    }

    /// Replaces the heuristic. It must never increase across a generated move,
    /// otherwise `solve` fails with `SolveError::InconsistentHeuristic`.
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
        self.frontier.clear();
        self.parents.clear();
        self.handles.clear();
        self.stats = Stats::default();
    }

    fn expand(&mut self, board: &Board, distance: u32) -> Result<(), SolveError> {
        let parent_estimate = (self.heuristic)(board);
        let tentative = distance + 1;

        for child in board.reachable_states() {
            let estimate = (self.heuristic)(&child);
            if estimate > parent_estimate {
                error!(
                    parent = %board,
                    child = %child,
                    parent_estimate,
                    estimate,
                    "heuristic increased across a move"
                );
                return Err(SolveError::InconsistentHeuristic {
                    parent: parent_estimate,
                    child: estimate,
                    from: board.positional_key(),
                    to: child.positional_key(),
                });
            }

            match self.parents.entry(child.canonical_key()) {
                Entry::Vacant(slot) => {
                    let handle = self.frontier.push(
                        tentative + estimate,
                        FrontierEntry {
                            board: child,
                            distance: tentative,
                        },
                    );
                    self.handles.insert(slot.key().clone(), handle);
                    slot.insert(ParentRecord {
                        parents: vec![board.clone()],
                        distance: tentative,
                    });
                }
                Entry::Occupied(mut slot) => {
                    let record = slot.get_mut();
                    if tentative < record.distance {
                        // Settled states already hold their final distance.
                        let Some(&handle) = self.handles.get(slot.key()) else {
                            continue;
                        };
                        let record = slot.get_mut();
                        record.parents = vec![board.clone()];
                        record.distance = tentative;
                        if let Some(entry) = self.frontier.get_mut(handle) {
                            *entry = FrontierEntry {
                                board: child,
                                distance: tentative,
                            };
                        }
                        self.frontier.decrease_key(handle, tentative + estimate);
                    } else if tentative == record.distance {
                        record.parents.push(board.clone());
                    }
                }
            }
        }
        Ok(())
    }

    /// Walks parent records back from `terminal` to the initial board.
    fn collect_path_to(&self, terminal: Board) -> Result<Vec<Move>, SolveError> {
        let mut moves = Vec::new();
        let mut state = terminal;
        loop {
            let key = state.canonical_key();
            let Some(record) = self.parents.get(&key) else {
                error!(state = %state, "state on the solution path was never recorded");
                return Err(SolveError::BrokenPath(state.positional_key()));
            };
            if record.parents.is_empty() {
                moves.reverse();
                return Ok(moves);
            }

            // Canonical collisions mean only some recorded parents connect to
            // this exact vessel layout.
            let Some((mv, parent)) = record
                .parents
                .iter()
                .find_map(|parent| parent.step_to(&state).ok().map(|mv| (mv, parent)))
            else {
                error!(state = %state, candidates = record.parents.len(), "no parent leads to state");
                return Err(SolveError::BrokenPath(state.positional_key()));
            };
            moves.push(mv);
            state = parent.clone();
        }
    }
}

impl Solver for AStarSolver {
    fn name(&self) -> &str {
        self.name
    }

    fn solve(&mut self, initial: &Board) -> Result<Vec<Move>, SolveError> {
        self.reset();
        debug!(solver = self.name, board = %initial, "starting best-first search");

        let key = initial.canonical_key();
        let handle = self.frontier.push(
            (self.heuristic)(initial),
            FrontierEntry {
                board: initial.clone(),
                distance: 0,
            },
        );
        self.handles.insert(key.clone(), handle);
        self.parents.insert(
            key,
            ParentRecord {
                parents: Vec::new(),
                distance: 0,
            },
        );

        while let Some((_, _, FrontierEntry { board, distance })) = self.frontier.pop() {
            if self.stop_flag.is_raised() {
                debug!(solver = self.name, expansions = self.stats.expansions, "search cancelled");
                return Err(SolveError::Cancelled {
                    expansions: self.stats.expansions,
                });
            }
            self.stats.expansions += 1;
            self.handles.remove(&board.canonical_key());

            if board.is_terminal() {
                let moves = self.collect_path_to(board)?;
                debug!(
                    solver = self.name,
                    expansions = self.stats.expansions,
                    seen = self.parents.len(),
                    length = moves.len(),
                    "solution found"
                );
                return Ok(moves);
            }
            self.expand(&board, distance)?;
        }

        debug!(
            solver = self.name,
            expansions = self.stats.expansions,
            seen = self.parents.len(),
            "frontier exhausted"
        );
        Err(SolveError::NoSolution)
    }

    fn stats(&self) -> Stats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_already_terminal() {
        let mut solver = AStarSolver::new();
        let moves = solver.solve(&board("AAAA;;BBBB")).unwrap();
        assert!(moves.is_empty());
        assert_eq!(solver.stats().expansions, 1);
    }

    #[test]
    fn test_single_pour() {
        let mut solver = AStarSolver::new();
        let moves = solver.solve(&board("O;OOO")).unwrap();
        assert_eq!(moves, vec![Move::new(0, 1)]);
    }

    #[test]
    fn test_dijkstra_matches_astar_length() {
        let start = board("FORF;OORF;RFOR;;");
        let astar = AStarSolver::new().solve(&start).unwrap();
        let mut dijkstra = AStarSolver::dijkstra();
        let moves = dijkstra.solve(&start).unwrap();
        assert_eq!(moves.len(), 10);
        assert_eq!(astar.len(), moves.len());
        assert_eq!(dijkstra.name(), "dijkstra");
        assert!(start.replay(&moves).unwrap().is_terminal());
    }

    #[test]
    fn test_no_moves_means_no_solution() {
        let mut solver = AStarSolver::new();
        assert_eq!(
            solver.solve(&board("ABCD;BCDA;CDAB;DABC")),
            Err(SolveError::NoSolution)
        );
    }

    #[test]
    fn test_inconsistent_heuristic_is_fatal() {
        // Counting empty vessels grows when a merge empties a vessel.
        let mut solver = AStarSolver::new().with_heuristic(|b: &Board| {
            b.vessels().iter().filter(|v| v.is_empty()).count() as u32
        });
        let err = solver.solve(&board("O;OOO")).unwrap_err();
        assert!(matches!(err, SolveError::InconsistentHeuristic { parent: 0, child: 1, .. }));
        assert!(err.is_internal());
    }

    #[test]
    fn test_stop_flag_cancels() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut solver = AStarSolver::new().with_stop_flag(flag.clone());
        assert_eq!(
            solver.solve(&board("FOFO;OFOF;")),
            Err(SolveError::Cancelled { expansions: 0 })
        );
        flag.store(false, Ordering::Relaxed);
        assert_eq!(solver.solve(&board("FOFO;OFOF;")).map(|m| m.len()), Ok(7));
    }

    #[test]
    fn test_solver_is_reusable() {
        let mut solver = AStarSolver::new();
        assert_eq!(solver.solve(&board("FOFO;OFOF;")).unwrap().len(), 7);
        assert_eq!(solver.solve(&board("O;OOO")).unwrap().len(), 1);
        assert_eq!(solver.stats().expansions, 2);
    }

    #[test]
    fn test_collect_path_skips_parents_with_other_layouts() {
        // Both recorded parents share the canonical key of "A;AAA;" but only
        // the second one connects to the stored child layout.
        let start = board("A;AAA;");
        let child = start.apply(Move::new(0, 1)).unwrap();
        let mut solver = AStarSolver::new();
        solver.parents.insert(
            start.canonical_key(),
            ParentRecord {
                parents: Vec::new(),
                distance: 0,
            },
        );
        solver.parents.insert(
            child.canonical_key(),
            ParentRecord {
                parents: vec![board("AAA;;A"), start.clone()],
                distance: 1,
            },
        );
        assert_eq!(solver.collect_path_to(child), Ok(vec![Move::new(0, 1)]));
    }

    #[test]
    fn test_collect_path_reports_broken_path() {
        let start = board("A;AAA;");
        let child = start.apply(Move::new(0, 1)).unwrap();
        let mut solver = AStarSolver::new();
        solver.parents.insert(
            child.canonical_key(),
            ParentRecord {
                parents: vec![board("AB;B;")],
                distance: 1,
            },
        );
        assert!(matches!(
            solver.collect_path_to(child),
            Err(SolveError::BrokenPath(_))
        ));
    }
}
