//! Error types shared by the board model, the notation parser and the solvers.
use thiserror::Error;

/// Errors raised while reading a board from its text notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A vessel string holds more units than a vessel can carry.
    #[error("vessel {vessel} holds {units} units, capacity is {capacity}")]
    TooManyUnits {
        vessel: usize,
        units: usize,
        capacity: usize,
    },

    /// A vessel string contains the empty sentinel or the separator.
    #[error("vessel {vessel} contains invalid color {color:?}")]
    InvalidColor { vessel: usize, color: char },
}

/// Errors raised by vessel and board mutations.
///
/// Generated moves never trigger these; seeing one during a search means the
/// move generator and the board model disagree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("cannot pour {height} units into a vessel with {free} free slots")]
    CapacityExceeded { height: usize, free: usize },

    #[error("cannot pour the empty color or the vessel separator")]
    InvalidColor,

    #[error("illegal move {from} -> {to}: {reason}")]
    IllegalMove {
        from: usize,
        to: usize,
        reason: String,
    },

    #[error("invalid child board: {0}")]
    InvalidChild(String),
}

/// Outcome of a failed `Solver::solve` call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The puzzle has no solution.
    #[error("solution doesn't exist")]
    NoSolution,

    /// The stop flag was raised while the search was running.
    #[error("search cancelled after {expansions} expansions")]
    Cancelled { expansions: usize },

    /// A successor scored a higher heuristic than its parent.
    #[error("heuristic is not monotonous: {parent} -> {child} between {from:?} and {to:?}")]
    InconsistentHeuristic {
        parent: u32,
        child: u32,
        from: String,
        to: String,
    },

    /// No recorded parent connects to a board on the solution path.
    #[error("cannot find previous step for state {0:?}")]
    BrokenPath(String),
}

impl SolveError {
    /// Returns `true` for failures caused by a bug rather than by the puzzle or the caller.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            SolveError::InconsistentHeuristic { .. } | SolveError::BrokenPath(_)
        )
    }
}
