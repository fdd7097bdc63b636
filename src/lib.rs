//! # Water Sort Solver Library
//!
//! This library provides the game logic for the water sort puzzle and three
//! search strategies that find a short sequence of pours sorting a board.
//!
//! It is used by three binaries:
//! - `play`: Allows interactive pouring via the command line, with undo and hints.
//! - `solve`: Takes a board in text notation and prints the moves of a solution.
//! - `evaluate`: Runs every strategy on seeded random boards and compares them.
//!
//! ## Modules
//! - `engine`: Contains the puzzle representation (`Color`, `Vessel`, `Board`, `Move`),
//!   the successor generator and the board keys used by the searches.
//! - `solver`: Defines the `Solver` trait, search statistics and `Algorithm` selection.
//! - `astar`: Best-first search, A* or Dijkstra depending on the heuristic.
//! - `ida_star`: Iterative-Deepening A*.
//! - `queue`: Min-heap with decrease-key used as the best-first frontier.
//! - `heuristics`: Lower bounds on the number of moves left.
//! - `error`: Parse, move and search errors.
//! - `logging`: Subscriber setup shared by the binaries.
//! - `utils`: Text notation of vessels and boards.

pub mod astar;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod ida_star;
pub mod logging;
pub mod queue;
pub mod solver;
pub mod utils;

pub use astar::AStarSolver;
pub use engine::{Board, Color, Move, Vessel, VESSEL_CAPACITY};
pub use error::{MoveError, ParseError, SolveError};
pub use ida_star::IdaStarSolver;
pub use solver::{Algorithm, Solver, Stats};
