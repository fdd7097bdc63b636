//! Heuristic functions estimating the number of moves left on a board.
//!
//! The best-first and depth-bounded solvers take any `HeuristicFn`. They rely on it
//! never overestimating the remaining moves and never increasing across a single
//! generated move.
use crate::engine::{Board, Color};
use std::collections::HashMap;

/// Signature shared by all heuristics.
pub type HeuristicFn = fn(&Board) -> u32;

/// Monotonic lower estimate of the number of moves to reach a terminal board.
///
/// Every non-empty vessel must still get rid of all but its lowest run, and when
/// `k` vessels share a bottom color at least `k - 1` of those bottoms have to be
/// moved as well.
///
/// # Examples
/// ```
/// use watersort_solver::engine::Board;
/// use watersort_solver::heuristics::lower_bound;
///
/// let board: Board = "ABA;BB;".parse().unwrap();
/// // "ABA" has three runs, "BB" has one; bottoms A and B are distinct.
/// assert_eq!(lower_bound(&board), 2);
/// ```
pub fn lower_bound(board: &Board) -> u32 {
    let mut estimate = 0;
    let mut bottom_colors: HashMap<Color, u32> = HashMap::new();

    for vessel in board.vessels() {
        let Some(bottom) = vessel.bottom_color() else {
            continue;
        };
        estimate += vessel.color_tower_count() as u32 - 1;
        *bottom_colors.entry(bottom).or_insert(0) += 1;
    }

    estimate + bottom_colors.values().map(|count| count - 1).sum::<u32>()
}

/// Always zero. Turns A* into Dijkstra's algorithm.
pub fn zero(_board: &Board) -> u32 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_lower_bound_terminal_is_zero() {
        assert_eq!(lower_bound(&board("AAAA;BBBB;;")), 0);
        assert_eq!(lower_bound(&board(";")), 0);
    }

    #[test]
    fn test_lower_bound_counts_towers_and_shared_bottoms() {
        // Towers: 1 + 3 + 3 + 3 + 1, bottom F shared by two vessels.
        assert_eq!(lower_bound(&board("RGGG;ORPG;PORO;FPOP;FFFR;;")), 12);
        assert_eq!(lower_bound(&board("O;OOO")), 1);
        assert_eq!(lower_bound(&board("FORF;OORF;RFOR;;")), 8);
    }

    #[test]
    fn test_lower_bound_never_increases() {
        for seed in 0..30 {
            let start = Board::new_random_with_seed(6, 2, seed);
            let mut frontier = vec![start];
            // Walk a couple of levels of the move graph from each random board.
            for _ in 0..2 {
                let mut next = Vec::new();
                for parent in &frontier {
                    let h = lower_bound(parent);
                    for child in parent.reachable_states() {
                        assert!(
                            lower_bound(&child) <= h,
                            "heuristic grew from {} to {}",
                            parent,
                            child
                        );
                        next.push(child);
                    }
                }
                frontier = next;
            }
        }
    }

    #[test]
    fn test_zero() {
        assert_eq!(zero(&board("ABAB;BABA;")), 0);
    }
}
