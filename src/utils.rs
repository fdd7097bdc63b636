use crate::engine::{Board, Color, Vessel, VESSEL_CAPACITY};
use crate::error::ParseError;
use std::str::FromStr;

/// Separates vessels in the text notation. Never a valid color.
pub const SEPARATOR: char = ';';

/// Writes a vessel's units bottom to top.
pub fn vessel_to_notation(vessel: &Vessel) -> String {
    vessel.units().iter().map(|c| c.to_char()).collect()
}

/// Joins the vessel strings in board order.
pub fn board_to_notation(board: &Board) -> String {
    join_vessels(board.vessels().iter().map(vessel_to_notation).collect())
}

/// Like `board_to_notation`, but with vessel strings sorted so that any
/// permutation of the vessels yields the same text.
pub fn board_to_canonical_notation(board: &Board) -> String {
    let mut vessels: Vec<String> = board.vessels().iter().map(vessel_to_notation).collect();
    vessels.sort_unstable();
    join_vessels(vessels)
}

fn join_vessels(vessels: Vec<String>) -> String {
    let mut separator = [0u8; 4];
    vessels.join(SEPARATOR.encode_utf8(&mut separator))
}

/// Parses one vessel, listed bottom to top. `index` is only used for error reporting.
///
/// # Examples
/// ```
/// use watersort_solver::utils::vessel_from_notation;
///
/// let vessel = vessel_from_notation("ABB", 0).unwrap();
/// assert_eq!(vessel.size(), 3);
/// assert!(vessel_from_notation("ABCDE", 0).is_err());
/// assert!(vessel_from_notation("A;", 0).is_err());
/// ```
pub fn vessel_from_notation(s: &str, index: usize) -> Result<Vessel, ParseError> {
    let units = s.chars().count();
    if units > VESSEL_CAPACITY {
        return Err(ParseError::TooManyUnits {
            vessel: index,
            units,
            capacity: VESSEL_CAPACITY,
        });
    }

    let mut vessel = Vessel::new_empty();
    for symbol in s.chars() {
        let color = Color::new(symbol);
        if symbol == SEPARATOR || color.is_none() {
            return Err(ParseError::InvalidColor {
                vessel: index,
                color: symbol,
            });
        }
        vessel
            .pour_in(color, 1)
            .map_err(|_| ParseError::InvalidColor {
                vessel: index,
                color: symbol,
            })?;
    }
    Ok(vessel)
}

/// Parses a board written as vessel strings joined by `;`.
///
/// An empty vessel is an empty string between two separators, so `"AB;;BA"` has
/// three vessels and `"AB;BA;"` ends with an empty one.
///
/// # Examples
/// ```
/// use watersort_solver::utils::board_from_notation;
///
/// let board = board_from_notation("FOFO;OFOF;").unwrap();
/// assert_eq!(board.len(), 3);
/// assert!(board.vessels()[2].is_empty());
/// assert_eq!(board.to_string(), "FOFO;OFOF;");
/// ```
pub fn board_from_notation(s: &str) -> Result<Board, ParseError> {
    let vessels = s
        .split(SEPARATOR)
        .enumerate()
        .map(|(index, vessel)| vessel_from_notation(vessel, index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Board::new(vessels))
}

impl FromStr for Board {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        board_from_notation(s)
    }
}

impl FromStr for Vessel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        vessel_from_notation(s, 0)
    }
}
