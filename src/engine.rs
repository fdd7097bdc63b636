//! Core model of the water sort puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Color`: an opaque unit of liquid.
//! - `Vessel`: a fixed-capacity stack of units with pour and pop primitives.
//! - `Board`: the ordered set of vessels, its successor generator and its
//!   positional and canonical keys.
//! - `Move`: a single pour between two vessels of one board ordering.
use crate::error::MoveError;
use crate::heuristics;
use crate::utils;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::fmt;

/// Number of units a vessel can hold.
pub const VESSEL_CAPACITY: usize = 4;

/// Colors handed out by `Board::new_random_with_seed`.
const RANDOM_PALETTE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A unit of liquid. Only equality between colors matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color(char);

impl Color {
    /// Marks a slot holding no unit.
    pub const NONE: Color = Color('\0');

    pub fn new(symbol: char) -> Self {
        Color(symbol)
    }

    pub fn to_char(self) -> char {
        self.0
    }

    pub fn is_none(self) -> bool {
        self == Color::NONE
    }
}

/// A fixed-capacity vessel. Units are stored bottom to top and are always
/// contiguous from the bottom slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vessel {
    units: [Color; VESSEL_CAPACITY],
}

impl Default for Vessel {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl Vessel {
    pub fn new_empty() -> Self {
        Vessel {
            units: [Color::NONE; VESSEL_CAPACITY],
        }
    }

    /// Builds a vessel from units listed bottom to top.
    pub fn from_units(units: &[Color]) -> Result<Self, MoveError> {
        let mut vessel = Vessel::new_empty();
        for &color in units {
            vessel.pour_in(color, 1)?;
        }
        Ok(vessel)
    }

    /// Filled slots, bottom to top.
    pub fn units(&self) -> &[Color] {
        &self.units[..self.size()]
    }

    pub fn size(&self) -> usize {
        self.units
            .iter()
            .position(|c| c.is_none())
            .unwrap_or(VESSEL_CAPACITY)
    }

    pub fn free_capacity(&self) -> usize {
        VESSEL_CAPACITY - self.size()
    }

    pub fn is_full(&self) -> bool {
        !self.units[VESSEL_CAPACITY - 1].is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.units[0].is_none()
    }

    /// A vessel is finished when it is empty or full of a single color.
    pub fn is_finished(&self) -> bool {
        if self.is_empty() {
            return true;
        }
        self.is_full() && self.units.windows(2).all(|w| w[0] == w[1])
    }

    /// Number of maximal same-color runs stacked in the vessel.
    pub fn color_tower_count(&self) -> usize {
        let units = self.units();
        if units.is_empty() {
            return 0;
        }
        1 + units.windows(2).filter(|w| w[0] != w[1]).count()
    }

    /// Color of the lowest unit, `None` for an empty vessel.
    pub fn bottom_color(&self) -> Option<Color> {
        if self.is_empty() {
            None
        } else {
            Some(self.units[0])
        }
    }

    /// Color and height of the topmost run.
    pub fn top_run(&self) -> Option<(Color, usize)> {
        let units = self.units();
        let top = *units.last()?;
        let height = units.iter().rev().take_while(|&&c| c == top).count();
        Some((top, height))
    }

    /// Removes the topmost run and returns it. An empty vessel is left untouched.
    pub fn pop_top(&mut self) -> Option<(Color, usize)> {
        let (color, height) = self.top_run()?;
        let size = self.size();
        for slot in &mut self.units[size - height..size] {
            *slot = Color::NONE;
        }
        Some((color, height))
    }

    /// Stacks `height` units of `color` on top of the vessel. Neither `Color::NONE`
    /// nor the notation separator can be poured.
    pub fn pour_in(&mut self, color: Color, height: usize) -> Result<(), MoveError> {
        let free = self.free_capacity();
        if height > free {
            return Err(MoveError::CapacityExceeded { height, free });
        }
        if color.is_none() || color.to_char() == utils::SEPARATOR {
            return Err(MoveError::InvalidColor);
        }
        let size = self.size();
        for slot in &mut self.units[size..size + height] {
            *slot = color;
        }
        Ok(())
    }
}

/// A single pour. Indices are 0-based and refer to one fixed board ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

impl Move {
    pub fn new(from: usize, to: usize) -> Self {
        Move { from, to }
    }
}

impl fmt::Display for Move {
    /// Prints the move with 1-based vessel numbers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from + 1, self.to + 1)
    }
}

/// Per-vessel facts used while grouping consolidation moves.
#[derive(Clone, Copy, Debug)]
struct PourCandidate {
    index: usize,
    free_capacity: usize,
    top_height: usize,
}

/// The full puzzle state: an ordered list of vessels.
///
/// Derived equality is positional. Searches identify states by
/// `canonical_key`, which ignores vessel order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    vessels: Vec<Vessel>,
}

impl Board {
    pub fn new(vessels: Vec<Vessel>) -> Self {
        Board { vessels }
    }

    /// Creates a shuffled board with `colors` full vessels worth of units spread over
    /// `colors` vessels, followed by `empty_vessels` empty ones.
    ///
    /// The same seed always produces the same board. The board is not guaranteed to
    /// be solvable.
    ///
    /// # Panics
    /// Panics if `colors` exceeds the 26 available color letters.
    pub fn new_random_with_seed(colors: usize, empty_vessels: usize, seed: u64) -> Self {
        assert!(
            colors <= RANDOM_PALETTE.len(),
            "at most {} colors are supported, got {}",
            RANDOM_PALETTE.len(),
            colors
        );
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut units: Vec<Color> = RANDOM_PALETTE
            .chars()
            .take(colors)
            .flat_map(|c| std::iter::repeat(Color::new(c)).take(VESSEL_CAPACITY))
            .collect();
        units.shuffle(&mut rng);

        let mut vessels: Vec<Vessel> = units
            .chunks(VESSEL_CAPACITY)
            .map(|chunk| {
                let mut vessel = Vessel::new_empty();
                vessel.units.copy_from_slice(chunk);
                vessel
            })
            .collect();
        vessels.extend(std::iter::repeat(Vessel::new_empty()).take(empty_vessels));
        Board { vessels }
    }

    pub fn vessels(&self) -> &[Vessel] {
        &self.vessels
    }

    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }

    /// The game ends once every vessel is finished.
    pub fn is_terminal(&self) -> bool {
        self.vessels.iter().all(Vessel::is_finished)
    }

    /// Lower bound on the number of moves left. See `heuristics::lower_bound`.
    pub fn heuristic(&self) -> u32 {
        heuristics::lower_bound(self)
    }

    /// Whether `mv` is a pour the game itself would accept: the source holds
    /// liquid, and its whole top run lands on an empty vessel or on the same color.
    pub fn is_legal(&self, mv: Move) -> bool {
        if mv.from == mv.to || mv.from >= self.len() || mv.to >= self.len() {
            return false;
        }
        let source = &self.vessels[mv.from];
        let target = &self.vessels[mv.to];
        let Some((color, height)) = source.top_run() else {
            return false;
        };
        match target.top_run() {
            None => true,
            Some((top, _)) => top == color && height <= target.free_capacity(),
        }
    }

    /// Enumerates the moves explored by the solvers.
    ///
    /// Two classes are produced: merging a top run onto another vessel with the
    /// same top color and enough room, and spilling a run into an empty vessel.
    /// Empty vessels are interchangeable, so only the first one is used as a
    /// spill target.
    pub fn generate_moves(&self) -> Vec<Move> {
        let mut groups: BTreeMap<Color, Vec<PourCandidate>> = BTreeMap::new();
        let mut non_empty = Vec::new();
        let mut first_empty = None;

        for (index, vessel) in self.vessels.iter().enumerate() {
            let Some((color, top_height)) = vessel.top_run() else {
                first_empty.get_or_insert(index);
                continue;
            };
            non_empty.push(index);
            groups.entry(color).or_default().push(PourCandidate {
                index,
                free_capacity: vessel.free_capacity(),
                top_height,
            });
        }

        let mut moves = Vec::new();
        for candidates in groups.into_values() {
            consolidation_moves(candidates, &mut moves);
        }
        if let Some(empty) = first_empty {
            moves.extend(non_empty.into_iter().map(|from| Move::new(from, empty)));
        }
        moves
    }

    /// Boards reachable from this one in exactly one generated move.
    ///
    /// # Panics
    /// Panics if a generated move cannot be applied, which means the generator
    /// and the vessel model disagree.
    pub fn reachable_states(&self) -> Vec<Board> {
        self.generate_moves()
            .into_iter()
            .map(|mv| match self.apply(mv) {
                Ok(board) => board,
                Err(err) => panic!("logic error: generated move {mv} is not applicable: {err}"),
            })
            .collect()
    }

    /// Returns a new board with the source's top run poured into the destination.
    pub fn apply(&self, mv: Move) -> Result<Board, MoveError> {
        let illegal = |reason: String| MoveError::IllegalMove {
            from: mv.from,
            to: mv.to,
            reason,
        };
        if mv.from >= self.len() || mv.to >= self.len() {
            return Err(illegal(format!("board has {} vessels", self.len())));
        }
        if mv.from == mv.to {
            return Err(illegal("source and destination are the same vessel".to_string()));
        }

        let mut next = self.clone();
        let (color, height) = next.vessels[mv.from]
            .pop_top()
            .ok_or_else(|| illegal("source vessel is empty".to_string()))?;
        next.vessels[mv.to]
            .pour_in(color, height)
            .map_err(|err| illegal(err.to_string()))?;
        Ok(next)
    }

    /// Applies `moves` in order and returns the final board.
    pub fn replay(&self, moves: &[Move]) -> Result<Board, MoveError> {
        let mut board = self.clone();
        for &mv in moves {
            board = board.apply(mv)?;
        }
        Ok(board)
    }

    /// Recovers the move that turns `self` into `child`, which must share this
    /// board's vessel order.
    pub fn step_to(&self, child: &Board) -> Result<Move, MoveError> {
        if self.len() != child.len() {
            return Err(MoveError::InvalidChild(format!(
                "has {} vessels, but parent has {}",
                child.len(),
                self.len()
            )));
        }

        let mut from = None;
        let mut to = None;
        for (i, (before, after)) in self.vessels.iter().zip(&child.vessels).enumerate() {
            let slot = match before.size().cmp(&after.size()) {
                std::cmp::Ordering::Less => &mut to,
                std::cmp::Ordering::Greater => &mut from,
                std::cmp::Ordering::Equal => continue,
            };
            if slot.replace(i).is_some() {
                return Err(MoveError::InvalidChild(
                    "more than two vessels changed size".to_string(),
                ));
            }
        }

        let (Some(from), Some(to)) = (from, to) else {
            return Err(MoveError::InvalidChild(
                "no single pour changes the vessel sizes this way".to_string(),
            ));
        };
        let mv = Move::new(from, to);
        let next = self
            .apply(mv)
            .map_err(|err| MoveError::InvalidChild(err.to_string()))?;
        if next != *child {
            return Err(MoveError::InvalidChild(
                "parent + step and child differ".to_string(),
            ));
        }
        Ok(mv)
    }

    /// Order-sensitive identity of the board.
    pub fn positional_key(&self) -> String {
        utils::board_to_notation(self)
    }

    /// Identity of the board with vessel order ignored.
    pub fn canonical_key(&self) -> String {
        utils::board_to_canonical_notation(self)
    }

    /// Renders the vessels as columns, top slot first, with ANSI highlighting of
    /// the source (red) and destination (green) of `mv`.
    pub fn to_string_with_highlight(&self, mv: Option<Move>) -> String {
        let mut output = String::new();
        for i in 0..self.len() {
            output.push_str(&format!("{:<3}", i + 1));
        }
        for slot in (0..VESSEL_CAPACITY).rev() {
            output.push('\n');
            for (i, vessel) in self.vessels.iter().enumerate() {
                let symbol = vessel.units().get(slot).map_or('.', |c| c.to_char());
                let code = match mv {
                    Some(m) if m.from == i => Some("41"),
                    Some(m) if m.to == i => Some("42"),
                    _ => None,
                };
                match code {
                    Some(code) => output.push_str(&format!("\x1b[1;{}m{}\x1b[m  ", code, symbol)),
                    None => output.push_str(&format!("{}  ", symbol)),
                }
            }
        }
        output
    }
}

/// Emits non-dominated merges among vessels sharing a top color: each run,
/// smallest first, goes to every other vessel with room for it.
fn consolidation_moves(candidates: Vec<PourCandidate>, moves: &mut Vec<Move>) {
    let mut by_height = candidates.clone();
    by_height.sort_by_key(|c| c.top_height);
    let mut by_capacity = candidates;
    by_capacity.sort_by_key(|c| c.free_capacity);

    let mut first_fit = 0;
    for source in &by_height {
        while first_fit < by_capacity.len()
            && by_capacity[first_fit].free_capacity < source.top_height
        {
            first_fit += 1;
        }
        for target in &by_capacity[first_fit..] {
            if target.index != source.index {
                moves.push(Move::new(source.index, target.index));
            }
        }
    }
}

impl fmt::Display for Vessel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&utils::vessel_to_notation(self))
    }
}

impl fmt::Display for Board {
    /// Formats the board in its positional text notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.positional_key())
    }
}
