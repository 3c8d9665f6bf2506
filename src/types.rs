//! This module defines the core data structures shared by the decoder, the compiler and the
//! executor: tape symbols, head directions, quintuples, the decoded transition table, the
//! execution outcome and the error types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Identifies a machine state. Descriptions number states from 1.
pub type StateId = usize;

/// The state every execution starts in.
pub const ENTRY_STATE: StateId = 1;

/// Character used to render a blank tape cell.
pub const BLANK_CHAR: char = '_';

/// A tape symbol. The standard description only knows three of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    /// Symbol number 0, rendered as `_`.
    Blank,
    /// Symbol number 1, rendered as `0`.
    Zero,
    /// Symbol number 2, rendered as `1`.
    One,
}

impl Symbol {
    /// Returns the symbol number used by the `C`-run encoding.
    pub fn number(self) -> usize {
        match self {
            Symbol::Blank => 0,
            Symbol::Zero => 1,
            Symbol::One => 2,
        }
    }

    /// Returns the character used for this symbol on a textual tape.
    pub fn as_char(self) -> char {
        match self {
            Symbol::Blank => BLANK_CHAR,
            Symbol::Zero => '0',
            Symbol::One => '1',
        }
    }

    /// Parses a tape character. Anything outside `_`, `0`, `1` is not a symbol.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            BLANK_CHAR => Some(Symbol::Blank),
            '0' => Some(Symbol::Zero),
            '1' => Some(Symbol::One),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left (`L`).
    Left,
    /// Move the head one position to the right (`R`).
    Right,
    /// Keep the head in the same position (`N`).
    Stay,
}

impl Direction {
    /// Parses a move letter of the standard description.
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            'N' => Some(Direction::Stay),
            _ => None,
        }
    }

    /// Returns the move letter of the standard description.
    pub fn letter(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'N',
        }
    }

    /// Applies the move to a head position.
    ///
    /// Returns `None` when the head would move left of position 0.
    pub fn apply(self, head: usize) -> Option<usize> {
        match self {
            Direction::Left => head.checked_sub(1),
            Direction::Right => head.checked_add(1),
            Direction::Stay => Some(head),
        }
    }
}

/// A single quintuple of a decoded standard description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state this rule belongs to.
    pub state: StateId,
    /// The symbol the rule expects under the head. `Blank` also acts as a wildcard.
    pub read: Symbol,
    /// The symbol written when the rule matches.
    pub write: Symbol,
    /// The head move, applied whether or not the rule matches.
    pub direction: Direction,
    /// The state entered when the rule matches.
    pub next_state: StateId,
}

impl Transition {
    /// Checks whether the rule fires for the symbol under the head.
    ///
    /// A blank read symbol is both the literal blank and "any symbol"; the notation does not
    /// distinguish the two, so a blank-reading rule matches every cell.
    pub fn accepts(&self, symbol: Symbol) -> bool {
        self.read == Symbol::Blank || self.read == symbol
    }
}

/// The decoded machine: one transition per state, ordered by state number.
///
/// Serializes as a list of transitions, each keyed by its own `state` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Transition>", into = "Vec<Transition>")]
pub struct TransitionTable {
    transitions: BTreeMap<StateId, Transition>,
}

impl TransitionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a transition, returning the one it replaced for the same state.
    pub fn insert(&mut self, transition: Transition) -> Option<Transition> {
        self.transitions.insert(transition.state, transition)
    }

    /// Returns the transition defined for `state`.
    pub fn get(&self, state: StateId) -> Option<&Transition> {
        self.transitions.get(&state)
    }

    /// Iterates over the transitions in ascending state order.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.values()
    }

    /// Iterates over the defined state numbers in ascending order.
    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.transitions.keys().copied()
    }

    /// Returns the highest defined state number.
    pub fn max_state(&self) -> Option<StateId> {
        self.transitions.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

impl FromIterator<Transition> for TransitionTable {
    fn from_iter<I: IntoIterator<Item = Transition>>(iter: I) -> Self {
        let mut table = Self::new();
        for transition in iter {
            table.insert(transition);
        }
        table
    }
}

impl From<Vec<Transition>> for TransitionTable {
    fn from(transitions: Vec<Transition>) -> Self {
        transitions.into_iter().collect()
    }
}

impl From<TransitionTable> for Vec<Transition> {
    fn from(table: TransitionTable) -> Self {
        table.transitions.into_values().collect()
    }
}

/// A named description together with its decoded table and an optional default tape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// The name of the program.
    pub name: String,
    /// The standard description the table was decoded from.
    pub description: String,
    /// The tape to run on when the caller does not provide one.
    pub tape: Option<String>,
    /// The decoded transitions.
    pub table: TransitionTable,
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Step {
    /// A transition fired (matching or not) and execution continues.
    Continue,
    /// The machine stopped.
    Halt(Halt),
}

/// Why a machine stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Halt {
    /// The head left the tape. This is the normal termination signal.
    OffTape,
    /// The current state has no transition in the table.
    UndefinedState(StateId),
    /// The caller's step budget ran out before the machine halted.
    StepLimit(usize),
}

/// Grammar violations found while decoding a standard description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A `C` appeared while no field was open.
    #[error("orphan symbol token 'C' at position {position}: no field is open")]
    OrphanSymbolToken { position: usize },
    /// An `A` appeared while no field was open.
    #[error("orphan state token 'A' at position {position}: no field is open")]
    OrphanStateToken { position: usize },
    /// Any other malformed input.
    #[error("unhandled sequence: {0}")]
    UnhandledSequence(String),
}

/// Represents the errors surfaced by the crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringError {
    /// The standard description could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
    /// A tape string contained a character outside `_`, `0`, `1`.
    #[error("Invalid tape symbol {symbol:?} at position {position}")]
    InvalidTapeSymbol { symbol: char, position: usize },
    /// The table failed static analysis.
    #[error("Table validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to reading program files.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(state: StateId, read: Symbol) -> Transition {
        Transition {
            state,
            read,
            write: Symbol::One,
            direction: Direction::Right,
            next_state: 2,
        }
    }

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        let stay_json = serde_json::to_string(&Direction::Stay).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(stay_json, "\"Stay\"");

        let left: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, Direction::Left);
    }

    #[test]
    fn test_direction_apply() {
        assert_eq!(Direction::Left.apply(0), None);
        assert_eq!(Direction::Left.apply(3), Some(2));
        assert_eq!(Direction::Right.apply(3), Some(4));
        assert_eq!(Direction::Stay.apply(3), Some(3));
    }

    #[test]
    fn test_symbol_chars() {
        for symbol in [Symbol::Blank, Symbol::Zero, Symbol::One] {
            assert_eq!(Symbol::from_char(symbol.as_char()), Some(symbol));
        }
        assert_eq!(Symbol::from_char('2'), None);
        assert_eq!(Symbol::from_char(' '), None);
    }

    #[test]
    fn test_blank_read_is_wildcard() {
        let wildcard = transition(1, Symbol::Blank);
        assert!(wildcard.accepts(Symbol::Blank));
        assert!(wildcard.accepts(Symbol::Zero));
        assert!(wildcard.accepts(Symbol::One));

        let exact = transition(1, Symbol::Zero);
        assert!(exact.accepts(Symbol::Zero));
        assert!(!exact.accepts(Symbol::One));
        assert!(!exact.accepts(Symbol::Blank));
    }

    #[test]
    fn test_table_replaces_state() {
        let mut table = TransitionTable::new();
        assert!(table.insert(transition(3, Symbol::Zero)).is_none());
        assert!(table.insert(transition(1, Symbol::Zero)).is_none());

        let replaced = table.insert(transition(3, Symbol::One));
        assert_eq!(replaced.map(|t| t.read), Some(Symbol::Zero));
        assert_eq!(table.len(), 2);
        assert_eq!(table.states().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(table.max_state(), Some(3));
    }

    #[test]
    fn test_table_serializes_as_transition_list() {
        let table: TransitionTable = [transition(2, Symbol::One), transition(1, Symbol::Zero)]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&table).unwrap();
        assert!(json.starts_with("[{\"state\":1,"));

        let back: TransitionTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_deserialized_table_keys_by_transition_state() {
        let json = r#"[{"state":5,"read":"Blank","write":"One","direction":"Right","next_state":1}]"#;
        let table: TransitionTable = serde_json::from_str(json).unwrap();

        assert!(table.get(1).is_none());
        assert_eq!(table.get(5).map(|t| t.state), Some(5));
        assert_eq!(table.states().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_error_display() {
        let error = TuringError::from(DecodeError::OrphanSymbolToken { position: 0 });
        let message = error.to_string();
        assert!(message.contains("Decode error"));
        assert!(message.contains("orphan symbol token"));
    }
}
