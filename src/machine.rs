//! This module defines the fixed-length [`Tape`] and the [`Machine`] that drives a compiled
//! table over it. Execution is an explicit loop holding the current state and head position;
//! it stops when the head leaves the tape.

use crate::compiler::{CompiledTable, Fired};
use crate::types::{Halt, StateId, Step, Symbol, TransitionTable, TuringError, ENTRY_STATE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// A fixed-length sequence of symbols. Its length never changes during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tape {
    cells: Vec<Symbol>,
}

impl Tape {
    /// Creates a tape of `len` blank cells.
    pub fn blank(len: usize) -> Self {
        Self {
            cells: vec![Symbol::Blank; len],
        }
    }

    /// Returns the symbol at `position`, or `None` past the end.
    pub fn get(&self, position: usize) -> Option<Symbol> {
        self.cells.get(position).copied()
    }

    /// Overwrites the cell at `position`. Positions past the end are ignored.
    pub fn set(&mut self, position: usize, symbol: Symbol) {
        if let Some(cell) = self.cells.get_mut(position) {
            *cell = symbol;
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }
}

impl FromStr for Tape {
    type Err = TuringError;

    /// Parses a tape written with `_`, `0` and `1`. Any other character is rejected.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.chars()
            .enumerate()
            .map(|(position, c)| {
                Symbol::from_char(c).ok_or(TuringError::InvalidTapeSymbol {
                    symbol: c,
                    position,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|cells| Self { cells })
    }
}

impl From<Vec<Symbol>> for Tape {
    fn from(cells: Vec<Symbol>) -> Self {
        Self { cells }
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells
            .iter()
            .try_for_each(|symbol| write!(f, "{}", symbol.as_char()))
    }
}

/// Executes a compiled table against one tape.
///
/// The table is borrowed, so one table can drive any number of machines, each owning its
/// own tape. Execution starts in state 1 with the head on cell 0.
pub struct Machine<'a> {
    table: &'a CompiledTable,
    initial_tape: Tape,
    tape: Tape,
    state: StateId,
    /// `None` once the head has moved left of cell 0.
    head: Option<usize>,
    step_count: usize,
}

impl<'a> Machine<'a> {
    pub fn new(table: &'a CompiledTable, tape: Tape) -> Self {
        Self {
            table,
            initial_tape: tape.clone(),
            tape,
            state: ENTRY_STATE,
            head: Some(0),
            step_count: 0,
        }
    }

    /// Fires the current state once.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition fired, whether or not it matched.
    /// * `Step::Halt(Halt::OffTape)` if the head is outside the tape.
    /// * `Step::Halt(Halt::UndefinedState(_))` if the current state has no transition.
    pub fn step(&mut self) -> Step {
        if let Some(halt) = self.halt_reason() {
            return Step::Halt(halt);
        }

        let Some(head) = self.head else {
            return Step::Halt(Halt::OffTape);
        };
        let Some(current) = self.table.state(self.state) else {
            return Step::Halt(Halt::UndefinedState(self.state));
        };

        match current.fire(&mut self.tape, head) {
            Fired::OffTape => Step::Halt(Halt::OffTape),
            Fired::Moved {
                matched,
                next_state,
                head: next_head,
            } => {
                trace!(
                    step = self.step_count,
                    state = self.state,
                    head,
                    matched,
                    next_state,
                    "fired"
                );
                self.state = next_state;
                self.head = next_head;
                self.step_count += 1;
                Step::Continue
            }
        }
    }

    /// Runs until the machine halts. There is no step limit: a table that never drives the
    /// head off the tape runs forever.
    pub fn run(&mut self) -> Halt {
        loop {
            if let Step::Halt(halt) = self.step() {
                debug!(steps = self.step_count, ?halt, "machine halted");
                return halt;
            }
        }
    }

    /// Runs at most `max_steps` steps.
    ///
    /// Returns `Halt::StepLimit(max_steps)` if the machine is still running afterwards.
    pub fn run_for(&mut self, max_steps: usize) -> Halt {
        for _ in 0..max_steps {
            if let Step::Halt(halt) = self.step() {
                debug!(steps = self.step_count, ?halt, "machine halted");
                return halt;
            }
        }

        self.halt_reason().unwrap_or_else(|| {
            debug!(steps = self.step_count, "step limit reached");
            Halt::StepLimit(max_steps)
        })
    }

    /// Returns why the machine cannot take another step, if it cannot.
    fn halt_reason(&self) -> Option<Halt> {
        match self.head {
            Some(head) if head < self.tape.len() => {}
            _ => return Some(Halt::OffTape),
        }

        if self.table.state(self.state).is_none() {
            return Some(Halt::UndefinedState(self.state));
        }

        None
    }

    pub fn is_halted(&self) -> bool {
        self.halt_reason().is_some()
    }

    /// Restores the initial tape, state and head.
    pub fn reset(&mut self) {
        self.tape = self.initial_tape.clone();
        self.state = ENTRY_STATE;
        self.head = Some(0);
        self.step_count = 0;
    }

    /// Returns the current state.
    pub fn state(&self) -> StateId {
        self.state
    }

    /// Returns the head position, or `None` once it has moved left of cell 0.
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn into_tape(self) -> Tape {
        self.tape
    }

    /// Returns the number of transitions fired so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }
}

/// Runs `table` on a textual tape and returns the final tape.
///
/// # Errors
///
/// * `TuringError::InvalidTapeSymbol` if `tape` contains anything other than `_`, `0`, `1`.
pub fn run(table: &TransitionTable, tape: &str) -> Result<String, TuringError> {
    let tape = tape.parse::<Tape>()?;
    let compiled = CompiledTable::compile(table);

    let mut machine = Machine::new(&compiled, tape);
    machine.run();

    Ok(machine.into_tape().to_string())
}
