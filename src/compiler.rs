//! This module compiles a [`TransitionTable`] into executable states. Each entry carries the
//! firing logic for one state: test the symbol under the head, write on a match, always move,
//! and pick the successor state.

use crate::machine::Tape;
use crate::types::{StateId, Transition, TransitionTable};
use std::collections::HashMap;
use tracing::debug;

/// What happened when a state fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fired {
    /// The head was already past the end of the tape. Nothing was read or written.
    OffTape,
    /// The state ran. `head` is `None` when the move took the head left of position 0.
    Moved {
        matched: bool,
        next_state: StateId,
        head: Option<usize>,
    },
}

/// One executable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledState {
    transition: Transition,
}

impl CompiledState {
    fn new(transition: &Transition) -> Self {
        Self {
            transition: transition.clone(),
        }
    }

    /// Runs this state once against `tape` with the head at `head`.
    ///
    /// The move is applied on both branches. On a mismatch nothing is written and the machine
    /// stays in this state, so a state scans across cells it does not expect.
    pub fn fire(&self, tape: &mut Tape, head: usize) -> Fired {
        let Some(symbol) = tape.get(head) else {
            return Fired::OffTape;
        };

        let rule = &self.transition;
        let candidate = rule.direction.apply(head);

        let matched = rule.accepts(symbol);
        let next_state = if matched {
            tape.set(head, rule.write);
            rule.next_state
        } else {
            rule.state
        };

        Fired::Moved {
            matched,
            next_state,
            head: candidate,
        }
    }

    pub fn state(&self) -> StateId {
        self.transition.state
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }
}

/// Executable states keyed by state number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledTable {
    states: HashMap<StateId, CompiledState>,
}

impl CompiledTable {
    /// Compiles every transition of `table`.
    pub fn compile(table: &TransitionTable) -> Self {
        let states: HashMap<_, _> = table
            .iter()
            .map(|transition| (transition.state, CompiledState::new(transition)))
            .collect();

        debug!(states = states.len(), "compiled transition table");

        Self { states }
    }

    /// Returns the executable state for `state`, if the table defines one.
    pub fn state(&self, state: StateId) -> Option<&CompiledState> {
        self.states.get(&state)
    }

    /// Returns the number of defined states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl From<&TransitionTable> for CompiledTable {
    fn from(table: &TransitionTable) -> Self {
        Self::compile(table)
    }
}
