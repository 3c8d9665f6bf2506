//! This module provides static checks over a decoded [`TransitionTable`]. None of them affect
//! decoding or execution: a table that fails analysis still runs, halting when it reaches a
//! state it does not define.

use crate::types::{StateId, TransitionTable, TuringError, ENTRY_STATE};
use std::collections::{BTreeSet, VecDeque};

/// Represents the problems analysis can find in a table.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The table does not define the entry state, so every run halts immediately.
    MissingEntryState,
    /// Transitions lead to states the table does not define.
    UndefinedNextStates(Vec<StateId>),
    /// Defined states that no path from the entry state reaches.
    UnreachableStates(Vec<StateId>),
}

impl From<AnalysisError> for TuringError {
    /// Converts an `AnalysisError` into a `TuringError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::MissingEntryState => TuringError::ValidationError(format!(
                "Entry state {ENTRY_STATE} is not defined"
            )),
            AnalysisError::UndefinedNextStates(states) => TuringError::ValidationError(format!(
                "Transitions reference undefined states: {:?}",
                states
            )),
            AnalysisError::UnreachableStates(states) => TuringError::ValidationError(format!(
                "Unreachable states detected: {:?}",
                states
            )),
        }
    }
}

/// Analyzes a table and fails on the first problem found.
///
/// # Returns
///
/// * `Ok(())` if no problems are found.
/// * `Err(TuringError::ValidationError)` otherwise.
pub fn analyze(table: &TransitionTable) -> Result<(), TuringError> {
    match diagnostics(table).into_iter().next() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

/// Runs every check and returns all problems found, in check order.
pub fn diagnostics(table: &TransitionTable) -> Vec<AnalysisError> {
    [
        check_entry_state,
        check_next_states,
        check_unreachable_states,
    ]
    .iter()
    .filter_map(|check| check(table).err())
    .collect()
}

fn check_entry_state(table: &TransitionTable) -> Result<(), AnalysisError> {
    if table.get(ENTRY_STATE).is_none() {
        return Err(AnalysisError::MissingEntryState);
    }

    Ok(())
}

fn check_next_states(table: &TransitionTable) -> Result<(), AnalysisError> {
    let undefined: BTreeSet<StateId> = table
        .iter()
        .map(|t| t.next_state)
        .filter(|&next| table.get(next).is_none())
        .collect();

    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedNextStates(
            undefined.into_iter().collect(),
        ));
    }

    Ok(())
}

/// Walks the table from the entry state. A state only ever leads to itself or its
/// `next_state`, so reachability is a single chain.
fn check_unreachable_states(table: &TransitionTable) -> Result<(), AnalysisError> {
    if table.get(ENTRY_STATE).is_none() {
        // Reported by `check_entry_state`.
        return Ok(());
    }

    let mut reachable = BTreeSet::new();
    let mut queue = VecDeque::from([ENTRY_STATE]);

    while let Some(state) = queue.pop_front() {
        if !reachable.insert(state) {
            continue;
        }
        if let Some(transition) = table.get(state) {
            queue.push_back(transition.next_state);
        }
    }

    let unreachable: Vec<StateId> = table
        .states()
        .filter(|state| !reachable.contains(state))
        .collect();

    if !unreachable.is_empty() {
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}
