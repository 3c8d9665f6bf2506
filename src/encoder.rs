//! This module provides the inverse of the decoder: it renders a [`TransitionTable`] as a
//! standard description, as canonical quintuples, or as a machine number.

use crate::alphabet::standard_description_to_machine_number;
use crate::types::{Transition, TransitionTable};

/// Encodes a table as a standard description.
///
/// Each transition becomes `D A^state D C^read D C^write <move> D A^next ;`, in ascending state
/// order. Decoding the result yields the same table.
pub fn encode(table: &TransitionTable) -> String {
    table.iter().map(encode_transition).collect()
}

/// Encodes a table in the canonical `q<N>S<N>S<N><move>q<N>;` form.
pub fn encode_canonical(table: &TransitionTable) -> String {
    table
        .iter()
        .map(|t| {
            format!(
                "q{}S{}S{}{}q{};",
                t.state,
                t.read.number(),
                t.write.number(),
                t.direction.letter(),
                t.next_state
            )
        })
        .collect()
}

/// Encodes a table as a machine number (digits `1`-`7`).
pub fn encode_machine_number(table: &TransitionTable) -> String {
    standard_description_to_machine_number(&encode(table))
}

fn encode_transition(transition: &Transition) -> String {
    let mut out = String::new();

    push_state(&mut out, transition.state);
    push_symbol(&mut out, transition.read.number());
    push_symbol(&mut out, transition.write.number());
    out.push(transition.direction.letter());
    push_state(&mut out, transition.next_state);
    out.push(';');

    out
}

fn push_state(out: &mut String, state: usize) {
    out.push('D');
    out.extend(std::iter::repeat('A').take(state));
}

fn push_symbol(out: &mut String, symbol: usize) {
    out.push('D');
    out.extend(std::iter::repeat('C').take(symbol));
}
