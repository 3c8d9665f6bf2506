//! This module parses the canonical quintuple form (`q1S0S1Rq2;...`) into a
//! [`TransitionTable`], using the `pest` grammar in `grammar.pest`.

use crate::alphabet::symbol_for_number;
use crate::types::{DecodeError, Direction, StateId, Symbol, Transition, TransitionTable};
use pest::{
    error::{Error, InputLocation},
    iterators::Pair,
    Parser as PestParser,
};
use pest_derive::Parser as PestParser;
use tracing::{debug, warn};

/// Derives a `PestParser` for the canonical form defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct CanonicalParser;

/// Parses a canonical quintuple string into a transition table.
///
/// Each record yields one transition. When a state is defined more than once the later
/// record wins.
///
/// # Returns
///
/// * `Ok(TransitionTable)` for well-formed input, including the empty string.
/// * `Err(DecodeError::UnhandledSequence)` if any record is malformed.
pub fn parse(canonical: &str) -> Result<TransitionTable, DecodeError> {
    let root = CanonicalParser::parse(Rule::table, canonical)
        .map_err(|e| malformed(canonical, e))?
        .next()
        .ok_or_else(|| DecodeError::UnhandledSequence("empty parse tree".to_string()))?;

    let mut table = TransitionTable::new();

    for pair in root.into_inner() {
        if pair.as_rule() != Rule::instruction {
            continue;
        }

        let transition = parse_instruction(pair)?;
        let state = transition.state;
        if table.insert(transition).is_some() {
            warn!(state, "state defined more than once; keeping the later definition");
        }
    }

    debug!(states = table.len(), "decoded transition table");

    Ok(table)
}

/// Parses a single `q<N>S<N>S<N><move>q<N>` record.
fn parse_instruction(pair: Pair<Rule>) -> Result<Transition, DecodeError> {
    let record = pair.as_str().to_string();
    let mut fields = pair.into_inner();

    let mut next_field = || {
        fields.next().ok_or_else(|| {
            DecodeError::UnhandledSequence(format!("incomplete quintuple {record:?}"))
        })
    };

    let state = parse_number(next_field()?)?;
    let read = parse_symbol(next_field()?)?;
    let write = parse_symbol(next_field()?)?;
    let direction = parse_direction(next_field()?)?;
    let next_state = parse_number(next_field()?)?;

    Ok(Transition {
        state,
        read,
        write,
        direction,
        next_state,
    })
}

/// Reads the number carried by a `state` or `symbol` pair.
fn parse_number(pair: Pair<Rule>) -> Result<StateId, DecodeError> {
    let text = pair.as_str();
    let digits = pair
        .into_inner()
        .next()
        .map(|number| number.as_str())
        .unwrap_or_default();

    digits
        .parse::<usize>()
        .map_err(|e| DecodeError::UnhandledSequence(format!("bad number in {text:?}: {e}")))
}

fn parse_symbol(pair: Pair<Rule>) -> Result<Symbol, DecodeError> {
    parse_number(pair).map(symbol_for_number)
}

fn parse_direction(pair: Pair<Rule>) -> Result<Direction, DecodeError> {
    let text = pair.as_str();
    text.chars()
        .next()
        .and_then(Direction::from_letter)
        .ok_or_else(|| DecodeError::UnhandledSequence(format!("invalid move {text:?}")))
}

/// Converts a pest failure into a decode error pointing into the canonical form.
fn malformed(canonical: &str, error: Error<Rule>) -> DecodeError {
    let offset = match error.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };

    DecodeError::UnhandledSequence(format!(
        "malformed quintuple at offset {offset} of {canonical:?}: {}",
        error.variant.message()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_record() {
        let table = parse("q1S0S1Rq2;").unwrap();

        assert_eq!(table.len(), 1);
        let transition = table.get(1).unwrap();
        assert_eq!(transition.read, Symbol::Blank);
        assert_eq!(transition.write, Symbol::Zero);
        assert_eq!(transition.direction, Direction::Right);
        assert_eq!(transition.next_state, 2);
    }

    #[test]
    fn test_parse_without_final_terminator() {
        let table = parse("q1S2S1Lq1;q2S1S0Nq10").unwrap();

        assert_eq!(table.len(), 2);
        let second = table.get(2).unwrap();
        assert_eq!(second.read, Symbol::Zero);
        assert_eq!(second.write, Symbol::Blank);
        assert_eq!(second.direction, Direction::Stay);
        assert_eq!(second.next_state, 10);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_symbol_numbers_read_as_blank() {
        let table = parse("q1S5S9Rq1;").unwrap();
        let transition = table.get(1).unwrap();
        assert_eq!(transition.read, Symbol::Blank);
        assert_eq!(transition.write, Symbol::Blank);
    }

    #[test]
    fn test_later_definition_wins() {
        let table = parse("q1S0S1Rq2;q1S0S2Lq3;").unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1).unwrap().write, Symbol::One);
        assert_eq!(table.get(1).unwrap().next_state, 3);
    }

    #[test]
    fn test_parse_rejects_malformed_records() {
        for input in [
            "q1S0S1R;",
            "q1S0Rq2;",
            "S0S0S1Rq2;",
            "q1S0S1Xq2;",
            "q1S0S1Rq2;;",
            "q1S0S1Rq2q3;",
            "q1S0S1Rq2 ;",
        ] {
            assert!(
                matches!(parse(input), Err(DecodeError::UnhandledSequence(_))),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_state_zero() {
        for input in ["q0S0S1Rq1;", "q1S0S1Rq0;", "q01S0S1Rq1;"] {
            assert!(
                matches!(parse(input), Err(DecodeError::UnhandledSequence(_))),
                "expected {input:?} to be rejected"
            );
        }
        assert_eq!(parse("q10S0S1Rq1;").unwrap().states().collect::<Vec<_>>(), vec![10]);
    }

    #[test]
    fn test_parse_rejects_overflowing_numbers() {
        let huge = format!("q1S0S1Rq{};", "9".repeat(40));
        match parse(&huge) {
            Err(DecodeError::UnhandledSequence(message)) => {
                assert!(message.contains("bad number"))
            }
            other => panic!("Expected UnhandledSequence, got {:?}", other),
        }
    }
}
