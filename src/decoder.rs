//! This module turns a standard description into its canonical quintuple form.
//!
//! A description is a stream of letter runs. `D` opens a field; the run that follows decides
//! what the field is: `A`s count a state number, `C`s count a symbol number, and a field closed
//! before anything was counted is symbol 0 (blank). `L`, `R`, `N` and `;` close the open field
//! and are copied through. The result is a string such as `q1S0S1Rq2;` which
//! [`crate::parser::parse`] turns into a [`TransitionTable`].

use crate::parser;
use crate::types::{DecodeError, TransitionTable};
use tracing::debug;

/// The field currently being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    /// No `D` is pending.
    Closed,
    /// A `D` was seen and nothing has been counted since.
    Open,
    /// A run of `n` `A`s.
    State(usize),
    /// A run of `n` `C`s.
    Symbol(usize),
}

/// Letter-run counter that writes canonical tokens into `out`.
struct Normalizer {
    field: Field,
    out: String,
}

impl Normalizer {
    fn new(capacity: usize) -> Self {
        Self {
            field: Field::Closed,
            out: String::with_capacity(capacity),
        }
    }

    /// Emits the open field, if any, and closes it.
    fn close(&mut self) {
        match self.field {
            Field::Closed => {}
            // Both counters still fresh: the field is the default symbol.
            Field::Open => self.out.push_str("S0"),
            Field::State(n) => {
                self.out.push('q');
                self.out.push_str(&n.to_string());
            }
            Field::Symbol(n) => {
                self.out.push('S');
                self.out.push_str(&n.to_string());
            }
        }
        self.field = Field::Closed;
    }

    fn feed(&mut self, position: usize, c: char) -> Result<(), DecodeError> {
        self.field = match (c, self.field) {
            ('D', _) => {
                self.close();
                Field::Open
            }
            ('A', Field::Closed) => return Err(DecodeError::OrphanStateToken { position }),
            ('A', Field::Open) => Field::State(1),
            ('A', Field::State(n)) => Field::State(n + 1),
            ('C', Field::Closed) => return Err(DecodeError::OrphanSymbolToken { position }),
            ('C', Field::Open) => Field::Symbol(1),
            ('C', Field::Symbol(n)) => Field::Symbol(n + 1),
            ('L' | 'R' | 'N' | ';', _) => {
                self.close();
                self.out.push(c);
                Field::Closed
            }
            (c, field) => {
                return Err(DecodeError::UnhandledSequence(format!(
                    "{c:?} at position {position} while {}",
                    describe(field)
                )))
            }
        };
        Ok(())
    }

    fn finish(mut self) -> String {
        self.close();
        self.out
    }
}

fn describe(field: Field) -> &'static str {
    match field {
        Field::Closed => "no field is open",
        Field::Open => "a field is open",
        Field::State(_) => "counting a state number",
        Field::Symbol(_) => "counting a symbol number",
    }
}

/// Rewrites a standard description into canonical form (`q<N>S<N>S<N><move>q<N>;...`).
///
/// # Errors
///
/// * `DecodeError::OrphanStateToken` / `DecodeError::OrphanSymbolToken` when an `A` or `C`
///   appears without a preceding `D`.
/// * `DecodeError::UnhandledSequence` for mixed runs (`A` after `C` or the reverse) and for
///   characters outside the description alphabet.
pub fn normalize(description: &str) -> Result<String, DecodeError> {
    let mut normalizer = Normalizer::new(description.len());

    for (position, c) in description.chars().enumerate() {
        normalizer.feed(position, c)?;
    }

    Ok(normalizer.finish())
}

/// Decodes a standard description into a transition table.
///
/// Decoding is all-or-nothing: the first violation aborts and no partial table is returned.
pub fn decode(description: &str) -> Result<TransitionTable, DecodeError> {
    let canonical = normalize(description)?;
    debug!(%canonical, "normalized standard description");

    parser::parse(&canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Symbol, Transition};
    use proptest::prelude::*;

    const ALTERNATING: &str = "DADDCRDAA;DAADDRDAAA;DAAADDCCRDAAAA;DAAAADDRDA;";

    #[test]
    fn test_normalize_first_example() {
        assert_eq!(
            normalize(ALTERNATING).unwrap(),
            "q1S0S1Rq2;q2S0S0Rq3;q3S0S2Rq4;q4S0S0Rq1;"
        );
    }

    #[test]
    fn test_normalize_flushes_trailing_field() {
        assert_eq!(normalize("DADDCRDAA").unwrap(), "q1S0S1Rq2");
        assert_eq!(normalize("").unwrap(), "");
        assert_eq!(normalize("D").unwrap(), "S0");
    }

    #[test]
    fn test_leading_c_is_orphan() {
        assert_eq!(
            normalize("C"),
            Err(DecodeError::OrphanSymbolToken { position: 0 })
        );
        assert_eq!(
            decode("CDADDCRDAA;"),
            Err(DecodeError::OrphanSymbolToken { position: 0 })
        );
    }

    proptest! {
        #[test]
        fn prop_leading_c_is_orphan(rest in "[ACDLRN;]{0,32}") {
            prop_assert_eq!(
                decode(&format!("C{rest}")),
                Err(DecodeError::OrphanSymbolToken { position: 0 })
            );
        }
    }

    #[test]
    fn test_orphan_after_terminator() {
        assert_eq!(
            decode("DADDCRDAA;A"),
            Err(DecodeError::OrphanStateToken { position: 10 })
        );
        assert_eq!(
            decode("DADDCRC"),
            Err(DecodeError::OrphanSymbolToken { position: 6 })
        );
    }

    #[test]
    fn test_mixed_runs_are_unhandled() {
        assert!(matches!(
            normalize("DAC"),
            Err(DecodeError::UnhandledSequence(_))
        ));
        assert!(matches!(
            normalize("DCA"),
            Err(DecodeError::UnhandledSequence(_))
        ));
    }

    #[test]
    fn test_foreign_characters_are_unhandled() {
        let err = normalize("DADDCRDAA;x").unwrap_err();
        match err {
            DecodeError::UnhandledSequence(message) => {
                assert!(message.contains("'x'"));
                assert!(message.contains("position 10"));
            }
            other => panic!("Expected UnhandledSequence, got {:?}", other),
        }
        assert!(normalize("DA DDCRDAA;").is_err());
    }

    #[test]
    fn test_decode_first_example() {
        let table = decode(ALTERNATING).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(
            table.get(1),
            Some(&Transition {
                state: 1,
                read: Symbol::Blank,
                write: Symbol::Zero,
                direction: Direction::Right,
                next_state: 2,
            })
        );
        assert_eq!(table.get(3).map(|t| t.write), Some(Symbol::One));
        assert_eq!(table.get(4).map(|t| t.next_state), Some(1));
    }

    #[test]
    fn test_decode_is_deterministic() {
        assert_eq!(decode(ALTERNATING), decode(ALTERNATING));
    }

    #[test]
    fn test_decode_rejects_misordered_fields() {
        // A state where the read symbol belongs.
        assert!(matches!(
            decode("DADARDAA;"),
            Err(DecodeError::UnhandledSequence(_))
        ));
        // Missing next state.
        assert!(matches!(
            decode("DADDCR;"),
            Err(DecodeError::UnhandledSequence(_))
        ));
    }
}
