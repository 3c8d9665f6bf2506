//! This crate decodes Turing machine standard descriptions (letters `A C D L R N ;`) into
//! transition tables and runs them over fixed-length tapes of `_`, `0` and `1`.
//!
//! The pipeline is `decode` → [`compiler::CompiledTable`] → [`machine::Machine`]; the
//! [`run`] function wires the last two together for string tapes.
//!
//! ```
//! let table = turing_sd::decode("DADDCRDAA;DAADDRDAAA;DAAADDCCRDAAAA;DAAAADDRDA;").unwrap();
//! assert_eq!(turing_sd::run(&table, "________").unwrap(), "0_1_0_1_");
//! ```

pub mod alphabet;
pub mod analyzer;
pub mod compiler;
pub mod decoder;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the string-level alphabet conversions.
pub use alphabet::{
    base7_to_machine_number, machine_number_to_base7, machine_number_to_standard_description,
    standard_description_to_machine_number,
};
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, diagnostics, AnalysisError};
pub use compiler::CompiledTable;
/// Re-exports the decoding entry points.
pub use decoder::{decode, normalize};
/// Re-exports the encoding functions from the encoder module.
pub use encoder::{encode, encode_canonical, encode_machine_number};
/// Re-exports the `DescriptionLoader` struct from the loader module.
pub use loader::DescriptionLoader;
pub use machine::{run, Machine, Tape};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the core types.
pub use types::{
    DecodeError, Direction, Halt, Program, StateId, Step, Symbol, Transition, TransitionTable,
    TuringError, ENTRY_STATE,
};
