//! This crate provides the core logic for a deterministic single-tape Turing Machine simulator.
//! It includes modules for parsing the alphabet, tape and transition program artifacts,
//! simulating their execution, tracing each step, and a small collection of bundled programs.

pub mod alphabet;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod table;
pub mod tape;
pub mod trace;
pub mod types;

/// Re-exports the `Alphabet` set of legal tape symbols.
pub use alphabet::Alphabet;
/// Re-exports the `ProgramLoader` and the `MachineDefinition` it produces.
pub use loader::{MachineDefinition, ProgramLoader};
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the artifact parsers.
pub use parser::{parse_alphabet, parse_program, parse_tape};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
pub use table::TransitionTable;
pub use tape::Tape;
/// Re-exports the step tracing types.
pub use trace::{Snapshot, StepSink, TraceFormat, TraceHeader, TraceRecorder};
/// Re-exports the core data types and the crate error.
pub use types::{
    ExecutionStatus, Move, RunOutcome, State, Step, Symbol, Transition, TuringMachineError,
    BLANK_SYMBOL, INITIAL_STATE,
};
