//! This module provides the `ProgramLoader` struct, responsible for reading the alphabet,
//! tape and program artifacts from files or strings and validating them.

use crate::alphabet::Alphabet;
use crate::machine::TuringMachine;
use crate::parser::{parse_alphabet, parse_program, parse_tape};
use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::TuringMachineError;
use std::fs;
use std::path::Path;

/// A fully validated machine: its alphabet, initial tape and transition table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineDefinition {
    pub alphabet: Alphabet,
    pub tape: Tape,
    pub table: TransitionTable,
}

impl MachineDefinition {
    /// Builds a machine positioned at the start of the initial tape.
    pub fn machine(&self) -> TuringMachine {
        TuringMachine::new(self.tape.clone(), self.table.clone())
    }

    /// Consumes the definition and builds a machine.
    pub fn into_machine(self) -> TuringMachine {
        TuringMachine::new(self.tape, self.table)
    }
}

/// `ProgramLoader` is a utility struct for loading machine artifacts.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads an alphabet declaration from `path`.
    ///
    /// # Returns
    ///
    /// * `Ok(Alphabet)` if the file is read and declares at least one symbol.
    /// * `Err(TuringMachineError::Io)` if the file cannot be read.
    /// * `Err(TuringMachineError::MalformedAlphabet)` if the declaration is empty or invalid.
    pub fn load_alphabet(path: &Path) -> Result<Alphabet, TuringMachineError> {
        parse_alphabet(&read(path)?)
    }

    /// Loads the initial tape from `path`, checking every cell against `alphabet`.
    pub fn load_tape(path: &Path, alphabet: &Alphabet) -> Result<Tape, TuringMachineError> {
        parse_tape(&read(path)?, alphabet)
    }

    /// Loads a transition program from `path`, checking every symbol against `alphabet`.
    ///
    /// # Returns
    ///
    /// * `Ok(TransitionTable)` holding at least one rule.
    /// * `Err(TuringMachineError::Io)` if the file cannot be read.
    /// * Any line-level error from [`parse_program`] otherwise.
    pub fn load_program(
        path: &Path,
        alphabet: &Alphabet,
    ) -> Result<TransitionTable, TuringMachineError> {
        parse_program(&read(path)?, alphabet)
    }

    /// Loads all three artifacts. The alphabet is loaded first because the tape and
    /// program are validated against it.
    pub fn load_machine(
        alphabet: &Path,
        tape: &Path,
        program: &Path,
    ) -> Result<MachineDefinition, TuringMachineError> {
        let alphabet = Self::load_alphabet(alphabet)?;
        let tape = Self::load_tape(tape, &alphabet)?;
        let table = Self::load_program(program, &alphabet)?;

        Ok(MachineDefinition {
            alphabet,
            tape,
            table,
        })
    }

    /// Same as [`ProgramLoader::load_machine`], from in-memory contents.
    pub fn load_machine_from_strings(
        alphabet: &str,
        tape: &str,
        program: &str,
    ) -> Result<MachineDefinition, TuringMachineError> {
        let alphabet = parse_alphabet(alphabet)?;
        let tape = parse_tape(tape, &alphabet)?;
        let table = parse_program(program, &alphabet)?;

        Ok(MachineDefinition {
            alphabet,
            tape,
            table,
        })
    }
}

fn read(path: &Path) -> Result<String, TuringMachineError> {
    fs::read_to_string(path).map_err(|e| TuringMachineError::io(path.display().to_string(), e))
}
