use crate::loader::{MachineDefinition, ProgramLoader};
use crate::machine::TuringMachine;
use crate::types::TuringMachineError;
use tracing::warn;

/// Embedded demo machines: name, description, alphabet, tape, program.
const PROGRAM_TEXTS: [(&str, &str, &str, &str, &str); 3] = [
    (
        "increment",
        "Adds one to the binary number on the tape",
        include_str!("../demos/increment/alphabet"),
        include_str!("../demos/increment/tape"),
        include_str!("../demos/increment/program"),
    ),
    (
        "invert",
        "Flips every bit on the tape",
        include_str!("../demos/invert/alphabet"),
        include_str!("../demos/invert/tape"),
        include_str!("../demos/invert/program"),
    ),
    (
        "unary-add",
        "Adds two unary numbers separated by '+'",
        include_str!("../demos/unary-add/alphabet"),
        include_str!("../demos/unary-add/tape"),
        include_str!("../demos/unary-add/program"),
    ),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<ProgramInfo> = load_embedded();
}

fn load_embedded() -> Vec<ProgramInfo> {
    PROGRAM_TEXTS
        .iter()
        .filter_map(|&(name, description, alphabet, tape, program)| {
            match ProgramLoader::load_machine_from_strings(alphabet, tape, program) {
                Ok(definition) => Some(ProgramInfo {
                    name,
                    description,
                    definition,
                }),
                Err(e) => {
                    warn!(name, error = %e, "failed to parse bundled program");
                    None
                }
            }
        })
        .collect()
}

/// A bundled machine ready to run.
#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub definition: MachineDefinition,
}

impl ProgramInfo {
    pub fn machine(&self) -> TuringMachine {
        self.definition.machine()
    }
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn count() -> usize {
        PROGRAMS.len()
    }

    /// List all program names
    pub fn names() -> Vec<&'static str> {
        PROGRAMS.iter().map(|program| program.name).collect()
    }

    /// Get a program by its index
    pub fn get_by_index(index: usize) -> Result<&'static ProgramInfo, TuringMachineError> {
        PROGRAMS
            .get(index)
            .ok_or_else(|| unknown_program(format!("index {}", index)))
    }

    /// Get a program by its name
    pub fn get_by_name(name: &str) -> Result<&'static ProgramInfo, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|program| program.name == name)
            .ok_or_else(|| unknown_program(format!("'{}'", name)))
    }
}

fn unknown_program(what: String) -> TuringMachineError {
    TuringMachineError::UnknownProgram(what)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_programs_load() {
        assert_eq!(ProgramManager::count(), PROGRAM_TEXTS.len());
        assert_eq!(
            ProgramManager::names(),
            vec!["increment", "invert", "unary-add"]
        );
    }

    #[test]
    fn test_increment() {
        let program = ProgramManager::get_by_name("increment").unwrap();
        let outcome = program.machine().run().unwrap();

        // 1011 + 1 = 1100, with the blank the head walked onto.
        assert_eq!(outcome.tape, "1100_");
        assert_eq!(outcome.head, 1);
    }

    #[test]
    fn test_increment_carries_past_the_start() {
        let program = ProgramManager::get_by_name("increment").unwrap();
        let mut machine = program.machine();
        machine.reset(crate::tape::Tape::new("111".chars()));

        let outcome = machine.run().unwrap();
        assert_eq!(outcome.tape, "1000_");
        assert_eq!(outcome.head, 0);
    }

    #[test]
    fn test_invert() {
        let program = ProgramManager::get_by_name("invert").unwrap();
        let outcome = program.machine().run().unwrap();

        assert_eq!(outcome.tape, "01001_");
        assert_eq!(outcome.steps, 6);
    }

    #[test]
    fn test_unary_add() {
        let program = ProgramManager::get_by_name("unary-add").unwrap();
        let outcome = program.machine().run().unwrap();

        assert_eq!(outcome.tape, "11111__");
        assert_eq!(outcome.tape.matches('1').count(), 5);
    }

    #[test]
    fn test_get_by_index() {
        assert_eq!(ProgramManager::get_by_index(1).unwrap().name, "invert");
        assert!(ProgramManager::get_by_index(999).is_err());
    }

    #[test]
    fn test_get_by_name_unknown() {
        let error = ProgramManager::get_by_name("nonexistent").unwrap_err();
        assert_eq!(error.to_string(), "Unknown program: 'nonexistent'");
    }
}
