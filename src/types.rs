//! This module defines the core data structures and types used throughout the Turing Machine
//! simulator, including symbols, states, transitions, execution results, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single tape symbol.
pub type Symbol = char;

/// A state identifier. States are implicitly declared by appearing in a rule.
pub type State = u64;

/// The reserved blank symbol. It is legal on the tape and in rules even when
/// the alphabet does not declare it.
pub const BLANK_SYMBOL: Symbol = '_';
/// The optional separator between the source and target halves of a rule line.
pub const RULE_ARROW: &str = "->";
/// Every run starts in this state.
pub const INITIAL_STATE: State = 0;
/// Every run starts with the head on this cell.
pub const INITIAL_HEAD: usize = 0;

/// What the head does after a transition has written its symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Move the head one cell to the left.
    Left,
    /// Move the head one cell to the right.
    Right,
    /// Stop the machine. The head stays where it is.
    Halt,
}

impl Move {
    /// Returns the program-file token for this move.
    pub fn token(self) -> &'static str {
        match self {
            Move::Left => "<",
            Move::Right => ">",
            Move::Halt => "!",
        }
    }

    /// Parses a program-file token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "<" => Some(Move::Left),
            ">" => Some(Move::Right),
            "!" => Some(Move::Halt),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The result of a transition table lookup for one `(state, symbol)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The symbol written under the head.
    pub write: Symbol,
    /// The state the machine moves to.
    pub next_state: State,
    /// The head movement applied after writing.
    pub movement: Move,
}

/// Represents the outcome of a single engine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A left or right move was applied and the machine keeps running.
    Continue,
    /// A halt rule fired.
    Halt,
}

/// The engine's own control state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    #[default]
    Running,
    /// A halt rule fired. Terminal, successful.
    Halted,
    /// No rule matched the current `(state, symbol)` pair. Terminal, failed.
    Stuck,
}

/// Summary of a run that ended on a halt rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Number of steps executed, including the halting one.
    pub steps: usize,
    /// The final tape rendered as text.
    pub tape: String,
    /// The final head position.
    pub head: usize,
}

/// Represents various errors that can occur while loading or running a machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TuringMachineError {
    /// An artifact could not be read, or the trace sink could not be written.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
    /// The alphabet declaration is missing or contains an invalid token.
    #[error("Malformed alphabet: {0}")]
    MalformedAlphabet(String),
    /// A program line does not follow the rule grammar.
    #[error("Malformed rule on line {line}: {detail}")]
    MalformedRule { line: usize, detail: String },
    /// A state field is not a non-negative integer.
    #[error("Invalid state '{token}' on line {line}")]
    InvalidState { line: usize, token: String },
    /// A symbol is neither declared in the alphabet nor the blank.
    #[error("Unknown symbol '{symbol}' on line {line}")]
    UnknownSymbol { line: usize, symbol: Symbol },
    /// The move field is not one of `<`, `>` or `!`.
    #[error("Invalid move '{token}' on line {line}")]
    InvalidMove { line: usize, token: String },
    /// The program has no rules.
    #[error("Empty program: no rules defined")]
    EmptyProgram,
    /// No rule exists for the pair the machine ran into.
    #[error("No applicable rule for state {state} and symbol '{symbol}'")]
    StuckState { state: State, symbol: Symbol },
    /// A bounded run used up its step budget before halting.
    #[error("Step limit of {0} exceeded before the machine halted")]
    StepLimitExceeded(usize),
    /// No bundled program matches the requested name or index.
    #[error("Unknown program: {0}")]
    UnknownProgram(String),
}

impl TuringMachineError {
    /// Builds an [`TuringMachineError::Io`] from any displayable source.
    pub fn io(path: impl Into<String>, error: impl fmt::Display) -> Self {
        TuringMachineError::Io {
            path: path.into(),
            message: error.to_string(),
        }
    }
}

/// Renders a rule in the compact notation used by traces, e.g. `01->00!`.
pub fn format_rule(state: State, symbol: Symbol, transition: &Transition) -> String {
    format!(
        "{}{}{}{}{}{}",
        state, symbol, RULE_ARROW, transition.next_state, transition.write, transition.movement
    )
}
