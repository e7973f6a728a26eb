//! This module defines the `TuringMachine` struct, which simulates a deterministic
//! single-tape Turing Machine. It owns the tape for the duration of a run, looks up the
//! transition for the current state and symbol, applies it, and reports each step to an
//! optional [`StepSink`].

use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::trace::{Snapshot, StepSink};
use crate::types::{
    ExecutionStatus, Move, RunOutcome, State, Step, TuringMachineError, INITIAL_STATE,
};
use tracing::{debug, trace};

/// Represents a single-tape Turing Machine.
///
/// The machine always starts in state `0` with the head on cell `0`.
pub struct TuringMachine {
    state: State,
    tape: Tape,
    table: TransitionTable,
    status: ExecutionStatus,
    step_count: usize,
}

impl TuringMachine {
    /// Creates a machine ready to run `table` over `tape`.
    pub fn new(tape: Tape, table: TransitionTable) -> Self {
        Self {
            state: INITIAL_STATE,
            tape,
            table,
            status: ExecutionStatus::Running,
            step_count: 0,
        }
    }

    /// Executes a single step of the machine's computation.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` after a left or right move.
    /// * `Ok(Step::Halt)` when a halt rule fired, now or on an earlier call.
    /// * `Err(TuringMachineError::StuckState)` when no rule matches the current state and
    ///   symbol. The tape is left untouched and later calls return the same error.
    pub fn step(&mut self) -> Result<Step, TuringMachineError> {
        self.advance(None)
    }

    /// Like [`TuringMachine::step`], reporting the step to `sink`.
    pub fn step_traced(&mut self, sink: &mut dyn StepSink) -> Result<Step, TuringMachineError> {
        self.advance(Some(sink))
    }

    /// Runs the machine until a halt rule fires or it gets stuck.
    ///
    /// There is no step limit: a program that never halts and never gets stuck runs forever.
    pub fn run(&mut self) -> Result<RunOutcome, TuringMachineError> {
        while self.step()? == Step::Continue {}
        Ok(self.outcome())
    }

    /// Like [`TuringMachine::run`], reporting every step to `sink`.
    pub fn run_traced(
        &mut self,
        sink: &mut dyn StepSink,
    ) -> Result<RunOutcome, TuringMachineError> {
        while self.step_traced(sink)? == Step::Continue {}
        Ok(self.outcome())
    }

    /// Restarts the machine on `tape` with the same transition table.
    pub fn reset(&mut self, tape: Tape) {
        self.state = INITIAL_STATE;
        self.tape = tape;
        self.status = ExecutionStatus::Running;
        self.step_count = 0;
    }

    fn advance(&mut self, sink: Option<&mut dyn StepSink>) -> Result<Step, TuringMachineError> {
        match self.status {
            ExecutionStatus::Halted => return Ok(Step::Halt),
            ExecutionStatus::Stuck => return Err(self.stuck_error()),
            ExecutionStatus::Running => {}
        }

        let symbol = self.tape.read();
        let transition = match self.table.get(self.state, symbol) {
            Some(transition) => *transition,
            None => {
                self.status = ExecutionStatus::Stuck;
                debug!(state = self.state, %symbol, steps = self.step_count, "machine is stuck");
                return Err(self.stuck_error());
            }
        };

        // Only copy the tape when someone is listening.
        let before = sink
            .as_ref()
            .map(|_| (self.tape.to_string(), self.tape.head()));
        let state_before = self.state;

        self.tape.write(transition.write);
        self.state = transition.next_state;
        match transition.movement {
            Move::Left => self.tape.move_left(),
            Move::Right => self.tape.move_right(),
            Move::Halt => self.status = ExecutionStatus::Halted,
        }
        self.step_count += 1;

        trace!(
            step = self.step_count,
            from = state_before,
            to = self.state,
            %symbol,
            head = self.tape.head(),
            "applied rule"
        );

        if let (Some(sink), Some((tape_before, head_before))) = (sink, before) {
            sink.record(&Snapshot {
                step: self.step_count,
                state_before,
                head_before,
                tape_before,
                symbol,
                transition,
                head_after: self.tape.head(),
                tape_after: self.tape.to_string(),
            })?;
        }

        if self.status == ExecutionStatus::Halted {
            debug!(steps = self.step_count, state = self.state, "machine halted");
            Ok(Step::Halt)
        } else {
            Ok(Step::Continue)
        }
    }

    fn stuck_error(&self) -> TuringMachineError {
        TuringMachineError::StuckState {
            state: self.state,
            symbol: self.tape.read(),
        }
    }

    fn outcome(&self) -> RunOutcome {
        RunOutcome {
            steps: self.step_count,
            tape: self.tape.to_string(),
            head: self.tape.head(),
        }
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> State {
        self.state
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the head position.
    pub fn head(&self) -> usize {
        self.tape.head()
    }

    pub fn status(&self) -> ExecutionStatus {
        self.status
    }

    /// Returns the total number of steps executed.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Consumes the machine and returns its tape.
    pub fn into_tape(self) -> Tape {
        self.tape
    }
}
