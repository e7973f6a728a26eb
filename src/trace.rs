//! This module provides step tracing: the [`Snapshot`] captured for each engine step, the
//! [`StepSink`] capability the engine reports snapshots to, and [`TraceRecorder`], a sink
//! that renders snapshots to any `io::Write` as a human-readable listing or as JSON lines.

use crate::alphabet::Alphabet;
use crate::table::TransitionTable;
use crate::tape::{caret_line, Tape};
use crate::types::{format_rule, State, Symbol, Transition, TuringMachineError};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::io::Write;

const RULE_LINE: &str = "----------";

/// An immutable record of one engine step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Step number, starting at 1.
    pub step: usize,
    pub state_before: State,
    pub head_before: usize,
    pub tape_before: String,
    /// The symbol that was read under the head.
    pub symbol: Symbol,
    /// The rule that was applied.
    pub transition: Transition,
    pub head_after: usize,
    pub tape_after: String,
}

impl Snapshot {
    /// Renders the applied rule, e.g. `01->00!`.
    pub fn rule(&self) -> String {
        format_rule(self.state_before, self.symbol, &self.transition)
    }
}

/// Receives one [`Snapshot`] per engine step.
pub trait StepSink {
    /// Records a step. An error aborts the run.
    fn record(&mut self, snapshot: &Snapshot) -> Result<(), TuringMachineError>;
}

/// Collects snapshots in memory.
impl StepSink for Vec<Snapshot> {
    fn record(&mut self, snapshot: &Snapshot) -> Result<(), TuringMachineError> {
        self.push(snapshot.clone());
        Ok(())
    }
}

/// Output format of a [`TraceRecorder`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    /// Tape, caret, rule, tape, caret blocks.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Audit information written before the step listing.
#[derive(Debug, Clone)]
pub struct TraceHeader<'a> {
    pub date: DateTime<Local>,
    pub alphabet: &'a Alphabet,
    pub tape: &'a Tape,
    pub table: &'a TransitionTable,
}

#[derive(Serialize)]
struct JsonHeader {
    date: String,
    alphabet: Vec<Symbol>,
    tape: String,
    program: Vec<String>,
}

/// A [`StepSink`] that writes each snapshot to `writer`.
///
/// `target` names the destination in I/O errors, usually the trace file path.
pub struct TraceRecorder<W: Write> {
    writer: W,
    format: TraceFormat,
    target: String,
}

impl<W: Write> TraceRecorder<W> {
    pub fn new(writer: W, format: TraceFormat, target: impl Into<String>) -> Self {
        Self {
            writer,
            format,
            target: target.into(),
        }
    }

    /// Writes the audit block: date, alphabet, initial tape and every rule.
    pub fn write_header(&mut self, header: &TraceHeader<'_>) -> Result<(), TuringMachineError> {
        let date = header.date.format("%Y-%m-%d %H:%M:%S %z").to_string();

        match self.format {
            TraceFormat::Text => {
                let mut text = format!("\n{RULE_LINE}\n{RULE_LINE}\n\n");
                text.push_str(&format!("Date: {}\n", date));
                text.push_str(&format!("Alphabet: {}\n", header.alphabet));
                text.push_str(&format!("Tape: {}\n", header.tape));
                text.push_str("Program:\n");
                for rule in header.table.render_rules() {
                    text.push_str(&format!("\t{}\n", rule));
                }
                text.push_str(&format!("\n{RULE_LINE}\n{RULE_LINE}\n"));
                self.write_all(text.as_bytes())
            }
            TraceFormat::Json => {
                let json = JsonHeader {
                    date,
                    alphabet: header.alphabet.symbols().collect(),
                    tape: header.tape.to_string(),
                    program: header.table.render_rules(),
                };
                self.write_json(&json)
            }
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> Result<W, TuringMachineError> {
        self.writer
            .flush()
            .map_err(|e| TuringMachineError::io(&self.target, e))?;
        Ok(self.writer)
    }

    fn write_json<T: Serialize>(&mut self, value: &T) -> Result<(), TuringMachineError> {
        let mut line =
            serde_json::to_string(value).map_err(|e| TuringMachineError::io(&self.target, e))?;
        line.push('\n');
        self.write_all(line.as_bytes())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), TuringMachineError> {
        self.writer
            .write_all(bytes)
            .map_err(|e| TuringMachineError::io(&self.target, e))
    }
}

impl<W: Write> StepSink for TraceRecorder<W> {
    fn record(&mut self, snapshot: &Snapshot) -> Result<(), TuringMachineError> {
        match self.format {
            TraceFormat::Text => {
                let block = format!(
                    "\n{}\n{}\n{}\n{}\n{}\n",
                    snapshot.tape_before,
                    caret_line(snapshot.head_before),
                    snapshot.rule(),
                    snapshot.tape_after,
                    caret_line(snapshot.head_after),
                );
                self.write_all(block.as_bytes())
            }
            TraceFormat::Json => self.write_json(snapshot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Move;
    use chrono::TimeZone;
    use std::io;

    fn snapshot() -> Snapshot {
        Snapshot {
            step: 1,
            state_before: 0,
            head_before: 1,
            tape_before: "101".to_string(),
            symbol: '0',
            transition: Transition {
                write: '1',
                next_state: 2,
                movement: Move::Right,
            },
            head_after: 2,
            tape_after: "111".to_string(),
        }
    }

    #[test]
    fn test_text_step_block() {
        let mut recorder = TraceRecorder::new(Vec::new(), TraceFormat::Text, "memory");
        recorder.record(&snapshot()).unwrap();

        let output = String::from_utf8(recorder.finish().unwrap()).unwrap();
        assert_eq!(output, "\n101\n ^\n00->21>\n111\n  ^\n");
    }

    #[test]
    fn test_json_step_line() {
        let mut recorder = TraceRecorder::new(Vec::new(), TraceFormat::Json, "memory");
        recorder.record(&snapshot()).unwrap();

        let output = String::from_utf8(recorder.finish().unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();

        assert_eq!(value["state_before"], 0);
        assert_eq!(value["tape_after"], "111");
        assert_eq!(value["transition"]["movement"], "Right");
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_text_header() {
        let alphabet = Alphabet::new(['0', '1']);
        let tape = Tape::new("10".chars());
        let mut table = TransitionTable::new();
        table.insert(
            0,
            '1',
            Transition {
                write: '0',
                next_state: 0,
                movement: Move::Halt,
            },
        );
        let date = Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

        let mut recorder = TraceRecorder::new(Vec::new(), TraceFormat::Text, "memory");
        recorder
            .write_header(&TraceHeader {
                date,
                alphabet: &alphabet,
                tape: &tape,
                table: &table,
            })
            .unwrap();

        let output = String::from_utf8(recorder.finish().unwrap()).unwrap();
        assert!(output.starts_with("\n----------\n----------\n\nDate: 2024-03-01 12:30:00"));
        assert!(output.contains("Alphabet: [0 1]\n"));
        assert!(output.contains("Tape: 10\n"));
        assert!(output.contains("Program:\n\t01->00!\n"));
        assert!(output.ends_with("\n----------\n----------\n"));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let mut recorder = TraceRecorder::new(FailingWriter, TraceFormat::Text, "trace.log");
        let error = recorder.record(&snapshot()).unwrap_err();

        assert_eq!(
            error,
            TuringMachineError::Io {
                path: "trace.log".to_string(),
                message: "disk full".to_string(),
            }
        );
    }
}
