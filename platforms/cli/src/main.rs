use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use tmsim::{
    MachineDefinition, ProgramLoader, ProgramManager, RunOutcome, Step, StepSink, TraceFormat,
    TraceHeader, TraceRecorder, TuringMachine, TuringMachineError,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runs a single-tape Turing machine described by an alphabet, a tape and a program file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
  tmsim-cli --alph files/alphabet --tape files/tape --prog files/program
  tmsim-cli --example increment -v --logs trace.log")]
struct Cli {
    /// Path to the alphabet file
    #[arg(long = "alph", default_value = "./files/alphabet")]
    alphabet: PathBuf,

    /// Path to the tape file
    #[arg(long, default_value = "./files/tape")]
    tape: PathBuf,

    /// Path to the program file
    #[arg(long = "prog", default_value = "./files/program")]
    program: PathBuf,

    /// The step trace is written to this file, replacing any previous content
    #[arg(long, default_value = "./files/logs")]
    logs: PathBuf,

    /// Write a step-by-step trace to the logs file
    #[arg(short, long)]
    verbose: bool,

    /// Trace format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Give up after this many steps
    #[arg(long)]
    max_steps: Option<usize>,

    /// Run a bundled program instead of the alphabet, tape and program files
    #[arg(long)]
    example: Option<String>,

    /// List the bundled programs and exit
    #[arg(long)]
    list: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for TraceFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => TraceFormat::Text,
            Format::Json => TraceFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Executes the command and returns what should be printed on success.
fn run(cli: &Cli) -> Result<String> {
    if cli.list {
        return Ok(list_programs());
    }

    let definition = load_definition(cli)?;
    let mut machine = definition.machine();

    let outcome = if cli.verbose {
        let file = File::create(&cli.logs)
            .with_context(|| format!("Failed to create trace file {}", cli.logs.display()))?;
        let mut recorder = TraceRecorder::new(
            BufWriter::new(file),
            cli.format.into(),
            cli.logs.display().to_string(),
        );
        recorder.write_header(&TraceHeader {
            date: Local::now(),
            alphabet: &definition.alphabet,
            tape: &definition.tape,
            table: &definition.table,
        })?;

        let outcome = execute(&mut machine, Some(&mut recorder), cli.max_steps);
        // Flush what was traced even when the run failed.
        let finished = recorder.finish();
        let outcome = outcome?;
        finished?;
        outcome
    } else {
        execute(&mut machine, None, cli.max_steps)?
    };

    info!(steps = outcome.steps, head = outcome.head, "run finished");
    Ok(outcome.tape)
}

fn load_definition(cli: &Cli) -> Result<MachineDefinition> {
    if let Some(name) = &cli.example {
        return Ok(ProgramManager::get_by_name(name)?.definition.clone());
    }

    let alphabet = ProgramLoader::load_alphabet(&cli.alphabet)
        .with_context(|| format!("Failed to load alphabet {}", cli.alphabet.display()))?;
    let tape = ProgramLoader::load_tape(&cli.tape, &alphabet)
        .with_context(|| format!("Failed to load tape {}", cli.tape.display()))?;
    let table = ProgramLoader::load_program(&cli.program, &alphabet)
        .with_context(|| format!("Failed to load program {}", cli.program.display()))?;

    Ok(MachineDefinition {
        alphabet,
        tape,
        table,
    })
}

/// Runs `machine` to completion, or for at most `max_steps` steps when a limit is given.
fn execute(
    machine: &mut TuringMachine,
    mut sink: Option<&mut dyn StepSink>,
    max_steps: Option<usize>,
) -> Result<RunOutcome, TuringMachineError> {
    let Some(limit) = max_steps else {
        return match sink {
            Some(sink) => machine.run_traced(sink),
            None => machine.run(),
        };
    };

    for _ in 0..limit {
        let step = match sink.as_deref_mut() {
            Some(sink) => machine.step_traced(sink)?,
            None => machine.step()?,
        };

        if step == Step::Halt {
            return Ok(RunOutcome {
                steps: machine.step_count(),
                tape: machine.tape().to_string(),
                head: machine.head(),
            });
        }
    }

    Err(TuringMachineError::StepLimitExceeded(limit))
}

fn list_programs() -> String {
    ProgramManager::names()
        .into_iter()
        .filter_map(|name| ProgramManager::get_by_name(name).ok())
        .map(|program| format!("{}\t{}", program.name, program.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Load failures exit with 1, a stuck machine with 2, an exhausted step limit with 3.
fn exit_status(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<TuringMachineError>() {
        Some(TuringMachineError::StuckState { .. }) => 2,
        Some(TuringMachineError::StepLimitExceeded(_)) => 3,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tmsim-cli").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_paths() {
        let cli = cli(&[]);

        assert_eq!(cli.alphabet, PathBuf::from("./files/alphabet"));
        assert_eq!(cli.tape, PathBuf::from("./files/tape"));
        assert_eq!(cli.program, PathBuf::from("./files/program"));
        assert_eq!(cli.logs, PathBuf::from("./files/logs"));
        assert_eq!(cli.format, Format::Text);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_run_bundled_example() {
        let output = run(&cli(&["--example", "invert"])).unwrap();
        assert_eq!(output, "01001_");
    }

    #[test]
    fn test_run_unknown_example() {
        let error = run(&cli(&["--example", "missing"])).unwrap_err();
        assert!(error.to_string().contains("missing"));
    }

    #[test]
    fn test_list_programs() {
        let output = run(&cli(&["--list"])).unwrap();
        assert!(output.contains("increment\t"));
        assert!(output.contains("unary-add\t"));
    }

    #[test]
    fn test_verbose_writes_trace_file() {
        let dir = tempdir().unwrap();
        let logs = dir.path().join("logs");
        fs::write(&logs, "stale content").unwrap();

        let output = run(&cli(&[
            "--example",
            "invert",
            "-v",
            "--logs",
            logs.to_str().unwrap(),
        ]))
        .unwrap();
        assert_eq!(output, "01001_");

        let trace = fs::read_to_string(&logs).unwrap();
        assert!(!trace.contains("stale content"));
        assert!(trace.contains("Program:\n"));
        assert!(trace.contains("\n10110\n^\n01->00>\n00110\n ^\n"));
        assert!(trace.ends_with("0_->0_!\n01001_\n     ^\n"));
    }

    #[test]
    fn test_load_errors_name_the_artifact() {
        let dir = tempdir().unwrap();
        let alphabet = dir.path().join("alphabet");
        let tape = dir.path().join("tape");
        let program = dir.path().join("program");
        fs::write(&alphabet, "0 1\n").unwrap();
        fs::write(&tape, "01\n").unwrap();
        fs::write(&program, "0 0 -> 0 1 >\n0 2 -> 0 1 >\n").unwrap();

        let error = run(&cli(&[
            "--alph",
            alphabet.to_str().unwrap(),
            "--tape",
            tape.to_str().unwrap(),
            "--prog",
            program.to_str().unwrap(),
        ]))
        .unwrap_err();

        let message = format!("{:#}", error);
        assert!(message.contains("Failed to load program"));
        assert!(message.contains("Unknown symbol '2' on line 2"));
        assert_eq!(exit_status(&error), 1);
    }

    #[test]
    fn test_stuck_machine_exit_code() {
        let dir = tempdir().unwrap();
        let alphabet = dir.path().join("alphabet");
        let tape = dir.path().join("tape");
        let program = dir.path().join("program");
        fs::write(&alphabet, "a b\n").unwrap();
        fs::write(&tape, "a\n").unwrap();
        fs::write(&program, "0 b -> 0 a !\n").unwrap();

        let error = run(&cli(&[
            "--alph",
            alphabet.to_str().unwrap(),
            "--tape",
            tape.to_str().unwrap(),
            "--prog",
            program.to_str().unwrap(),
        ]))
        .unwrap_err();

        assert!(error.to_string().contains("No applicable rule"));
        assert_eq!(exit_status(&error), 2);
    }

    #[test]
    fn test_step_limit() {
        let error = run(&cli(&["--example", "increment", "--max-steps", "3"])).unwrap_err();
        assert_eq!(exit_status(&error), 3);

        let output = run(&cli(&["--example", "increment", "--max-steps", "100"])).unwrap();
        assert_eq!(output, "1100_");
    }
}
