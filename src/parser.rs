//! This module provides the parsers for the three machine artifacts: the alphabet, the
//! initial tape and the transition program. Line splitting is done by a `pest` grammar
//! (`grammar.pest`); the semantic checks on each field are done here.

use crate::{
    alphabet::Alphabet,
    table::TransitionTable,
    tape::Tape,
    types::{Move, State, Symbol, Transition, TuringMachineError, RULE_ARROW},
};
use pest::Parser as PestParser;
use pest_derive::Parser as PestParser;
use std::collections::HashMap;
use tracing::debug;

/// Number of whitespace-separated fields on a rule line.
pub const RULE_FIELDS: usize = 6;

/// Derives a `PestParser` for the line grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct LineParser;

/// A single program line after tokenizing.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Comment,
    Fields(Vec<&'a str>),
}

/// Parses an alphabet declaration.
///
/// The first non-blank line lists whitespace-separated single-character symbols. Any
/// following lines are ignored.
///
/// # Returns
///
/// * `Ok(Alphabet)` with the declared symbols.
/// * `Err(TuringMachineError::MalformedAlphabet)` if nothing is declared or a token is
///   longer than one character.
pub fn parse_alphabet(input: &str) -> Result<Alphabet, TuringMachineError> {
    for text in input.lines() {
        let fields = declaration_fields(text)?;
        if fields.is_empty() {
            continue;
        }

        let symbols = fields
            .into_iter()
            .map(|token| {
                single_char(token).ok_or_else(|| {
                    TuringMachineError::MalformedAlphabet(format!(
                        "symbol '{}' must be a single character",
                        token
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let alphabet = Alphabet::new(symbols);
        debug!(symbols = alphabet.len(), "loaded alphabet");
        return Ok(alphabet);
    }

    Err(TuringMachineError::MalformedAlphabet(
        "no symbols declared".to_string(),
    ))
}

/// Parses the initial tape.
///
/// The first line, trimmed, is read character by character. An empty line yields a tape
/// holding a single blank. Every character must belong to `alphabet` or be the blank.
pub fn parse_tape(input: &str, alphabet: &Alphabet) -> Result<Tape, TuringMachineError> {
    let text = input.lines().next().unwrap_or_default().trim();

    if let Some(symbol) = text.chars().find(|&c| !alphabet.contains(c)) {
        return Err(TuringMachineError::UnknownSymbol { line: 1, symbol });
    }

    let tape = Tape::new(text.chars());
    debug!(cells = tape.len(), "loaded tape");
    Ok(tape)
}

/// Parses a transition program against `alphabet`.
///
/// Each non-blank, non-comment line must hold six fields, either
/// `state symbol next_state next_symbol separator move` or
/// `state symbol -> next_state next_symbol move`, or a single compact field
/// `<state><symbol>-><next_state><next_symbol><move>` such as `01->00!`.
/// A later rule for the same `(state, symbol)` pair replaces an earlier one.
///
/// The first invalid line aborts parsing; no partial table is returned.
pub fn parse_program(
    input: &str,
    alphabet: &Alphabet,
) -> Result<TransitionTable, TuringMachineError> {
    let mut table = TransitionTable::new();
    let mut origins: HashMap<(State, Symbol), usize> = HashMap::new();

    for (index, text) in input.lines().enumerate() {
        let line = index + 1;

        let fields = match tokenize(text, line)? {
            Line::Fields(fields) => fields,
            Line::Blank | Line::Comment => continue,
        };

        let (state, symbol, transition) = parse_rule(&fields, line, alphabet)?;
        table.insert(state, symbol, transition);

        if let Some(previous) = origins.insert((state, symbol), line) {
            debug!(
                state,
                %symbol,
                previous,
                line,
                "rule replaces an earlier definition"
            );
        }
    }

    if table.is_empty() {
        return Err(TuringMachineError::EmptyProgram);
    }

    debug!(rules = table.len(), "loaded program");
    Ok(table)
}

/// Splits one program line into its fields.
fn tokenize(text: &str, line: usize) -> Result<Line<'_>, TuringMachineError> {
    let pair = LineParser::parse(Rule::line, text)
        .map_err(|e| malformed(line, e.to_string()))?
        .next()
        .ok_or_else(|| malformed(line, "unreadable line".to_string()))?;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::comment => return Ok(Line::Comment),
            Rule::fields => {
                return Ok(Line::Fields(
                    inner.into_inner().map(|field| field.as_str()).collect(),
                ))
            }
            _ => {}
        }
    }

    Ok(Line::Blank)
}

/// Splits one alphabet line into its fields. A blank line yields no fields.
fn declaration_fields(text: &str) -> Result<Vec<&str>, TuringMachineError> {
    let pair = LineParser::parse(Rule::declaration, text)
        .map_err(|e| TuringMachineError::MalformedAlphabet(e.to_string()))?
        .next()
        .ok_or_else(|| TuringMachineError::MalformedAlphabet("unreadable line".to_string()))?;

    Ok(pair
        .into_inner()
        .filter(|inner| inner.as_rule() == Rule::fields)
        .flat_map(|inner| inner.into_inner().map(|field| field.as_str()))
        .collect())
}

/// Validates the fields of a rule line.
fn parse_rule(
    fields: &[&str],
    line: usize,
    alphabet: &Alphabet,
) -> Result<(State, Symbol, Transition), TuringMachineError> {
    if let [rule] = fields {
        if let Some((source, target)) = rule.split_once(RULE_ARROW) {
            return parse_compact_rule(source, target, line, alphabet);
        }
    }

    if fields.len() != RULE_FIELDS {
        return Err(malformed(
            line,
            format!(
                "expected {} fields, found {}",
                RULE_FIELDS,
                fields.len()
            ),
        ));
    }

    let (next_state, write) = if fields[2] == RULE_ARROW {
        (fields[3], fields[4])
    } else {
        (fields[2], fields[3])
    };

    build_rule([fields[0], fields[1], next_state, write, fields[5]], line, alphabet)
}

/// Validates a compact rule split at its arrow, e.g. `01` and `00!`.
///
/// The last character of each half is a symbol (or the move); everything before it is
/// the state, so states may have several digits.
fn parse_compact_rule(
    source: &str,
    target: &str,
    line: usize,
    alphabet: &Alphabet,
) -> Result<(State, Symbol, Transition), TuringMachineError> {
    let incomplete = || {
        malformed(
            line,
            format!("incomplete rule '{}{}{}'", source, RULE_ARROW, target),
        )
    };

    let (state, symbol) = split_last(source).ok_or_else(incomplete)?;
    let (target, movement) = split_last(target).ok_or_else(incomplete)?;
    let (next_state, write) = split_last(target).ok_or_else(incomplete)?;

    build_rule([state, symbol, next_state, write, movement], line, alphabet)
}

/// Checks `[state, symbol, next_state, write, move]` in that order.
fn build_rule(
    [state, symbol, next_state, write, movement]: [&str; 5],
    line: usize,
    alphabet: &Alphabet,
) -> Result<(State, Symbol, Transition), TuringMachineError> {
    let state = parse_state(state, line)?;
    let symbol = parse_symbol(symbol, line, alphabet)?;
    let next_state = parse_state(next_state, line)?;
    let write = parse_symbol(write, line, alphabet)?;
    let movement = Move::from_token(movement).ok_or_else(|| TuringMachineError::InvalidMove {
        line,
        token: movement.to_string(),
    })?;

    Ok((
        state,
        symbol,
        Transition {
            write,
            next_state,
            movement,
        },
    ))
}

/// Splits off the last character, requiring a non-empty remainder.
fn split_last(text: &str) -> Option<(&str, &str)> {
    let (index, _) = text.char_indices().last()?;
    if index == 0 {
        return None;
    }
    Some(text.split_at(index))
}

fn parse_state(token: &str, line: usize) -> Result<State, TuringMachineError> {
    token
        .parse::<State>()
        .map_err(|_| TuringMachineError::InvalidState {
            line,
            token: token.to_string(),
        })
}

fn parse_symbol(
    token: &str,
    line: usize,
    alphabet: &Alphabet,
) -> Result<Symbol, TuringMachineError> {
    let symbol = single_char(token).ok_or_else(|| {
        malformed(
            line,
            format!("symbol '{}' must be a single character", token),
        )
    })?;

    if !alphabet.contains(symbol) {
        return Err(TuringMachineError::UnknownSymbol { line, symbol });
    }

    Ok(symbol)
}

/// Returns the only character of `token`, or `None` if it has zero or several.
fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn malformed(line: usize, detail: String) -> TuringMachineError {
    TuringMachineError::MalformedRule { line, detail }
}
