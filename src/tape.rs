//! This module defines the `Tape`, the machine's growable cell sequence together with the
//! read/write head.

use crate::types::{Symbol, BLANK_SYMBOL, INITIAL_HEAD};
use std::fmt;

/// A single tape with its head position.
///
/// The head always points at an existing cell. Moving past either end grows the tape by
/// exactly one blank cell instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Symbol>,
    head: usize,
}

impl Tape {
    /// Creates a tape from the given cells with the head on the first cell.
    ///
    /// An empty cell list yields a tape holding a single blank.
    pub fn new(cells: impl IntoIterator<Item = Symbol>) -> Self {
        let mut cells: Vec<Symbol> = cells.into_iter().collect();
        if cells.is_empty() {
            cells.push(BLANK_SYMBOL);
        }

        Self {
            cells,
            head: INITIAL_HEAD,
        }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> Symbol {
        self.cells[self.head]
    }

    /// Overwrites the symbol under the head.
    pub fn write(&mut self, symbol: Symbol) {
        self.cells[self.head] = symbol;
    }

    /// Moves the head one cell to the left, prepending a blank when it is on the first cell.
    pub fn move_left(&mut self) {
        if self.head == 0 {
            // The head stays on index 0, which is now the new blank.
            self.cells.insert(0, BLANK_SYMBOL);
        } else {
            self.head -= 1;
        }
    }

    /// Moves the head one cell to the right, appending a blank when it walks off the end.
    pub fn move_right(&mut self) {
        self.head += 1;
        if self.head == self.cells.len() {
            self.cells.push(BLANK_SYMBOL);
        }
    }

    /// Returns the head position.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns all cells from left to right.
    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A tape always holds at least one cell.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Renders a line with a caret under the head, e.g. `"  ^"` for head 2.
    pub fn caret_line(&self) -> String {
        caret_line(self.head)
    }
}

/// Renders `head` spaces followed by `^`.
pub fn caret_line(head: usize) -> String {
    format!("{}^", " ".repeat(head))
}

impl fmt::Display for Tape {
    /// Concatenates all cells without a separator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells.iter().try_for_each(|c| write!(f, "{}", c))
    }
}
