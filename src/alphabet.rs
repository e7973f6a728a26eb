//! The set of symbols a machine may read and write.

use crate::types::{Symbol, BLANK_SYMBOL};
use std::collections::BTreeSet;
use std::fmt;

/// An immutable set of declared tape symbols.
///
/// The blank symbol is always accepted by [`Alphabet::contains`], whether or not it was
/// declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    symbols: BTreeSet<Symbol>,
}

impl Alphabet {
    /// Builds an alphabet from the declared symbols. Duplicates collapse.
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
        }
    }

    /// Returns `true` if `symbol` is declared or is the blank.
    pub fn contains(&self, symbol: Symbol) -> bool {
        symbol == BLANK_SYMBOL || self.symbols.contains(&symbol)
    }

    /// Iterates over the declared symbols in sorted order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().copied()
    }

    /// Number of declared symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols = self
            .symbols
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "[{}]", symbols)
    }
}
