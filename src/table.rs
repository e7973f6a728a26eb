//! The validated transition function of a machine.

use crate::types::{format_rule, State, Symbol, Transition};
use std::collections::BTreeMap;

/// Maps `(state, symbol)` to at most one [`Transition`].
///
/// Entries iterate in `(state, symbol)` order, which keeps rendered rule listings stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionTable {
    rules: BTreeMap<(State, Symbol), Transition>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rule, returning the one it replaced if the key was already present.
    pub fn insert(
        &mut self,
        state: State,
        symbol: Symbol,
        transition: Transition,
    ) -> Option<Transition> {
        self.rules.insert((state, symbol), transition)
    }

    /// Looks up the rule for `(state, symbol)`.
    pub fn get(&self, state: State, symbol: Symbol) -> Option<&Transition> {
        self.rules.get(&(state, symbol))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over `(state, symbol, transition)` entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (State, Symbol, &Transition)> + '_ {
        self.rules
            .iter()
            .map(|(&(state, symbol), transition)| (state, symbol, transition))
    }

    /// Renders every rule in compact trace notation, one per entry.
    pub fn render_rules(&self) -> Vec<String> {
        self.iter()
            .map(|(state, symbol, transition)| format_rule(state, symbol, transition))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Move;

    fn transition(write: Symbol, next_state: State, movement: Move) -> Transition {
        Transition {
            write,
            next_state,
            movement,
        }
    }

    #[test]
    fn test_insert_overwrites_same_key() {
        let mut table = TransitionTable::new();

        assert!(table.insert(0, 'a', transition('b', 1, Move::Right)).is_none());
        let replaced = table.insert(0, 'a', transition('c', 2, Move::Left));

        assert_eq!(replaced, Some(transition('b', 1, Move::Right)));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, 'a'), Some(&transition('c', 2, Move::Left)));
    }

    #[test]
    fn test_render_rules_in_key_order() {
        let mut table = TransitionTable::new();
        table.insert(1, '0', transition('1', 1, Move::Left));
        table.insert(0, '1', transition('0', 0, Move::Halt));

        assert_eq!(table.render_rules(), vec!["01->00!", "10->11<"]);
    }
}
