use tracing::{debug, trace};

use crate::prelude::*;

impl Automaton for DFA {
    fn states(&self) -> &StateSet {
        &self.states
    }

    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn transitions(&self) -> &TransitionRelation {
        &self.delta
    }

    /// Runs `word` from the initial state. The word is rejected as soon as a transition is
    /// missing, otherwise it is accepted if the state reached at the end is accepting.
    fn accepts(&self, word: &str) -> Result<bool, AutomatonError> {
        let symbols = self.verify_word(word)?;
        Ok(self
            .run(symbols)
            .map(|q| self.states.is_accepting(q))
            .unwrap_or(false))
    }

    fn rep_ok(&self) -> bool {
        self.check_representation()
    }
}

impl DFA {
    /// Returns the unique successor of `state` on `sym`, if the transition is defined.
    pub fn successor(&self, state: StateId, sym: Symbol) -> Option<StateId> {
        self.delta.successors(state, Label::Symbol(sym)).next()
    }

    /// Follows `symbols` from the initial state and returns the state that is reached, or `None`
    /// if the automaton is empty or some transition on the way is undefined.
    pub fn run<I: IntoIterator<Item = Symbol>>(&self, symbols: I) -> Option<StateId> {
        symbols.into_iter().try_fold(self.initial()?, |q, sym| {
            let next = self.successor(q, sym);
            trace!("{q:?} --{sym}--> {next:?}");
            next
        })
    }

    /// Returns true if every state has a transition on every symbol.
    pub fn is_complete(&self) -> bool {
        self.states.ids().all(|q| {
            self.alphabet
                .iter()
                .all(|sym| self.successor(q, sym).is_some())
        })
    }

    /// Returns a copy of `self` in which every undefined transition leads to a fresh rejecting
    /// sink state that loops on every symbol. If `self` is already complete, the copy has the same
    /// states. The accepted language does not change.
    ///
    /// The empty automaton has no run at all, so its completion consists of the sink alone, which
    /// is then the initial state.
    pub fn complete(&self) -> DFA {
        let mut out = self.deep_clone();
        if !out.is_empty() && self.is_complete() {
            return out;
        }

        let initial = out.is_empty();
        let name = out.states.fresh_name("q");
        let sink = out.states.push(State::new(name, initial, false));
        debug!(
            "completing DFA with {} states by adding sink {:?}",
            self.size(),
            sink
        );
        for q in out.states.ids() {
            for sym in out.alphabet.iter() {
                if out.successor(q, sym).is_none() {
                    out.delta.insert(q, Label::Symbol(sym), sink);
                }
            }
        }
        debug_assert!(out.is_complete());
        out
    }

    /// Views `self` as an [`EpsilonNFA`]. Every DFA is one that happens to use neither epsilon
    /// transitions nor branching.
    pub fn into_nfa(self) -> EpsilonNFA {
        let (states, alphabet, delta) = self.into_parts();
        EpsilonNFA::from_parts(states, alphabet, delta)
    }
}
