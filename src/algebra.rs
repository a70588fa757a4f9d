//! Boolean operations on [`DFA`]s. Every operation works on private copies of its operands,
//! which are never modified, and returns a freshly built automaton.
use itertools::Itertools;
use tracing::debug;

use crate::prelude::*;

impl DFA {
    /// Computes an automaton accepting precisely the words over the alphabet of `self` that
    /// `self` rejects.
    ///
    /// The copy is first completed (see [`DFA::complete`]) so that every word has a run, then
    /// every state has its accepting flag flipped. The flags live in the state collection only,
    /// so the transition relation observes the flip without being touched. The initial state
    /// stays the same.
    pub fn complement(&self) -> DFA {
        let (mut states, alphabet, delta) = self.complete().into_parts();
        for q in states.ids().collect_vec() {
            let accepting = states.is_accepting(q);
            states.set_accepting(q, !accepting);
        }
        DFA::from_parts(states, alphabet, delta)
    }

    /// Computes an automaton accepting the words that are accepted by `self` or by `other`,
    /// over the union of both alphabets.
    ///
    /// Both operands are copied into a single [`EpsilonNFA`] with fresh state names, where
    /// neither of the former initial states is initial anymore. A new initial state branches
    /// into both of them with epsilon transitions. The result is the determinization of that
    /// automaton.
    pub fn union(&self, other: &DFA) -> DFA {
        let mut states = StateSet::new();
        let mut delta = TransitionRelation::new();
        let mut former_initial = vec![];

        for operand in [self, other] {
            let offset = states.len();
            for (id, q) in operand.states().iter() {
                let copy = states.push(State::new(
                    format!("q{}", offset + id.index()),
                    false,
                    q.is_accepting(),
                ));
                if q.is_initial() {
                    former_initial.push(copy);
                }
            }
            for (p, label, q) in operand.transitions().triples() {
                delta.insert(
                    StateId::from_usize(offset + p.index()),
                    label,
                    StateId::from_usize(offset + q.index()),
                );
            }
        }

        let start = states.push(State::new(states.fresh_name("q"), true, false));
        for q in former_initial {
            delta.insert(start, Label::Epsilon, q);
        }

        let alphabet = self.alphabet().union(other.alphabet());
        let nfa = EpsilonNFA::from_parts(states, alphabet, delta);
        debug!(
            "union of DFAs with {} and {} states goes through epsilon-NFA with {} states",
            self.size(),
            other.size(),
            nfa.size()
        );
        nfa.determinize()
    }

    /// Computes an automaton accepting the words that are accepted by both `self` and `other`.
    /// By De Morgan's law, this is the complement of the union of the two complements. Both
    /// complements are taken over the union of the two alphabets, otherwise a word using a
    /// symbol that only one operand knows would slip through.
    pub fn intersection(&self, other: &DFA) -> DFA {
        let alphabet = self.alphabet().union(other.alphabet());
        self.with_symbols(&alphabet)
            .complement()
            .union(&other.with_symbols(&alphabet).complement())
            .complement()
    }

    /// Returns a copy of `self` whose alphabet additionally contains the symbols of `alphabet`.
    /// No transitions are added, so the accepted language stays the same.
    pub fn with_symbols(&self, alphabet: &Alphabet) -> DFA {
        let (states, own, delta) = self.deep_clone().into_parts();
        DFA::from_parts(states, own.union(alphabet), delta)
    }
}
