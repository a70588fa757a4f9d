use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::{
    math::{Bijection, OrderedSet},
    prelude::*,
};

/// A state of the deterministic automaton under construction, which is a set of states of the
/// nondeterministic one. Being ordered, two subsets with the same members are always equal.
type Subset = OrderedSet<StateId>;

impl EpsilonNFA {
    /// Builds a [`DFA`] accepting the same language as `self` through the subset construction.
    ///
    /// The initial state of the result is the epsilon closure of the initial state of `self`.
    /// Starting from it, subsets are explored in breadth first order: for each subset `S` and
    /// each symbol `a`, the successor is the epsilon closure of all `a`-successors of `S`. An
    /// empty successor means the transition stays undefined. The `n`-th subset that is
    /// discovered becomes the state `qn`, it is accepting if it contains an accepting state of
    /// `self`.
    pub fn determinize(&self) -> DFA {
        let Some(initial) = self.initial() else {
            debug!("determinizing empty automaton");
            return DFA::empty();
        };

        let mut subsets: Bijection<usize, Subset> = Bijection::new();
        let mut queue = VecDeque::new();
        let mut edges = vec![];

        let start = self.epsilon_closure([initial]);
        subsets.insert(0, start);
        queue.push_back(0);

        while let Some(source) = queue.pop_front() {
            let current = subsets
                .get_by_left(&source)
                .cloned()
                .expect("queued subsets are registered");
            for sym in self.alphabet().iter() {
                let reached = self.epsilon_closure(self.move_on(&current, sym));
                if reached.is_empty() {
                    continue;
                }
                let target = match subsets.get_by_right(&reached) {
                    Some(&known) => known,
                    None => {
                        let fresh = subsets.len();
                        trace!("discovered subset {} as q{fresh}", reached.show());
                        subsets.insert(fresh, reached);
                        queue.push_back(fresh);
                        fresh
                    }
                };
                edges.push((source, sym, target));
            }
        }

        debug!(
            "subset construction turned {} states into {} states",
            self.size(),
            subsets.len()
        );
        self.rebuild(&subsets, edges)
    }

    /// Turns the explored subsets and the transitions between them into a [`DFA`]. Subset `0` is
    /// the initial one.
    fn rebuild(&self, subsets: &Bijection<usize, Subset>, edges: Vec<(usize, Symbol, usize)>) -> DFA {
        let mut states = StateSet::new();
        for index in 0..subsets.len() {
            let subset = subsets
                .get_by_left(&index)
                .expect("subsets are numbered consecutively");
            let accepting = subset.iter().any(|&q| self.states().is_accepting(q));
            states.push(State::new(format!("q{index}"), index == 0, accepting));
        }
        debug_assert_eq!(states.initial_states().count(), 1);

        let mut delta = TransitionRelation::new();
        for (source, sym, target) in edges {
            delta.insert(
                StateId::from_usize(source),
                Label::Symbol(sym),
                StateId::from_usize(target),
            );
        }
        DFA::from_parts(states, self.alphabet().clone(), delta)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::optional_c_then_as;

    #[test_log::test]
    fn determinized_agrees_with_nfa() {
        let nfa = optional_c_then_as();
        let dfa = nfa.determinize();

        assert!(dfa.rep_ok());
        assert!(dfa.transitions().is_deterministic());
        for word in ["a", "ca", "caa", "ac", "c", "", "aaaa", "cc", "cac"] {
            assert_eq!(dfa.accepts(word), nfa.accepts(word), "disagreement on {word:?}");
        }
        assert_eq!(dfa.initial_state().map(|(_, q)| q.name()), Some("q0"));
        assert_eq!(dfa.states().initial_states().count(), 1);
        // {s0, s1}, {s1} after c, {s2} after a
        assert_eq!(dfa.size(), 3);
    }

    #[test_log::test]
    fn subset_construction_merges_branches() {
        // 0 -a-> 1, 0 -a-> 2, 1 -b-> 3, 2 -b-> 3 with 3 accepting
        let states = StateSet::from_states([
            State::new("0", true, false),
            State::new("1", false, false),
            State::new("2", false, false),
            State::new("3", false, true),
        ])
        .unwrap();
        let nfa = EpsilonNFA::new(
            states,
            Alphabet::from_iter(['a', 'b']),
            [
                ("0", 'a', "1"),
                ("0", 'a', "2"),
                ("1", 'b', "3"),
                ("2", 'b', "3"),
            ],
        )
        .unwrap();

        let dfa = nfa.determinize();
        assert!(dfa.rep_ok());
        assert_eq!(dfa.size(), 3);
        assert_eq!(
            dfa.states().initial_states().map(|(_, q)| q.name()).collect::<Vec<_>>(),
            vec!["q0"]
        );
        assert_eq!(
            dfa.accepting_states().map(|(_, q)| q.name()).collect::<Vec<_>>(),
            vec!["q2"]
        );
        assert!(dfa.accepts("ab").unwrap());
        assert!(!dfa.accepts("a").unwrap());
        assert!(!dfa.accepts("abb").unwrap());
    }

    #[test_log::test]
    fn epsilon_only_acceptance() {
        let states = StateSet::from_states([
            State::new("start", true, false),
            State::new("end", false, true),
        ])
        .unwrap();
        let nfa = EpsilonNFA::new(
            states,
            Alphabet::from_iter(['a']),
            [Transition::epsilon("start", "end")],
        )
        .unwrap();

        let dfa = nfa.determinize();
        assert!(dfa.rep_ok());
        assert_eq!(dfa.size(), 1);
        assert!(dfa.accepts("").unwrap());
        assert!(!dfa.accepts("a").unwrap());
    }

    #[test]
    fn empty_nfa_gives_empty_dfa() {
        let dfa = EpsilonNFA::empty().determinize();
        assert!(dfa.is_empty());
        assert!(dfa.rep_ok());
    }
}
