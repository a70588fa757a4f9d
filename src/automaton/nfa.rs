use tracing::trace;

use crate::{math::OrderedSet, prelude::*};

impl Automaton for EpsilonNFA {
    fn states(&self) -> &StateSet {
        &self.states
    }

    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn transitions(&self) -> &TransitionRelation {
        &self.delta
    }

    /// Performs a depth first search over configurations, which consist of a state and the
    /// number of symbols consumed so far. From a configuration, every epsilon successor is
    /// explored at the same position and every successor on the next symbol at the following
    /// position. The word is accepted as soon as an accepting state is reached with the whole
    /// word consumed. Configurations are explored at most once, which bounds the search by the
    /// number of states times the length of the word and makes epsilon cycles harmless.
    fn accepts(&self, word: &str) -> Result<bool, AutomatonError> {
        let symbols = self.verify_word(word)?;
        let Some(initial) = self.initial() else {
            return Ok(false);
        };

        let mut seen = math::Set::default();
        let mut stack = vec![(initial, 0usize)];
        while let Some((q, pos)) = stack.pop() {
            if !seen.insert((q, pos)) {
                continue;
            }
            trace!("exploring configuration ({q:?}, {pos})");
            if pos == symbols.len() && self.states.is_accepting(q) {
                return Ok(true);
            }

            stack.extend(
                self.delta
                    .successors(q, Label::Epsilon)
                    .map(|p| (p, pos)),
            );
            if let Some(&sym) = symbols.get(pos) {
                stack.extend(
                    self.delta
                        .successors(q, Label::Symbol(sym))
                        .map(|p| (p, pos + 1)),
                );
            }
        }
        Ok(false)
    }

    fn rep_ok(&self) -> bool {
        self.check_representation()
    }
}

impl EpsilonNFA {
    /// Computes the epsilon closure of `states`, that is the set of all states that can be
    /// reached from one of them using only epsilon transitions (including the states themselves).
    pub fn epsilon_closure<I: IntoIterator<Item = StateId>>(&self, states: I) -> OrderedSet<StateId> {
        let mut closure = OrderedSet::new();
        let mut queue: Vec<_> = states.into_iter().collect();
        while let Some(q) = queue.pop() {
            if closure.insert(q) {
                queue.extend(
                    self.delta
                        .successors(q, Label::Epsilon)
                        .filter(|p| !closure.contains(p)),
                );
            }
        }
        closure
    }

    /// Collects the successors on `sym` of all `states`. Epsilon transitions are not followed.
    pub fn move_on<'a, I>(&self, states: I, sym: Symbol) -> OrderedSet<StateId>
    where
        I: IntoIterator<Item = &'a StateId>,
    {
        states
            .into_iter()
            .flat_map(|&q| self.delta.successors(q, Label::Symbol(sym)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::optional_c_then_as;

    fn ids(nfa: &EpsilonNFA, names: &[&str]) -> math::OrderedSet<StateId> {
        names
            .iter()
            .map(|name| nfa.states().id_of(name).unwrap())
            .collect()
    }

    #[test_log::test]
    fn optional_c_followed_by_as() {
        let nfa = optional_c_then_as();
        assert!(nfa.rep_ok());
        for (word, expected) in [
            ("a", true),
            ("ca", true),
            ("caa", true),
            ("aaaaaaaa", true),
            ("", false),
            ("ac", false),
            ("c", false),
            ("cc", false),
        ] {
            assert_eq!(nfa.accepts(word), Ok(expected), "wrong answer on {word:?}");
        }
        assert_eq!(
            nfa.accepts("cab"),
            Err(AutomatonError::AlphabetMismatch('b'))
        );
    }

    #[test_log::test]
    fn epsilon_cycles_terminate() {
        let states = StateSet::from_states([
            State::new("a", true, false),
            State::new("b", false, false),
            State::new("c", false, true),
        ])
        .unwrap();
        let nfa = EpsilonNFA::new(
            states,
            Alphabet::from_iter(['x']),
            [
                Transition::epsilon("a", "b"),
                Transition::epsilon("b", "a"),
                Transition::new("b", 'x', "c"),
            ],
        )
        .unwrap();

        assert!(!nfa.accepts("").unwrap());
        assert!(nfa.accepts("x").unwrap());
        assert!(!nfa.accepts("xx").unwrap());
        assert_eq!(
            nfa.epsilon_closure(ids(&nfa, &["a"])),
            ids(&nfa, &["a", "b"])
        );
    }

    #[test_log::test]
    fn closure_and_move() {
        let nfa = optional_c_then_as();
        let initial = nfa.initial().unwrap();

        let closure = nfa.epsilon_closure([initial]);
        assert_eq!(closure, ids(&nfa, &["s0", "s1"]));
        assert_eq!(nfa.epsilon_closure(ids(&nfa, &["s2"])), ids(&nfa, &["s2"]));
        assert!(nfa.epsilon_closure([]).is_empty());

        assert_eq!(nfa.move_on(&closure, 'a'), ids(&nfa, &["s2"]));
        assert_eq!(nfa.move_on(&closure, 'c'), ids(&nfa, &["s1"]));
        assert!(nfa.move_on(&ids(&nfa, &["s2"]), 'c').is_empty());
    }

    #[test_log::test]
    fn accepting_initial_state_accepts_empty_word() {
        let states = StateSet::from_states([State::new("only", true, true)]).unwrap();
        let nfa = EpsilonNFA::new(states, Alphabet::from_iter(['a']), Vec::<Transition>::new())
            .unwrap();
        assert!(nfa.accepts("").unwrap());
        assert!(!nfa.accepts("a").unwrap());
    }
}
