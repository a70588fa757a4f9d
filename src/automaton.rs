use itertools::Itertools;
use owo_colors::OwoColorize;
use tracing::trace;

use crate::prelude::*;

mod dfa;
mod nfa;

/// A finite automaton given by its states, its alphabet and its transition relation. The const
/// parameter `DET` distinguishes the two kinds: for `DET = true` (see [`DFA`]) every state has at
/// most one successor per symbol and there are no epsilon transitions, for `DET = false` (see
/// [`EpsilonNFA`]) both restrictions are lifted.
///
/// Every non-empty automaton has precisely one initial state. The automaton without any states,
/// symbols and transitions (see [`FiniteAutomaton::empty`]) serves as an uninitialized value; it
/// accepts nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FiniteAutomaton<const DET: bool> {
    states: StateSet,
    alphabet: Alphabet,
    delta: TransitionRelation,
}

/// A deterministic finite automaton (DFA). It accepts a finite word if running the word from the
/// initial state ends in an accepting state.
pub type DFA = FiniteAutomaton<true>;

/// A nondeterministic finite automaton with epsilon transitions. It accepts a word if there is
/// some run on it that ends in an accepting state.
pub type EpsilonNFA = FiniteAutomaton<false>;

/// The capability shared by both kinds of automata: access to the three components and
/// recognition of words.
pub trait Automaton {
    /// The collection of states.
    fn states(&self) -> &StateSet;

    /// The alphabet.
    fn alphabet(&self) -> &Alphabet;

    /// The transition relation.
    fn transitions(&self) -> &TransitionRelation;

    /// Decides whether `word` is accepted. Fails with [`AutomatonError::AlphabetMismatch`] if the
    /// word contains a symbol that is not in the alphabet.
    fn accepts(&self, word: &str) -> Result<bool, AutomatonError>;

    /// Verifies the representation invariants: the automaton is either empty or has exactly one
    /// initial state, every transition connects states of the automaton via a label admitted by
    /// the alphabet, and a deterministic automaton has no epsilon transitions and at most one
    /// successor per state and symbol. Intended for tests and debugging.
    fn rep_ok(&self) -> bool;

    /// Returns the initial state together with its handle, `None` for an empty automaton.
    fn initial_state(&self) -> Option<(StateId, &State)> {
        self.states().initial_state()
    }

    /// Iterates over the accepting states.
    fn accepting_states(&self) -> impl Iterator<Item = (StateId, &State)> + '_ {
        self.states().accepting_states()
    }

    /// Returns the successors of `state` on `label`, or `None` if the transition is undefined.
    fn delta(&self, state: StateId, label: Label) -> Option<&math::OrderedSet<StateId>> {
        self.transitions().delta(state, label)
    }

    /// Checks that every symbol of `word` is part of the alphabet and returns them in order.
    fn verify_word(&self, word: &str) -> Result<Vec<Symbol>, AutomatonError> {
        match self.alphabet().first_foreign(word) {
            Some(sym) => Err(AutomatonError::AlphabetMismatch(sym)),
            None => Ok(word.chars().collect()),
        }
    }
}

impl<const DET: bool> FiniteAutomaton<DET> {
    /// Creates an automaton from a collection of states, an alphabet and transitions between
    /// states given by name. Construction fails if
    /// - `states` is non-empty but does not have precisely one initial state,
    /// - a transition refers to a state that does not exist ([`AutomatonError::UnknownState`]),
    /// - a transition uses a symbol outside of `alphabet` ([`AutomatonError::UnknownSymbol`]),
    /// - for a [`DFA`], a transition is labeled with epsilon ([`AutomatonError::IllegalEpsilon`])
    ///   or a state has two transitions with different targets on the same symbol
    ///   ([`AutomatonError::NonDeterministicTransition`]).
    ///
    /// Transitions are collected as a set, so giving the same transition twice is harmless.
    pub fn new<I, T>(
        states: StateSet,
        alphabet: Alphabet,
        transitions: I,
    ) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Transition>,
    {
        let initial = states.initial_states().count();
        if !states.is_empty() && initial != 1 {
            return Err(AutomatonError::InitialStateCount(initial));
        }

        let mut delta = TransitionRelation::new();
        for transition in transitions {
            let Transition {
                source,
                label,
                target,
            } = transition.into();
            let p = states
                .id_of(&source)
                .ok_or_else(|| AutomatonError::UnknownState(source.clone()))?;
            let q = states
                .id_of(&target)
                .ok_or(AutomatonError::UnknownState(target))?;

            match label {
                Label::Epsilon if DET => {
                    return Err(AutomatonError::IllegalEpsilon { state: source });
                }
                Label::Symbol(sym) if !alphabet.contains(sym) => {
                    return Err(AutomatonError::UnknownSymbol(sym));
                }
                Label::Symbol(sym) if DET => {
                    if delta.delta(p, label).is_some_and(|existing| !existing.contains(&q)) {
                        return Err(AutomatonError::NonDeterministicTransition {
                            state: source,
                            symbol: sym,
                        });
                    }
                }
                _ => {}
            }
            delta.insert(p, label, q);
        }

        trace!(
            "built automaton with {} states and {} transitions",
            states.len(),
            delta.len()
        );
        Ok(Self {
            states,
            alphabet,
            delta,
        })
    }

    /// The empty automaton without states, symbols and transitions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assembles an automaton from components that are known to be consistent.
    pub(crate) fn from_parts(
        states: StateSet,
        alphabet: Alphabet,
        delta: TransitionRelation,
    ) -> Self {
        let out = Self {
            states,
            alphabet,
            delta,
        };
        debug_assert!(
            out.check_representation(),
            "assembled an ill-formed automaton {:?}",
            out
        );
        out
    }

    pub(crate) fn into_parts(self) -> (StateSet, Alphabet, TransitionRelation) {
        (self.states, self.alphabet, self.delta)
    }

    /// Handle of the initial state, `None` for an empty automaton.
    pub fn initial(&self) -> Option<StateId> {
        self.states.initial_state().map(|(id, _)| id)
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns true if this is the empty automaton, i.e. it has no states at all.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns the transitions as triples of state names.
    pub fn transition_triples(&self) -> Vec<Transition> {
        self.delta
            .triples()
            .into_iter()
            .map(|(p, label, q)| Transition::new(self.name_of(p), label, self.name_of(q)))
            .collect()
    }

    fn name_of(&self, id: StateId) -> &str {
        self.states
            .state(id)
            .map(State::name)
            .expect("transition endpoints are states of the automaton")
    }

    /// Produces an independent copy of `self`. The states are rebuilt one by one into a fresh
    /// collection and the transitions are translated through the mapping from old to new
    /// handles, so nothing is shared with `self`.
    pub fn deep_clone(&self) -> Self {
        let mut states = StateSet::new();
        let translation = self
            .states
            .iter()
            .map(|(_, q)| states.push(q.clone()))
            .collect_vec();
        let delta = self.delta.map_states(|q| translation[q.index()]);
        Self::from_parts(states, self.alphabet.clone(), delta)
    }

    /// Returns true if and only if no word is accepted, which is the case when no accepting
    /// state can be reached from the initial state.
    pub fn is_empty_language(&self) -> bool {
        let Some(initial) = self.initial() else {
            return true;
        };
        let mut seen = math::Set::default();
        let mut stack = vec![initial];
        while let Some(q) = stack.pop() {
            if !seen.insert(q) {
                continue;
            }
            if self.states.is_accepting(q) {
                return false;
            }
            stack.extend(
                self.delta
                    .labels_from(q)
                    .flat_map(|label| self.delta.successors(q, label)),
            );
        }
        true
    }

    pub(crate) fn check_representation(&self) -> bool {
        if self.states.is_empty() {
            return self.delta.is_empty();
        }
        if self.states.initial_states().count() != 1 {
            trace!("representation broken: no unique initial state");
            return false;
        }
        self.delta.triples().into_iter().all(|(p, label, q)| {
            let ok = self.states.contains_id(p)
                && self.states.contains_id(q)
                && self.alphabet.admits(label)
                && !(DET && label.is_epsilon());
            if !ok {
                trace!("representation broken by transition ({p:?}, {label:?}, {q:?})");
            }
            ok
        }) && (!DET || self.delta.is_deterministic())
    }
}

impl<const DET: bool> Show for FiniteAutomaton<DET> {
    /// Renders the transition table. The initial state is marked with an arrow and accepting
    /// states are highlighted.
    fn show(&self) -> String {
        let labels = self
            .alphabet
            .iter()
            .map(Label::Symbol)
            .chain((!DET).then_some(Label::Epsilon))
            .collect_vec();

        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(labels.iter().map(|label| label.show())),
        );
        for (id, state) in self.states.iter() {
            let name = if state.is_accepting() {
                state.name().bold().green().to_string()
            } else {
                state.name().to_string()
            };
            let mut row = vec![if state.is_initial() {
                format!("→ {name}")
            } else {
                name
            }];
            for &label in &labels {
                row.push(match self.delta.delta(id, label) {
                    None => "-".to_string(),
                    Some(targets) if DET => targets.iter().map(|&q| self.name_of(q)).join(""),
                    Some(targets) => {
                        format!("{{{}}}", targets.iter().map(|&q| self.name_of(q)).join(", "))
                    }
                });
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}
