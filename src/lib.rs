//! Library for finite automata over finite alphabets of `char` symbols.
//!
//! An automaton consists of a collection of states ([`state::StateSet`]), an [`Alphabet`] and a
//! transition relation ([`transition::TransitionRelation`]) which maps a state together with a
//! [`Label`] to a set of successor states. A label is either a symbol of the alphabet or
//! [`Label::Epsilon`], which marks a transition that consumes no input. Exactly one state of a
//! (non-empty) automaton is initial.
//!
//! There are two flavours, both instances of [`automaton::FiniteAutomaton`]:
//! - [`DFA`] where each state has at most one successor per symbol and no epsilon transitions
//!   exist. Acceptance is a single linear run.
//! - [`EpsilonNFA`] which allows arbitrarily many successors and epsilon transitions. Acceptance
//!   is a search over the configurations of the automaton.
//!
//! An [`EpsilonNFA`] can be turned into an equivalent [`DFA`] through the subset construction,
//! see the [`determinize`] module. On top of that, DFAs support the boolean
//! operations complement, union and intersection (see the [`algebra`] module). All of these
//! operations leave their operands untouched and produce fresh automata.
//!
//! Automata are usually built from a textual graph description, see the [`dot`] module which is
//! available with the `dot` feature (enabled by default).
//!
//! ```
//! use finite_automata::prelude::*;
//!
//! let states = StateSet::from_states([State::new("q0", true, true), State::new("q1", false, false)])
//!     .unwrap();
//! let dfa = DFA::new(states, Alphabet::from_iter(['b']), [("q0", 'b', "q1"), ("q1", 'b', "q0")])
//!     .unwrap();
//! assert!(dfa.accepts("bb").unwrap());
//! assert!(!dfa.accepts("b").unwrap());
//! assert!(dfa.complement().accepts("bbb").unwrap());
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use itertools::Itertools;

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use finite_automata::prelude::*;` should be enough to use the package.
pub mod prelude {
    #[cfg(feature = "dot")]
    pub use super::dot::{parse_dot, DotAutomaton, DotError, Dottable};
    pub use super::{
        alphabet::{Alphabet, Label, Symbol},
        automaton::{Automaton, EpsilonNFA, FiniteAutomaton, DFA},
        error::AutomatonError,
        math,
        state::{State, StateId, StateSet},
        transition::{Transition, TransitionRelation},
        Show,
    };
}

/// Collection types that are used throughout the crate.
pub mod math;

/// Module that contains definitions for dealing with alphabets and transition labels.
pub mod alphabet;
pub use alphabet::{Alphabet, Label};

/// States and collections of states.
pub mod state;

/// The transition relation of an automaton and the transition triples it is built from.
pub mod transition;

/// Errors that can occur when constructing or querying automata.
pub mod error;
pub use error::AutomatonError;

/// Defines automata, their recognition semantics and the conversion between the two kinds.
#[allow(clippy::upper_case_acronyms)]
pub mod automaton;
pub use automaton::{Automaton, EpsilonNFA, DFA};

/// Conversion of epsilon-NFAs into DFAs through the subset construction.
pub mod determinize;

/// Boolean operations on deterministic automata.
pub mod algebra;

/// Reading and writing automata in the graphviz DOT format.
#[cfg(feature = "dot")]
pub mod dot;

/// Helper trait which can be used to display states, transitions and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state index that should be
    /// for example q0, q1, q2, ... and for a transition (q0, a, q1) it should be (q0, a, q1).
    /// Just use something that makes sense. This is mainly used for debugging purposes.
    fn show(&self) -> String;
    /// Show a collection of the thing, for a collection of states this should be {q0, q1, q2, ...}.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("{{{}}}", iter.into_iter().map(|x| x.show()).join(", "))
    }
}

impl Show for usize {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }

    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("\"{}\"", iter.into_iter().join(""))
    }
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "+",
            false => "-",
        }
        .to_string()
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show> Show for std::collections::BTreeSet<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show, T: Show> Show for (S, T) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}

impl<S: Show> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// Two state DFA over `{b}` that accepts exactly the words of even length.
    pub fn even_bs() -> DFA {
        let states =
            StateSet::from_states([State::new("q0", true, true), State::new("q1", false, false)])
                .unwrap();
        DFA::new(
            states,
            Alphabet::from_iter(['b']),
            [("q0", 'b', "q1"), ("q1", 'b', "q0")],
        )
        .unwrap()
    }

    /// DFA over `{b}` that accepts only `bb`. It is not complete.
    pub fn only_bb() -> DFA {
        let states = StateSet::from_states([
            State::new("r0", true, false),
            State::new("r1", false, false),
            State::new("r2", false, true),
        ])
        .unwrap();
        DFA::new(
            states,
            Alphabet::from_iter(['b']),
            [("r0", 'b', "r1"), ("r1", 'b', "r2")],
        )
        .unwrap()
    }

    /// DFA over `{a}` that accepts `a+`.
    pub fn some_as() -> DFA {
        let states =
            StateSet::from_states([State::new("p0", true, false), State::new("p1", false, true)])
                .unwrap();
        DFA::new(
            states,
            Alphabet::from_iter(['a']),
            [("p0", 'a', "p1"), ("p1", 'a', "p1")],
        )
        .unwrap()
    }

    /// Epsilon-NFA for `c?a+`.
    pub fn optional_c_then_as() -> EpsilonNFA {
        let states = StateSet::from_states([
            State::new("s0", true, false),
            State::new("s1", false, false),
            State::new("s2", false, true),
        ])
        .unwrap();
        EpsilonNFA::new(
            states,
            Alphabet::from_iter(['a', 'c']),
            [
                Transition::new("s0", 'c', "s1"),
                Transition::epsilon("s0", "s1"),
                Transition::new("s1", 'a', "s2"),
                Transition::new("s2", 'a', "s2"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn show_collections() {
        assert_eq!(vec!['a', 'b'].show(), "\"ab\"");
        assert_eq!(vec![1usize, 2].show(), "{1, 2}");
        assert_eq!((true, false).show(), "(+, -)");
    }
}
