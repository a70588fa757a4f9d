use thiserror::Error;

use crate::alphabet::Symbol;

/// Represents the types of errors that can occur when building an automaton or running it
/// on a word.
///
/// Note that a missing transition is not an error: looking up a transition that does not
/// exist simply yields nothing and recognition treats it as "no move".
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AutomatonError {
    /// A transition mentions a state that is not part of the automaton.
    #[error("transition refers to unknown state {0}")]
    UnknownState(String),
    /// A transition is labeled with a symbol that is not part of the alphabet.
    #[error("transition is labeled with symbol {0:?} which is not in the alphabet")]
    UnknownSymbol(Symbol),
    /// An epsilon transition was given to a deterministic automaton.
    #[error("deterministic automaton can not have epsilon transition leaving {state}")]
    IllegalEpsilon {
        /// Name of the source state of the offending transition.
        state: String,
    },
    /// Two transitions leave the same state on the same symbol in a deterministic automaton.
    #[error("deterministic automaton has more than one transition from {state} on {symbol:?}")]
    NonDeterministicTransition {
        /// Name of the source state.
        state: String,
        /// The symbol that is used twice.
        symbol: Symbol,
    },
    /// A word contains a symbol that is not part of the alphabet.
    #[error("symbol {0:?} of the word does not belong to the alphabet")]
    AlphabetMismatch(Symbol),
    /// The states do not contain precisely one initial state.
    #[error("automaton must have exactly one initial state, but has {0}")]
    InitialStateCount(usize),
    /// A different state with the same name exists already.
    #[error("a different state named {0} exists already")]
    DuplicateState(String),
}
