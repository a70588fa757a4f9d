use itertools::Itertools;

use crate::{
    alphabet::Label,
    math::{Map, OrderedSet},
    state::StateId,
    Show,
};

/// A transition given by the names of its endpoints. This is the form in which transitions are
/// handed to the constructors of automata.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Transition {
    /// Name of the state the transition leaves.
    pub source: String,
    /// The symbol consumed, or epsilon.
    pub label: Label,
    /// Name of the state the transition enters.
    pub target: String,
}

impl Transition {
    /// Creates a new transition.
    pub fn new<S, L, T>(source: S, label: L, target: T) -> Self
    where
        S: Into<String>,
        L: Into<Label>,
        T: Into<String>,
    {
        Self {
            source: source.into(),
            label: label.into(),
            target: target.into(),
        }
    }

    /// Creates a new epsilon transition.
    pub fn epsilon<S: Into<String>, T: Into<String>>(source: S, target: T) -> Self {
        Self::new(source, Label::Epsilon, target)
    }
}

impl<S, L, T> From<(S, L, T)> for Transition
where
    S: Into<String>,
    L: Into<Label>,
    T: Into<String>,
{
    fn from((source, label, target): (S, L, T)) -> Self {
        Transition::new(source, label, target)
    }
}

impl Show for Transition {
    fn show(&self) -> String {
        format!("({}, {}, {})", self.source, self.label.show(), self.target)
    }
}

/// The transition relation of an automaton. It maps every state and [`Label`] to the set of
/// successor states. Only handles are stored, the states themselves live in the
/// [`crate::state::StateSet`] of the automaton, so there is a single place where their flags
/// are kept.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TransitionRelation {
    edges: Map<StateId, Map<Label, OrderedSet<StateId>>>,
}

impl TransitionRelation {
    /// Creates an empty relation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the transition from `source` to `target` on `label`, returns true if it was not
    /// present before.
    pub fn insert(&mut self, source: StateId, label: Label, target: StateId) -> bool {
        self.edges
            .entry(source)
            .or_default()
            .entry(label)
            .or_default()
            .insert(target)
    }

    /// Returns the successors of `source` on `label`, or `None` if there is no such transition.
    pub fn delta(&self, source: StateId, label: Label) -> Option<&OrderedSet<StateId>> {
        self.edges
            .get(&source)
            .and_then(|by_label| by_label.get(&label))
    }

    /// Iterates over the successors of `source` on `label`. An undefined transition simply
    /// yields nothing.
    pub fn successors(&self, source: StateId, label: Label) -> impl Iterator<Item = StateId> + '_ {
        self.delta(source, label).into_iter().flatten().copied()
    }

    /// Iterates over the labels that have at least one transition leaving `source`.
    pub fn labels_from(&self, source: StateId) -> impl Iterator<Item = Label> + '_ {
        self.edges
            .get(&source)
            .into_iter()
            .flat_map(|by_label| by_label.keys().copied())
    }

    /// Returns all transitions as `(source, label, target)` triples, sorted.
    pub fn triples(&self) -> Vec<(StateId, Label, StateId)> {
        self.edges
            .iter()
            .flat_map(|(&source, by_label)| {
                by_label.iter().flat_map(move |(&label, targets)| {
                    targets.iter().map(move |&target| (source, label, target))
                })
            })
            .sorted()
            .collect()
    }

    /// The number of transitions.
    pub fn len(&self) -> usize {
        self.edges
            .values()
            .flat_map(|by_label| by_label.values())
            .map(|targets| targets.len())
            .sum()
    }

    /// Returns true if there are no transitions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if there is no epsilon transition and no state has more than one successor
    /// on any symbol.
    pub fn is_deterministic(&self) -> bool {
        self.edges.values().flat_map(|by_label| by_label.iter()).all(
            |(label, targets)| !label.is_epsilon() && targets.len() <= 1,
        )
    }

    /// Builds a new relation by mapping every state handle through `f`.
    pub(crate) fn map_states<F: Fn(StateId) -> StateId>(&self, f: F) -> TransitionRelation {
        let mut out = TransitionRelation::new();
        for (source, label, target) in self.triples() {
            out.insert(f(source), label, f(target));
        }
        out
    }
}

impl std::fmt::Debug for TransitionRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.triples()
                .into_iter()
                .map(|(p, a, q)| format!("({:?}, {}, {:?})", p, a.show(), q))
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: usize) -> StateId {
        StateId::from_usize(n)
    }

    #[test_log::test]
    fn lookup_and_insert() {
        let mut delta = TransitionRelation::new();
        assert!(delta.insert(id(0), 'a'.into(), id(1)));
        assert!(delta.insert(id(0), 'a'.into(), id(2)));
        assert!(!delta.insert(id(0), 'a'.into(), id(2)));
        assert!(delta.insert(id(1), Label::Epsilon, id(0)));

        assert_eq!(
            delta.delta(id(0), 'a'.into()).map(|t| t.len()),
            Some(2)
        );
        assert!(delta.delta(id(0), 'b'.into()).is_none());
        assert!(delta.delta(id(7), 'a'.into()).is_none());
        assert_eq!(delta.successors(id(0), 'b'.into()).count(), 0);
        assert_eq!(
            delta.successors(id(1), Label::Epsilon).collect::<Vec<_>>(),
            vec![id(0)]
        );
        assert_eq!(delta.len(), 3);
        assert_eq!(
            delta.triples(),
            vec![
                (id(0), 'a'.into(), id(1)),
                (id(0), 'a'.into(), id(2)),
                (id(1), Label::Epsilon, id(0)),
            ]
        );
        assert!(!delta.is_deterministic());
    }

    #[test]
    fn determinism() {
        let mut delta = TransitionRelation::new();
        assert!(delta.is_empty());
        delta.insert(id(0), 'a'.into(), id(1));
        delta.insert(id(1), 'a'.into(), id(1));
        assert!(delta.is_deterministic());

        let mut with_epsilon = delta.clone();
        with_epsilon.insert(id(1), Label::Epsilon, id(1));
        assert!(!with_epsilon.is_deterministic());

        let shifted = delta.map_states(|q| StateId::from_usize(q.index() + 3));
        assert_eq!(
            shifted.successors(id(3), 'a'.into()).collect::<Vec<_>>(),
            vec![id(4)]
        );
        assert_eq!(
            delta.labels_from(id(0)).collect::<Vec<_>>(),
            vec![Label::Symbol('a')]
        );
    }

    #[test]
    fn transitions_from_tuples() {
        let t: Transition = ("p", 'x', "q").into();
        assert_eq!(t, Transition::new("p", Label::Symbol('x'), "q"));
        assert_eq!(Transition::epsilon("p", "q").show(), "(p, ε, q)");
    }
}
