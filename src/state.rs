use std::fmt::Debug;

use indexmap::{map::Entry, IndexMap};
use itertools::Itertools;

use crate::{error::AutomatonError, Show};

/// Integer handle of a [`State`] within the [`StateSet`] that owns it. Handles are assigned in
/// insertion order, so the `n`-th state that is added has handle `n`.
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct StateId(pub(crate) u32);

impl StateId {
    /// Creates a handle from its position.
    ///
    /// # Panics
    /// Handles are `u32`, so this panics if `n` exceeds `u32::MAX`. An automaton (or a subset
    /// construction) can therefore hold at most `u32::MAX + 1` states.
    pub fn from_usize(n: usize) -> Self {
        Self(n.try_into().expect("state handle does not fit into u32"))
    }

    /// Returns the position this handle refers to.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Debug for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl Show for StateId {
    fn show(&self) -> String {
        format!("{:?}", self)
    }
}

/// A vertex of an automaton. The name identifies the state within its [`StateSet`], the two
/// flags can change while the name stays fixed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct State {
    name: String,
    initial: bool,
    accepting: bool,
}

impl State {
    /// Creates a new state with the given name and flags.
    pub fn new<S: Into<String>>(name: S, initial: bool, accepting: bool) -> Self {
        Self {
            name: name.into(),
            initial,
            accepting,
        }
    }

    /// The name of the state.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the initial state.
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// Whether this state is accepting (final).
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Sets the initial flag.
    pub fn set_initial(&mut self, initial: bool) {
        self.initial = initial;
    }

    /// Sets the accepting flag.
    pub fn set_accepting(&mut self, accepting: bool) {
        self.accepting = accepting;
    }
}

impl Show for State {
    fn show(&self) -> String {
        match (self.initial, self.accepting) {
            (true, true) => format!("→({})", self.name),
            (true, false) => format!("→{}", self.name),
            (false, true) => format!("({})", self.name),
            (false, false) => self.name.clone(),
        }
    }
}

/// An ordered collection of [`State`]s, keyed by name. The [`StateId`] of a state is its position
/// in the collection.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StateSet(IndexMap<String, State>);

impl StateSet {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from the given states, failing on the first name clash between two
    /// different states.
    pub fn from_states<I: IntoIterator<Item = State>>(iter: I) -> Result<Self, AutomatonError> {
        let mut out = Self::new();
        for state in iter {
            out.add(state)?;
        }
        Ok(out)
    }

    /// Adds `state` and returns its handle. Adding a state that is already present (same name
    /// and flags) returns the existing handle, a different state with the same name causes
    /// [`AutomatonError::DuplicateState`].
    pub fn add(&mut self, state: State) -> Result<StateId, AutomatonError> {
        let index = match self.0.entry(state.name.clone()) {
            Entry::Occupied(existing) if existing.get() == &state => existing.index(),
            Entry::Occupied(_) => return Err(AutomatonError::DuplicateState(state.name)),
            Entry::Vacant(vacant) => {
                let index = vacant.index();
                vacant.insert(state);
                index
            }
        };
        Ok(StateId::from_usize(index))
    }

    /// Appends a state whose name the caller knows to be fresh.
    pub(crate) fn push(&mut self, state: State) -> StateId {
        debug_assert!(!self.0.contains_key(state.name()), "{} is not fresh", state.name);
        let (index, _) = self.0.insert_full(state.name.clone(), state);
        StateId::from_usize(index)
    }

    /// Removes the state with the given name. The states after it move up by one position, which
    /// shifts their handles.
    pub fn remove(&mut self, name: &str) -> Option<State> {
        self.0.shift_remove(name)
    }

    /// Looks up a state by name.
    pub fn get(&self, name: &str) -> Option<&State> {
        self.0.get(name)
    }

    /// Returns the handle of the state with the given name.
    pub fn id_of(&self, name: &str) -> Option<StateId> {
        self.0.get_index_of(name).map(StateId::from_usize)
    }

    /// Returns the state that `id` refers to.
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.0.get_index(id.index()).map(|(_, q)| q)
    }

    /// Mutable access to the state that `id` refers to. The name can not be changed through this.
    pub fn state_mut(&mut self, id: StateId) -> Option<&mut State> {
        self.0.get_index_mut(id.index()).map(|(_, q)| q)
    }

    /// Returns true if a state with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns true if `id` refers to a state of `self`.
    pub fn contains_id(&self, id: StateId) -> bool {
        id.index() < self.0.len()
    }

    /// Computes the union of `self` and `other`. The states of `self` keep their handles, the
    /// ones of `other` that are new are appended. Two different states sharing a name are not
    /// merged, instead [`AutomatonError::DuplicateState`] is returned.
    pub fn union(&self, other: &StateSet) -> Result<StateSet, AutomatonError> {
        let mut out = self.clone();
        for state in other.0.values() {
            out.add(state.clone())?;
        }
        Ok(out)
    }

    /// Iterates over all states that are marked initial.
    pub fn initial_states(&self) -> impl Iterator<Item = (StateId, &State)> + '_ {
        self.iter().filter(|(_, q)| q.is_initial())
    }

    /// Returns the initial state, provided there is precisely one.
    pub fn initial_state(&self) -> Option<(StateId, &State)> {
        self.initial_states().exactly_one().ok()
    }

    /// Iterates over all accepting states.
    pub fn accepting_states(&self) -> impl Iterator<Item = (StateId, &State)> + '_ {
        self.iter().filter(|(_, q)| q.is_accepting())
    }

    /// Returns true if `id` refers to an accepting state.
    pub fn is_accepting(&self, id: StateId) -> bool {
        self.state(id).map(State::is_accepting).unwrap_or(false)
    }

    /// Sets the accepting flag of the state `id`, returns false if no such state exists.
    pub fn set_accepting(&mut self, id: StateId, accepting: bool) -> bool {
        self.state_mut(id)
            .map(|q| q.set_accepting(accepting))
            .is_some()
    }

    /// Sets the initial flag of the state `id`, returns false if no such state exists.
    pub fn set_initial(&mut self, id: StateId, initial: bool) -> bool {
        self.state_mut(id).map(|q| q.set_initial(initial)).is_some()
    }

    /// Iterates over all states together with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &State)> + '_ {
        self.0
            .values()
            .enumerate()
            .map(|(i, q)| (StateId::from_usize(i), q))
    }

    /// Iterates over all handles.
    pub fn ids(&self) -> impl Iterator<Item = StateId> {
        (0..self.0.len()).map(StateId::from_usize)
    }

    /// The number of states.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no states.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Produces a name of the form `{prefix}{n}` that is not used by any state in `self`.
    pub fn fresh_name(&self, prefix: &str) -> String {
        (self.0.len()..)
            .map(|n| format!("{prefix}{n}"))
            .find(|name| !self.contains(name))
            .expect("an unused name exists among infinitely many candidates")
    }
}

impl Debug for StateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.show())
    }
}

impl Show for StateSet {
    fn show(&self) -> String {
        format!("{{{}}}", self.0.values().map(|q| q.show()).join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn add_lookup_remove() {
        let mut states = StateSet::new();
        let q0 = states.add(State::new("q0", true, false)).unwrap();
        let q1 = states.add(State::new("q1", false, true)).unwrap();

        assert_eq!(q0.index(), 0);
        assert_eq!(q1.index(), 1);
        assert_eq!(states.id_of("q1"), Some(q1));
        assert_eq!(states.state(q1).map(State::name), Some("q1"));
        assert!(states.contains("q0"));
        assert!(states.contains_id(q1));
        assert!(!states.contains_id(StateId::from_usize(2)));

        // re-adding an identical state is fine, a different one is not
        assert_eq!(states.add(State::new("q0", true, false)), Ok(q0));
        assert_eq!(
            states.add(State::new("q0", false, false)),
            Err(AutomatonError::DuplicateState("q0".to_string()))
        );

        assert!(states.remove("q0").is_some());
        assert_eq!(states.id_of("q1"), Some(StateId::from_usize(0)));
        assert!(states.get("q0").is_none());
    }

    #[test_log::test]
    fn initial_and_accepting() {
        let mut states = StateSet::from_states([
            State::new("a", false, true),
            State::new("b", true, false),
            State::new("c", false, true),
        ])
        .unwrap();

        let (id, initial) = states.initial_state().unwrap();
        assert_eq!(initial.name(), "b");
        assert_eq!(id, StateId::from_usize(1));
        assert_eq!(
            states
                .accepting_states()
                .map(|(_, q)| q.name())
                .collect::<Vec<_>>(),
            vec!["a", "c"]
        );

        assert!(states.set_initial(StateId::from_usize(0), true));
        assert!(states.initial_state().is_none());
        assert_eq!(states.initial_states().count(), 2);

        assert!(states.set_accepting(StateId::from_usize(0), false));
        assert!(!states.is_accepting(StateId::from_usize(0)));
        assert!(!states.set_accepting(StateId::from_usize(9), true));
    }

    #[test_log::test]
    fn union_keeps_distinct_states_apart() {
        let left = StateSet::from_states([State::new("q0", true, false)]).unwrap();
        let same = StateSet::from_states([State::new("q0", true, false)]).unwrap();
        let clash = StateSet::from_states([State::new("q0", false, true)]).unwrap();
        let other = StateSet::from_states([State::new("p0", false, true)]).unwrap();

        assert_eq!(left.union(&same).unwrap().len(), 1);
        assert!(matches!(
            left.union(&clash),
            Err(AutomatonError::DuplicateState(name)) if name == "q0"
        ));
        let union = left.union(&other).unwrap();
        assert_eq!(union.len(), 2);
        assert_eq!(union.id_of("p0"), Some(StateId::from_usize(1)));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    #[should_panic(expected = "state handle does not fit into u32")]
    fn handles_are_bounded() {
        assert_eq!(StateId::from_usize(u32::MAX as usize).index(), u32::MAX as usize);
        StateId::from_usize(u32::MAX as usize + 1);
    }

    #[test]
    fn fresh_names() {
        let states =
            StateSet::from_states([State::new("q1", true, false), State::new("q2", false, false)])
                .unwrap();
        assert_eq!(states.fresh_name("q"), "q3");
        assert_eq!(states.fresh_name("sink"), "sink2");
        assert_eq!(StateId::from_usize(4).show(), "q4");
        assert_eq!(State::new("x", true, true).show(), "→(x)");
    }
}
