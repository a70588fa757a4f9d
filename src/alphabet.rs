use itertools::Itertools;

use crate::{math::OrderedSet, Show};

/// A single input symbol.
pub type Symbol = char;

/// The label of a transition. This is either a [`Symbol`] of the alphabet or [`Label::Epsilon`],
/// which denotes a transition that does not consume any input. Epsilon is never a member of an
/// [`Alphabet`].
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Label {
    /// A transition consuming the given symbol.
    Symbol(Symbol),
    /// A transition that consumes nothing.
    Epsilon,
}

impl Label {
    /// Returns the symbol this label consumes, or `None` for epsilon.
    pub fn symbol(self) -> Option<Symbol> {
        match self {
            Label::Symbol(sym) => Some(sym),
            Label::Epsilon => None,
        }
    }

    /// Returns true if and only if `self` is [`Label::Epsilon`].
    pub fn is_epsilon(self) -> bool {
        matches!(self, Label::Epsilon)
    }
}

impl From<Symbol> for Label {
    fn from(value: Symbol) -> Self {
        Label::Symbol(value)
    }
}

impl From<Option<Symbol>> for Label {
    fn from(value: Option<Symbol>) -> Self {
        value.map(Label::Symbol).unwrap_or(Label::Epsilon)
    }
}

impl Show for Label {
    fn show(&self) -> String {
        match self {
            Label::Symbol(sym) => sym.show(),
            Label::Epsilon => "ε".to_string(),
        }
    }
}

/// A finite set of symbols. Iteration always yields the symbols in ascending order, so that
/// every algorithm that walks the alphabet behaves the same from run to run.
#[derive(Clone, Default, Hash, PartialEq, Eq, Debug)]
pub struct Alphabet(OrderedSet<Symbol>);

impl Alphabet {
    /// Creates an empty alphabet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `sym` to the alphabet, returns `true` if it was not present before.
    pub fn add_symbol(&mut self, sym: Symbol) -> bool {
        self.0.insert(sym)
    }

    /// Removes `sym` from the alphabet, returns `true` if it was present.
    pub fn remove_symbol(&mut self, sym: Symbol) -> bool {
        self.0.remove(&sym)
    }

    /// Returns true if `sym` belongs to the alphabet.
    pub fn contains(&self, sym: Symbol) -> bool {
        self.0.contains(&sym)
    }

    /// Returns true if the given label is either epsilon or a symbol of `self`.
    pub fn admits(&self, label: Label) -> bool {
        label.symbol().map(|sym| self.contains(sym)).unwrap_or(true)
    }

    /// Computes the union of `self` and `other`. Neither of the two is modified.
    pub fn union(&self, other: &Alphabet) -> Alphabet {
        Alphabet(self.0.union(&other.0).copied().collect())
    }

    /// Returns an iterator over the symbols in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.0.iter().copied()
    }

    /// The number of symbols.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the first symbol of `word` that is not part of the alphabet, if any.
    pub fn first_foreign(&self, word: &str) -> Option<Symbol> {
        word.chars().find(|sym| !self.contains(*sym))
    }
}

impl FromIterator<Symbol> for Alphabet {
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Symbol> for Alphabet {
    fn extend<T: IntoIterator<Item = Symbol>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl<'a> IntoIterator for &'a Alphabet {
    type Item = Symbol;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, Symbol>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

impl Show for Alphabet {
    fn show(&self) -> String {
        format!("{{{}}}", self.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn alphabet_operations() {
        let mut alphabet = Alphabet::from_iter(['b', 'a', 'b']);
        assert_eq!(alphabet.size(), 2);
        assert_eq!(alphabet.iter().collect::<Vec<_>>(), vec!['a', 'b']);

        assert!(!alphabet.add_symbol('a'));
        assert!(alphabet.add_symbol('c'));
        assert!(alphabet.remove_symbol('c'));
        assert!(!alphabet.remove_symbol('c'));
        assert!(!alphabet.contains('c'));

        assert_eq!(alphabet.first_foreign("abxa"), Some('x'));
        assert_eq!(alphabet.first_foreign(""), None);
        assert_eq!(alphabet.show(), "{a, b}");
    }

    #[test_log::test]
    fn union_leaves_operands_alone() {
        let left = Alphabet::from_iter(['a']);
        let right = Alphabet::from_iter(['b', 'c']);
        let union = left.union(&right);

        assert_eq!(union, Alphabet::from_iter(['a', 'b', 'c']));
        assert_eq!(left.size(), 1);
        assert_eq!(right.size(), 2);
    }

    #[test]
    fn labels() {
        assert!(Label::Epsilon.is_epsilon());
        assert_eq!(Label::from('a').symbol(), Some('a'));
        assert_eq!(Label::from(None::<Symbol>), Label::Epsilon);

        let alphabet = Alphabet::from_iter(['a']);
        assert!(alphabet.admits(Label::Epsilon));
        assert!(alphabet.admits('a'.into()));
        assert!(!alphabet.admits('z'.into()));
        assert_eq!(Label::Epsilon.show(), "ε");
    }
}
