//! Contains literals.

use crate::parsed_types::Atom;

/// An atomic formula or its negation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal<T> {
    Positive(Atom<T>),
    Negative(Atom<T>),
}

impl<T> Literal<T> {
    pub fn new(atom: Atom<T>) -> Self {
        Self::Positive(atom)
    }

    pub fn new_not(atom: Atom<T>) -> Self {
        Self::Negative(atom)
    }

    pub fn atom(&self) -> &Atom<T> {
        match self {
            Self::Positive(atom) => atom,
            Self::Negative(atom) => atom,
        }
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, Self::Negative(_))
    }
}
