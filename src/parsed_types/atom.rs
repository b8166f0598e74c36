//! Contains atoms.

use crate::parsed_types::Name;

/// An atomic formula `(<predicate> t*)`. The argument type is [`crate::parsed_types::Term`]
/// inside action schemas and [`Name`] in the ground contexts (`:init`, `:goal`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom<T> {
    predicate_name: Name,
    values: Vec<T>,
}

impl<T> Atom<T> {
    pub fn new(predicate_name: Name, values: Vec<T>) -> Self {
        Self {
            predicate_name,
            values,
        }
    }

    pub fn predicate_name(&self) -> &Name {
        &self.predicate_name
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}
