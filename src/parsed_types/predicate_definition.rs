//! Contains predicate and function declarations.

use crate::parsed_types::{Name, TypedList};

/// A declaration from `:predicates`, e.g. `(at ?m - locatable ?l - location)`.
/// Variable names are stored without their leading `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateDefinition {
    name: Name,
    variables: TypedList<Name>,
}

impl PredicateDefinition {
    pub fn new(name: Name, variables: TypedList<Name>) -> Self {
        Self { name, variables }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn variables(&self) -> &TypedList<Name> {
        &self.variables
    }
}

/// A declaration from `:functions`, e.g. `(total-cost)`. Shapes exactly like
/// a predicate declaration; only the numeric interpretation differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDefinition {
    name: Name,
    variables: TypedList<Name>,
}

impl FunctionDefinition {
    pub fn new(name: Name, variables: TypedList<Name>) -> Self {
        Self { name, variables }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn variables(&self) -> &TypedList<Name> {
        &self.variables
    }
}
