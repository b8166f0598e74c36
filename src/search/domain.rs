use crate::parsed_types::Name;
use crate::search::{ActionSchema, Predicate};
use std::collections::HashMap;
use std::rc::Rc;

/// A type of a domain. Every type except the root `object` has a base type;
/// the base chain is finite and acyclic (enforced at translation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub index: usize,
    pub name: Name,
    pub base: Option<usize>,
}

/// A numeric function declared in `:functions`. Function atoms only appear in
/// cost expressions and in `:init` value assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub index: usize,
    pub name: Name,
    pub arity: usize,
}

/// An interned domain: types, predicates, functions and action schemas, all
/// addressed by dense indices. Immutable once translated.
#[derive(Debug)]
pub struct Domain {
    pub name: Name,
    pub types: Vec<TypeDef>,
    pub predicates: Vec<Predicate>,
    pub functions: Vec<Function>,
    pub action_schemas: Vec<Rc<ActionSchema>>,
    /// Domain constants as `(name, type_index)`; they are appended to every
    /// problem's object list.
    pub constants: Vec<(Name, usize)>,
    predicate_table: HashMap<Name, usize>,
    type_table: HashMap<Name, usize>,
    function_table: HashMap<Name, usize>,
}

impl Domain {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: Name,
        types: Vec<TypeDef>,
        predicates: Vec<Predicate>,
        functions: Vec<Function>,
        action_schemas: Vec<Rc<ActionSchema>>,
        constants: Vec<(Name, usize)>,
    ) -> Self {
        let predicate_table = predicates
            .iter()
            .map(|predicate| (predicate.name.clone(), predicate.index))
            .collect();
        let type_table = types
            .iter()
            .map(|type_def| (type_def.name.clone(), type_def.index))
            .collect();
        let function_table = functions
            .iter()
            .map(|function| (function.name.clone(), function.index))
            .collect();
        Self {
            name,
            types,
            predicates,
            functions,
            action_schemas,
            constants,
            predicate_table,
            type_table,
            function_table,
        }
    }

    /// `true` iff `type_index` equals `supertype_index` or is a descendant of
    /// it along the base chain.
    pub fn is_subtype_of(&self, type_index: usize, supertype_index: usize) -> bool {
        if type_index == supertype_index {
            return true;
        }
        match self.types[type_index].base {
            Some(base) => self.is_subtype_of(base, supertype_index),
            None => false,
        }
    }

    pub fn predicate_index(&self, name: &Name) -> Option<usize> {
        self.predicate_table.get(name).copied()
    }

    pub fn type_index(&self, name: &Name) -> Option<usize> {
        self.type_table.get(name).copied()
    }

    pub fn function_index(&self, name: &Name) -> Option<usize> {
        self.function_table.get(name).copied()
    }

    /// Indices of all predicates never mentioned in any schema effect.
    pub fn static_predicate_indices(&self) -> Vec<usize> {
        self.predicates
            .iter()
            .filter(|predicate| predicate.is_static)
            .map(|predicate| predicate.index)
            .collect()
    }
}
