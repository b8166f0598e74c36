use crate::parsed_types::Name;

/// A typed schema parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaParameter {
    pub index: usize,
    pub type_index: usize,
}

/// An argument of a schema atom: either a constant object of the problem or a
/// reference to one of the schema's parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaArgument {
    Constant(u32),
    Free(usize),
}

impl SchemaArgument {
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }
}

/// A possibly lifted atom inside a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaAtom {
    pub predicate_index: usize,
    pub arguments: Vec<SchemaArgument>,
}

impl SchemaAtom {
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }
}

/// A possibly lifted literal inside a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaLiteral {
    pub atom: SchemaAtom,
    pub negated: bool,
}

/// A conditional effect: if every antecedent literal holds in the pre-state,
/// the consequence literals are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Implication {
    pub antecedent: Vec<SchemaLiteral>,
    pub consequence: Vec<SchemaLiteral>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostOperation {
    Increase,
    Decrease,
}

/// The cost of grounding a schema: a constant, or a function-atom lookup in
/// the problem's per-atom cost map, negated for `Decrease`.
#[derive(Debug, Clone, PartialEq)]
pub enum CostExpression {
    Constant(f64),
    FunctionLookup {
        operation: CostOperation,
        function_index: usize,
        arguments: Vec<SchemaArgument>,
    },
}

impl CostExpression {
    pub fn unit() -> Self {
        Self::Constant(1.0)
    }
}

/// An action schema of a domain.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSchema {
    pub index: usize,
    pub name: Name,
    pub parameters: Vec<SchemaParameter>,
    pub precondition: Vec<SchemaLiteral>,
    pub unconditional_effect: Vec<SchemaLiteral>,
    pub conditional_effect: Vec<Implication>,
    pub cost: CostExpression,
}

impl ActionSchema {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Every predicate a grounding of this schema can add or delete,
    /// including through conditional effects.
    pub fn affected_predicates(&self) -> impl Iterator<Item = usize> + '_ {
        self.unconditional_effect
            .iter()
            .map(|literal| literal.atom.predicate_index)
            .chain(self.conditional_effect.iter().flat_map(|implication| {
                implication
                    .consequence
                    .iter()
                    .map(|literal| literal.atom.predicate_index)
            }))
    }
}
