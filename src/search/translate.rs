//! Translates parsed PDDL into the interned [`Domain`]/[`Problem`]
//! representation: name resolution, arity and type checking, equality
//! injection, static-predicate classification and per-atom costs.

use crate::parsed_types::{
    ActionDefinition, Atom as ParsedAtom, Domain as ParsedDomain, FunctionSource, InitElement,
    Literal as ParsedLiteral, Name, Problem as ParsedProblem, PropEffect, Requirement, Term,
    TypedList, TYPE_OBJECT,
};
use crate::parsers::Parser;
use crate::search::{
    ActionSchema, Arguments, Atom, CostExpression, CostOperation, Domain, Function, Implication,
    Literal, Object, Predicate, Problem, SchemaArgument, SchemaAtom, SchemaLiteral,
    SchemaParameter, TypeDef,
};
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;
use tracing::info;

pub const EQUALITY_PREDICATE: &str = "=";

/// Name resolution and validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("undefined type `{0}`")]
    UndefinedType(Name),
    #[error("undefined predicate `{0}`")]
    UndefinedPredicate(Name),
    #[error("undefined function `{0}`")]
    UndefinedFunction(Name),
    #[error("undefined object `{0}`")]
    UndefinedObject(Name),
    #[error("undefined parameter `?{0}`")]
    UndefinedParameter(Name),
    #[error("`{predicate}` expects {expected} arguments, got {got}")]
    ArityMismatch {
        predicate: Name,
        expected: usize,
        got: usize,
    },
    #[error("argument {position} of `{predicate}` has an incompatible type")]
    TypeMismatch { predicate: Name, position: usize },
    #[error("type `{0}` participates in a base-type cycle")]
    CyclicTypeHierarchy(Name),
    #[error("problem is for domain `{got}`, expected `{expected}`")]
    DomainMismatch { expected: Name, got: Name },
    #[error("negated literals are not allowed in `:init`")]
    NegatedInitialLiteral,
    #[error("only `(:metric minimize (total-cost))` is supported")]
    UnsupportedMetric,
}

/// A syntax failure, reported with the expectation and the offending slice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error: expected {expected}, got `{got}`")]
pub struct ParseFailure {
    pub expected: String,
    pub got: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Parse(#[from] ParseFailure),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

fn parse_failure(error: nom::Err<crate::parsers::ParseError>) -> ParseFailure {
    match error {
        nom::Err::Error(inner) | nom::Err::Failure(inner) => {
            let (got, expected) = inner
                .errors
                .first()
                .map(|(span, kind)| {
                    let fragment: String = span.fragment().chars().take(32).collect();
                    (fragment, format!("{kind:?}"))
                })
                .unwrap_or_default();
            ParseFailure { expected, got }
        }
        nom::Err::Incomplete(_) => ParseFailure {
            expected: "more input".to_string(),
            got: String::new(),
        },
    }
}

/// Parses and translates a domain/problem pair.
pub fn translate(domain_text: &str, problem_text: &str) -> Result<Rc<Problem>, TranslateError> {
    let domain = ParsedDomain::from_str(domain_text).map_err(parse_failure)?;
    let problem = ParsedProblem::from_str(problem_text).map_err(parse_failure)?;
    translate_parsed(&domain, &problem)
}

/// Translates already-parsed structures.
pub fn translate_parsed(
    domain: &ParsedDomain,
    problem: &ParsedProblem,
) -> Result<Rc<Problem>, TranslateError> {
    if problem.domain() != domain.name() {
        return Err(SemanticError::DomainMismatch {
            expected: domain.name().clone(),
            got: problem.domain().clone(),
        }
        .into());
    }

    let types = build_types(domain.types())?;
    let type_table: HashMap<Name, usize> = types
        .iter()
        .map(|type_def| (type_def.name.clone(), type_def.index))
        .collect();

    let with_equality = domain.has_requirement(Requirement::Equality);
    let predicates = build_predicates(domain, &type_table, with_equality)?;
    let predicate_table: HashMap<Name, usize> = predicates
        .iter()
        .map(|predicate| (predicate.name.clone(), predicate.index))
        .collect();

    let functions: Vec<Function> = domain
        .functions()
        .iter()
        .enumerate()
        .map(|(index, definition)| Function {
            index,
            name: definition.name().clone(),
            arity: definition.variables().len(),
        })
        .collect();
    let function_table: HashMap<Name, usize> = functions
        .iter()
        .map(|function| (function.name.clone(), function.index))
        .collect();

    // Problem objects first, then domain constants, sharing one index space.
    let mut objects = Vec::new();
    for typed in problem.objects() {
        let type_index = resolve_type(typed.type_name(), &type_table)?;
        objects.push(Object::new(
            objects.len() as u32,
            typed.value().clone(),
            type_index,
        ));
    }
    let mut constants = Vec::new();
    for typed in domain.constants() {
        let type_index = resolve_type(typed.type_name(), &type_table)?;
        constants.push((typed.value().clone(), type_index));
        objects.push(Object::new(
            objects.len() as u32,
            typed.value().clone(),
            type_index,
        ));
    }
    let object_table: HashMap<Name, u32> = objects
        .iter()
        .map(|object| (object.name.clone(), object.index))
        .collect();

    let context = SchemaContext {
        types: &types,
        type_table: &type_table,
        predicates: &predicates,
        predicate_table: &predicate_table,
        function_table: &function_table,
        object_table: &object_table,
        objects: &objects,
    };

    let action_schemas: Result<Vec<Rc<ActionSchema>>, TranslateError> = domain
        .actions()
        .iter()
        .enumerate()
        .map(|(index, definition)| context.build_schema(index, definition).map(Rc::new))
        .collect();
    let action_schemas = action_schemas?;

    let mut initial_atoms = Vec::new();
    let mut atom_costs: HashMap<(usize, Arguments), f64> = HashMap::new();
    for element in problem.init() {
        match element {
            InitElement::Literal(literal) => {
                if literal.is_negated() {
                    return Err(SemanticError::NegatedInitialLiteral.into());
                }
                initial_atoms.push(context.resolve_ground_atom(literal.atom())?);
            }
            InitElement::FunctionValue(function_atom, value) => {
                let function_index = function_table
                    .get(function_atom.predicate_name())
                    .copied()
                    .ok_or_else(|| {
                        SemanticError::UndefinedFunction(function_atom.predicate_name().clone())
                    })?;
                let arguments = context.resolve_ground_arguments(function_atom)?;
                atom_costs.insert((function_index, arguments), *value);
            }
        }
    }

    if with_equality {
        // Reflexive equality atoms for every object, including constants.
        let equality = predicate_table[&Name::from(EQUALITY_PREDICATE)];
        for object in &objects {
            initial_atoms.push(Atom::new(
                equality,
                [object.index, object.index].into_iter().collect(),
            ));
        }
    }

    let mut goal = Vec::new();
    for literal in problem.goals() {
        goal.push(Literal::new(
            context.resolve_ground_atom(literal.atom())?,
            literal.is_negated(),
        ));
    }

    if let Some(metric) = problem.metric() {
        if metric.direction() != "minimize" || metric.function_name() != "total-cost" {
            return Err(SemanticError::UnsupportedMetric.into());
        }
    }

    let predicates = mark_static_predicates(predicates, &action_schemas);

    let interned_domain = Rc::new(Domain::new(
        domain.name().clone(),
        types,
        predicates,
        functions,
        action_schemas,
        constants,
    ));

    info!(
        domain = %interned_domain.name,
        problem = %problem.name(),
        predicates = interned_domain.predicates.len(),
        schemas = interned_domain.action_schemas.len(),
        objects = objects.len(),
        "translated domain and problem"
    );

    Ok(Rc::new(Problem::new(
        problem.name().clone(),
        interned_domain,
        objects,
        initial_atoms,
        goal,
        atom_costs,
    )))
}

fn build_types(declared: &TypedList<Name>) -> Result<Vec<TypeDef>, TranslateError> {
    let mut types = vec![TypeDef {
        index: 0,
        name: Name::from(TYPE_OBJECT),
        base: None,
    }];
    let mut table: HashMap<Name, usize> = HashMap::from([(Name::from(TYPE_OBJECT), 0)]);

    // First pass: every declared type name gets an index in order of
    // appearance. Base names not declared themselves become root types.
    for typed in declared {
        if !table.contains_key(typed.value()) {
            table.insert(typed.value().clone(), types.len());
            types.push(TypeDef {
                index: types.len(),
                name: typed.value().clone(),
                base: None,
            });
        }
    }
    for typed in declared {
        if !table.contains_key(typed.type_name()) {
            table.insert(typed.type_name().clone(), types.len());
            types.push(TypeDef {
                index: types.len(),
                name: typed.type_name().clone(),
                base: Some(0),
            });
        }
    }

    // Second pass: wire up the base links.
    for typed in declared {
        let index = table[typed.value()];
        types[index].base = Some(table[typed.type_name()]);
    }
    // The root has no base.
    types[0].base = None;

    // The base chain must be finite and acyclic.
    for type_def in &types {
        let mut steps = 0;
        let mut current = type_def.base;
        while let Some(base) = current {
            steps += 1;
            if steps > types.len() {
                return Err(SemanticError::CyclicTypeHierarchy(type_def.name.clone()).into());
            }
            current = types[base].base;
        }
    }

    Ok(types)
}

fn resolve_type(name: &Name, type_table: &HashMap<Name, usize>) -> Result<usize, SemanticError> {
    type_table
        .get(name)
        .copied()
        .ok_or_else(|| SemanticError::UndefinedType(name.clone()))
}

fn build_predicates(
    domain: &ParsedDomain,
    type_table: &HashMap<Name, usize>,
    with_equality: bool,
) -> Result<Vec<Predicate>, TranslateError> {
    let mut predicates = Vec::new();
    for definition in domain.predicates() {
        let mut parameter_types = Vec::with_capacity(definition.variables().len());
        for variable in definition.variables() {
            parameter_types.push(resolve_type(variable.type_name(), type_table)?);
        }
        predicates.push(Predicate::new(
            predicates.len(),
            definition.name().clone(),
            parameter_types,
        ));
    }
    if with_equality {
        predicates.push(Predicate::new(
            predicates.len(),
            Name::from(EQUALITY_PREDICATE),
            vec![0, 0],
        ));
    }
    Ok(predicates)
}

fn mark_static_predicates(
    mut predicates: Vec<Predicate>,
    action_schemas: &[Rc<ActionSchema>],
) -> Vec<Predicate> {
    for predicate in &mut predicates {
        let affected = action_schemas.iter().any(|schema| {
            schema
                .affected_predicates()
                .any(|predicate_index| predicate_index == predicate.index)
        });
        if !affected {
            predicate.mark_as_static();
        }
    }
    predicates
}

struct SchemaContext<'a> {
    types: &'a [TypeDef],
    type_table: &'a HashMap<Name, usize>,
    predicates: &'a [Predicate],
    predicate_table: &'a HashMap<Name, usize>,
    function_table: &'a HashMap<Name, usize>,
    object_table: &'a HashMap<Name, u32>,
    objects: &'a [Object],
}

impl SchemaContext<'_> {
    fn is_subtype_of(&self, type_index: usize, supertype_index: usize) -> bool {
        if type_index == supertype_index {
            return true;
        }
        match self.types[type_index].base {
            Some(base) => self.is_subtype_of(base, supertype_index),
            None => false,
        }
    }

    fn resolve_predicate(&self, name: &Name, arity: usize) -> Result<usize, SemanticError> {
        let index = self
            .predicate_table
            .get(name)
            .copied()
            .ok_or_else(|| SemanticError::UndefinedPredicate(name.clone()))?;
        let expected = self.predicates[index].arity();
        if expected != arity {
            return Err(SemanticError::ArityMismatch {
                predicate: name.clone(),
                expected,
                got: arity,
            });
        }
        Ok(index)
    }

    fn resolve_object(&self, name: &Name) -> Result<u32, SemanticError> {
        self.object_table
            .get(name)
            .copied()
            .ok_or_else(|| SemanticError::UndefinedObject(name.clone()))
    }

    fn resolve_ground_arguments(&self, atom: &ParsedAtom<Name>) -> Result<Arguments, SemanticError> {
        atom.values().iter().map(|name| self.resolve_object(name)).collect()
    }

    fn resolve_ground_atom(&self, atom: &ParsedAtom<Name>) -> Result<Atom, SemanticError> {
        let predicate_index =
            self.resolve_predicate(atom.predicate_name(), atom.values().len())?;
        let arguments = self.resolve_ground_arguments(atom)?;
        for (position, &argument) in arguments.iter().enumerate() {
            let expected = self.predicates[predicate_index].parameter_types[position];
            if !self.is_subtype_of(self.objects[argument as usize].type_index, expected) {
                return Err(SemanticError::TypeMismatch {
                    predicate: atom.predicate_name().clone(),
                    position,
                });
            }
        }
        Ok(Atom::new(predicate_index, arguments))
    }

    fn build_schema(
        &self,
        index: usize,
        definition: &ActionDefinition,
    ) -> Result<ActionSchema, TranslateError> {
        let mut parameters = Vec::with_capacity(definition.parameters().len());
        let mut parameter_table: HashMap<Name, usize> = HashMap::new();
        for typed in definition.parameters() {
            let type_index = resolve_type(typed.type_name(), self.type_table)?;
            parameter_table.insert(typed.value().clone(), parameters.len());
            parameters.push(SchemaParameter {
                index: parameters.len(),
                type_index,
            });
        }

        let precondition = self.build_schema_literals(
            definition.preconditions(),
            &parameters,
            &parameter_table,
        )?;

        let mut unconditional_effect = Vec::new();
        let mut conditional_effect = Vec::new();
        let mut cost = CostExpression::unit();
        for effect in definition.effects() {
            match effect {
                PropEffect::Add(atom) => unconditional_effect.push(self.build_schema_literal(
                    atom,
                    false,
                    &parameters,
                    &parameter_table,
                )?),
                PropEffect::Delete(atom) => unconditional_effect.push(self.build_schema_literal(
                    atom,
                    true,
                    &parameters,
                    &parameter_table,
                )?),
                PropEffect::When(antecedent, consequence) => {
                    conditional_effect.push(Implication {
                        antecedent: self.build_schema_literals(
                            antecedent,
                            &parameters,
                            &parameter_table,
                        )?,
                        consequence: self.build_schema_literals(
                            consequence,
                            &parameters,
                            &parameter_table,
                        )?,
                    });
                }
                PropEffect::Increase(target, source) => {
                    cost = self.build_cost(
                        CostOperation::Increase,
                        target,
                        source,
                        &parameter_table,
                    )?;
                }
                PropEffect::Decrease(target, source) => {
                    cost = self.build_cost(
                        CostOperation::Decrease,
                        target,
                        source,
                        &parameter_table,
                    )?;
                }
            }
        }

        Ok(ActionSchema {
            index,
            name: definition.name().clone(),
            parameters,
            precondition,
            unconditional_effect,
            conditional_effect,
            cost,
        })
    }

    fn build_cost(
        &self,
        operation: CostOperation,
        target: &ParsedAtom<Term>,
        source: &FunctionSource,
        parameter_table: &HashMap<Name, usize>,
    ) -> Result<CostExpression, TranslateError> {
        if self.function_table.get(target.predicate_name()).is_none() {
            return Err(SemanticError::UndefinedFunction(target.predicate_name().clone()).into());
        }
        match source {
            FunctionSource::Number(value) => Ok(CostExpression::Constant(match operation {
                CostOperation::Increase => *value,
                CostOperation::Decrease => -*value,
            })),
            FunctionSource::Function(atom) => {
                let function_index = self
                    .function_table
                    .get(atom.predicate_name())
                    .copied()
                    .ok_or_else(|| {
                        SemanticError::UndefinedFunction(atom.predicate_name().clone())
                    })?;
                let arguments = atom
                    .values()
                    .iter()
                    .map(|term| self.resolve_schema_argument(term, parameter_table))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CostExpression::FunctionLookup {
                    operation,
                    function_index,
                    arguments,
                })
            }
        }
    }

    fn resolve_schema_argument(
        &self,
        term: &Term,
        parameter_table: &HashMap<Name, usize>,
    ) -> Result<SchemaArgument, SemanticError> {
        match term {
            Term::Variable(name) => parameter_table
                .get(name)
                .map(|&index| SchemaArgument::Free(index))
                .ok_or_else(|| SemanticError::UndefinedParameter(name.clone())),
            Term::Name(name) => Ok(SchemaArgument::Constant(self.resolve_object(name)?)),
        }
    }

    fn build_schema_literal(
        &self,
        atom: &ParsedAtom<Term>,
        negated: bool,
        parameters: &[SchemaParameter],
        parameter_table: &HashMap<Name, usize>,
    ) -> Result<SchemaLiteral, TranslateError> {
        let predicate_index =
            self.resolve_predicate(atom.predicate_name(), atom.values().len())?;
        let mut arguments = Vec::with_capacity(atom.values().len());
        for (position, term) in atom.values().iter().enumerate() {
            let argument = self.resolve_schema_argument(term, parameter_table)?;
            let argument_type = match argument {
                SchemaArgument::Constant(object_index) => {
                    self.objects[object_index as usize].type_index
                }
                SchemaArgument::Free(parameter_index) => parameters[parameter_index].type_index,
            };
            let expected = self.predicates[predicate_index].parameter_types[position];
            if !self.is_subtype_of(argument_type, expected) {
                return Err(SemanticError::TypeMismatch {
                    predicate: atom.predicate_name().clone(),
                    position,
                }
                .into());
            }
            arguments.push(argument);
        }
        Ok(SchemaLiteral {
            atom: SchemaAtom {
                predicate_index,
                arguments,
            },
            negated,
        })
    }

    fn build_schema_literals(
        &self,
        literals: &[ParsedLiteral<Term>],
        parameters: &[SchemaParameter],
        parameter_table: &HashMap<Name, usize>,
    ) -> Result<Vec<SchemaLiteral>, TranslateError> {
        literals
            .iter()
            .map(|literal| {
                self.build_schema_literal(
                    literal.atom(),
                    literal.is_negated(),
                    parameters,
                    parameter_table,
                )
            })
            .collect()
    }

}
