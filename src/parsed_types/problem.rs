//! Contains problem definitions.

use crate::parsed_types::{Atom, Literal, Name, Requirement, TypedList};

/// A single `:init` entry: a ground atom (possibly negated, which the
/// translation rejects) or a function value assignment `(= (<f> n*) <number>)`.
#[derive(Debug, Clone, PartialEq)]
pub enum InitElement {
    Literal(Literal<Name>),
    FunctionValue(Atom<Name>, f64),
}

/// The `:metric` section, e.g. `minimize (total-cost)`. The translation
/// rejects every metric other than minimising `total-cost`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    direction: Name,
    function_name: Name,
}

impl Metric {
    pub fn new(direction: Name, function_name: Name) -> Self {
        Self {
            direction,
            function_name,
        }
    }

    pub fn direction(&self) -> &Name {
        &self.direction
    }

    pub fn function_name(&self) -> &Name {
        &self.function_name
    }
}

/// A parsed `(define (problem …) …)` structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    name: Name,
    domain: Name,
    requirements: Vec<Requirement>,
    objects: TypedList<Name>,
    init: Vec<InitElement>,
    goals: Vec<Literal<Name>>,
    metric: Option<Metric>,
}

impl Problem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: Name,
        domain: Name,
        requirements: Vec<Requirement>,
        objects: TypedList<Name>,
        init: Vec<InitElement>,
        goals: Vec<Literal<Name>>,
        metric: Option<Metric>,
    ) -> Self {
        Self {
            name,
            domain,
            requirements,
            objects,
            init,
            goals,
            metric,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn domain(&self) -> &Name {
        &self.domain
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn objects(&self) -> &TypedList<Name> {
        &self.objects
    }

    pub fn init(&self) -> &[InitElement] {
        &self.init
    }

    pub fn goals(&self) -> &[Literal<Name>] {
        &self.goals
    }

    pub fn metric(&self) -> Option<&Metric> {
        self.metric.as_ref()
    }
}
