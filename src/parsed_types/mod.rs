//! Value types produced by the PDDL parsers. These are plain syntax trees;
//! name resolution and validation happen in [`crate::search::translate`].

mod action_definition;
mod atom;
mod domain;
mod effect;
mod literal;
mod name;
mod predicate_definition;
mod problem;
mod requirements;
mod term;
mod r#type;

pub use action_definition::ActionDefinition;
pub use atom::Atom;
pub use domain::Domain;
pub use effect::{FunctionSource, PropEffect};
pub use literal::Literal;
pub use name::Name;
pub use predicate_definition::{FunctionDefinition, PredicateDefinition};
pub use problem::{InitElement, Metric, Problem};
pub use r#type::{Typed, TypedList, TYPE_OBJECT};
pub use requirements::names as requirement_names;
pub use requirements::Requirement;
pub use term::Term;
