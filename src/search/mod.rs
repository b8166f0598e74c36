//! The planning core: interned domain/problem entities, the atom-rank
//! bijection, bitset states, ground actions, successor generation, state
//! spaces, heuristics and search.

mod action;
mod action_schema;
mod atom;
mod bitset;
mod domain;
mod goal_matcher;
pub mod heuristics;
mod object;
mod open_list;
mod plan;
mod predicate;
mod problem;
pub mod search_engines;
mod state;
mod state_space;
pub mod successor_generators;
mod transition;
pub mod translate;

pub use action::{Action, ConditionalBitsets, GroundAction};
pub use action_schema::{
    ActionSchema, CostExpression, CostOperation, Implication, SchemaArgument, SchemaAtom,
    SchemaLiteral, SchemaParameter,
};
pub use atom::{Arguments, Atom, Literal};
pub use bitset::Bitset;
pub use domain::{Domain, Function, TypeDef};
pub use goal_matcher::{GoalMatcher, QueryAtom, QueryTerm};
pub use object::Object;
pub use open_list::OpenList;
pub use plan::Plan;
pub use predicate::Predicate;
pub use problem::Problem;
pub use state::{apply, atoms_hold, is_applicable, literal_holds, literals_hold, State};
pub use state_space::StateSpace;
pub use transition::Transition;
