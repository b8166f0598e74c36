use crate::search::successor_generators::{GroundedSuccessorGenerator, LiftedSuccessorGenerator};
use crate::search::{Action, Problem, State};
use std::fmt::Debug;
use std::rc::Rc;
use std::time::Instant;
use tracing::info;

/// Grounding everything up front pays off on small instances; past this many
/// candidate groundings the lifted generator is used instead.
const AUTOMATIC_GROUNDING_LIMIT: u64 = 100_000;

pub trait SuccessorGenerator: Debug {
    fn problem(&self) -> &Rc<Problem>;

    /// All ground actions applicable in `state`, in deterministic order.
    fn get_applicable_actions(&self, state: &State) -> Vec<Action>;

    /// Deadline-aware variant: returns `false` if the deadline expired, in
    /// which case the contents of `out_actions` must be discarded.
    fn get_applicable_actions_until(
        &self,
        deadline: Instant,
        state: &State,
        out_actions: &mut Vec<Action>,
    ) -> bool;
}

/// The closed set of successor generators, for contexts that need to know
/// which one they hold (the Δ heuristics require the grounded one).
#[derive(Debug)]
pub enum AnySuccessorGenerator {
    Lifted(LiftedSuccessorGenerator),
    Grounded(GroundedSuccessorGenerator),
}

impl AnySuccessorGenerator {
    pub fn as_grounded(&self) -> Option<&GroundedSuccessorGenerator> {
        match self {
            Self::Grounded(generator) => Some(generator),
            Self::Lifted(_) => None,
        }
    }
}

impl SuccessorGenerator for AnySuccessorGenerator {
    fn problem(&self) -> &Rc<Problem> {
        match self {
            Self::Lifted(generator) => generator.problem(),
            Self::Grounded(generator) => generator.problem(),
        }
    }

    fn get_applicable_actions(&self, state: &State) -> Vec<Action> {
        match self {
            Self::Lifted(generator) => generator.get_applicable_actions(state),
            Self::Grounded(generator) => generator.get_applicable_actions(state),
        }
    }

    fn get_applicable_actions_until(
        &self,
        deadline: Instant,
        state: &State,
        out_actions: &mut Vec<Action>,
    ) -> bool {
        match self {
            Self::Lifted(generator) => {
                generator.get_applicable_actions_until(deadline, state, out_actions)
            }
            Self::Grounded(generator) => {
                generator.get_applicable_actions_until(deadline, state, out_actions)
            }
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[clap(rename_all = "lower")]
pub enum SuccessorGeneratorName {
    Lifted,
    Grounded,
    Automatic,
}

/// Upper bound on the number of groundings: the product of the compatible
/// object counts per parameter, summed over schemas.
fn estimated_groundings(problem: &Problem) -> u64 {
    let domain = &problem.domain;
    domain
        .action_schemas
        .iter()
        .map(|schema| {
            schema
                .parameters
                .iter()
                .map(|parameter| {
                    problem
                        .objects
                        .iter()
                        .filter(|object| {
                            domain.is_subtype_of(object.type_index, parameter.type_index)
                        })
                        .count() as u64
                })
                .product::<u64>()
        })
        .sum()
}

impl SuccessorGeneratorName {
    pub fn create(&self, problem: Rc<Problem>) -> AnySuccessorGenerator {
        match self {
            Self::Lifted => AnySuccessorGenerator::Lifted(LiftedSuccessorGenerator::new(problem)),
            Self::Grounded => {
                AnySuccessorGenerator::Grounded(GroundedSuccessorGenerator::new(problem))
            }
            Self::Automatic => {
                let estimate = estimated_groundings(&problem);
                if estimate <= AUTOMATIC_GROUNDING_LIMIT {
                    info!(estimate, "automatic: grounding up front");
                    AnySuccessorGenerator::Grounded(GroundedSuccessorGenerator::new(problem))
                } else {
                    info!(estimate, "automatic: staying lifted");
                    AnySuccessorGenerator::Lifted(LiftedSuccessorGenerator::new(problem))
                }
            }
        }
    }
}
