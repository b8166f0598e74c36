use crate::search::successor_generators::GroundedSuccessorGenerator;
use crate::search::{Problem, State};

/// The value assigned to unreachable atoms and dead-end states.
pub const DEAD_END: f64 = f64::INFINITY;

pub fn is_dead_end(value: f64) -> bool {
    value.is_infinite()
}

pub trait Heuristic {
    /// Estimates the cost from `state` to the nearest goal state;
    /// [`DEAD_END`] when the goal is unreachable under the relaxation.
    fn evaluate(&mut self, state: &State) -> f64;
}

/// A ground action reduced to the rank sets the Δ heuristics propagate over:
/// positive precondition ranks, add-effect ranks, the complement of the
/// delete-effect ranks, and the cost.
#[derive(Debug)]
pub(crate) struct RelaxedAction {
    pub precondition: Vec<u32>,
    pub add_effect: Vec<u32>,
    pub delete_effect_complement: Vec<u32>,
    pub cost: f64,
}

/// Converts the grounded action universe into relaxed form. Conditional
/// effect consequences count as regular effects, which keeps the relaxation
/// admissible.
pub(crate) fn relaxed_actions(
    problem: &Problem,
    successor_generator: &GroundedSuccessorGenerator,
) -> Vec<RelaxedAction> {
    let num_ranks = problem.num_ranks();

    successor_generator
        .get_actions()
        .iter()
        .map(|action| {
            let mut precondition = Vec::new();
            for literal in action.get_precondition() {
                if !literal.negated {
                    precondition.push(problem.get_rank(&literal.atom));
                }
            }

            let mut add_effect = Vec::new();
            let mut delete_effect = Vec::new();
            for literal in action.get_unconditional_effect() {
                let rank = problem.get_rank(&literal.atom);
                if literal.negated {
                    delete_effect.push(rank);
                } else {
                    add_effect.push(rank);
                }
            }
            for (_, consequence) in action.get_conditional_effect() {
                for literal in consequence {
                    let rank = problem.get_rank(&literal.atom);
                    if literal.negated {
                        delete_effect.push(rank);
                    } else {
                        add_effect.push(rank);
                    }
                }
            }

            let delete_effect_complement = (0..num_ranks)
                .filter(|rank| !delete_effect.contains(rank))
                .collect();

            RelaxedAction {
                precondition,
                add_effect,
                delete_effect_complement,
                cost: action.cost,
            }
        })
        .collect()
}

/// The goal as positive ranks. Negated goal literals have no delete-relaxed
/// counterpart.
pub(crate) fn goal_ranks(problem: &Problem) -> Vec<u32> {
    problem
        .goal
        .iter()
        .map(|literal| {
            assert!(
                !literal.negated,
                "negative literals in the goal are not supported"
            );
            problem.get_rank(&literal.atom)
        })
        .collect()
}
