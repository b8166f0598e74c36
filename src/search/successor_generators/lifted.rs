//! The lifted successor generator: one [`SchemaGenerator`] per action schema.

use crate::search::successor_generators::{
    build_assignment_sets, SchemaGenerator, SuccessorGenerator,
};
use crate::search::{Action, Problem, State};
use std::rc::Rc;
use std::time::Instant;

#[derive(Debug)]
pub struct LiftedSuccessorGenerator {
    problem: Rc<Problem>,
    generators: Vec<SchemaGenerator>,
}

impl LiftedSuccessorGenerator {
    pub fn new(problem: Rc<Problem>) -> Self {
        let generators = problem
            .domain
            .action_schemas
            .iter()
            .map(|schema| SchemaGenerator::new(Rc::clone(&problem), Rc::clone(schema)))
            .collect();
        Self {
            problem,
            generators,
        }
    }

    pub(crate) fn schema_generators(&self) -> &[SchemaGenerator] {
        &self.generators
    }
}

impl SuccessorGenerator for LiftedSuccessorGenerator {
    fn problem(&self) -> &Rc<Problem> {
        &self.problem
    }

    fn get_applicable_actions(&self, state: &State) -> Vec<Action> {
        let assignment_sets = build_assignment_sets(&self.problem, &state.get_dynamic_ranks());

        let mut applicable_actions = Vec::new();
        for generator in &self.generators {
            applicable_actions
                .extend(generator.applicable_actions(state, &assignment_sets));
        }
        applicable_actions
    }

    fn get_applicable_actions_until(
        &self,
        deadline: Instant,
        state: &State,
        out_actions: &mut Vec<Action>,
    ) -> bool {
        let assignment_sets = build_assignment_sets(&self.problem, &state.get_dynamic_ranks());

        for generator in &self.generators {
            if Instant::now() >= deadline {
                return false;
            }
            if !generator.applicable_actions_until(
                Some(deadline),
                state,
                &assignment_sets,
                out_actions,
            ) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::translate::translate;
    use itertools::Itertools;

    use crate::test_utils::*;

    #[test]
    fn all_applicable_actions_in_the_gripper_initial_state() {
        let problem = translate(GRIPPER_DOMAIN_TEXT, GRIPPER_PROBLEM_TEXT).unwrap();
        let state = State::initial(&problem);
        let generator = LiftedSuccessorGenerator::new(Rc::clone(&problem));

        let actions = generator.get_applicable_actions(&state);
        let rendered: Vec<String> = actions
            .iter()
            .map(|action| action.to_string())
            .sorted()
            .collect();

        // move rooma→rooma/roomb, and either gripper can pick any of the
        // four balls in rooma.
        assert_eq!(actions.len(), 10);
        assert_eq!(rendered[0], "move(rooma, rooma)");
        assert_eq!(rendered[1], "move(rooma, roomb)");
        assert!(rendered[2..].iter().all(|name| name.starts_with("pick(")));
    }

    #[test]
    fn deadline_variant_matches_the_plain_one() {
        let problem = translate(BLOCKS_DOMAIN_TEXT, BLOCKS_PROBLEM_TEXT).unwrap();
        let state = State::initial(&problem);
        let generator = LiftedSuccessorGenerator::new(Rc::clone(&problem));

        let plain = generator.get_applicable_actions(&state);
        let mut with_deadline = Vec::new();
        let in_time = generator.get_applicable_actions_until(
            Instant::now() + std::time::Duration::from_secs(60),
            &state,
            &mut with_deadline,
        );

        assert!(in_time);
        assert_eq!(plain.len(), with_deadline.len());
    }
}
