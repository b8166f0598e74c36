//! The Δ¹ (hmax) heuristic: the cost of the most expensive single goal atom
//! in the delete relaxation.

use crate::search::heuristics::heuristic::{
    goal_ranks, is_dead_end, relaxed_actions, Heuristic, RelaxedAction, DEAD_END,
};
use crate::search::successor_generators::GroundedSuccessorGenerator;
use crate::search::{Problem, State};
use std::rc::Rc;

#[derive(Debug)]
pub struct H1Heuristic {
    problem: Rc<Problem>,
    actions: Vec<RelaxedAction>,
    goal: Vec<u32>,
    table: Vec<f64>,
}

impl H1Heuristic {
    pub fn new(problem: Rc<Problem>, successor_generator: &GroundedSuccessorGenerator) -> Self {
        let actions = relaxed_actions(&problem, successor_generator);
        let goal = goal_ranks(&problem);
        let table = vec![DEAD_END; problem.num_ranks() as usize];
        Self {
            problem,
            actions,
            goal,
            table,
        }
    }

    fn eval(&self, ranks: &[u32]) -> f64 {
        let mut value: f64 = 0.0;
        for &rank in ranks {
            value = value.max(self.table[rank as usize]);
            if is_dead_end(value) {
                return DEAD_END;
            }
        }
        value
    }

    /// Bellman-Ford-style fixpoint: seed the state's ranks with 0 and relax
    /// every action until nothing changes. Values only decrease and are
    /// bounded below by 0, so the loop terminates.
    fn fill_table(&mut self, state: &State) {
        self.table.fill(DEAD_END);
        for rank in state.get_ranks() {
            self.table[rank as usize] = 0.0;
        }

        let mut changed = true;
        while changed {
            changed = false;
            for action in &self.actions {
                let precondition_cost = self.eval(&action.precondition);
                if is_dead_end(precondition_cost) {
                    continue;
                }
                let value = precondition_cost + action.cost;
                for &rank in &action.add_effect {
                    if self.table[rank as usize] > value {
                        self.table[rank as usize] = value;
                        changed = true;
                    }
                }
            }
        }
    }
}

impl Heuristic for H1Heuristic {
    fn evaluate(&mut self, state: &State) -> f64 {
        assert!(
            Rc::ptr_eq(state.problem(), &self.problem),
            "heuristic is constructed for a different problem"
        );
        self.fill_table(state);
        self.eval(&self.goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::successor_generators::SuccessorGenerator;
    use crate::search::translate::translate;
    use crate::search::{apply, StateSpace};
    use crate::test_utils::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn blocks_initial_state() {
        let problem = translate(BLOCKS_DOMAIN_TEXT, BLOCKS_PROBLEM_TEXT).unwrap();
        let generator = GroundedSuccessorGenerator::new(Rc::clone(&problem));
        let mut h1 = H1Heuristic::new(Rc::clone(&problem), &generator);

        // Each goal atom (on x y) needs a pick-up and a stack.
        let h = h1.evaluate(&State::initial(&problem));
        assert_approx_eq!(h, 2.0);
    }

    #[test]
    fn goal_states_evaluate_to_zero() {
        let problem = translate(BLOCKS_DOMAIN_TEXT, BLOCKS_PROBLEM_TEXT).unwrap();
        let generator = GroundedSuccessorGenerator::new(Rc::clone(&problem));
        let mut h1 = H1Heuristic::new(Rc::clone(&problem), &generator);

        // Follow the known 6-step plan to a goal state.
        let mut state = State::initial(&problem);
        for rendered in [
            "pick-up(b)",
            "stack(b, a)",
            "pick-up(c)",
            "stack(c, b)",
            "pick-up(d)",
            "stack(d, c)",
        ] {
            let actions = generator.get_applicable_actions(&state);
            let action = actions
                .iter()
                .find(|action| action.to_string() == rendered)
                .unwrap();
            state = apply(action, &state);
        }
        assert_approx_eq!(h1.evaluate(&state), 0.0);
    }

    #[test]
    fn admissible_on_every_reachable_state() {
        let problem = translate(BLOCKS_DOMAIN_TEXT, BLOCKS_PROBLEM_TEXT).unwrap();
        let generator = GroundedSuccessorGenerator::new(Rc::clone(&problem));
        let space = StateSpace::new(Rc::clone(&problem), &generator, usize::MAX).unwrap();
        let mut h1 = H1Heuristic::new(Rc::clone(&problem), &generator);

        for state in space.get_states() {
            let h = h1.evaluate(state);
            let optimal = space.get_distance_to_goal_state(state);
            assert!(optimal >= 0, "blocks has no dead ends");
            assert!(
                h <= optimal as f64,
                "h1 {h} exceeds optimum {optimal}"
            );
        }
    }
}
