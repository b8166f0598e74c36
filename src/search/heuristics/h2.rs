//! The Δ² heuristic: like Δ¹ but over pairs of atoms, which sees conflicts
//! the single-atom relaxation misses. Still admissible.

use crate::search::heuristics::heuristic::{
    goal_ranks, is_dead_end, relaxed_actions, Heuristic, RelaxedAction, DEAD_END,
};
use crate::search::successor_generators::GroundedSuccessorGenerator;
use crate::search::{Problem, State};
use std::rc::Rc;

#[derive(Debug)]
pub struct H2Heuristic {
    problem: Rc<Problem>,
    actions: Vec<RelaxedAction>,
    goal: Vec<u32>,
    h1_table: Vec<f64>,
    h2_table: Vec<Vec<f64>>,
}

impl H2Heuristic {
    pub fn new(problem: Rc<Problem>, successor_generator: &GroundedSuccessorGenerator) -> Self {
        let actions = relaxed_actions(&problem, successor_generator);
        let goal = goal_ranks(&problem);
        let num_ranks = problem.num_ranks() as usize;
        Self {
            problem,
            actions,
            goal,
            h1_table: vec![DEAD_END; num_ranks],
            h2_table: vec![vec![DEAD_END; num_ranks]; num_ranks],
        }
    }

    /// The max over singleton and pair values of `ranks`.
    fn eval(&self, ranks: &[u32]) -> f64 {
        let mut value: f64 = 0.0;
        for (position, &rank1) in ranks.iter().enumerate() {
            value = value.max(self.h1_table[rank1 as usize]);
            if is_dead_end(value) {
                return DEAD_END;
            }
            for &rank2 in &ranks[position + 1..] {
                value = value.max(self.h2_table[rank1 as usize][rank2 as usize]);
                if is_dead_end(value) {
                    return DEAD_END;
                }
            }
        }
        value
    }

    /// The max over `h1[extra]` and the pair values of `extra` with each of
    /// `ranks`; the cost of achieving `ranks` while also holding `extra`.
    fn eval_with(&self, ranks: &[u32], extra: u32) -> f64 {
        let mut value = self.h1_table[extra as usize];
        if is_dead_end(value) {
            return DEAD_END;
        }
        for &rank in ranks {
            if rank == extra {
                continue;
            }
            value = value.max(self.h2_table[extra as usize][rank as usize]);
            if is_dead_end(value) {
                return DEAD_END;
            }
        }
        value
    }

    fn update_single(table: &mut [f64], rank: u32, value: f64, changed: &mut bool) {
        if table[rank as usize] > value {
            table[rank as usize] = value;
            *changed = true;
        }
    }

    fn update_pair(table: &mut [Vec<f64>], rank1: u32, rank2: u32, value: f64, changed: &mut bool) {
        if table[rank1 as usize][rank2 as usize] > value {
            table[rank1 as usize][rank2 as usize] = value;
            table[rank2 as usize][rank1 as usize] = value;
            *changed = true;
        }
    }

    fn fill_tables(&mut self, state: &State) {
        self.h1_table.fill(DEAD_END);
        for row in &mut self.h2_table {
            row.fill(DEAD_END);
        }

        let state_ranks = state.get_ranks();
        for &rank1 in &state_ranks {
            self.h1_table[rank1 as usize] = 0.0;
            for &rank2 in &state_ranks {
                self.h2_table[rank1 as usize][rank2 as usize] = 0.0;
            }
        }

        let mut changed = true;
        while changed {
            changed = false;

            for action_index in 0..self.actions.len() {
                let precondition_cost = self.eval(&self.actions[action_index].precondition);
                if is_dead_end(precondition_cost) {
                    continue;
                }

                let action = &self.actions[action_index];
                let cost = action.cost;

                // The borrow checker cannot see that eval_with only reads
                // the tables, so collect the updates first.
                let mut single_updates: Vec<(u32, f64)> = Vec::new();
                let mut pair_updates: Vec<(u32, u32, f64)> = Vec::new();

                for (position, &rank1) in action.add_effect.iter().enumerate() {
                    single_updates.push((rank1, precondition_cost + cost));

                    for &rank2 in &action.add_effect[position + 1..] {
                        if rank1 != rank2 {
                            pair_updates.push((rank1, rank2, precondition_cost + cost));
                        }
                    }

                    // An atom that survives the deletes pairs with every
                    // added atom, at the cost of achieving the precondition
                    // together with it.
                    for &rank2 in &action.delete_effect_complement {
                        let survivor_cost =
                            precondition_cost.max(self.eval_with(&action.precondition, rank2));
                        if !is_dead_end(survivor_cost) {
                            pair_updates.push((rank1, rank2, survivor_cost + cost));
                        }
                    }
                }

                for (rank, value) in single_updates {
                    Self::update_single(&mut self.h1_table, rank, value, &mut changed);
                }
                for (rank1, rank2, value) in pair_updates {
                    Self::update_pair(&mut self.h2_table, rank1, rank2, value, &mut changed);
                }
            }
        }
    }
}

impl Heuristic for H2Heuristic {
    fn evaluate(&mut self, state: &State) -> f64 {
        assert!(
            Rc::ptr_eq(state.problem(), &self.problem),
            "heuristic is constructed for a different problem"
        );
        self.fill_tables(state);
        self.eval(&self.goal)
    }
}
