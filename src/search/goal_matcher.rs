use crate::parsed_types::Name;
use crate::search::successor_generators::{build_assignment_sets, SchemaGenerator};
use crate::search::{
    ActionSchema, Arguments, Atom, CostExpression, Problem, SchemaArgument, SchemaAtom,
    SchemaLiteral, SchemaParameter, State, StateSpace,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// An argument of a goal query: a concrete object or a typed free variable.
/// Repeated variable names unify.
#[derive(Debug, Clone)]
pub enum QueryTerm {
    Object(u32),
    Variable { name: Name, type_index: usize },
}

/// A goal atom to match, possibly lifted.
#[derive(Debug, Clone)]
pub struct QueryAtom {
    pub predicate_index: usize,
    pub arguments: Vec<QueryTerm>,
}

impl QueryAtom {
    pub fn new(predicate_index: usize, arguments: Vec<QueryTerm>) -> Self {
        Self {
            predicate_index,
            arguments,
        }
    }

    fn is_ground(&self) -> bool {
        self.arguments
            .iter()
            .all(|term| matches!(term, QueryTerm::Object(_)))
    }
}

/// Finds the state closest to a given origin that satisfies a conjunction of
/// (possibly lifted) goal atoms. Ground goals reduce to a rank-subset test;
/// lifted goals run a one-shot schema generator whose precondition is the
/// goal conjunction.
#[derive(Debug)]
pub struct GoalMatcher<'a> {
    state_space: &'a StateSpace,
    /// States sorted by distance from the initial state, built on first use.
    initial_distances: RefCell<Vec<(usize, i32)>>,
}

impl<'a> GoalMatcher<'a> {
    pub fn new(state_space: &'a StateSpace) -> Self {
        Self {
            state_space,
            initial_distances: RefCell::new(Vec::new()),
        }
    }

    /// The states of the space with their distance from `from_state`, sorted
    /// ascending. The initial-state ordering is cached; other origins are
    /// recomputed per call via the all-pairs distances.
    fn state_distances(&self, from_state: &State) -> Vec<(usize, i32)> {
        if from_state == self.state_space.get_initial_state() {
            let mut cached = self.initial_distances.borrow_mut();
            if cached.is_empty() {
                let mut distances: Vec<(usize, i32)> = self
                    .state_space
                    .get_states()
                    .iter()
                    .enumerate()
                    .map(|(index, state)| {
                        (index, self.state_space.get_distance_from_initial_state(state))
                    })
                    .collect();
                distances.sort_by_key(|&(_, distance)| distance);
                *cached = distances;
            }
            cached.clone()
        } else {
            let mut distances: Vec<(usize, i32)> = self
                .state_space
                .get_states()
                .iter()
                .enumerate()
                .map(|(index, state)| {
                    (
                        index,
                        self.state_space.get_distance_between_states(from_state, state),
                    )
                })
                .collect();
            distances.sort_by_key(|&(_, distance)| distance);
            distances
        }
    }

    pub fn best_match(&self, goal: &[QueryAtom]) -> Option<(State, i32)> {
        self.best_match_from(&self.state_space.get_initial_state().clone(), goal)
    }

    pub fn best_match_from(
        &self,
        from_state: &State,
        goal: &[QueryAtom],
    ) -> Option<(State, i32)> {
        let problem = self.state_space.problem();

        if goal.iter().all(QueryAtom::is_ground) {
            let goal_ranks: Vec<u32> = goal
                .iter()
                .map(|atom| {
                    let arguments: Arguments = atom
                        .arguments
                        .iter()
                        .map(|term| match term {
                            QueryTerm::Object(object_index) => *object_index,
                            QueryTerm::Variable { .. } => unreachable!(),
                        })
                        .collect();
                    problem.get_rank(&Atom::new(atom.predicate_index, arguments))
                })
                .collect();

            for (state_index, distance) in self.state_distances(from_state) {
                let state = &self.state_space.get_states()[state_index];
                if goal_ranks.iter().all(|&rank| state.contains_rank(rank)) {
                    return Some((state.clone(), distance));
                }
            }
            None
        } else {
            let generator = self.lifted_goal_generator(problem, goal);

            for (state_index, distance) in self.state_distances(from_state) {
                let state = &self.state_space.get_states()[state_index];
                let assignment_sets =
                    build_assignment_sets(problem, &state.get_dynamic_ranks());
                if !generator.applicable_actions(state, &assignment_sets).is_empty() {
                    return Some((state.clone(), distance));
                }
            }
            None
        }
    }

    /// Builds a unit-cost schema whose parameters are the goal's free
    /// variables and whose precondition is the goal conjunction; a state
    /// matches the goal iff the schema has an applicable grounding there.
    fn lifted_goal_generator(&self, problem: &Rc<Problem>, goal: &[QueryAtom]) -> SchemaGenerator {
        let mut parameters = Vec::new();
        let mut parameter_table: HashMap<Name, usize> = HashMap::new();

        for atom in goal {
            for term in &atom.arguments {
                if let QueryTerm::Variable { name, type_index } = term {
                    if !parameter_table.contains_key(name) {
                        parameter_table.insert(name.clone(), parameters.len());
                        parameters.push(SchemaParameter {
                            index: parameters.len(),
                            type_index: *type_index,
                        });
                    }
                }
            }
        }

        let precondition = goal
            .iter()
            .map(|atom| SchemaLiteral {
                atom: SchemaAtom {
                    predicate_index: atom.predicate_index,
                    arguments: atom
                        .arguments
                        .iter()
                        .map(|term| match term {
                            QueryTerm::Object(object_index) => {
                                SchemaArgument::Constant(*object_index)
                            }
                            QueryTerm::Variable { name, .. } => {
                                SchemaArgument::Free(parameter_table[name])
                            }
                        })
                        .collect(),
                },
                negated: false,
            })
            .collect();

        let schema = ActionSchema {
            index: problem.domain.action_schemas.len(),
            name: Name::from("dummy"),
            parameters,
            precondition,
            unconditional_effect: Vec::new(),
            conditional_effect: Vec::new(),
            cost: CostExpression::unit(),
        };

        SchemaGenerator::new(Rc::clone(problem), Rc::new(schema))
    }
}
