//! The per-schema lifted successor generator: computes the applicable
//! groundings of one action schema in a state without enumerating the full
//! assignment space.

use crate::search::state::literals_hold_of_arity;
use crate::search::successor_generators::kpkc::find_all_k_cliques_in_k_partite_graph;
use crate::search::{
    literals_hold, Action, ActionSchema, Arguments, Atom, GroundAction, Literal, Problem,
    SchemaArgument, SchemaLiteral, State,
};
use fixedbitset::FixedBitSet;
use std::rc::Rc;
use std::time::Instant;

/// One vertex of the compatibility graph: a parameter bound to an object.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Assignment {
    pub parameter_index: usize,
    pub object_index: u32,
}

/// A pair of vertices that jointly satisfy every static precondition.
#[derive(Debug, Clone, Copy)]
struct AssignmentPair {
    first_vertex: usize,
    second_vertex: usize,
    first_assignment: Assignment,
    second_assignment: Assignment,
}

/// A precondition literal with arguments flattened to
/// parameter-index-or-constant form, split off its schema for cheap
/// consistency tests.
#[derive(Debug, Clone)]
struct FlatLiteral {
    predicate_index: usize,
    arity: usize,
    negated: bool,
    arguments: Vec<SchemaArgument>,
}

impl FlatLiteral {
    fn new(literal: &SchemaLiteral) -> Self {
        Self {
            predicate_index: literal.atom.predicate_index,
            arity: literal.atom.arity(),
            negated: literal.negated,
            arguments: literal.atom.arguments.clone(),
        }
    }
}

/// Per-predicate indicator sets answering "does the given atom set contain an
/// atom with object `o₁` at position `p₁` (and object `o₂` at position
/// `p₂`)?". Packed into a flat bool vector per predicate; `-1` encodes an
/// unconstrained position or object.
pub(crate) type AssignmentSets = Vec<Vec<bool>>;

fn assignment_position(
    first_position: i32,
    first_object: i32,
    second_position: i32,
    second_object: i32,
    arity: i32,
    num_objects: i32,
) -> usize {
    let first = 1;
    let second = first * (arity + 1);
    let third = second * (arity + 1);
    let fourth = third * (num_objects + 1);
    let rank = first * (first_position + 1)
        + second * (second_position + 1)
        + third * (first_object + 1)
        + fourth * (second_object + 1);
    rank as usize
}

fn num_assignments(arity: i32, num_objects: i32) -> usize {
    let first = 1;
    let second = first * (arity + 1);
    let third = second * (arity + 1);
    let fourth = third * (num_objects + 1);
    let max = first * arity + second * arity + third * num_objects + fourth * num_objects;
    (max + 1) as usize
}

/// Builds the assignment sets of the given atom ranks. The lifted generator
/// calls this once per state with the dynamic ranks, and once per schema at
/// construction with the static ranks.
pub(crate) fn build_assignment_sets(problem: &Problem, ranks: &[u32]) -> AssignmentSets {
    let num_objects = problem.num_objects() as i32;
    let mut assignment_sets: AssignmentSets = problem
        .domain
        .predicates
        .iter()
        .map(|predicate| vec![false; num_assignments(predicate.arity() as i32, num_objects)])
        .collect();

    for &rank in ranks {
        let arity = problem.get_arity(rank);
        let predicate_index = problem.get_predicate_index(rank);
        let argument_ids = problem.get_argument_ids(rank);
        let assignment_set = &mut assignment_sets[predicate_index];

        for first_position in 0..arity {
            let first_object = argument_ids[first_position] as i32;
            assignment_set[assignment_position(
                first_position as i32,
                first_object,
                -1,
                -1,
                arity as i32,
                num_objects,
            )] = true;

            for second_position in (first_position + 1)..arity {
                let second_object = argument_ids[second_position] as i32;
                assignment_set[assignment_position(
                    second_position as i32,
                    second_object,
                    -1,
                    -1,
                    arity as i32,
                    num_objects,
                )] = true;
                assignment_set[assignment_position(
                    first_position as i32,
                    first_object,
                    second_position as i32,
                    second_object,
                    arity as i32,
                    num_objects,
                )] = true;
            }
        }
    }

    assignment_sets
}

/// The generator for one action schema.
#[derive(Debug)]
pub struct SchemaGenerator {
    problem: Rc<Problem>,
    schema: Rc<ActionSchema>,
    initial_state: State,
    static_precondition: Vec<FlatLiteral>,
    fluent_precondition: Vec<FlatLiteral>,
    /// For each parameter, the objects whose type fits; only used for
    /// arity ≥ 1.
    compatible_objects: Vec<Vec<u32>>,
    /// Flat enumeration of `(parameter, object)` vertices; the partitions
    /// group them by parameter. Only used for arity ≥ 2.
    to_vertex_assignment: Vec<Assignment>,
    partitions: Vec<Vec<usize>>,
    statically_consistent_assignments: Vec<AssignmentPair>,
}

impl SchemaGenerator {
    pub fn new(problem: Rc<Problem>, schema: Rc<ActionSchema>) -> Self {
        let domain = Rc::clone(&problem.domain);
        let initial_state = State::initial(&problem);

        let mut static_precondition = Vec::new();
        let mut fluent_precondition = Vec::new();
        for literal in &schema.precondition {
            let flat = FlatLiteral::new(literal);
            if domain.predicates[literal.atom.predicate_index].is_static {
                static_precondition.push(flat);
            } else {
                fluent_precondition.push(flat);
            }
        }

        let mut compatible_objects = Vec::new();
        if schema.arity() >= 1 {
            for parameter in &schema.parameters {
                let objects: Vec<u32> = problem
                    .objects
                    .iter()
                    .filter(|object| {
                        object.is_constant()
                            && domain.is_subtype_of(object.type_index, parameter.type_index)
                    })
                    .map(|object| object.index)
                    .collect();
                compatible_objects.push(objects);
            }
        }

        let mut to_vertex_assignment = Vec::new();
        let mut partitions = Vec::new();
        let mut statically_consistent_assignments = Vec::new();
        if schema.arity() >= 2 {
            for (parameter_index, objects) in compatible_objects.iter().enumerate() {
                let mut partition = Vec::with_capacity(objects.len());
                for &object_index in objects {
                    partition.push(to_vertex_assignment.len());
                    to_vertex_assignment.push(Assignment {
                        parameter_index,
                        object_index,
                    });
                }
                partitions.push(partition);
            }

            // Filter vertex pairs against the static atoms once.
            let static_assignment_sets =
                build_assignment_sets(&problem, &initial_state.get_static_ranks());

            for first_vertex in 0..to_vertex_assignment.len() {
                for second_vertex in (first_vertex + 1)..to_vertex_assignment.len() {
                    let first_assignment = to_vertex_assignment[first_vertex];
                    let second_assignment = to_vertex_assignment[second_vertex];

                    if first_assignment.parameter_index != second_assignment.parameter_index
                        && literal_all_consistent(
                            &problem,
                            &static_assignment_sets,
                            &static_precondition,
                            &first_assignment,
                            &second_assignment,
                        )
                    {
                        statically_consistent_assignments.push(AssignmentPair {
                            first_vertex,
                            second_vertex,
                            first_assignment,
                            second_assignment,
                        });
                    }
                }
            }

            // The pair filter cannot see static nullary atoms.
            for literal in &static_precondition {
                if literal.arity == 0 {
                    let atom = Atom::new(literal.predicate_index, Arguments::new());
                    if initial_state.contains(&atom) == literal.negated {
                        statically_consistent_assignments.clear();
                        break;
                    }
                }
            }
        }

        Self {
            problem,
            schema,
            initial_state,
            static_precondition,
            fluent_precondition,
            compatible_objects,
            to_vertex_assignment,
            partitions,
            statically_consistent_assignments,
        }
    }

    pub fn schema(&self) -> &Rc<ActionSchema> {
        &self.schema
    }

    fn create_action(&self, arguments: Arguments) -> Action {
        GroundAction::ground(
            Rc::clone(&self.problem),
            Rc::clone(&self.schema),
            arguments,
        )
    }

    fn nullary_preconditions_hold(&self, state: &State) -> bool {
        self.fluent_precondition
            .iter()
            .filter(|literal| literal.arity == 0)
            .all(|literal| {
                let atom = Atom::new(literal.predicate_index, Arguments::new());
                state.contains(&atom) != literal.negated
            })
    }

    fn nullary_case(
        &self,
        deadline: Option<Instant>,
        state: &State,
        out_actions: &mut Vec<Action>,
    ) -> bool {
        if deadline_expired(deadline) {
            return false;
        }

        let action = self.create_action(Arguments::new());
        if literals_hold(action.get_precondition(), state) {
            out_actions.push(action);
        }
        true
    }

    fn unary_case(
        &self,
        deadline: Option<Instant>,
        state: &State,
        out_actions: &mut Vec<Action>,
    ) -> bool {
        for &object_index in &self.compatible_objects[0] {
            if deadline_expired(deadline) {
                return false;
            }

            let action = self.create_action([object_index].into_iter().collect());
            if literals_hold(action.get_precondition(), state) {
                out_actions.push(action);
            }
        }
        true
    }

    fn general_case(
        &self,
        deadline: Option<Instant>,
        state: &State,
        assignment_sets: &AssignmentSets,
        out_actions: &mut Vec<Action>,
    ) -> bool {
        if deadline_expired(deadline) {
            return false;
        }

        let num_vertices = self.to_vertex_assignment.len();
        let mut adjacency_matrix = vec![FixedBitSet::with_capacity(num_vertices); num_vertices];

        for pair in &self.statically_consistent_assignments {
            if literal_all_consistent(
                &self.problem,
                assignment_sets,
                &self.fluent_precondition,
                &pair.first_assignment,
                &pair.second_assignment,
            ) {
                adjacency_matrix[pair.first_vertex].insert(pair.second_vertex);
                adjacency_matrix[pair.second_vertex].insert(pair.first_vertex);
            }
        }

        // Every k-clique with one vertex per partition is a complete
        // assignment that may yield an applicable action. States contain few
        // atoms compared to the number of possible atoms, so the graph is
        // sparse and the clique count small.
        let mut cliques = Vec::new();
        if !find_all_k_cliques_in_k_partite_graph(
            deadline,
            &adjacency_matrix,
            &self.partitions,
            &mut cliques,
        ) {
            return false;
        }

        for clique in &cliques {
            if deadline_expired(deadline) {
                return false;
            }

            let mut arguments: Arguments = Arguments::from_elem(0, self.schema.arity());
            for &vertex in clique {
                let assignment = self.to_vertex_assignment[vertex];
                arguments[assignment.parameter_index] = assignment.object_index;
            }

            let action = self.create_action(arguments);
            // The pair filter decides literals over at most two positions;
            // recheck the residual ones exactly.
            if literals_hold_of_arity(action.get_precondition(), state, 3) {
                out_actions.push(action);
            }
        }

        true
    }

    /// The applicable groundings of this schema in `state`, given the
    /// assignment sets of the state's dynamic ranks.
    pub(crate) fn applicable_actions(
        &self,
        state: &State,
        assignment_sets: &AssignmentSets,
    ) -> Vec<Action> {
        let mut actions = Vec::new();
        self.applicable_actions_until(None, state, assignment_sets, &mut actions);
        actions
    }

    /// Deadline-aware variant. Returns `false` on expiry; the caller discards
    /// partial results.
    pub(crate) fn applicable_actions_until(
        &self,
        deadline: Option<Instant>,
        state: &State,
        assignment_sets: &AssignmentSets,
        out_actions: &mut Vec<Action>,
    ) -> bool {
        if !self.nullary_preconditions_hold(state) {
            return true;
        }

        match self.schema.arity() {
            0 => self.nullary_case(deadline, state, out_actions),
            1 => self.unary_case(deadline, state, out_actions),
            _ => self.general_case(deadline, state, assignment_sets, out_actions),
        }
    }

    /// Every grounding whose static preconditions hold in the initial state,
    /// regardless of fluents: the grounded generator's action universe. The
    /// general case runs the clique search with all statically consistent
    /// pairs as edges, which is exactly a maximally permissive fluent filter.
    pub(crate) fn ground_all(&self) -> Vec<Action> {
        let mut actions = Vec::new();

        match self.schema.arity() {
            0 => {
                let action = self.create_action(Arguments::new());
                if self.static_precondition_holds(&action) {
                    actions.push(action);
                }
            }
            1 => {
                for &object_index in &self.compatible_objects[0] {
                    let action = self.create_action([object_index].into_iter().collect());
                    if self.static_precondition_holds(&action) {
                        actions.push(action);
                    }
                }
            }
            _ => {
                let num_vertices = self.to_vertex_assignment.len();
                let mut adjacency_matrix =
                    vec![FixedBitSet::with_capacity(num_vertices); num_vertices];
                for pair in &self.statically_consistent_assignments {
                    adjacency_matrix[pair.first_vertex].insert(pair.second_vertex);
                    adjacency_matrix[pair.second_vertex].insert(pair.first_vertex);
                }

                let mut cliques = Vec::new();
                find_all_k_cliques_in_k_partite_graph(
                    None,
                    &adjacency_matrix,
                    &self.partitions,
                    &mut cliques,
                );

                for clique in &cliques {
                    let mut arguments: Arguments = Arguments::from_elem(0, self.schema.arity());
                    for &vertex in clique {
                        let assignment = self.to_vertex_assignment[vertex];
                        arguments[assignment.parameter_index] = assignment.object_index;
                    }
                    let action = self.create_action(arguments);
                    if self.static_precondition_holds(&action) {
                        actions.push(action);
                    }
                }
            }
        }

        actions
    }

    /// Exact check of the ground static precondition against the initial
    /// state. Static atoms never change, so this decides all reachable
    /// states at once.
    fn static_precondition_holds(&self, action: &Action) -> bool {
        let static_literals: Vec<Literal> = action
            .get_precondition()
            .iter()
            .filter(|literal| {
                self.problem.domain.predicates[literal.atom.predicate_index].is_static
            })
            .cloned()
            .collect();
        literals_hold(&static_literals, &self.initial_state)
    }
}

fn deadline_expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

/// Tests whether every literal is compatible with the atom set behind
/// `assignment_sets` under the (at most two) bindings of the vertex pair.
/// Exact for literals whose variables the pair fully fixes with arity ≤ 2;
/// conservative otherwise (negated partial queries are skipped and the
/// residual is rechecked on the ground action).
fn literal_all_consistent(
    problem: &Problem,
    assignment_sets: &AssignmentSets,
    literals: &[FlatLiteral],
    first_assignment: &Assignment,
    second_assignment: &Assignment,
) -> bool {
    let num_objects = problem.num_objects() as i32;

    for literal in literals {
        let mut first_position: i32 = -1;
        let mut second_position: i32 = -1;
        let mut first_object: i32 = -1;
        let mut second_object: i32 = -1;
        let mut empty_assignment = true;

        for (index, argument) in literal.arguments.iter().enumerate() {
            match argument {
                SchemaArgument::Constant(object_index) => {
                    // Constants only constrain literals the pair test can
                    // decide exactly.
                    if literal.arity <= 2 {
                        if first_position < 0 {
                            first_position = index as i32;
                            first_object = *object_index as i32;
                        } else {
                            second_position = index as i32;
                            second_object = *object_index as i32;
                        }
                        empty_assignment = false;
                    }
                }
                SchemaArgument::Free(parameter_index) => {
                    let bound = if *parameter_index == first_assignment.parameter_index {
                        Some(first_assignment.object_index)
                    } else if *parameter_index == second_assignment.parameter_index {
                        Some(second_assignment.object_index)
                    } else {
                        None
                    };
                    if let Some(object_index) = bound {
                        if first_position < 0 {
                            first_position = index as i32;
                            first_object = object_index as i32;
                        } else {
                            second_position = index as i32;
                            second_object = object_index as i32;
                            break;
                        }
                        empty_assignment = false;
                    }
                }
            }
        }

        if empty_assignment {
            continue;
        }

        let assignment_set = &assignment_sets[literal.predicate_index];
        let assignment_rank = assignment_position(
            first_position,
            first_object,
            second_position,
            second_object,
            literal.arity as i32,
            num_objects,
        );
        let consistent_with_state = assignment_set[assignment_rank];

        if !literal.negated && !consistent_with_state {
            return false;
        }
        if literal.negated
            && consistent_with_state
            && (literal.arity == 1 || (literal.arity == 2 && second_position >= 0))
        {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::translate::translate;
    use crate::test_utils::*;
    use itertools::Itertools;

    fn rendered(actions: &[Action]) -> Vec<String> {
        actions
            .iter()
            .map(|action| action.to_string())
            .sorted()
            .collect()
    }

    #[test]
    fn assignment_sets_answer_single_and_pair_queries() {
        let problem = translate(SPANNER_DOMAIN_TEXT, SPANNER_PROBLEM_TEXT).unwrap();
        let initial_state = State::initial(&problem);
        let sets = build_assignment_sets(&problem, &initial_state.get_static_ranks());

        let link = problem.domain.predicate_index(&"link".into()).unwrap();
        let shed = problem.object_index(&"shed".into()).unwrap() as i32;
        let location1 = problem.object_index(&"location1".into()).unwrap() as i32;
        let gate = problem.object_index(&"gate".into()).unwrap() as i32;
        let num_objects = problem.num_objects() as i32;

        // (link shed location1) is in the initial state.
        let yes = assignment_position(0, shed, 1, location1, 2, num_objects);
        assert!(sets[link][yes]);
        // (link shed gate) is not.
        let no = assignment_position(0, shed, 1, gate, 2, num_objects);
        assert!(!sets[link][no]);
        // shed appears in the first position of some link atom.
        let single = assignment_position(0, shed, -1, -1, 2, num_objects);
        assert!(sets[link][single]);
    }

    #[test]
    fn unary_schema_groundings_blocks() {
        let problem = translate(BLOCKS_DOMAIN_TEXT, BLOCKS_PROBLEM_TEXT).unwrap();
        let state = State::initial(&problem);
        let schema = Rc::clone(&problem.domain.action_schemas[0]);
        let generator = SchemaGenerator::new(Rc::clone(&problem), schema);

        let sets = build_assignment_sets(&problem, &state.get_dynamic_ranks());
        let actions = generator.applicable_actions(&state, &sets);

        // Every block is clear and on the table, so all four pick-ups apply.
        assert_eq!(
            rendered(&actions),
            vec!["pick-up(a)", "pick-up(b)", "pick-up(c)", "pick-up(d)"]
        );
    }

    #[test]
    fn static_filtering_prunes_walk_groundings() {
        let problem = translate(SPANNER_DOMAIN_TEXT, SPANNER_PROBLEM_TEXT).unwrap();
        let state = State::initial(&problem);
        let walk = problem
            .domain
            .action_schemas
            .iter()
            .find(|schema| schema.name == "walk")
            .unwrap();
        let generator = SchemaGenerator::new(Rc::clone(&problem), Rc::clone(walk));

        let sets = build_assignment_sets(&problem, &state.get_dynamic_ranks());
        let actions = generator.applicable_actions(&state, &sets);

        // Bob is at the shed and the only link from it goes to location1.
        assert_eq!(rendered(&actions), vec!["walk(shed, location1, bob)"]);
    }

    #[test]
    fn ground_all_respects_static_preconditions() {
        let problem = translate(SPANNER_DOMAIN_TEXT, SPANNER_PROBLEM_TEXT).unwrap();
        let walk = problem
            .domain
            .action_schemas
            .iter()
            .find(|schema| schema.name == "walk")
            .unwrap();
        let generator = SchemaGenerator::new(Rc::clone(&problem), Rc::clone(walk));

        // There are four link atoms and one man, so four walk groundings
        // survive the static filter.
        let actions = generator.ground_all();
        assert_eq!(
            rendered(&actions),
            vec![
                "walk(location1, location2, bob)",
                "walk(location2, location3, bob)",
                "walk(location3, gate, bob)",
                "walk(shed, location1, bob)"
            ]
        );
    }

    #[test]
    fn deadline_expiry_discards_results() {
        let problem = translate(GRIPPER_DOMAIN_TEXT, GRIPPER_PROBLEM_TEXT).unwrap();
        let state = State::initial(&problem);
        let schema = Rc::clone(&problem.domain.action_schemas[1]);
        let generator = SchemaGenerator::new(Rc::clone(&problem), schema);

        let sets = build_assignment_sets(&problem, &state.get_dynamic_ranks());
        let deadline = Instant::now() - std::time::Duration::from_millis(1);
        let mut actions = Vec::new();
        let in_time =
            generator.applicable_actions_until(Some(deadline), &state, &sets, &mut actions);
        assert!(!in_time);
    }
}
