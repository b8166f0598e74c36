use crate::search::{
    ActionSchema, Arguments, Atom, Bitset, CostExpression, CostOperation, Literal, Problem,
    SchemaArgument, SchemaAtom, SchemaLiteral,
};
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// The four bitsets of one conditional effect.
#[derive(Debug, Clone)]
pub struct ConditionalBitsets {
    pub positive_precondition: Bitset,
    pub negative_precondition: Bitset,
    pub positive_effect: Bitset,
    pub negative_effect: Bitset,
}

/// A shared handle to a ground action.
pub type Action = Rc<GroundAction>;

/// A ground action: a schema instantiated with an argument tuple, its cost,
/// its ground literal lists, and precomputed bitsets for applicability and
/// apply. The negative bitsets are stored as masks (default tail 1, ranks
/// unset where forbidden/deleted) so that applicability and apply reduce to
/// `|` and `&`.
#[derive(Debug)]
pub struct GroundAction {
    pub problem: Rc<Problem>,
    pub schema: Rc<ActionSchema>,
    pub arguments: Arguments,
    pub cost: f64,
    precondition: Vec<Literal>,
    unconditional_effect: Vec<Literal>,
    conditional_effect: Vec<(Vec<Literal>, Vec<Literal>)>,
    positive_precondition: Bitset,
    negative_precondition: Bitset,
    positive_effect: Bitset,
    negative_effect: Bitset,
    conditional_bitsets: Vec<ConditionalBitsets>,
}

fn ground_argument(argument: &SchemaArgument, arguments: &Arguments) -> u32 {
    match argument {
        SchemaArgument::Constant(object_index) => *object_index,
        SchemaArgument::Free(parameter_index) => arguments[*parameter_index],
    }
}

pub(crate) fn ground_atom(atom: &SchemaAtom, arguments: &Arguments) -> Atom {
    Atom::new(
        atom.predicate_index,
        atom.arguments
            .iter()
            .map(|argument| ground_argument(argument, arguments))
            .collect(),
    )
}

pub(crate) fn ground_literal(literal: &SchemaLiteral, arguments: &Arguments) -> Literal {
    Literal::new(ground_atom(&literal.atom, arguments), literal.negated)
}

fn ground_literals(literals: &[SchemaLiteral], arguments: &Arguments) -> Vec<Literal> {
    literals
        .iter()
        .map(|literal| ground_literal(literal, arguments))
        .collect()
}

fn convert_to_bitsets(problem: &Problem, literals: &[Literal]) -> (Bitset, Bitset) {
    let mut positive = Bitset::with_default(0, false);
    let mut negative = Bitset::with_default(0, true);
    for literal in literals {
        let rank = problem.get_rank(&literal.atom) as usize;
        if literal.negated {
            negative.unset(rank);
        } else {
            positive.set(rank);
        }
    }
    (positive, negative)
}

impl GroundAction {
    /// Grounds `schema` with the given argument tuple. The cost is evaluated
    /// here: constants are taken literally, function lookups consult the
    /// problem's per-atom cost map and are negated for `Decrease`.
    pub fn ground(problem: Rc<Problem>, schema: Rc<ActionSchema>, arguments: Arguments) -> Action {
        assert_eq!(
            arguments.len(),
            schema.arity(),
            "ground: argument tuple does not fill the schema parameters"
        );

        let precondition = ground_literals(&schema.precondition, &arguments);
        let unconditional_effect = ground_literals(&schema.unconditional_effect, &arguments);
        let conditional_effect: Vec<(Vec<Literal>, Vec<Literal>)> = schema
            .conditional_effect
            .iter()
            .map(|implication| {
                (
                    ground_literals(&implication.antecedent, &arguments),
                    ground_literals(&implication.consequence, &arguments),
                )
            })
            .collect();

        let cost = match &schema.cost {
            CostExpression::Constant(value) => *value,
            CostExpression::FunctionLookup {
                operation,
                function_index,
                arguments: function_arguments,
            } => {
                let ground_arguments: Arguments = function_arguments
                    .iter()
                    .map(|argument| ground_argument(argument, &arguments))
                    .collect();
                let value = *problem
                    .atom_costs
                    .get(&(*function_index, ground_arguments))
                    .expect("ground: no cost recorded for the function atom");
                match operation {
                    CostOperation::Increase => value,
                    CostOperation::Decrease => -value,
                }
            }
        };

        let (positive_precondition, negative_precondition) =
            convert_to_bitsets(&problem, &precondition);
        let (positive_effect, negative_effect) =
            convert_to_bitsets(&problem, &unconditional_effect);

        let conditional_bitsets = conditional_effect
            .iter()
            .map(|(antecedent, consequence)| {
                let (positive_precondition, negative_precondition) =
                    convert_to_bitsets(&problem, antecedent);
                let (positive_effect, negative_effect) =
                    convert_to_bitsets(&problem, consequence);
                ConditionalBitsets {
                    positive_precondition,
                    negative_precondition,
                    positive_effect,
                    negative_effect,
                }
            })
            .collect();

        Rc::new(Self {
            problem,
            schema,
            arguments,
            cost,
            precondition,
            unconditional_effect,
            conditional_effect,
            positive_precondition,
            negative_precondition,
            positive_effect,
            negative_effect,
            conditional_bitsets,
        })
    }

    pub fn get_precondition(&self) -> &[Literal] {
        &self.precondition
    }

    pub fn get_unconditional_effect(&self) -> &[Literal] {
        &self.unconditional_effect
    }

    pub fn get_conditional_effect(&self) -> &[(Vec<Literal>, Vec<Literal>)] {
        &self.conditional_effect
    }

    pub fn positive_precondition(&self) -> &Bitset {
        &self.positive_precondition
    }

    pub fn negative_precondition(&self) -> &Bitset {
        &self.negative_precondition
    }

    pub fn positive_effect(&self) -> &Bitset {
        &self.positive_effect
    }

    pub fn negative_effect(&self) -> &Bitset {
        &self.negative_effect
    }

    pub fn conditional_bitsets(&self) -> &[ConditionalBitsets] {
        &self.conditional_bitsets
    }
}

impl PartialEq for GroundAction {
    fn eq(&self, other: &Self) -> bool {
        self.schema.index == other.schema.index && self.arguments == other.arguments
    }
}

impl Eq for GroundAction {}

impl Display for GroundAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({})",
            self.schema.name,
            self.arguments
                .iter()
                .map(|&argument| &self.problem.object(argument).name)
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::successor_generators::{LiftedSuccessorGenerator, SuccessorGenerator};
    use crate::search::translate::translate;
    use crate::search::{apply, is_applicable, State};
    use crate::test_utils::*;
    use smallvec::smallvec;

    fn find_action<'a>(actions: &'a [Action], rendered: &str) -> &'a Action {
        actions
            .iter()
            .find(|action| action.to_string() == rendered)
            .unwrap_or_else(|| panic!("no action {rendered} in {actions:?}"))
    }

    #[test]
    fn grounding_blocks_pick_up() {
        let problem = translate(BLOCKS_DOMAIN_TEXT, BLOCKS_PROBLEM_TEXT).unwrap();
        let schema = Rc::clone(&problem.domain.action_schemas[0]);
        assert_eq!(schema.name, "pick-up");

        // pick-up(a); objects are declared d b a c.
        let action = GroundAction::ground(Rc::clone(&problem), schema, smallvec![2]);
        assert_eq!(action.to_string(), "pick-up(a)");
        assert_eq!(action.cost, 1.0);
        assert_eq!(action.get_precondition().len(), 3);
        assert_eq!(action.get_unconditional_effect().len(), 4);
    }

    #[test]
    fn applicability_and_apply() {
        let problem = translate(BLOCKS_DOMAIN_TEXT, BLOCKS_PROBLEM_TEXT).unwrap();
        let state = State::initial(&problem);
        let generator = LiftedSuccessorGenerator::new(Rc::clone(&problem));
        let actions = generator.get_applicable_actions(&state);

        let pick_up_a = find_action(&actions, "pick-up(a)");
        assert!(is_applicable(pick_up_a, &state));

        let successor = apply(pick_up_a, &state);
        let holding = problem.domain.predicate_index(&"holding".into()).unwrap();
        let clear = problem.domain.predicate_index(&"clear".into()).unwrap();
        let handempty = problem.domain.predicate_index(&"handempty".into()).unwrap();
        assert!(successor.contains(&Atom::new(holding, smallvec![2])));
        assert!(!successor.contains(&Atom::new(clear, smallvec![2])));
        assert!(!successor.contains(&Atom::new(handempty, smallvec![])));

        // pick-up(a) is no longer applicable afterwards.
        assert!(!is_applicable(pick_up_a, &successor));
    }

    #[test]
    fn apply_leaves_unmentioned_ranks_alone() {
        let problem = translate(BLOCKS_DOMAIN_TEXT, BLOCKS_PROBLEM_TEXT).unwrap();
        let state = State::initial(&problem);
        let generator = LiftedSuccessorGenerator::new(Rc::clone(&problem));
        let actions = generator.get_applicable_actions(&state);

        let pick_up_a = find_action(&actions, "pick-up(a)");
        let successor = apply(pick_up_a, &state);

        let mentioned: Vec<u32> = pick_up_a
            .get_unconditional_effect()
            .iter()
            .map(|literal| problem.get_rank(&literal.atom))
            .collect();
        for rank in 0..problem.num_ranks() {
            if !mentioned.contains(&rank) {
                assert_eq!(state.contains_rank(rank), successor.contains_rank(rank));
            }
        }
    }

    #[test]
    fn applicability_is_monotone_under_compatible_additions() {
        let problem = translate(BLOCKS_DOMAIN_TEXT, BLOCKS_PROBLEM_TEXT).unwrap();
        let state = State::initial(&problem);
        let generator = LiftedSuccessorGenerator::new(Rc::clone(&problem));
        let actions = generator.get_applicable_actions(&state);
        let pick_up_a = find_action(&actions, "pick-up(a)");

        // Add an unrelated atom; the action has no negative preconditions on
        // it, so it stays applicable.
        let on = problem.domain.predicate_index(&"on".into()).unwrap();
        let mut atoms = problem.initial_atoms.clone();
        atoms.push(Atom::new(on, smallvec![1, 0]));
        let larger = State::new(&atoms, Rc::clone(&problem));
        assert!(is_applicable(pick_up_a, &larger));
    }

    #[test]
    fn conditional_effects_fire_against_the_pre_state() {
        let problem = translate(BRIEFCASE_DOMAIN_TEXT, BRIEFCASE_PROBLEM_TEXT).unwrap();
        let state = State::initial(&problem);
        let generator = LiftedSuccessorGenerator::new(Rc::clone(&problem));
        let actions = generator.get_applicable_actions(&state);

        // Moving the briefcase carries its contents along.
        let move_home_office = find_action(&actions, "move-briefcase(home, office)");
        let successor = apply(move_home_office, &state);

        let at = problem.domain.predicate_index(&"at".into()).unwrap();
        let pencil = problem.object_index(&"pencil".into()).unwrap();
        let book = problem.object_index(&"book".into()).unwrap();
        let office = problem.object_index(&"office".into()).unwrap();
        let home = problem.object_index(&"home".into()).unwrap();

        // The pencil is inside and moves; the book is not and stays.
        assert!(successor.contains(&Atom::new(at, smallvec![pencil, office])));
        assert!(!successor.contains(&Atom::new(at, smallvec![pencil, home])));
        assert!(successor.contains(&Atom::new(at, smallvec![book, home])));
    }
}
