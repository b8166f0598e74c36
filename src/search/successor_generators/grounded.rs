//! The grounded successor generator: grounds every action once, then answers
//! applicability queries through a decision tree keyed on atom ranks.

use crate::search::successor_generators::{LiftedSuccessorGenerator, SuccessorGenerator};
use crate::search::{is_applicable, Action, Problem, State};
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Instant;
use tracing::debug;

/// Below this many candidates a subtree is not worth splitting further.
const LEAF_SIZE: usize = 4;

#[derive(Debug)]
enum DecisionNode {
    /// Splits on one atom rank. `present` holds the actions requiring it
    /// positively, `absent` those requiring its absence, `dont_care` those
    /// not mentioning it.
    Branch {
        rank: u32,
        present: Option<Box<DecisionNode>>,
        absent: Option<Box<DecisionNode>>,
        dont_care: Option<Box<DecisionNode>>,
    },
    Leaf(Vec<Action>),
}

/// A candidate action with its precondition rank sets, used while building
/// the tree.
struct Candidate {
    action: Action,
    positive: BTreeSet<u32>,
    negative: BTreeSet<u32>,
}

#[derive(Debug)]
pub struct GroundedSuccessorGenerator {
    problem: Rc<Problem>,
    actions: Vec<Action>,
    root: Option<Box<DecisionNode>>,
}

impl GroundedSuccessorGenerator {
    pub fn new(problem: Rc<Problem>) -> Self {
        let lifted = LiftedSuccessorGenerator::new(Rc::clone(&problem));
        Self::from_lifted(&lifted)
    }

    pub fn from_lifted(lifted: &LiftedSuccessorGenerator) -> Self {
        let problem = Rc::clone(lifted.problem());

        let mut actions = Vec::new();
        for generator in lifted.schema_generators() {
            actions.extend(generator.ground_all());
        }

        let candidates: Vec<Candidate> = actions
            .iter()
            .map(|action| {
                let mut positive = BTreeSet::new();
                let mut negative = BTreeSet::new();
                for literal in action.get_precondition() {
                    let rank = problem.get_rank(&literal.atom);
                    if literal.negated {
                        negative.insert(rank);
                    } else {
                        positive.insert(rank);
                    }
                }
                Candidate {
                    action: Rc::clone(action),
                    positive,
                    negative,
                }
            })
            .collect();

        // All atom ranks some candidate mentions in its precondition, in
        // rank order; the branching scan advances monotonically over them.
        let ranks: Vec<u32> = candidates
            .iter()
            .flat_map(|candidate| {
                candidate
                    .positive
                    .iter()
                    .chain(candidate.negative.iter())
                    .copied()
            })
            .collect::<BTreeSet<u32>>()
            .into_iter()
            .collect();

        let root = build_decision_tree(candidates, &ranks, 0);
        debug!(
            actions = actions.len(),
            branch_ranks = ranks.len(),
            "built grounded successor generator"
        );

        Self {
            problem,
            actions,
            root,
        }
    }

    /// The full ground action universe, in grounding order.
    pub fn get_actions(&self) -> &[Action] {
        &self.actions
    }
}

fn select_branching_rank(candidates: &[Candidate], ranks: &[u32], start: usize) -> usize {
    // The atom whose one-sided precondition count is largest discriminates
    // most; when nothing in the tail discriminates, fall back to the first
    // remaining atom.
    let mut best: Option<(usize, usize)> = None;
    for (offset, &rank) in ranks[start..].iter().enumerate() {
        let positive = candidates
            .iter()
            .filter(|candidate| candidate.positive.contains(&rank))
            .count();
        let negative = candidates
            .iter()
            .filter(|candidate| candidate.negative.contains(&rank))
            .count();
        let score = positive.max(negative);
        if score > 0 && best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((start + offset, score));
        }
    }
    best.map_or(start, |(index, _)| index)
}

fn build_decision_tree(
    candidates: Vec<Candidate>,
    ranks: &[u32],
    start: usize,
) -> Option<Box<DecisionNode>> {
    if candidates.is_empty() {
        return None;
    }
    if candidates.len() < LEAF_SIZE || start >= ranks.len() {
        return Some(Box::new(leaf(candidates)));
    }

    let index = select_branching_rank(&candidates, ranks, start);
    let rank = ranks[index];

    let mut present = Vec::new();
    let mut absent = Vec::new();
    let mut dont_care = Vec::new();
    for candidate in candidates {
        if candidate.positive.contains(&rank) {
            present.push(candidate);
        } else if candidate.negative.contains(&rank) {
            absent.push(candidate);
        } else {
            dont_care.push(candidate);
        }
    }

    Some(Box::new(DecisionNode::Branch {
        rank,
        present: build_decision_tree(present, ranks, index + 1),
        absent: build_decision_tree(absent, ranks, index + 1),
        dont_care: build_decision_tree(dont_care, ranks, index + 1),
    }))
}

fn leaf(candidates: Vec<Candidate>) -> DecisionNode {
    DecisionNode::Leaf(
        candidates
            .into_iter()
            .map(|candidate| candidate.action)
            .collect(),
    )
}

fn collect_applicable(node: &DecisionNode, state: &State, out_actions: &mut Vec<Action>) {
    match node {
        DecisionNode::Branch {
            rank,
            present,
            absent,
            dont_care,
        } => {
            let followed = if state.contains_rank(*rank) {
                present
            } else {
                absent
            };
            if let Some(child) = followed {
                collect_applicable(child, state, out_actions);
            }
            if let Some(child) = dont_care {
                collect_applicable(child, state, out_actions);
            }
        }
        DecisionNode::Leaf(actions) => {
            // The tree prunes one conjunct per path; the leaf check is exact.
            for action in actions {
                if is_applicable(action, state) {
                    out_actions.push(Rc::clone(action));
                }
            }
        }
    }
}

impl SuccessorGenerator for GroundedSuccessorGenerator {
    fn problem(&self) -> &Rc<Problem> {
        &self.problem
    }

    fn get_applicable_actions(&self, state: &State) -> Vec<Action> {
        let mut applicable_actions = Vec::new();
        if let Some(root) = &self.root {
            collect_applicable(root, state, &mut applicable_actions);
        }
        applicable_actions
    }

    fn get_applicable_actions_until(
        &self,
        deadline: Instant,
        state: &State,
        out_actions: &mut Vec<Action>,
    ) -> bool {
        if Instant::now() >= deadline {
            return false;
        }
        out_actions.extend(self.get_applicable_actions(state));
        true
    }
}
