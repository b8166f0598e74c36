use crate::search::{Action, Atom, Bitset, Literal, Problem};
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash, Hasher};
use std::rc::Rc;
use std::sync::OnceLock;

fn state_hasher() -> &'static RandomState {
    static HASHER: OnceLock<RandomState> = OnceLock::new();
    HASHER.get_or_init(RandomState::new)
}

fn compute_state_hash(problem: &Rc<Problem>, bitset: &Bitset) -> u64 {
    let mut hasher = state_hasher().build_hasher();
    (Rc::as_ptr(problem) as usize).hash(&mut hasher);
    bitset.hash(&mut hasher);
    hasher.finish()
}

/// An immutable state: a bitset over the problem's atom ranks plus a cached
/// hash. Two states are equal iff they belong to the same problem and their
/// bitsets are equal.
#[derive(Debug, Clone)]
pub struct State {
    problem: Rc<Problem>,
    bitset: Bitset,
    hash: u64,
}

impl State {
    pub fn new(atoms: &[Atom], problem: Rc<Problem>) -> Self {
        let mut bitset = Bitset::new(problem.num_ranks() as usize);
        for atom in atoms {
            bitset.set(problem.get_rank(atom) as usize);
        }
        let hash = compute_state_hash(&problem, &bitset);
        Self {
            problem,
            bitset,
            hash,
        }
    }

    /// The initial state of `problem`.
    pub fn initial(problem: &Rc<Problem>) -> Self {
        Self::new(&problem.initial_atoms, Rc::clone(problem))
    }

    pub fn from_bitset(bitset: Bitset, problem: Rc<Problem>) -> Self {
        let hash = compute_state_hash(&problem, &bitset);
        Self {
            problem,
            bitset,
            hash,
        }
    }

    pub fn problem(&self) -> &Rc<Problem> {
        &self.problem
    }

    pub fn bitset(&self) -> &Bitset {
        &self.bitset
    }

    pub fn contains_rank(&self, rank: u32) -> bool {
        self.bitset.get(rank as usize)
    }

    pub fn contains(&self, atom: &Atom) -> bool {
        self.contains_rank(self.problem.get_rank(atom))
    }

    pub fn get_ranks(&self) -> Vec<u32> {
        self.bitset.iter_set_bits().map(|rank| rank as u32).collect()
    }

    pub fn get_static_ranks(&self) -> Vec<u32> {
        self.bitset
            .iter_set_bits()
            .map(|rank| rank as u32)
            .filter(|&rank| self.problem.is_static(rank))
            .collect()
    }

    pub fn get_dynamic_ranks(&self) -> Vec<u32> {
        self.bitset
            .iter_set_bits()
            .map(|rank| rank as u32)
            .filter(|&rank| self.problem.is_dynamic(rank))
            .collect()
    }

    /// The atoms of the state in rank order, materialised on demand.
    pub fn get_atoms(&self) -> Vec<Atom> {
        self.bitset
            .iter_set_bits()
            .map(|rank| self.problem.get_atom(rank as u32))
            .collect()
    }

    pub fn get_static_atoms(&self) -> Vec<Atom> {
        self.get_static_ranks()
            .into_iter()
            .map(|rank| self.problem.get_atom(rank))
            .collect()
    }

    pub fn get_dynamic_atoms(&self) -> Vec<Atom> {
        self.get_dynamic_ranks()
            .into_iter()
            .map(|rank| self.problem.get_atom(rank))
            .collect()
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && Rc::ptr_eq(&self.problem, &other.problem)
            && self.bitset == other.bitset
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

pub fn literal_holds(literal: &Literal, state: &State) -> bool {
    state.contains(&literal.atom) != literal.negated
}

pub fn literals_hold(literals: &[Literal], state: &State) -> bool {
    literals.iter().all(|literal| literal_holds(literal, state))
}

/// Like [`literals_hold`] but only tests literals of at least `min_arity`.
/// Used to recheck the residual literals an approximate filter could not
/// decide.
pub fn literals_hold_of_arity(literals: &[Literal], state: &State, min_arity: usize) -> bool {
    literals
        .iter()
        .filter(|literal| literal.atom.arguments.len() >= min_arity)
        .all(|literal| literal_holds(literal, state))
}

pub fn atoms_hold(atoms: &[Atom], state: &State) -> bool {
    atoms.iter().all(|atom| state.contains(atom))
}

/// Applicability as a pure bitset identity: `(s ∪ pos) ∩ neg-mask = s`, which
/// is `s ⊇ pos ∧ s ∩ forbidden = ∅`. The precondition bitsets' default tails
/// make this total even when the state bitset is shorter.
pub fn is_applicable(action: &Action, state: &State) -> bool {
    assert_eq!(
        action.arguments.len(),
        action.schema.arity(),
        "is_applicable: action is not ground"
    );

    let mut bitset = state.bitset().clone();
    bitset |= action.positive_precondition();
    bitset &= action.negative_precondition();
    *state.bitset() == bitset
}

/// Applies `action` to `state`. Delete lists are applied before add lists so
/// that an action simultaneously deleting and adding the same rank leaves it
/// set. Conditional effects are evaluated against the pre-state.
pub fn apply(action: &Action, state: &State) -> State {
    assert_eq!(
        action.arguments.len(),
        action.schema.arity(),
        "apply: action is not ground"
    );

    let mut bitset = state.bitset().clone();
    let conditional = action.conditional_bitsets();

    if conditional.is_empty() {
        bitset &= action.negative_effect();
        bitset |= action.positive_effect();
    } else {
        let applicable: Vec<usize> = conditional
            .iter()
            .enumerate()
            .filter(|(_, effect)| {
                let mut condition = bitset.clone();
                condition |= &effect.positive_precondition;
                condition &= &effect.negative_precondition;
                bitset == condition
            })
            .map(|(index, _)| index)
            .collect();

        bitset &= action.negative_effect();
        for &index in &applicable {
            bitset &= &conditional[index].negative_effect;
        }

        bitset |= action.positive_effect();
        for &index in &applicable {
            bitset |= &conditional[index].positive_effect;
        }
    }

    State::from_bitset(bitset, Rc::clone(state.problem()))
}
