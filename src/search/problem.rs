use crate::parsed_types::Name;
use crate::search::{Arguments, Atom, Domain, Literal, Object};
use std::collections::HashMap;
use std::rc::Rc;

/// An interned problem together with its rank tables. The rank of a ground
/// atom is `offset[predicate] + Σᵢ argumentᵢ · |objects|^i`, which makes
/// atom ↔ rank a bijection and lets states be bitsets over ranks.
#[derive(Debug)]
pub struct Problem {
    pub name: Name,
    pub domain: Rc<Domain>,
    pub objects: Vec<Object>,
    pub initial_atoms: Vec<Atom>,
    pub goal: Vec<Literal>,
    /// Values of ground function atoms from `:init`, keyed by function index
    /// and argument tuple. Consulted when grounding cost expressions.
    pub atom_costs: HashMap<(usize, Arguments), f64>,
    object_table: HashMap<Name, u32>,
    predicate_offsets: Vec<u32>,
    rank_to_predicate: Vec<u32>,
    rank_to_arity: Vec<u32>,
    static_predicates: Vec<bool>,
}

impl Problem {
    pub(crate) fn new(
        name: Name,
        domain: Rc<Domain>,
        objects: Vec<Object>,
        initial_atoms: Vec<Atom>,
        goal: Vec<Literal>,
        atom_costs: HashMap<(usize, Arguments), f64>,
    ) -> Self {
        let num_objects = objects.len() as u64;

        let mut predicate_offsets = Vec::with_capacity(domain.predicates.len() + 1);
        predicate_offsets.push(0_u32);
        let mut offset: u64 = 0;
        for predicate in &domain.predicates {
            offset += num_objects.pow(predicate.arity() as u32);
            predicate_offsets.push(
                offset
                    .try_into()
                    .expect("rank space exceeds the representable range"),
            );
        }

        let num_ranks = *predicate_offsets.last().unwrap() as usize;
        let mut rank_to_predicate = vec![0_u32; num_ranks];
        let mut rank_to_arity = vec![0_u32; num_ranks];
        for predicate in &domain.predicates {
            let start = predicate_offsets[predicate.index] as usize;
            let end = predicate_offsets[predicate.index + 1] as usize;
            rank_to_predicate[start..end].fill(predicate.index as u32);
            rank_to_arity[start..end].fill(predicate.arity() as u32);
        }

        let static_predicates = domain
            .predicates
            .iter()
            .map(|predicate| predicate.is_static)
            .collect();

        let object_table = objects
            .iter()
            .map(|object| (object.name.clone(), object.index))
            .collect();

        Self {
            name,
            domain,
            objects,
            initial_atoms,
            goal,
            atom_costs,
            object_table,
            predicate_offsets,
            rank_to_predicate,
            rank_to_arity,
            static_predicates,
        }
    }

    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    /// Total number of ranks; a tight upper bound on any state's bitset width.
    pub fn num_ranks(&self) -> u32 {
        *self.predicate_offsets.last().unwrap()
    }

    pub fn object(&self, object_index: u32) -> &Object {
        &self.objects[object_index as usize]
    }

    pub fn object_index(&self, name: &Name) -> Option<u32> {
        self.object_table.get(name).copied()
    }

    pub fn get_rank(&self, atom: &Atom) -> u32 {
        let mut rank = self.predicate_offsets[atom.predicate_index];
        let num_objects = self.num_objects() as u32;
        let mut multiplier = 1_u32;
        for &argument in &atom.arguments {
            rank += multiplier * argument;
            multiplier *= num_objects;
        }
        rank
    }

    pub fn get_predicate_index(&self, rank: u32) -> usize {
        debug_assert!(rank < self.num_ranks(), "rank {rank} is out of range");
        self.rank_to_predicate[rank as usize] as usize
    }

    pub fn get_arity(&self, rank: u32) -> usize {
        debug_assert!(rank < self.num_ranks(), "rank {rank} is out of range");
        self.rank_to_arity[rank as usize] as usize
    }

    /// Reconstructs the argument tuple of `rank` by modular decomposition in
    /// base `|objects|`.
    pub fn get_argument_ids(&self, rank: u32) -> Arguments {
        let predicate_index = self.get_predicate_index(rank);
        let arity = self.get_arity(rank);
        let num_objects = self.num_objects() as u32;
        let mut remainder = rank - self.predicate_offsets[predicate_index];

        let mut arguments = Arguments::new();
        for _ in 0..arity {
            arguments.push(remainder % num_objects);
            remainder /= num_objects;
        }
        arguments
    }

    pub fn get_atom(&self, rank: u32) -> Atom {
        Atom::new(self.get_predicate_index(rank), self.get_argument_ids(rank))
    }

    pub fn is_static(&self, rank: u32) -> bool {
        self.static_predicates[self.get_predicate_index(rank)]
    }

    pub fn is_dynamic(&self, rank: u32) -> bool {
        !self.is_static(rank)
    }

    pub fn to_ranks(&self, atoms: &[Atom]) -> Vec<u32> {
        atoms.iter().map(|atom| self.get_rank(atom)).collect()
    }
}
