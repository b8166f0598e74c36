use smallvec::SmallVec;

/// Argument tuples of ground atoms. Most predicates have small arity, so the
/// arguments are stored inline.
pub type Arguments = SmallVec<[u32; 4]>;

/// A ground atom: a predicate applied to objects, both by index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom {
    pub predicate_index: usize,
    pub arguments: Arguments,
}

impl Atom {
    pub fn new(predicate_index: usize, arguments: Arguments) -> Self {
        Self {
            predicate_index,
            arguments,
        }
    }
}

/// A ground atom or its negation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub atom: Atom,
    pub negated: bool,
}

impl Literal {
    pub fn new(atom: Atom, negated: bool) -> Self {
        Self { atom, negated }
    }
}
